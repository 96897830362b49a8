use regex::Regex;
use std::sync::LazyLock;

/// A line break followed by at least one whitespace character. The indentation
/// of pretty-printed markup lands in extracted text as exactly this pattern.
static BREAK_INDENT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n\s+").expect("Failed to compile break regex"));

/// Clean text pulled out of a node.
///
/// Every line break that is followed by whitespace is removed together with
/// that whitespace, then the whole string is trimmed. Spaces between words on
/// the same line are left alone, and a bare break with nothing after it stays.
pub fn normalize_text(text: &str) -> String {
    BREAK_INDENT_REGEX.replace_all(text, "").trim().to_string()
}


#[cfg(feature = "fuzz")]
mod fuzz {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_normalize_is_idempotent(text in "[a-z \\t\\r\\n]{0,64}") {
            let once = normalize_text(&text);
            prop_assert_eq!(normalize_text(&once), once);
        }

        #[test]
        fn test_normalized_has_no_indented_break(text in "[a-z \\t\\n]{0,64}") {
            let out = normalize_text(&text);
            prop_assert!(!BREAK_INDENT_REGEX.is_match(&out));
            prop_assert_eq!(out.trim(), out.as_str());
        }
    }
}
