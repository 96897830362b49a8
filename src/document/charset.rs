use encoding_rs::Encoding;
use regex::Regex;
use std::sync::LazyLock;

use crate::document::errors::ParseError;

/// A `charset=` label, as found in a `Content-Type` value or inside a
/// `<meta>` tag (both `<meta charset>` and the `http-equiv` form).
static CHARSET_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\bcharset\s*=\s*["']?([\w.:-]+)"#).unwrap());

static META_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<meta\b[^>]*>").unwrap());

/// How many leading bytes are searched for a `<meta>` charset declaration.
const SNIFF_LEN: usize = 4096;

/// Decode uploaded document bytes to UTF-8 text.
///
/// A byte order mark always wins. Otherwise the encoding comes from the
/// upload's `content_type`, then from a `<meta>` declaration near the top of
/// the document, and finally from statistical detection. Returns the text and
/// the encoding actually used.
pub fn decode_document(
    raw: &[u8],
    content_type: Option<&str>,
) -> Result<(String, &'static Encoding), ParseError> {
    let declared = content_type
        .and_then(label_encoding)
        .or_else(|| meta_encoding(raw))
        .unwrap_or_else(|| detect_encoding(raw));

    let (decoded, used, had_errors) = declared.decode(raw);
    if had_errors {
        return Err(ParseError::Decode {
            encoding: used.name(),
            reason: "malformed byte sequence".to_string(),
        });
    }

    Ok((decoded.into_owned(), used))
}

fn label_encoding(text: &str) -> Option<&'static Encoding> {
    let label = CHARSET_LABEL.captures(text)?.get(1)?;
    Encoding::for_label(label.as_str().as_bytes())
}

fn meta_encoding(raw: &[u8]) -> Option<&'static Encoding> {
    let head = String::from_utf8_lossy(&raw[..raw.len().min(SNIFF_LEN)]);
    META_TAG
        .find_iter(&head)
        .find_map(|tag| label_encoding(tag.as_str()))
        // a page cannot describe itself as UTF-16 in ASCII-compatible bytes
        .map(Encoding::output_encoding)
}

fn detect_encoding(raw: &[u8]) -> &'static Encoding {
    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(raw, true);
    detector.guess(None, true)
}
