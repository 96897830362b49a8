use scraper::{ElementRef, Selector};
use serde_json::json;
use std::{cell::Cell, fs};

use crate::document::{DocumentModel, HtmlDocument, QueryError};
use crate::extractor::{
    ExtractMode, ExtractionError, ExtractionResult, Record, extract, extract_bytes, extract_html,
};
use crate::spec::SelectorSpec;

const PRICE_TABLE: &str =
    "<table><tr><th>H</th></tr><tr><td>Apple</td><td>1.00</td></tr></table>";

fn read_fixture(name: &str) -> String {
    fs::read_to_string(format!("src/extractor/tests/fixtures/{name}"))
        .expect("Failed to read test fixture")
}

fn fixture_spec(name: &str) -> SelectorSpec {
    SelectorSpec::decode(read_fixture(name).as_bytes()).expect("Fixture spec should decode")
}

fn record(pairs: &[(&str, &str)]) -> Record {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn prices_spec() -> SelectorSpec {
    SelectorSpec::from_value(json!({
        "prices": {"root": "tr", "itemName": "td:nth-child(1)", "price": "td:nth-child(2)"}
    }))
    .unwrap()
}

#[test]
fn test_price_table_end_to_end() {
    let result = extract_html(PRICE_TABLE, &prices_spec(), ExtractMode::Lenient).unwrap();

    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({"prices": [{"itemName": "Apple", "price": "1.00"}]})
    );
}

#[test]
fn test_header_row_skipped_and_order_kept() {
    let html = r#"
        <ul>
            <li class="row"><b>Name</b></li>
            <li class="row"><b>first</b></li>
            <li class="row"><b>second</b></li>
        </ul>
    "#;
    let spec = SelectorSpec::builder()
        .group("rows", "li.row", [("name", "b")])
        .build()
        .unwrap();

    let result = extract_html(html, &spec, ExtractMode::Lenient).unwrap();
    assert_eq!(
        result.records("rows").unwrap(),
        &[record(&[("name", "first")]), record(&[("name", "second")])]
    );
}

#[test]
fn test_group_without_rows() {
    let spec = SelectorSpec::builder()
        .group("rows", "tr.missing", [("name", "td")])
        .build()
        .unwrap();

    let lenient = extract_html(PRICE_TABLE, &spec, ExtractMode::Lenient).unwrap();
    assert_eq!(lenient.records("rows"), Some(&[][..]));

    let err = extract_html(PRICE_TABLE, &spec, ExtractMode::strict()).unwrap_err();
    assert_eq!(
        err,
        ExtractionError::NoRecordsFound {
            field: "rows".to_string()
        }
    );

    let relaxed = ExtractMode::Strict {
        require_records: false,
    };
    let result = extract_html(PRICE_TABLE, &spec, relaxed).unwrap();
    assert_eq!(result.records("rows"), Some(&[][..]));
}

#[test]
fn test_header_only_group_counts_as_empty() {
    let spec = SelectorSpec::builder()
        .group("headers", "tr:first-child", [("name", "th")])
        .build()
        .unwrap();

    let result = extract_html(PRICE_TABLE, &spec, ExtractMode::Lenient).unwrap();
    assert_eq!(result.records("headers"), Some(&[][..]));

    let err = extract_html(PRICE_TABLE, &spec, ExtractMode::strict()).unwrap_err();
    assert!(matches!(err, ExtractionError::NoRecordsFound { .. }));
}

#[test]
fn test_missing_scalar() {
    let spec = SelectorSpec::builder()
        .scalar("subtitle", "h2")
        .build()
        .unwrap();

    let result = extract_html(PRICE_TABLE, &spec, ExtractMode::Lenient).unwrap();
    assert_eq!(result.text("subtitle"), Some(""));

    let err = extract_html(PRICE_TABLE, &spec, ExtractMode::strict()).unwrap_err();
    assert_eq!(
        err,
        ExtractionError::MissingRequiredField {
            field: "subtitle".to_string(),
            column: None,
            record: None,
        }
    );
}

#[test]
fn test_scalar_uses_first_match_only() {
    let html = "<div class='price'>$19.99</div><div class='price'>$29.99</div>";
    let spec = SelectorSpec::builder()
        .scalar("price", ".price")
        .build()
        .unwrap();

    let result = extract_html(html, &spec, ExtractMode::strict()).unwrap();
    assert_eq!(result.text("price"), Some("$19.99"));
}

#[test]
fn test_malformed_spec_reported_before_parsing() {
    // Not decodable as UTF-8, so parsing would fail if it were attempted.
    let html = [b'<', b'p', b'>', 0xFF, 0xFE, 0xFD];
    let content_type = Some("text/html; charset=utf-8");

    let err = extract_bytes(&html, content_type, br#"{"count": 5}"#, ExtractMode::Lenient)
        .unwrap_err();
    assert!(matches!(err, ExtractionError::MalformedSpecification(_)));
    assert_eq!(err.field().as_deref(), Some("count"));

    let err = extract_bytes(&html, content_type, br#"{"title": "h1"}"#, ExtractMode::Lenient)
        .unwrap_err();
    assert!(matches!(err, ExtractionError::Parse(_)));
}

#[test]
fn test_invalid_selector_is_not_a_miss() {
    let spec = SelectorSpec::builder()
        .group("prices", "tr", [("price", "td:nth-child(")])
        .build()
        .unwrap();

    let err = extract_html(PRICE_TABLE, &spec, ExtractMode::Lenient).unwrap_err();
    match err {
        ExtractionError::SelectorEngineFailure {
            field,
            column,
            selector,
            ..
        } => {
            assert_eq!(field, "prices");
            assert_eq!(column.as_deref(), Some("price"));
            assert_eq!(selector, "td:nth-child(");
        }
        other => panic!("expected a selector failure, got {other:?}"),
    }
}

#[test]
fn test_invalid_scalar_selector() {
    let spec = SelectorSpec::builder()
        .scalar("title", "h1[")
        .build()
        .unwrap();

    let err = extract_html(PRICE_TABLE, &spec, ExtractMode::Lenient).unwrap_err();
    assert_eq!(err.kind(), "selector_engine_failure");
    assert_eq!(err.field().as_deref(), Some("title"));
}

#[test]
fn test_empty_rows_are_kept() {
    let html = "<table><tr><th>H</th></tr><tr><td></td></tr><tr><th>x</th></tr></table>";
    let spec = SelectorSpec::builder()
        .group("rows", "tr", [("a", "td:nth-child(1)"), ("b", "td:nth-child(2)")])
        .build()
        .unwrap();

    let result = extract_html(html, &spec, ExtractMode::Lenient).unwrap();
    assert_eq!(
        result.records("rows").unwrap(),
        &[
            record(&[("a", ""), ("b", "")]),
            record(&[("a", ""), ("b", "")])
        ]
    );
}

#[test]
fn test_modes_agree_when_every_selector_matches_once() {
    let html = r#"
        <h1>Title</h1>
        <p class="lead">Lead</p>
        <table><tr><th>only header</th></tr></table>
    "#;
    let spec = SelectorSpec::builder()
        .scalar("title", "h1")
        .scalar("lead", "p.lead")
        .group("rows", "tr", [("cell", "th")])
        .build()
        .unwrap();

    let lenient = extract_html(html, &spec, ExtractMode::Lenient).unwrap();
    let strict = extract_html(
        html,
        &spec,
        ExtractMode::Strict {
            require_records: false,
        },
    )
    .unwrap();
    assert_eq!(lenient, strict);
}

#[test]
fn test_extraction_is_idempotent() {
    let document = HtmlDocument::parse_str(&read_fixture("price_list.html"));
    let spec = fixture_spec("price_list.json");

    let first = serde_json::to_vec(&extract(&document, &spec, ExtractMode::Lenient).unwrap()).unwrap();
    let second =
        serde_json::to_vec(&extract(&document, &spec, ExtractMode::Lenient).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_price_list_fixture() {
    let html = read_fixture("price_list.html");
    let result = extract_bytes(
        html.as_bytes(),
        None,
        read_fixture("price_list.json").as_bytes(),
        ExtractMode::Lenient,
    )
    .unwrap();

    assert_eq!(result.text("store"), Some("Corner Market"));
    // Words split by a line break are joined without a space.
    assert_eq!(result.text("intro"), Some("Prices validuntil Sunday."));
    assert_eq!(
        result.records("prices").unwrap(),
        &[
            record(&[("item", "Apple"), ("price", "1.00"), ("unit", "each")]),
            record(&[("item", "Whole Milk"), ("price", "2.49"), ("unit", "litre")]),
            record(&[("item", "Bread"), ("price", "3.10"), ("unit", "")]),
        ]
    );
}

#[test]
fn test_price_list_fixture_strict() {
    let document = HtmlDocument::parse_str(&read_fixture("price_list.html"));
    let spec = fixture_spec("price_list.json");

    let err = extract(&document, &spec, ExtractMode::strict()).unwrap_err();
    assert_eq!(
        err,
        ExtractionError::MissingRequiredField {
            field: "prices".to_string(),
            column: Some("unit".to_string()),
            record: Some(2),
        }
    );
    assert!(err.is_policy_violation());
}

#[test]
fn test_article_fixture() {
    let document = HtmlDocument::parse_str(&read_fixture("article.html"));
    let spec = fixture_spec("article.json");

    let result = extract(&document, &spec, ExtractMode::Lenient).unwrap();
    assert_eq!(result.len(), spec.len());
    assert_eq!(result.text("title"), Some("Sample Article"));
    assert_eq!(
        result.text("firstParagraph"),
        Some("This is the first paragraph,wrapped across lines.")
    );
    assert_eq!(result.text("byline"), Some(""));
    assert_eq!(
        result.records("tags").unwrap(),
        &[record(&[("name", "news")]), record(&[("name", "rust")])]
    );

    let err = extract(&document, &spec, ExtractMode::strict()).unwrap_err();
    assert_eq!(err.field().as_deref(), Some("byline"));
}

#[test]
fn test_result_keys_match_spec_keys() {
    let document = HtmlDocument::parse_str(&read_fixture("article.html"));
    let spec = fixture_spec("article.json");

    let result = extract(&document, &spec, ExtractMode::Lenient).unwrap();
    let mut expected: Vec<&str> = spec.fields().iter().map(|f| f.name.as_str()).collect();
    expected.sort_unstable();
    assert_eq!(result.keys().collect::<Vec<_>>(), expected);
}

#[test]
fn test_result_outlives_document() {
    let result: ExtractionResult = {
        let document = HtmlDocument::parse_str(PRICE_TABLE);
        extract(&document, &prices_spec(), ExtractMode::Lenient).unwrap()
    };
    assert_eq!(result.records("prices").unwrap().len(), 1);
}

/// Wraps the scraper backend and counts selector compilations.
struct CountingDocument {
    inner: HtmlDocument,
    compiled: Cell<usize>,
}

impl DocumentModel for CountingDocument {
    type Selector = Selector;
    type Node<'a> = ElementRef<'a>;

    fn compile(&self, selector: &str) -> Result<Selector, QueryError> {
        self.compiled.set(self.compiled.get() + 1);
        self.inner.compile(selector)
    }

    fn select<'a>(&'a self, selector: &Selector, scope: Option<ElementRef<'a>>) -> Vec<ElementRef<'a>> {
        self.inner.select(selector, scope)
    }

    fn text(&self, node: ElementRef<'_>) -> String {
        self.inner.text(node)
    }
}

#[test]
fn test_selectors_compiled_once_per_field() {
    let document = CountingDocument {
        inner: HtmlDocument::parse_str(&read_fixture("price_list.html")),
        compiled: Cell::new(0),
    };
    let spec = fixture_spec("price_list.json");

    let result = extract(&document, &spec, ExtractMode::Lenient).unwrap();
    assert_eq!(result.records("prices").unwrap().len(), 3);
    // store + intro + prices.root + three columns
    assert_eq!(document.compiled.get(), 6);
}

#[test]
fn test_invalid_selector_wins_over_earlier_missing_field() {
    let spec = SelectorSpec::from_value(json!({"a": "h2", "b": "h1["})).unwrap();

    let err = extract_html(PRICE_TABLE, &spec, ExtractMode::strict()).unwrap_err();
    assert_eq!(err.kind(), "selector_engine_failure");
    assert_eq!(err.field().as_deref(), Some("b"));
    assert!(!err.is_policy_violation());
}

#[test]
fn test_invalid_column_checked_before_matching() {
    let spec = SelectorSpec::from_value(json!({
        "a": {"root": "tr", "price": "td.missing"},
        "b": {"root": "tr", "price": "td:nth-child("}
    }))
    .unwrap();

    let err = extract_html(PRICE_TABLE, &spec, ExtractMode::strict()).unwrap_err();
    assert!(matches!(
        err,
        ExtractionError::SelectorEngineFailure { ref field, ref column, .. }
            if field == "b" && column.as_deref() == Some("price")
    ));
}

#[cfg(feature = "fuzz")]
mod fuzz {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_extract_never_panics(html in ".*") {
            let spec = fixture_spec("price_list.json");
            let _ = extract_html(&html, &spec, ExtractMode::Lenient);
            let _ = extract_html(&html, &spec, ExtractMode::strict());
        }

        #[test]
        fn test_lenient_output_shape(html in "(<tr><td>[a-z ]{0,8}</td></tr>){0,6}") {
            let spec = prices_spec();
            let table = format!("<table>{html}</table>");
            let result = extract_html(&table, &spec, ExtractMode::Lenient).unwrap();
            let rows = html.matches("<tr>").count();
            prop_assert_eq!(result.records("prices").unwrap().len(), rows.saturating_sub(1));
        }
    }
}
