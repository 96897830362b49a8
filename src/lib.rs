//! Declarative structured extraction from HTML documents.
//!
//! A [`spec::SelectorSpec`] maps output field names to CSS selectors, either a
//! single selector (a scalar field) or a `root` row selector plus per-row
//! column selectors (a repeated group). [`extractor::extract`] runs it against
//! a [`document::HtmlDocument`] and returns an [`extractor::ExtractionResult`].
//!
//! ```
//! use pagesift::{extractor::{ExtractMode, extract_html}, spec::SelectorSpec};
//!
//! let spec = SelectorSpec::decode(
//!     br#"{"prices": {"root": "tr", "itemName": "td:nth-child(1)", "price": "td:nth-child(2)"}}"#,
//! )
//! .unwrap();
//! let html = "<table><tr><th>H</th></tr><tr><td>Apple</td><td>1.00</td></tr></table>";
//!
//! let result = extract_html(html, &spec, ExtractMode::Lenient).unwrap();
//! assert_eq!(result.records("prices").unwrap()[0]["itemName"], "Apple");
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod document;
pub mod extractor;
pub mod health;
pub mod spec;
pub mod telemetry;
