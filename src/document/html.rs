use encoding_rs::Encoding;
use scraper::{ElementRef, Html, Selector};

use crate::document::{
    DocumentModel,
    charset::decode_document,
    errors::{ParseError, QueryError},
};

/// A parsed HTML document backed by `scraper`.
///
/// Parsing is as permissive as a browser: unclosed tags, stray text and
/// missing `<html>`/`<body>` wrappers all produce a usable tree.
#[derive(Debug)]
pub struct HtmlDocument {
    html: Html,
    encoding: &'static Encoding,
}

impl HtmlDocument {
    /// Decode `raw` bytes and parse them as a full HTML document.
    pub fn parse(raw: &[u8], content_type: Option<&str>) -> Result<Self, ParseError> {
        let (markup, encoding) = decode_document(raw, content_type)?;
        Ok(Self {
            html: Html::parse_document(&markup),
            encoding,
        })
    }

    /// Parse markup that is already text.
    pub fn parse_str(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
            encoding: encoding_rs::UTF_8,
        }
    }

    /// Encoding the document bytes were decoded with.
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }
}

impl DocumentModel for HtmlDocument {
    type Selector = Selector;
    type Node<'a> = ElementRef<'a>;

    fn compile(&self, selector: &str) -> Result<Selector, QueryError> {
        Selector::parse(selector).map_err(|err| QueryError {
            selector: selector.to_string(),
            reason: err.to_string(),
        })
    }

    fn select<'a>(&'a self, selector: &Selector, scope: Option<ElementRef<'a>>) -> Vec<ElementRef<'a>> {
        match scope {
            Some(node) => node.select(selector).collect(),
            None => self.html.select(selector).collect(),
        }
    }

    fn select_first<'a>(
        &'a self,
        selector: &Selector,
        scope: Option<ElementRef<'a>>,
    ) -> Option<ElementRef<'a>> {
        match scope {
            Some(node) => node.select(selector).next(),
            None => self.html.select(selector).next(),
        }
    }

    fn text(&self, node: ElementRef<'_>) -> String {
        node.text().collect()
    }
}
