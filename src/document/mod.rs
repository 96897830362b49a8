//! Document model consumed by the extraction engine.
//!
//! The engine only talks to [`DocumentModel`], so a different DOM or selector
//! backend can be dropped in without touching the extractor. The default
//! backend is [`HtmlDocument`], built on `scraper`.

pub mod charset;
pub mod errors;
pub mod html;

pub use errors::{ParseError, QueryError};
pub use html::HtmlDocument;

/// Read-only query capability over a parsed document.
pub trait DocumentModel {
    /// A selector compiled by this backend.
    type Selector;

    /// A handle to one node of the tree. Handles borrow the document and are
    /// cheap to copy.
    type Node<'a>: Copy
    where
        Self: 'a;

    /// Compile a selector string, failing if the backend rejects its syntax.
    fn compile(&self, selector: &str) -> Result<Self::Selector, QueryError>;

    /// All nodes matching `selector`, in document order. With a `scope` only
    /// descendants of that node are searched.
    fn select<'a>(
        &'a self,
        selector: &Self::Selector,
        scope: Option<Self::Node<'a>>,
    ) -> Vec<Self::Node<'a>>;

    /// First node matching `selector`, if any.
    fn select_first<'a>(
        &'a self,
        selector: &Self::Selector,
        scope: Option<Self::Node<'a>>,
    ) -> Option<Self::Node<'a>> {
        self.select(selector, scope).into_iter().next()
    }

    /// Concatenated text content of `node` and all of its descendants.
    fn text(&self, node: Self::Node<'_>) -> String;
}
