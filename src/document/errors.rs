use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("document is not valid {encoding}: {reason}")]
    Decode {
        encoding: &'static str,
        reason: String,
    },
}

/// The selector backend refused a selector string. This is never raised for a
/// selector that is valid but matches nothing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid selector '{selector}': {reason}")]
pub struct QueryError {
    pub selector: String,
    pub reason: String,
}
