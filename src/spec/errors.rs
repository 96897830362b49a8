use thiserror::Error;

/// A selector specification that cannot be interpreted. Always reported before
/// the document is touched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpecError {
    #[error("malformed specification: {0}")]
    Payload(String),

    #[error("malformed specification for field '{field}': {reason}")]
    Field { field: String, reason: String },
}

impl SpecError {
    pub(crate) fn field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Field {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Path of the offending field, e.g. `prices` or `prices.price`.
    pub fn field_name(&self) -> Option<&str> {
        match self {
            Self::Payload(_) => None,
            Self::Field { field, .. } => Some(field),
        }
    }
}
