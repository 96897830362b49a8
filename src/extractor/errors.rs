use thiserror::Error;

use crate::{document::ParseError, spec::SpecError};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error(transparent)]
    MalformedSpecification(#[from] SpecError),

    #[error("unparsable document: {0}")]
    Parse(#[from] ParseError),

    #[error("selector for '{}' rejected by selector engine: '{selector}': {reason}", field_path(field, column.as_deref()))]
    SelectorEngineFailure {
        field: String,
        column: Option<String>,
        selector: String,
        reason: String,
    },

    #[error("{}", missing_message(field, column.as_deref(), *record))]
    MissingRequiredField {
        field: String,
        column: Option<String>,
        /// Index of the data record (header row excluded).
        record: Option<usize>,
    },

    #[error("no records found for '{field}'")]
    NoRecordsFound { field: String },
}

impl ExtractionError {
    /// Stable label for the failure, used in API responses and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedSpecification(_) => "malformed_specification",
            Self::Parse(_) => "parse_error",
            Self::SelectorEngineFailure { .. } => "selector_engine_failure",
            Self::MissingRequiredField { .. } => "missing_required_field",
            Self::NoRecordsFound { .. } => "no_records_found",
        }
    }

    /// Strict-mode policy violations. The input is well formed but the page
    /// does not contain what the caller required.
    pub fn is_policy_violation(&self) -> bool {
        matches!(
            self,
            Self::MissingRequiredField { .. } | Self::NoRecordsFound { .. }
        )
    }

    /// Field the failure belongs to, as `field` or `field.column`.
    pub fn field(&self) -> Option<String> {
        match self {
            Self::MalformedSpecification(err) => err.field_name().map(str::to_string),
            Self::Parse(_) => None,
            Self::SelectorEngineFailure { field, column, .. }
            | Self::MissingRequiredField { field, column, .. } => {
                Some(field_path(field, column.as_deref()))
            }
            Self::NoRecordsFound { field } => Some(field.clone()),
        }
    }
}

fn field_path(field: &str, column: Option<&str>) -> String {
    match column {
        Some(column) => format!("{field}.{column}"),
        None => field.to_string(),
    }
}

fn missing_message(field: &str, column: Option<&str>, record: Option<usize>) -> String {
    match (column, record) {
        (Some(column), Some(record)) => {
            format!("missing required field '{field}[{record}].{column}'")
        }
        _ => format!("missing required field '{}'", field_path(field, column)),
    }
}
