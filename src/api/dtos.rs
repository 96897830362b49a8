use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use crate::extractor::{ExtractionResult, ModeKind};

/// Multipart part carrying the HTML document.
pub const HTML_FILE_FIELD: &str = "htmlFile";
/// Multipart part carrying the JSON selector specification.
pub const SPEC_FILE_FIELD: &str = "jsonFile";

pub const SUCCESS_MESSAGE: &str = "Files are available.";
pub const MISSING_FILES_MESSAGE: &str = "no files available.";

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ExtractResponse {
    pub status: u16,
    pub message: String,
    /// Field name to text, or to an array of records for repeated groups.
    #[schema(value_type = Object)]
    pub data: ExtractionResult,
}

impl ExtractResponse {
    pub fn ok(data: ExtractionResult) -> Self {
        Self {
            status: 200,
            message: SUCCESS_MESSAGE.to_string(),
            data,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub status: u16,
    pub message: String,
    /// Machine readable failure kind, e.g. `missing_required_field`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Field the failure belongs to, as `field` or `field.column`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// JSON alternative to the multipart upload.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ExtractRequest {
    pub html: String,
    #[schema(value_type = Object)]
    pub spec: Value,
    pub mode: Option<ModeKind>,
    pub require_records: Option<bool>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ModeQuery {
    /// Overrides the configured extraction mode.
    pub mode: Option<ModeKind>,
    /// Strict mode only: fail when a repeated group yields no records.
    pub require_records: Option<bool>,
}
