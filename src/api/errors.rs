use axum::{
    Json,
    extract::{
        multipart::MultipartError,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use crate::api::dtos::{ErrorResponse, MISSING_FILES_MESSAGE};
use crate::extractor::ExtractionError;
use crate::spec::SpecError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{}", MISSING_FILES_MESSAGE)]
    MissingFiles,

    #[error("only one '{0}' part is allowed")]
    DuplicateFile(String),

    /// The request itself was refused before extraction started.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingFiles | Self::DuplicateFile(_) => StatusCode::BAD_REQUEST,
            Self::Rejected { status, .. } => *status,
            Self::Extraction(err) if err.is_policy_violation() => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Extraction(_) => StatusCode::BAD_REQUEST,
            Self::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> Option<&'static str> {
        match self {
            Self::MissingFiles | Self::DuplicateFile(_) => Some("invalid_upload"),
            Self::Rejected { .. } => Some("invalid_request"),
            Self::Extraction(err) => Some(err.kind()),
            Self::Task(_) => None,
        }
    }
}

impl From<SpecError> for ApiError {
    fn from(err: SpecError) -> Self {
        Self::Extraction(err.into())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        Self::Rejected {
            status: err.status(),
            message: err.body_text(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let field = match &self {
            Self::Extraction(err) => err.field(),
            Self::DuplicateFile(name) => Some(name.clone()),
            _ => None,
        };
        let message = match &self {
            // Internal details stay in the logs.
            Self::Task(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        (
            status,
            Json(ErrorResponse {
                status: status.as_u16(),
                message,
                error: self.kind().map(str::to_string),
                field,
            }),
        )
            .into_response()
    }
}
