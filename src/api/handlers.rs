use axum::{
    Json,
    extract::{
        Multipart, Query, State,
        multipart::MultipartRejection,
        rejection::{JsonRejection, QueryRejection},
    },
};
use bytes::Bytes;
use tracing::{debug, info};

use crate::{
    api::{
        dtos::{ErrorResponse, ExtractRequest, ExtractResponse, HTML_FILE_FIELD, ModeQuery, SPEC_FILE_FIELD},
        errors::ApiError,
    },
    app_state::AppState,
    extractor::{extract_bytes, extract_html},
    spec::SelectorSpec,
};

/// Extract from an uploaded document and specification.
///
/// Expects a multipart form with an `htmlFile` part (the page) and a
/// `jsonFile` part (the selector specification).
#[utoipa::path(
    post,
    path = "/html-page",
    tag = "extract",
    params(ModeQuery),
    responses(
        (status = 200, description = "Extraction succeeded", body = ExtractResponse),
        (status = 400, description = "Missing upload, malformed specification or invalid selector", body = ErrorResponse),
        (status = 413, description = "Upload too large", body = ErrorResponse),
        (status = 422, description = "Strict mode requirement not met", body = ErrorResponse)
    )
)]
pub async fn upload_page(
    State(state): State<AppState>,
    query: Result<Query<ModeQuery>, QueryRejection>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ExtractResponse>, ApiError> {
    let Query(query) = query?;
    // A request that is not multipart at all carries no files.
    let mut multipart = multipart.map_err(|_| ApiError::MissingFiles)?;

    let mut html: Option<(Bytes, Option<String>)> = None;
    let mut spec: Option<Bytes> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(HTML_FILE_FIELD) => {
                if html.is_some() {
                    return Err(ApiError::DuplicateFile(HTML_FILE_FIELD.to_string()));
                }
                let content_type = field.content_type().map(str::to_string);
                html = Some((field.bytes().await?, content_type));
            }
            Some(SPEC_FILE_FIELD) => {
                if spec.is_some() {
                    return Err(ApiError::DuplicateFile(SPEC_FILE_FIELD.to_string()));
                }
                spec = Some(field.bytes().await?);
            }
            other => debug!(field = ?other, "Ignoring unexpected multipart field"),
        }
    }

    let (Some((html, content_type)), Some(spec)) = (html, spec) else {
        return Err(ApiError::MissingFiles);
    };

    let mode = state.resolve_mode(query.mode, query.require_records);
    info!(
        html_bytes = html.len(),
        spec_bytes = spec.len(),
        ?mode,
        "Extracting uploaded page"
    );

    let result = tokio::task::spawn_blocking(move || {
        extract_bytes(&html, content_type.as_deref(), &spec, mode)
    })
    .await??;

    Ok(Json(ExtractResponse::ok(result)))
}

/// Extract from a JSON request carrying the markup and the specification.
#[utoipa::path(
    post,
    path = "/v1/extract",
    tag = "extract",
    params(ModeQuery),
    request_body = ExtractRequest,
    responses(
        (status = 200, description = "Extraction succeeded", body = ExtractResponse),
        (status = 400, description = "Malformed specification or invalid selector", body = ErrorResponse),
        (status = 422, description = "Strict mode requirement not met", body = ErrorResponse)
    )
)]
pub async fn extract_json(
    State(state): State<AppState>,
    query: Result<Query<ModeQuery>, QueryRejection>,
    payload: Result<Json<ExtractRequest>, JsonRejection>,
) -> Result<Json<ExtractResponse>, ApiError> {
    let Query(query) = query?;
    let Json(payload) = payload?;

    let spec = SelectorSpec::from_value(payload.spec)?;
    let mode = state.resolve_mode(
        payload.mode.or(query.mode),
        payload.require_records.or(query.require_records),
    );
    info!(html_bytes = payload.html.len(), fields = spec.len(), ?mode, "Extracting page");

    let html = payload.html;
    let result = tokio::task::spawn_blocking(move || extract_html(&html, &spec, mode)).await??;

    Ok(Json(ExtractResponse::ok(result)))
}
