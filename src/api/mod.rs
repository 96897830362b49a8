//! HTTP surface: routes, request/response types and error mapping.

pub mod dtos;
pub mod errors;
pub mod handlers;

use axum::{
    Json, Router,
    body::Body,
    extract::DefaultBodyLimit,
    http::Request,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info_span;
use utoipa::OpenApi;

use crate::{app_state::AppState, extractor::ModeKind, health};

pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

#[derive(OpenApi)]
#[openapi(
    paths(health::health_check, handlers::upload_page, handlers::extract_json),
    components(schemas(
        health::HealthResponse,
        dtos::ExtractResponse,
        dtos::ErrorResponse,
        dtos::ExtractRequest,
        ModeKind
    )),
    tags(
        (name = "extract", description = "Structured extraction from HTML documents"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the service router with tracing, request ids and the body limit.
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(health::hello))
        .route("/healthz", get(health::health_check))
        .route("/html-page", post(handlers::upload_page))
        .route("/v1/extract", post(handlers::extract_json))
        .route(OPENAPI_PATH, get(openapi))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    let request_id = request
                        .headers()
                        .get("x-request-id")
                        .and_then(|value| value.to_str().ok())
                        .unwrap_or("-");
                    info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id,
                    )
                }))
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .with_state(state)
}
