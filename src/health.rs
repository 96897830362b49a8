use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    status: String,
}

pub async fn hello() -> &'static str {
    "hello!"
}

#[utoipa::path(
    get,
    path = "/healthz",
    tag = "health",
    responses(
        (status = 200, description = "Health check successful", body = HealthResponse)
    )
)]
pub async fn health_check() -> Json<HealthResponse> {
    // The service holds no connections, so being able to answer is enough.
    debug!("Health check passed");
    Json(HealthResponse {
        status: "OK".to_string(),
    })
}
