//! Health check endpoints

use crate::state::HasServices;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    security(()),
    responses((status = 200, description = "Process is alive", body = HealthResponse))
)]
/// Liveness check
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/ready",
    tag = "System",
    security(()),
    responses(
        (status = 200, description = "Database reachable"),
        (status = 503, description = "Database unreachable")
    )
)]
/// Readiness check
pub async fn ready<S: HasServices>(State(state): State<S>) -> impl IntoResponse {
    if state.check_ready().await {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not_ready")
    }
}
