//! System endpoints: plaintext liveness check and JSON health.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::app_state::AppState;

/// Body returned by `GET /test`.
pub const LIVENESS_TEXT: &str = "Server is running!";

/// Health check response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Always `"healthy"` when the process answers.
    pub status: String,
    /// RFC 3339 server time.
    pub timestamp: String,
    /// Crate version.
    pub version: String,
    /// Participants in the registry.
    pub participants: usize,
    /// Open WebSocket connections.
    pub connections: usize,
}

/// `GET /test`: plaintext liveness check.
#[utoipa::path(
    get,
    path = "/test",
    tag = "System",
    summary = "Liveness check",
    description = "Returns a fixed confirmation string with 200 while the process is serving.",
    responses(
        (status = 200, description = "Server is running", body = String, content_type = "text/plain"),
    )
)]
pub async fn liveness_handler() -> impl IntoResponse {
    (StatusCode::OK, LIVENESS_TEXT)
}

/// `GET /health`: service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, current timestamp and presence counters.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let participants = state.router.registry().len().await;
    let connections = state.router.connections().connection_count().await;
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            participants,
            connections,
        }),
    )
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/test", get(liveness_handler))
        .route("/health", get(health_handler))
}
