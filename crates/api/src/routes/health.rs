//! Liveness endpoint.

use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET /health — liveness probe, always reports `ok` while the server runs.
pub async fn check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
