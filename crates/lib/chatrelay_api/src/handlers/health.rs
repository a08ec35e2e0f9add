//! Liveness check.

use axum::Json;

use crate::models::HealthResponse;

/// `GET /health`: always answers `{"status":"ok"}` while the process serves requests.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
    })
}
