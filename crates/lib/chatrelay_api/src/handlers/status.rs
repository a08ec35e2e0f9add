//! Operational status endpoint.

use axum::Json;
use axum::extract::State;
use chrono::{SecondsFormat, Utc};

use crate::AppState;
use crate::models::StatusResponse;

/// `GET /api/status`: report configuration for diagnostics.
///
/// The webhook URL may embed a secret path, so only its presence is reported.
pub async fn status_handler(State(state): State<AppState>) -> Json<StatusResponse> {
    let webhook = if state.webhook.is_configured() {
        "configured"
    } else {
        "not set"
    };

    Json(StatusResponse {
        status: "ok".into(),
        environment: state.config.environment.clone(),
        n8n_webhook_url: webhook.into(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        cors_origin: Some(state.config.cors_origin.to_string()),
    })
}
