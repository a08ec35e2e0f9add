//! Request and response bodies of the relay HTTP API.

use serde::{Deserialize, Serialize};

pub use chatrelay_core::message::RelayResponse as ChatReply;

/// `POST /api/chat` body.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

/// `POST /api/webhook/receive` body. Both fields are informational.
#[derive(Debug, Default, Deserialize)]
pub struct WebhookPush {
    #[serde(default)]
    pub message: Option<serde_json::Value>,
    #[serde(default)]
    pub source: Option<String>,
}

/// Acknowledgement for an inbound push.
#[derive(Debug, Serialize, Deserialize)]
pub struct WebhookAck {
    pub status: String,
    pub message: String,
}

/// `GET /api/status` body. Reports webhook presence, never its value.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub status: String,
    pub environment: String,
    #[serde(rename = "n8nWebhookUrl")]
    pub n8n_webhook_url: String,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cors_origin: Option<String>,
}

/// `GET /health` body.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Body of every non-2xx response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
