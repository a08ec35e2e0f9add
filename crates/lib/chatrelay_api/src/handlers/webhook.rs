//! Inbound push endpoint for external systems.
//!
//! Pushes are logged and acknowledged. They are not matched against chat
//! turns in flight.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use tracing::{debug, info};

use crate::models::{WebhookAck, WebhookPush};

/// `POST /api/webhook/receive`: acknowledge a push.
///
/// The route is a sink: a missing content type or an unreadable body is
/// logged and treated as an empty push, never answered with an error.
pub async fn receive_handler(push: Result<Json<WebhookPush>, JsonRejection>) -> Json<WebhookAck> {
    let push = push.map(|Json(push)| push).unwrap_or_else(|rejection| {
        debug!(error = %rejection, "unreadable webhook push body");
        WebhookPush::default()
    });

    let source = push.source.as_deref().unwrap_or("unknown");
    match &push.message {
        Some(message) => info!(source, message = %message, "received webhook push"),
        None => info!(source, "received webhook push without message"),
    }

    Json(WebhookAck {
        status: "success".into(),
        message: "Webhook received successfully".into(),
    })
}
