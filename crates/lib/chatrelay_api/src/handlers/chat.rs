//! Chat relay handler.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use tracing::{debug, info};

use chatrelay_core::relay::relay_turn;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{ChatReply, ChatRequest};

/// Message returned when the request carries no usable `message`.
pub const MESSAGE_REQUIRED: &str = "Message is required";

/// `POST /api/chat`: forward one chat turn to the webhook.
///
/// Answers 200 for every non-empty message, including when the webhook is
/// unset, unreachable or failing. Only a missing message is a 400; a body
/// over the configured size limit is a 413, not a missing message.
pub async fn chat_handler(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> AppResult<Json<ChatReply>> {
    let message = match body {
        Ok(Json(ChatRequest {
            message: Some(message),
        })) if !message.is_empty() => message,
        Ok(_) => return Err(AppError::Validation(MESSAGE_REQUIRED.into())),
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            debug!(error = %rejection, "chat body over size limit");
            return Err(AppError::PayloadTooLarge(format!(
                "Request body exceeds {} bytes",
                state.config.max_body_bytes
            )));
        }
        Err(rejection) => {
            debug!(error = %rejection, "rejected chat body");
            return Err(AppError::Validation(MESSAGE_REQUIRED.into()));
        }
    };

    info!(message = %message, "received chat message");

    Ok(Json(relay_turn(&state.webhook, &message).await))
}
