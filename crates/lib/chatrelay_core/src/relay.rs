//! One relay turn: forward a message and collapse the outcome into the
//! client-facing [`RelayResponse`].
//!
//! Every failure other than input validation ends here as a canned reply with
//! `processed: false`. The failure category survives only in the logs.

use tracing::{error, info, warn};

use crate::message::RelayResponse;
use crate::webhook::{ForwardError, WebhookAnswer, WebhookClient};

/// Reply when no webhook URL is configured.
pub const NOT_CONFIGURED_REPLY: &str =
    "The webhook address is not configured correctly. Please check the environment settings.";

/// Reply when the webhook answered successfully without a usable `reply`.
pub const UNSURE_REPLY: &str = "I received your message, but I'm not sure how to respond.";

/// Reply when the webhook could not be reached or answered with an error.
pub const CONNECTIVITY_FAILURE_REPLY: &str = "I can't process your request right now. Please check the server's connection to n8n and try again later.";

impl RelayResponse {
    /// Collapse a forwarding outcome into the wire contract.
    pub fn from_outcome(outcome: &Result<WebhookAnswer, ForwardError>) -> Self {
        match outcome {
            Ok(WebhookAnswer::Reply(reply)) => RelayResponse::processed(reply.clone()),
            Ok(WebhookAnswer::Unrecognized) => RelayResponse::processed(UNSURE_REPLY),
            Err(ForwardError::NotConfigured) => RelayResponse::fallback(NOT_CONFIGURED_REPLY),
            Err(_) => RelayResponse::fallback(CONNECTIVITY_FAILURE_REPLY),
        }
    }
}

/// Forward `message` through `client` and return exactly one response.
pub async fn relay_turn(client: &WebhookClient, message: &str) -> RelayResponse {
    let outcome = client.forward(message).await;
    log_outcome(&outcome);
    RelayResponse::from_outcome(&outcome)
}

fn log_outcome(outcome: &Result<WebhookAnswer, ForwardError>) {
    match outcome {
        Ok(WebhookAnswer::Reply(_)) => info!("webhook replied"),
        Ok(WebhookAnswer::Unrecognized) => {
            warn!("webhook answered without a usable reply field")
        }
        Err(e) => match e {
            ForwardError::NotConfigured => {
                error!(category = e.category(), "webhook url is not set, check configuration")
            }
            ForwardError::Timeout(_) | ForwardError::Transport(_) => {
                warn!(category = e.category(), error = %e, "no response received from webhook")
            }
            ForwardError::UpstreamStatus { status, body } => warn!(
                category = e.category(),
                status = *status,
                body = %body,
                "webhook responded with an error status"
            ),
        },
    }
}
