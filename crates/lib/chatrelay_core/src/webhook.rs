//! Outbound webhook forwarder.
//!
//! Posts a [`RelayRequest`] to the configured webhook and classifies the
//! result. A single attempt is made per call; the caller decides how the
//! outcome is presented (see [`crate::relay`]).

use std::time::Duration;

use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

use crate::message::RelayRequest;

/// Default bound on a single outbound call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Upstream error bodies longer than this are truncated in logs.
const MAX_LOGGED_BODY: usize = 512;

/// What a 2xx webhook answer contained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookAnswer {
    /// A non-empty `reply` string.
    Reply(String),
    /// A successful response without a usable `reply` field.
    Unrecognized,
}

/// Why a forward attempt produced no answer.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("webhook url is not configured")]
    NotConfigured,

    #[error("no response from webhook within {0:?}")]
    Timeout(Duration),

    #[error("webhook request failed: {0}")]
    Transport(String),

    #[error("webhook answered {status}")]
    UpstreamStatus { status: u16, body: String },
}

impl ForwardError {
    /// Short category name used as a structured log field.
    pub fn category(&self) -> &'static str {
        match self {
            ForwardError::NotConfigured => "not_configured",
            ForwardError::Timeout(_) => "timeout",
            ForwardError::Transport(_) => "transport",
            ForwardError::UpstreamStatus { .. } => "upstream_status",
        }
    }

    /// `true` when the failure stems from missing configuration rather than
    /// connectivity or the upstream itself.
    pub fn is_configuration(&self) -> bool {
        matches!(self, ForwardError::NotConfigured)
    }
}

/// HTTP client bound to one (optional) webhook URL.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    http: Client,
    url: Option<Url>,
    timeout: Duration,
}

impl WebhookClient {
    /// Builds a client whose every call is bounded by `timeout`.
    pub fn new(url: Option<Url>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, url, timeout })
    }

    pub fn is_configured(&self) -> bool {
        self.url.is_some()
    }

    /// Forward `message` to the webhook.
    pub async fn forward(&self, message: &str) -> Result<WebhookAnswer, ForwardError> {
        let url = self.url.as_ref().ok_or(ForwardError::NotConfigured)?;

        info!(target_url = %url, "forwarding message to webhook");

        let resp = self
            .http
            .post(url.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(&RelayRequest::new(message))
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = resp.status();
        let body = resp.bytes().await.map_err(|e| self.classify(e))?;

        if !status.is_success() {
            let text = String::from_utf8_lossy(&body);
            return Err(ForwardError::UpstreamStatus {
                status: status.as_u16(),
                body: truncate(&text, MAX_LOGGED_BODY),
            });
        }

        Ok(parse_answer(&body))
    }

    fn classify(&self, e: reqwest::Error) -> ForwardError {
        if e.is_timeout() {
            ForwardError::Timeout(self.timeout)
        } else {
            ForwardError::Transport(e.to_string())
        }
    }
}

/// Extract the reply from a 2xx body.
fn parse_answer(body: &[u8]) -> WebhookAnswer {
    let value: Value = match serde_json::from_slice(body) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "webhook returned a non-JSON body");
            return WebhookAnswer::Unrecognized;
        }
    };

    debug!(response = %value, "webhook response");

    match value.get("reply").and_then(Value::as_str) {
        Some(reply) if !reply.is_empty() => WebhookAnswer::Reply(reply.to_string()),
        _ => WebhookAnswer::Unrecognized,
    }
}

fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}…", &s[..idx]),
        None => s.to_string(),
    }
}
