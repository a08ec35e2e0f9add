//! Typed HTTP client for the relay API.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use chatrelay_core::message::RelayResponse;

/// Default bound on a single call to the relay. Longer than the relay's own
/// webhook timeout so the relay's fallback normally arrives first.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Errors from a single relay call.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid relay url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("failed to build http client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("relay did not answer in time")]
    Timeout,

    #[error("relay request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("relay answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode relay response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::Timeout
        } else {
            ClientError::Transport(e)
        }
    }
}

/// `GET /api/status` as seen by the client.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub status: String,
    #[serde(default)]
    pub environment: Option<String>,
    #[serde(rename = "n8nWebhookUrl")]
    pub n8n_webhook_url: String,
    pub timestamp: String,
    #[serde(default)]
    pub cors_origin: Option<String>,
}

impl StatusReport {
    pub fn webhook_configured(&self) -> bool {
        self.n8n_webhook_url == "configured"
    }
}

/// `GET /health` as seen by the client.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthReport {
    pub status: String,
}

/// Client for one relay instance.
#[derive(Debug, Clone)]
pub struct RelayClient {
    http: Client,
    base_url: Url,
}

impl RelayClient {
    /// Creates a client for the relay at `base_url`, bounding every call by `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let mut base_url = Url::parse(base_url)?;
        // Keep any path prefix when joining endpoint paths.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(path)?)
    }

    /// `POST /api/chat`.
    pub async fn chat(&self, message: &str) -> Result<RelayResponse, ClientError> {
        let url = self.endpoint("api/chat")?;
        log::debug!("sending message to {url}");

        let resp = self
            .http
            .post(url)
            .header(ACCEPT, "application/json")
            .json(&serde_json::json!({ "message": message }))
            .send()
            .await?;

        let reply: RelayResponse = decode(resp).await?;
        log::debug!("relay response: processed={}", reply.processed);
        Ok(reply)
    }

    /// `GET /api/status`.
    pub async fn status(&self) -> Result<StatusReport, ClientError> {
        let resp = self.http.get(self.endpoint("api/status")?).send().await?;
        decode(resp).await
    }

    /// `GET /health`.
    pub async fn health(&self) -> Result<HealthReport, ClientError> {
        let resp = self.http.get(self.endpoint("health")?).send().await?;
        decode(resp).await
    }
}

async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
    let status = resp.status();
    let body = resp.bytes().await?;

    if !status.is_success() {
        return Err(ClientError::Status {
            status: status.as_u16(),
            body: String::from_utf8_lossy(&body).into_owned(),
        });
    }

    serde_json::from_slice(&body).map_err(|e| ClientError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_join_onto_base() {
        let client = RelayClient::new("http://localhost:3001", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(
            client.endpoint("api/chat").unwrap().as_str(),
            "http://localhost:3001/api/chat"
        );
    }

    #[test]
    fn base_path_prefix_is_kept() {
        let client = RelayClient::new("https://example.com/relay", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(
            client.endpoint("health").unwrap().as_str(),
            "https://example.com/relay/health"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(matches!(
            RelayClient::new("localhost without scheme", DEFAULT_TIMEOUT),
            Err(ClientError::InvalidUrl(_))
        ));
    }

    #[test]
    fn status_report_reads_camel_case() {
        let report: StatusReport = serde_json::from_str(
            r#"{"status":"ok","environment":"production","n8nWebhookUrl":"configured","timestamp":"2024-01-01T00:00:00.000Z","corsOrigin":"*"}"#,
        )
        .unwrap();
        assert!(report.webhook_configured());
        assert_eq!(report.cors_origin.as_deref(), Some("*"));
    }
}
