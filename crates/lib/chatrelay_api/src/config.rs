//! Relay server configuration.

use std::fmt;
use std::time::Duration;

use http::HeaderValue;
use thiserror::Error;
use url::Url;

use chatrelay_core::webhook::DEFAULT_TIMEOUT;

/// Default cap on request bodies. Message length itself is never validated.
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Errors raised while turning raw settings into a [`RelayConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid webhook url '{value}': {source}")]
    InvalidWebhookUrl {
        value: String,
        source: url::ParseError,
    },

    #[error("webhook url must use http or https, got '{0}'")]
    UnsupportedScheme(String),

    #[error("invalid CORS origin '{0}'")]
    InvalidCorsOrigin(String),
}

/// Which cross-origin callers the relay accepts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CorsOrigin {
    /// `*`: any origin, without credentials.
    Any,
    /// A single exact origin, with credentials allowed.
    Exact(HeaderValue),
}

impl CorsOrigin {
    /// Parses an optional raw setting. Unset, empty and `*` all mean [`CorsOrigin::Any`].
    pub fn parse(raw: Option<&str>) -> Result<Self, ConfigError> {
        match raw.map(str::trim) {
            None | Some("") | Some("*") => Ok(CorsOrigin::Any),
            Some(origin) => HeaderValue::from_str(origin)
                .map(CorsOrigin::Exact)
                .map_err(|_| ConfigError::InvalidCorsOrigin(origin.to_string())),
        }
    }
}

impl fmt::Display for CorsOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorsOrigin::Any => f.write_str("*"),
            CorsOrigin::Exact(v) => f.write_str(v.to_str().unwrap_or("<non-ascii origin>")),
        }
    }
}

/// Configuration for the relay server, built once at startup.
#[derive(Clone, Debug)]
pub struct RelayConfig {
    /// Address to bind the HTTP listener (e.g. "0.0.0.0:3001").
    pub bind_addr: String,
    /// Webhook every chat turn is forwarded to. `None` is a valid state.
    pub webhook_url: Option<Url>,
    /// Allowed cross-origin caller.
    pub cors_origin: CorsOrigin,
    /// Free-form environment tag reported by `/api/status`.
    pub environment: String,
    /// Bound on each outbound webhook call.
    pub webhook_timeout: Duration,
    /// Largest accepted request body; bigger bodies get a 413.
    pub max_body_bytes: usize,
}

impl RelayConfig {
    /// Configuration with no webhook, any origin and the default timeout.
    pub fn new(bind_addr: impl Into<String>) -> Self {
        Self {
            bind_addr: bind_addr.into(),
            webhook_url: None,
            cors_origin: CorsOrigin::Any,
            environment: "development".into(),
            webhook_timeout: DEFAULT_TIMEOUT,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    pub fn with_webhook_url(mut self, url: Option<Url>) -> Self {
        self.webhook_url = url;
        self
    }

    pub fn with_cors_origin(mut self, origin: CorsOrigin) -> Self {
        self.cors_origin = origin;
        self
    }

    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    pub fn with_webhook_timeout(mut self, timeout: Duration) -> Self {
        self.webhook_timeout = timeout;
        self
    }

    pub fn with_max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }
}

/// Parses an optional webhook URL. Unset or blank means "not configured".
pub fn parse_webhook_url(raw: Option<&str>) -> Result<Option<Url>, ConfigError> {
    let Some(value) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    let url = Url::parse(value).map_err(|source| ConfigError::InvalidWebhookUrl {
        value: value.to_string(),
        source,
    })?;

    match url.scheme() {
        "http" | "https" => Ok(Some(url)),
        other => Err(ConfigError::UnsupportedScheme(other.to_string())),
    }
}
