//! # chatrelay_api
//!
//! HTTP relay API: receives chat messages, forwards them to the configured
//! webhook and normalizes the answer.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use http::Method;
use http::header::{ACCEPT, CONTENT_TYPE};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use chatrelay_core::webhook::WebhookClient;

use crate::config::{CorsOrigin, RelayConfig};
use crate::handlers::{chat, health, status, webhook};

/// Route paths.
pub mod routes {
    pub const POST_API_CHAT: &str = "/api/chat";
    pub const POST_API_WEBHOOK_RECEIVE: &str = "/api/webhook/receive";
    pub const GET_API_STATUS: &str = "/api/status";
    pub const GET_HEALTH: &str = "/health";
}

/// Shared application state passed to all handlers.
///
/// Immutable after startup, so concurrent chat turns share it without locks.
#[derive(Clone)]
pub struct AppState {
    /// Relay configuration.
    pub config: Arc<RelayConfig>,
    /// Outbound client bound to the configured webhook.
    pub webhook: WebhookClient,
}

impl AppState {
    /// Builds the state, including the outbound HTTP client.
    pub fn new(config: RelayConfig) -> Result<Self, reqwest::Error> {
        let webhook = WebhookClient::new(config.webhook_url.clone(), config.webhook_timeout)?;
        Ok(Self {
            config: Arc::new(config),
            webhook,
        })
    }
}

fn cors_layer(origin: &CorsOrigin) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE, ACCEPT]);

    // Credentials cannot be combined with a wildcard origin.
    match origin {
        CorsOrigin::Any => cors.allow_origin(Any),
        CorsOrigin::Exact(value) => cors.allow_origin(value.clone()).allow_credentials(true),
    }
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origin);
    let body_limit = DefaultBodyLimit::max(state.config.max_body_bytes);

    Router::new()
        .route(routes::POST_API_CHAT, post(chat::chat_handler))
        .route(routes::POST_API_WEBHOOK_RECEIVE, post(webhook::receive_handler))
        .route(routes::GET_API_STATUS, get(status::status_handler))
        .route(routes::GET_HEALTH, get(health::health_check))
        .layer(body_limit)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
