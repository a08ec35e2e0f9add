//! Chat relay server binary.
//!
//! Reads its configuration once at startup (flags, environment, `.env`) and
//! serves the relay API until interrupted.

use std::time::Duration;

use clap::Parser;
use tracing::{info, warn};

use chatrelay_api::config::{CorsOrigin, RelayConfig, parse_webhook_url};

/// CLI arguments for the relay server.
#[derive(Parser, Debug)]
#[command(name = "chatrelay_server", about = "Relays chat messages to an n8n webhook")]
struct Args {
    /// Interface to listen on.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 3001)]
    port: u16,

    /// Webhook every chat message is forwarded to. Unset is allowed: chats
    /// are then answered with a "not configured" reply.
    #[arg(long, env = "N8N_WEBHOOK_URL")]
    webhook_url: Option<String>,

    /// Allowed cross-origin caller (`*` or unset for any).
    #[arg(long, env = "CORS_ORIGIN")]
    cors_origin: Option<String>,

    /// Environment tag reported by `/api/status`.
    #[arg(long, env = "APP_ENV", default_value = "development")]
    environment: String,

    /// Timeout in seconds for each outbound webhook call.
    #[arg(long, env = "WEBHOOK_TIMEOUT_SECS", default_value_t = 10)]
    webhook_timeout_secs: u64,

    /// Largest accepted request body in bytes.
    #[arg(long, env = "MAX_BODY_BYTES", default_value_t = chatrelay_api::config::DEFAULT_MAX_BODY_BYTES)]
    max_body_bytes: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(
                    "info,chatrelay_api=debug,chatrelay_core=debug,tower_http=info",
                )
            }),
        )
        .init();

    let args = Args::parse();

    let config = RelayConfig::new(format!("{}:{}", args.host, args.port))
        .with_webhook_url(parse_webhook_url(args.webhook_url.as_deref())?)
        .with_cors_origin(CorsOrigin::parse(args.cors_origin.as_deref())?)
        .with_environment(args.environment)
        .with_webhook_timeout(Duration::from_secs(args.webhook_timeout_secs))
        .with_max_body_bytes(args.max_body_bytes);

    match &config.webhook_url {
        Some(url) => info!(host = url.host_str().unwrap_or(""), "n8n webhook configured"),
        None => warn!("N8N_WEBHOOK_URL is not set; chat messages will get a fallback reply"),
    }
    info!(
        environment = %config.environment,
        cors_origin = %config.cors_origin,
        webhook_timeout_secs = args.webhook_timeout_secs,
        max_body_bytes = args.max_body_bytes,
        "starting chatrelay_server"
    );

    let bind_addr = config.bind_addr.clone();
    let state = chatrelay_api::AppState::new(config)?;
    let app = chatrelay_api::router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %listener.local_addr()?, "relay API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
