//! Shared helpers: an in-process mock webhook and request plumbing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use chatrelay_api::config::RelayConfig;
use chatrelay_api::{AppState, router};
use tower::ServiceExt;
use url::Url;

/// Serve `app` on an ephemeral local port.
pub async fn spawn_webhook(app: Router) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock webhook");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve mock webhook");
    });
    webhook_url(addr)
}

/// A URL on which nothing is listening.
pub async fn dead_webhook() -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    webhook_url(addr)
}

fn webhook_url(addr: SocketAddr) -> Url {
    Url::parse(&format!("http://{addr}/webhook/chat")).expect("webhook url")
}

pub fn relay(webhook: Option<Url>) -> Router {
    relay_with_timeout(webhook, Duration::from_secs(10))
}

pub fn relay_with_timeout(webhook: Option<Url>, timeout: Duration) -> Router {
    let config = RelayConfig::new("127.0.0.1:0")
        .with_webhook_url(webhook)
        .with_webhook_timeout(timeout)
        .with_environment("test");
    router(AppState::new(config).expect("app state"))
}

pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

/// A POST without any content type.
pub fn post_plain(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

pub async fn send(app: Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let resp: Response<Body> = app.oneshot(req).await.expect("request");
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    let json = serde_json::from_slice(&body).expect("parse JSON");
    (status, json)
}
