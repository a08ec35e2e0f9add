//! End-to-end turns: client session → relay router → mock webhook, all in-process.

use std::net::SocketAddr;
use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use chatrelay_api::config::RelayConfig;
use chatrelay_api::{AppState, router};
use chatrelay_client::client::DEFAULT_TIMEOUT;
use chatrelay_client::session::{CLIENT_ERROR_REPLY, FallbackReason};
use chatrelay_client::{ChatSession, ClientError, RelayClient, TurnOutcome};
use chatrelay_core::message::Sender;
use serde_json::json;
use url::Url;

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn relay_for(webhook: Option<Url>) -> RelayClient {
    let config = RelayConfig::new("127.0.0.1:0").with_webhook_url(webhook);
    let addr = serve(router(AppState::new(config).unwrap())).await;
    RelayClient::new(&format!("http://{addr}"), DEFAULT_TIMEOUT).unwrap()
}

async fn echo_webhook() -> Url {
    let app = Router::new().route(
        "/hook",
        post(|Json(body): Json<serde_json::Value>| async move {
            let message = body["message"].as_str().unwrap_or_default().to_string();
            Json(json!({ "reply": format!("you said: {message}") }))
        }),
    );
    let addr = serve(app).await;
    Url::parse(&format!("http://{addr}/hook")).unwrap()
}

#[tokio::test]
async fn full_turn_appends_user_then_bot() {
    let client = relay_for(Some(echo_webhook().await)).await;
    let mut session = ChatSession::greeted();

    let outcome = session.send_message(&client, "hello").await.unwrap().unwrap();

    assert!(outcome.is_fulfilled());
    let log = session.messages().as_slice();
    assert_eq!(log.len(), 3);
    assert_eq!(log[1].sender(), Sender::User);
    assert_eq!(log[1].content(), "hello");
    assert_eq!(log[2].sender(), Sender::Bot);
    assert_eq!(log[2].content(), "you said: hello");
    assert!(!session.is_busy());
}

#[tokio::test]
async fn turns_stay_in_request_order() {
    let client = relay_for(Some(echo_webhook().await)).await;
    let mut session = ChatSession::new();

    for text in ["one", "two", "three"] {
        session.set_draft(text);
        session.send_draft(&client).await.unwrap().unwrap();
    }

    let contents: Vec<_> = session.messages().iter().map(|m| m.content()).collect();
    assert_eq!(
        contents,
        [
            "one",
            "you said: one",
            "two",
            "you said: two",
            "three",
            "you said: three"
        ]
    );
}

#[tokio::test]
async fn unconfigured_relay_yields_fallback_turn() {
    let client = relay_for(None).await;
    let mut session = ChatSession::new();

    let outcome = session.send_message(&client, "hello").await.unwrap().unwrap();

    assert!(matches!(
        outcome,
        TurnOutcome::FailedFallback(FallbackReason::NotProcessed { .. })
    ));
    assert_eq!(
        session.messages().last().unwrap().content(),
        CLIENT_ERROR_REPLY
    );
}

#[tokio::test]
async fn unreachable_relay_yields_fallback_turn() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let client = RelayClient::new(&format!("http://{addr}"), DEFAULT_TIMEOUT).unwrap();
    let mut session = ChatSession::new();

    let outcome = session.send_message(&client, "hello").await.unwrap().unwrap();

    assert!(matches!(
        outcome,
        TurnOutcome::FailedFallback(FallbackReason::Request(ClientError::Transport(_)))
    ));
    assert_eq!(session.messages().len(), 2);
    assert!(!session.is_busy());
}

#[tokio::test]
async fn slow_relay_hits_client_timeout() {
    let app = Router::new().route(
        "/api/chat",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({ "reply": "late", "processed": true }))
        }),
    );
    let addr = serve(app).await;
    let client = RelayClient::new(&format!("http://{addr}"), Duration::from_millis(200)).unwrap();

    let err = client.chat("hello").await.unwrap_err();

    assert!(matches!(err, ClientError::Timeout));
}

#[tokio::test]
async fn cancelled_turn_leaves_session_usable() {
    let app = Router::new().route(
        "/api/chat",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({ "reply": "late", "processed": true }))
        }),
    );
    let addr = serve(app).await;
    let client = RelayClient::new(&format!("http://{addr}"), DEFAULT_TIMEOUT).unwrap();
    let mut session = ChatSession::new();

    let cancelled = tokio::time::timeout(
        Duration::from_millis(200),
        session.send_message(&client, "hello"),
    )
    .await;

    assert!(cancelled.is_err());
    assert!(!session.is_busy());
    let log = session.messages().as_slice();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].sender(), Sender::User);
    assert_eq!(log[1].sender(), Sender::Bot);
    assert_eq!(log[1].content(), CLIENT_ERROR_REPLY);

    session.set_draft("again");
    let turn = session.submit_draft().unwrap();
    assert!(turn.is_some());
}

#[tokio::test]
async fn error_status_from_relay_is_reported() {
    let app = Router::new().route(
        "/api/chat",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let addr = serve(app).await;
    let client = RelayClient::new(&format!("http://{addr}"), DEFAULT_TIMEOUT).unwrap();

    let err = client.chat("hello").await.unwrap_err();

    assert!(matches!(err, ClientError::Status { status: 500, .. }));
}

#[tokio::test]
async fn undecodable_relay_body_is_reported() {
    let app = Router::new().route("/api/chat", post(|| async { Json(json!({ "nope": 1 })) }));
    let addr = serve(app).await;
    let client = RelayClient::new(&format!("http://{addr}"), DEFAULT_TIMEOUT).unwrap();

    let err = client.chat("hello").await.unwrap_err();

    assert!(matches!(err, ClientError::Decode(_)));
}

#[tokio::test]
async fn diagnostics_report_relay_state() {
    let client = relay_for(None).await;

    let status = client.status().await.unwrap();
    let health = client.health().await.unwrap();

    assert_eq!(status.status, "ok");
    assert!(!status.webhook_configured());
    assert_eq!(health.status, "ok");
}
