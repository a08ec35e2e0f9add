//! Chat domain models shared by the relay and its clients.
//!
//! Wire-facing types use camelCase field names where the JSON contract does.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Source tag stamped on every outbound webhook request.
pub const SOURCE_TAG: &str = "chatbot-app";

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// A single entry of a chat conversation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    id: String,
    content: String,
    sender: Sender,
    timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Creates a message stamped with the current time.
    ///
    /// Ids are UUIDv7, so a message created later in a session sorts later.
    pub fn new(content: impl Into<String>, sender: Sender) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            content: content.into(),
            sender,
            timestamp: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(content, Sender::User)
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Self::new(content, Sender::Bot)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Body of the outbound POST to the webhook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayRequest {
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub source: String,
}

impl RelayRequest {
    /// Builds a request for `message`, stamped now and tagged with [`SOURCE_TAG`].
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timestamp: Utc::now(),
            source: SOURCE_TAG.to_string(),
        }
    }
}

/// Normalized answer returned to chat clients.
///
/// `processed` is `false` when `reply` is a locally synthesized fallback
/// rather than an answer produced by the webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayResponse {
    pub reply: String,
    pub processed: bool,
}

impl RelayResponse {
    pub fn processed(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            processed: true,
        }
    }

    pub fn fallback(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            processed: false,
        }
    }
}
