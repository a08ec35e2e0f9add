//! Chat session state: the ordered message log and the per-turn state machine.
//!
//! A turn moves `Idle → Sending → (Fulfilled | FailedFallback) → Idle`. The
//! user message is appended as soon as the turn starts; exactly one bot
//! message is appended when it completes. While a turn is in flight further
//! submissions are refused, so replies always line up with their requests.

use thiserror::Error;

use chatrelay_core::message::{ChatMessage, RelayResponse};

use crate::client::{ClientError, RelayClient};

/// Bot greeting that opens an interactive session.
pub const WELCOME_MESSAGE: &str = "Hello! How can I help you today?";

/// Shown when a turn fails for any reason.
pub const CLIENT_ERROR_REPLY: &str =
    "Sorry, I'm having trouble connecting right now. Please try again later.";

/// Shown when the relay reports success with a blank reply.
pub const EMPTY_REPLY: &str = "Sorry, I couldn't process your request.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("a message is already being sent")]
    Busy,
}

/// Append-only, ordered list of chat messages.
#[derive(Debug, Clone, Default)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
}

impl ChatLog {
    fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }

    pub fn as_slice(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Idle,
    Sending,
}

/// Why a turn ended with the fallback message.
#[derive(Debug)]
pub enum FallbackReason {
    /// The relay call itself failed.
    Request(ClientError),
    /// The relay answered with its own fallback (`processed: false`).
    NotProcessed { reply: String },
}

/// How a completed turn ended.
#[derive(Debug)]
pub enum TurnOutcome {
    Fulfilled,
    FailedFallback(FallbackReason),
}

impl TurnOutcome {
    pub fn is_fulfilled(&self) -> bool {
        matches!(self, TurnOutcome::Fulfilled)
    }
}

/// A turn that has been started and awaits its relay result.
#[derive(Debug)]
#[must_use = "a started turn must be completed"]
pub struct PendingTurn {
    message: String,
}

impl PendingTurn {
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Session-scoped chat context owning the message log.
#[derive(Debug, Clone)]
pub struct ChatSession {
    log: ChatLog,
    draft: String,
    phase: TurnPhase,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    /// An empty session.
    pub fn new() -> Self {
        Self {
            log: ChatLog::default(),
            draft: String::new(),
            phase: TurnPhase::Idle,
        }
    }

    /// A session opened with the bot's [`WELCOME_MESSAGE`].
    pub fn greeted() -> Self {
        let mut session = Self::new();
        session.log.push(ChatMessage::bot(WELCOME_MESSAGE));
        session
    }

    pub fn messages(&self) -> &ChatLog {
        &self.log
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn is_busy(&self) -> bool {
        self.phase == TurnPhase::Sending
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Start a turn for `content`.
    ///
    /// Returns `Ok(None)` for blank input, leaving the session untouched.
    pub fn begin_turn(&mut self, content: &str) -> Result<Option<PendingTurn>, SessionError> {
        if self.is_busy() {
            return Err(SessionError::Busy);
        }
        if content.trim().is_empty() {
            return Ok(None);
        }

        self.log.push(ChatMessage::user(content));
        self.phase = TurnPhase::Sending;
        Ok(Some(PendingTurn {
            message: content.to_string(),
        }))
    }

    /// Start a turn from the draft buffer, clearing it.
    pub fn submit_draft(&mut self) -> Result<Option<PendingTurn>, SessionError> {
        if self.is_busy() {
            return Err(SessionError::Busy);
        }
        if self.draft.trim().is_empty() {
            return Ok(None);
        }
        let content = std::mem::take(&mut self.draft);
        self.begin_turn(&content)
    }

    /// Finish `turn` with the relay result, appending exactly one bot message.
    pub fn complete_turn(
        &mut self,
        turn: PendingTurn,
        result: Result<RelayResponse, ClientError>,
    ) -> TurnOutcome {
        let (content, outcome) = match result {
            Ok(resp) if resp.processed => {
                let content = if resp.reply.trim().is_empty() {
                    EMPTY_REPLY.to_string()
                } else {
                    resp.reply
                };
                (content, TurnOutcome::Fulfilled)
            }
            Ok(resp) => {
                log::warn!("relay fell back for {:?}: {}", turn.message, resp.reply);
                (
                    CLIENT_ERROR_REPLY.to_string(),
                    TurnOutcome::FailedFallback(FallbackReason::NotProcessed { reply: resp.reply }),
                )
            }
            Err(e) => {
                log::error!("error sending message: {e}");
                (
                    CLIENT_ERROR_REPLY.to_string(),
                    TurnOutcome::FailedFallback(FallbackReason::Request(e)),
                )
            }
        };

        self.log.push(ChatMessage::bot(content));
        self.phase = TurnPhase::Idle;
        outcome
    }

    /// Close an in-flight turn whose result will never arrive.
    fn abandon_turn(&mut self) {
        self.log.push(ChatMessage::bot(CLIENT_ERROR_REPLY));
        self.phase = TurnPhase::Idle;
    }

    async fn run_turn(&mut self, client: &RelayClient, turn: PendingTurn) -> TurnOutcome {
        let message = turn.message.clone();
        let in_flight = InFlight {
            session: self,
            armed: true,
        };
        let result = client.chat(&message).await;
        in_flight.finish(turn, result)
    }

    /// Run one full turn for `content` against `client`.
    ///
    /// Returns `Ok(None)` when `content` is blank. Dropping the returned
    /// future before it resolves ends the turn with [`CLIENT_ERROR_REPLY`].
    pub async fn send_message(
        &mut self,
        client: &RelayClient,
        content: &str,
    ) -> Result<Option<TurnOutcome>, SessionError> {
        let Some(turn) = self.begin_turn(content)? else {
            return Ok(None);
        };
        Ok(Some(self.run_turn(client, turn).await))
    }

    /// Run one full turn from the draft buffer.
    pub async fn send_draft(
        &mut self,
        client: &RelayClient,
    ) -> Result<Option<TurnOutcome>, SessionError> {
        let Some(turn) = self.submit_draft()? else {
            return Ok(None);
        };
        Ok(Some(self.run_turn(client, turn).await))
    }
}

/// Keeps a session from staying `Sending` when a turn's future is dropped.
struct InFlight<'a> {
    session: &'a mut ChatSession,
    armed: bool,
}

impl InFlight<'_> {
    fn finish(
        mut self,
        turn: PendingTurn,
        result: Result<RelayResponse, ClientError>,
    ) -> TurnOutcome {
        self.armed = false;
        self.session.complete_turn(turn, result)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed {
            log::warn!("turn cancelled before the relay answered");
            self.session.abandon_turn();
        }
    }
}
