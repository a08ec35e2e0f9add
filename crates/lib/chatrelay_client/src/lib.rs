//! # chatrelay_client
//!
//! Client side of the chat relay: a typed HTTP client for the relay API and
//! a [`ChatSession`] holding the conversation in memory.

pub mod client;
pub mod session;

pub use client::{ClientError, RelayClient};
pub use session::{ChatSession, TurnOutcome};
