//! # chatrelay_core
//!
//! Core domain logic for the chat relay: the message model, the outbound
//! webhook forwarder and the collapse of forwarding outcomes into the
//! client-facing reply.

pub mod message;
pub mod relay;
pub mod webhook;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
