//! Application layer for koven-platform.
//!
//! The application layer orchestrates the business logic: it knows *what* to
//! do, but delegates *how* to do it to the infrastructure layer.
//!
//! # Responsibilities
//!
//! - Translating browser JSON requests into oven [`koven_core::Command`]s
//! - Translating oven [`koven_core::Event`]s into display-ready JSON
//! - Fanning events out to every browser session ([`EventHub`])
//! - Defining the [`CommandSink`] seam and the `BridgeError` type
//!
//! # What does NOT belong here?
//!
//! - Opening sockets or listening for connections (that is infrastructure)
//! - Tokio task spawning (that happens in the infrastructure layer)
//! - WebSocket framing (handled by tokio-tungstenite)

pub mod bridge_service;
pub mod hub;

pub use bridge_service::{
    handle_browser_message, state_name, translate_browser_command, translate_event, BridgeError,
    CommandSink,
};
pub use hub::{EventHub, HubSubscription};
