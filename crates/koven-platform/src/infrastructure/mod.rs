//! Infrastructure layer for koven-platform.
//!
//! The infrastructure layer handles all I/O: accepting WebSocket connections
//! from browsers and keeping the TCP connection to the oven device alive.
//!
//! # Responsibilities
//!
//! - Binding a TCP listener for browser WebSocket connections
//! - Performing the WebSocket HTTP upgrade handshake
//! - Connecting (and reconnecting) to the device's frame link
//! - Reading event frames and writing command frames over TCP
//! - Spawning per-session Tokio tasks
//! - Handling the graceful shutdown signal
//!
//! # What does NOT belong here?
//!
//! - Protocol translation logic (that is the application layer)
//! - Message type definitions (that is the domain layer)
//! - Configuration parsing (that is done in `main.rs`)

pub mod device_link;
pub mod ws_server;

// Re-export the primary entry points so `main.rs` can call them concisely.
pub use device_link::DeviceLink;
pub use ws_server::WsServer;
