//! Domain layer for koven-platform.
//!
//! Pure types with no I/O: the JSON messages exchanged with browsers and the
//! runtime configuration.
//!
//! # What does NOT belong here?
//!
//! - Any `tokio`, `TcpStream`, or `WebSocket` types
//! - Translation between JSON and binary frames (that is the application layer)

pub mod config;
pub mod messages;

pub use config::PlatformConfig;
pub use messages::{BrowserToPlatformMsg, PlatformToBrowserMsg};
