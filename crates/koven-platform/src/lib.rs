//! koven-platform library crate.
//!
//! The platform sits between web browsers and the simulated oven.  It keeps
//! one TCP connection to the device, turns its binary event frames into
//! display-ready JSON for every connected browser, and forwards browser
//! commands back to the device as binary frames.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! Browser (JSON over WebSocket)
//!         ↕
//! [koven-platform]
//!   ├── domain/             Pure types: JSON message enums, PlatformConfig
//!   ├── application/        Translation, EventHub fan-out, CommandSink seam
//!   └── infrastructure/
//!         ├── ws_server/    WebSocket accept loop (tokio-tungstenite)
//!         └── device_link/  TCP connection to koven-device (koven-core codec)
//!         ↕
//! koven-device (binary frames over TCP)
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O and no async.
//! - `application` depends on `domain` and `koven-core`; it uses channels but
//!   never opens sockets.
//! - `infrastructure` depends on all other layers plus `tokio` and `tungstenite`.
//!
//! # For beginners: why this structure?
//!
//! Clean architecture separates *what the program does* (domain + application)
//! from *how it does it* (infrastructure).  The request path can be tested
//! against a mock [`application::CommandSink`] without any network, and the
//! transport to the device could change without touching the translation.

/// Domain layer: pure types (no I/O).
pub mod domain;

/// Application layer: translation and event fan-out.
pub mod application;

/// Infrastructure layer: WebSocket server and device TCP link.
pub mod infrastructure;
