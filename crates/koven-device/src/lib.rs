//! koven-device library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does koven-device do? (for beginners)
//!
//! The *device* is the simulated oven.  It owns exactly one
//! [`koven_core::Oven`] and:
//!
//! 1. Listens on TCP for a controller (normally `koven-platform`).
//! 2. Decodes the controller's command frames and applies them to the oven.
//! 3. Advances the oven once per tick (one second by default).
//! 4. Encodes each tick's snapshot as an event frame and sends it to the
//!    controller, if one is connected.

/// Application layer: the oven driver and its tick loop.
pub mod application;

/// Infrastructure layer: configuration and the TCP frame link.
pub mod infrastructure;
