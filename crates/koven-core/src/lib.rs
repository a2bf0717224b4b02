//! # koven-core
//!
//! Shared library for Koven containing the binary wire protocol and the oven
//! simulation.
//!
//! This crate is used by both the device and the platform processes.  It has
//! no dependencies on sockets, timers or async runtimes.
//!
//! # Architecture overview (for beginners)
//!
//! Koven is a simulated smart oven.  A **device** process owns one simulated
//! oven and reports its state once per tick; a **platform** process relays
//! those reports to web browsers and forwards the browsers' start/stop
//! requests back to the device.
//!
//! This crate (`koven-core`) is the shared foundation.  It defines:
//!
//! - **`protocol`** – How bytes travel between device and platform.  Commands
//!   and events are encoded into small fixed-size frames protected by a
//!   CRC-16/USB checksum, and decoded back into typed Rust structs.
//!
//! - **`domain`** – The oven itself: a four-state machine (idle, preheating,
//!   baking, cooling down) whose fields are exactly what an event frame
//!   carries.
//!
//! The codec and the simulation never call each other.  Whoever drives the
//! oven decodes a command, applies it, ticks the oven and encodes the
//! resulting event.

pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `koven_core::Oven` instead of `koven_core::domain::oven::Oven`.
pub use domain::oven::{Oven, ROOM_TEMPERATURE};
pub use protocol::codec::{
    decode_command, decode_event, encode_command, encode_command_into, encode_event,
    encode_event_into, DecodeError, EncodeError,
};
pub use protocol::messages::{Action, Command, Event, OvenState, NOT_APPLICABLE};
pub use protocol::stream::FrameBuffer;
