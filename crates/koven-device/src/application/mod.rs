//! Application layer for the device process.
//!
//! - **`driver`** – Owns the oven, decodes inbound command frames, ticks the
//!   oven on a fixed interval and publishes the encoded events.  Knows
//!   nothing about TCP; frames arrive on an `mpsc` channel and leave on a
//!   `broadcast` channel.

pub mod driver;
