//! Domain entities for Koven.
//!
//! This module contains the oven simulation.  It has no timers, sockets or
//! threads of its own: callers drive it by applying decoded commands and
//! advancing it one tick at a time.
//!
//! # Why keep the simulation free of I/O? (for beginners)
//!
//! The device process ticks the oven from a tokio interval, while the tests
//! in this crate tick it from a plain `for` loop.  Because [`oven::Oven`]
//! never sleeps or reads a clock, both drivers see exactly the same
//! behaviour, and a test can walk a ten-minute bake in microseconds.

/// Oven state machine.
///
/// See [`oven::Oven`] for the main type.
pub mod oven;
