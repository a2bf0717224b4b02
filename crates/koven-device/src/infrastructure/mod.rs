//! Infrastructure layer for the device process.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `koven_core`, but MUST NOT be imported by the `application` layer.
//!
//! # Sub-modules
//!
//! - **`config`** – Optional TOML config file with serde defaults.
//!
//! - **`link`** – TCP listener that serves one controller at a time,
//!   reassembles command frames from the byte stream and writes the oven's
//!   event frames back.

pub mod config;
pub mod link;
