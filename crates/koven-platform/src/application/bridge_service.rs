//! Core translation logic between browsers and the oven.
//!
//! This module provides the functions that translate between the two protocol
//! representations used by the platform:
//!
//! - **Browser side**: JSON messages ([`BrowserToPlatformMsg`] / [`PlatformToBrowserMsg`])
//! - **Device side**: binary frames carrying [`Command`] and [`Event`]
//!
//! # Translation directions
//!
//! ```text
//! Browser → Device:  BrowserToPlatformMsg → Command    translate_browser_command()
//! Device  → Browser: Event → PlatformToBrowserMsg      translate_event()
//! ```
//!
//! [`handle_browser_message`] ties the inbound direction to a [`CommandSink`]
//! and produces the reply the browser should get.  The sink is a trait so the
//! whole request path can be tested without a socket.

use thiserror::Error;
use tracing::{debug, warn};

use koven_core::{Command, Event, OvenState};

use crate::domain::messages::{BrowserToPlatformMsg, PlatformToBrowserMsg};

// ── Error type ────────────────────────────────────────────────────────────────

/// Errors that can occur while handling a browser request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BridgeError {
    /// A numeric field does not fit in the wire's signed 16-bit range.
    #[error(
        "{field} out of range: {value} (allowed {min}..={max})",
        min = i16::MIN,
        max = i16::MAX
    )]
    OutOfRange { field: &'static str, value: i64 },

    /// The device link is down; the command was not queued.
    #[error("device not connected")]
    NotConnected,

    /// The device link is up but could not accept the command.
    #[error("failed to send command: {0}")]
    SendFailed(String),
}

// ── Command sink seam ─────────────────────────────────────────────────────────

/// Where translated commands go.
///
/// Implemented by the device link in the infrastructure layer.  Both methods
/// are synchronous and must not block: an implementation queues the command
/// and returns.
#[cfg_attr(test, mockall::automock)]
pub trait CommandSink: Send + Sync {
    /// Queues `cmd` for delivery to the device.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::NotConnected`] while the link is down.
    fn send_command(&self, cmd: &Command) -> Result<(), BridgeError>;

    /// Whether the device link is currently connected.
    fn is_connected(&self) -> bool;
}

// ── Browser → Device translation ──────────────────────────────────────────────

/// Translates a browser command into an oven [`Command`].
///
/// Returns `Ok(None)` for messages that are not commands (health checks).
///
/// # Errors
///
/// Returns [`BridgeError::OutOfRange`] if a start request's temperature or
/// duration does not fit in a signed 16-bit integer.
///
/// # Example
///
/// ```rust
/// use koven_platform::application::translate_browser_command;
/// use koven_platform::domain::BrowserToPlatformMsg;
///
/// let cmd = translate_browser_command(&BrowserToPlatformMsg::Start {
///     temperature: 180,
///     duration: 60,
/// })
/// .unwrap()
/// .unwrap();
/// assert_eq!(cmd.temperature, 180);
/// ```
pub fn translate_browser_command(
    msg: &BrowserToPlatformMsg,
) -> Result<Option<Command>, BridgeError> {
    match msg {
        BrowserToPlatformMsg::Start {
            temperature,
            duration,
        } => {
            let temperature = to_wire("temperature", *temperature)?;
            let duration = to_wire("duration", *duration)?;
            Ok(Some(Command::start(temperature, duration)))
        }
        BrowserToPlatformMsg::Stop => Ok(Some(Command::stop())),
        BrowserToPlatformMsg::Health => Ok(None),
    }
}

fn to_wire(field: &'static str, value: i64) -> Result<i16, BridgeError> {
    i16::try_from(value).map_err(|_| BridgeError::OutOfRange { field, value })
}

/// Handles one browser request and returns the reply for that browser.
///
/// `websocket_clients` is only used for health replies.
pub fn handle_browser_message(
    msg: &BrowserToPlatformMsg,
    sink: &dyn CommandSink,
    websocket_clients: usize,
) -> PlatformToBrowserMsg {
    let cmd = match translate_browser_command(msg) {
        Ok(Some(cmd)) => cmd,
        Ok(None) => {
            return PlatformToBrowserMsg::Health {
                status: sink.is_connected(),
                websocket_clients,
            }
        }
        Err(e) => {
            debug!("rejected browser request: {e}");
            return PlatformToBrowserMsg::error(e.to_string());
        }
    };

    match sink.send_command(&cmd) {
        Ok(()) => {
            debug!(action = %cmd.action, "command forwarded to device");
            PlatformToBrowserMsg::success()
        }
        Err(e) => {
            warn!(action = %cmd.action, "failed to forward command: {e}");
            PlatformToBrowserMsg::error(e.to_string())
        }
    }
}

// ── Device → Browser translation ──────────────────────────────────────────────

/// Translates an oven [`Event`] into the display-ready JSON event.
pub fn translate_event(event: &Event) -> PlatformToBrowserMsg {
    PlatformToBrowserMsg::Event {
        state: state_name(event.state).to_string(),
        current_temperature: format_temperature(event.current_temperature),
        remaining_time: format_time(event.remaining_time),
        programmed_duration: format_programmed_time(event.programmed_duration),
        programmed_temperature: format_programmed_temperature(event.programmed_temperature),
    }
}

/// Upper-case state name shown in the browser.
pub fn state_name(state: OvenState) -> &'static str {
    match state {
        OvenState::Idle => "IDLE",
        OvenState::Preheating => "PREHEATING",
        OvenState::Baking => "BAKING",
        OvenState::CoolingDown => "COOLING_DOWN",
    }
}

// Any negative value renders as a placeholder, not only the -1 sentinel.

fn format_temperature(value: i16) -> String {
    if value < 0 {
        "--".to_string()
    } else {
        format!("{value}°C")
    }
}

fn format_time(value: i16) -> String {
    if value < 0 {
        "--".to_string()
    } else {
        format!("{value}s")
    }
}

fn format_programmed_temperature(value: i16) -> String {
    if value < 0 {
        "Not set".to_string()
    } else {
        format!("{value}°C")
    }
}

fn format_programmed_time(value: i16) -> String {
    if value < 0 {
        "Not set".to_string()
    } else {
        format!("{value}s")
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
