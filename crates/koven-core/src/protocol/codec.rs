//! Binary codec for Koven command and event frames.
//!
//! Wire format:
//! ```text
//! [msg_type:1][payload_len:2][payload:N][crc:2]
//! ```
//! All multi-byte integers are little-endian.  The CRC-16/USB checksum covers
//! `msg_type`, `payload_len` and `payload`, never the checksum bytes.
//!
//! Command payload (5 bytes):
//! ```text
//! [action:1][temperature:i16][duration:i16]
//! ```
//!
//! Event payload (9 bytes):
//! ```text
//! [state:1][current_temperature:i16][remaining_time:i16]
//! [programmed_duration:i16][programmed_temperature:i16]
//! ```
//!
//! The oven side decodes commands and encodes events; the platform side does
//! the opposite.  Both directions share the helpers below so the field order
//! and checksum placement cannot drift apart.

use thiserror::Error;
use tracing::debug;

use crate::protocol::checksum::crc16_usb;
use crate::protocol::messages::{
    Action, Command, Event, OvenState, CHECKSUM_SIZE, COMMAND_FRAME_SIZE, COMMAND_PAYLOAD_SIZE,
    EVENT_FRAME_SIZE, EVENT_PAYLOAD_SIZE, HEADER_SIZE, MSG_TYPE_COMMAND, MSG_TYPE_EVENT,
};

/// Errors that can occur while decoding a frame.
///
/// The variants are checked in declaration order, so a truncated frame with a
/// wrong tag reports [`DecodeError::TooShort`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The byte slice is shorter than a complete frame of the expected kind.
    #[error("frame too short: need {needed} bytes, got {available}")]
    TooShort { needed: usize, available: usize },

    /// The message-kind byte is not the one this decoder handles.
    #[error("invalid message type: 0x{found:02X} (expected 0x{expected:02X})")]
    WrongMessageKind { expected: u8, found: u8 },

    /// The declared payload length disagrees with the fixed payload size.
    #[error("invalid payload size: {declared} (expected {expected})")]
    PayloadSizeMismatch { expected: usize, declared: usize },

    /// The trailing checksum does not match the recomputed one.
    #[error("CRC mismatch: received 0x{received:04X}, calculated 0x{calculated:04X}")]
    ChecksumMismatch { received: u16, calculated: u16 },

    /// The command payload carries an action code outside {start, stop}.
    #[error("unknown action code: 0x{0:02X}")]
    UnknownAction(u8),

    /// The event payload carries a state code outside the four known states.
    #[error("unknown state code: 0x{0:02X}")]
    UnknownState(u8),
}

/// Errors that can occur while encoding a frame into a caller-provided buffer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EncodeError {
    /// The output buffer cannot hold the whole frame.  Nothing was written.
    #[error("buffer too small: need {needed} bytes, capacity is {capacity}")]
    BufferTooSmall { needed: usize, capacity: usize },
}

// ── Public API: command direction ─────────────────────────────────────────────

/// Encodes `cmd` into the front of `buf` and returns the frame length (10).
///
/// # Errors
///
/// Returns [`EncodeError::BufferTooSmall`] without touching `buf` when it is
/// shorter than [`COMMAND_FRAME_SIZE`].
pub fn encode_command_into(cmd: &Command, buf: &mut [u8]) -> Result<usize, EncodeError> {
    let frame = frame_slot(buf, COMMAND_FRAME_SIZE)?;
    fill_command(frame, cmd);
    Ok(COMMAND_FRAME_SIZE)
}

/// Encodes `cmd` into a freshly allocated, exactly sized frame.
///
/// # Examples
///
/// ```rust
/// use koven_core::protocol::{decode_command, encode_command, Command};
///
/// let cmd = Command::start(180, 600);
/// let bytes = encode_command(&cmd);
/// assert_eq!(bytes.len(), 10);
/// assert_eq!(decode_command(&bytes).unwrap(), cmd);
/// ```
pub fn encode_command(cmd: &Command) -> Vec<u8> {
    let mut buf = vec![0u8; COMMAND_FRAME_SIZE];
    fill_command(&mut buf, cmd);
    buf
}

/// Decodes a command frame from the beginning of `bytes`.
///
/// Bytes past the end of the frame are ignored.
///
/// # Errors
///
/// Returns the first [`DecodeError`] encountered, checking length, message
/// kind, declared payload size, checksum and finally the action code.
pub fn decode_command(bytes: &[u8]) -> Result<Command, DecodeError> {
    let payload = open_frame(bytes, MSG_TYPE_COMMAND, COMMAND_PAYLOAD_SIZE)?;
    let action = Action::try_from(payload[0]).map_err(|_| {
        debug!(code = payload[0], "rejecting command with unknown action");
        DecodeError::UnknownAction(payload[0])
    })?;
    Ok(Command {
        action,
        temperature: read_i16(payload, 1),
        duration: read_i16(payload, 3),
    })
}

// ── Public API: event direction ───────────────────────────────────────────────

/// Encodes `event` into the front of `buf` and returns the frame length (14).
///
/// # Errors
///
/// Returns [`EncodeError::BufferTooSmall`] without touching `buf` when it is
/// shorter than [`EVENT_FRAME_SIZE`].
///
/// # Examples
///
/// ```rust
/// use koven_core::protocol::{encode_event_into, EncodeError, Event, OvenState};
///
/// let event = Event {
///     state: OvenState::Idle,
///     current_temperature: 25,
///     remaining_time: -1,
///     programmed_duration: -1,
///     programmed_temperature: -1,
/// };
/// let mut small = [0u8; 13];
/// assert!(matches!(
///     encode_event_into(&event, &mut small),
///     Err(EncodeError::BufferTooSmall { needed: 14, capacity: 13 })
/// ));
/// assert_eq!(small, [0u8; 13]);
///
/// let mut buf = [0u8; 64];
/// assert_eq!(encode_event_into(&event, &mut buf), Ok(14));
/// ```
pub fn encode_event_into(event: &Event, buf: &mut [u8]) -> Result<usize, EncodeError> {
    let frame = frame_slot(buf, EVENT_FRAME_SIZE)?;
    fill_event(frame, event);
    Ok(EVENT_FRAME_SIZE)
}

/// Encodes `event` into a freshly allocated, exactly sized frame.
pub fn encode_event(event: &Event) -> Vec<u8> {
    let mut buf = vec![0u8; EVENT_FRAME_SIZE];
    fill_event(&mut buf, event);
    buf
}

/// Decodes an event frame from the beginning of `bytes`.
///
/// # Errors
///
/// Returns the first [`DecodeError`] encountered, checking length, message
/// kind, declared payload size, checksum and finally the state code.
pub fn decode_event(bytes: &[u8]) -> Result<Event, DecodeError> {
    let payload = open_frame(bytes, MSG_TYPE_EVENT, EVENT_PAYLOAD_SIZE)?;
    let state = OvenState::try_from(payload[0]).map_err(|_| {
        debug!(code = payload[0], "rejecting event with unknown state");
        DecodeError::UnknownState(payload[0])
    })?;
    Ok(Event {
        state,
        current_temperature: read_i16(payload, 1),
        remaining_time: read_i16(payload, 3),
        programmed_duration: read_i16(payload, 5),
        programmed_temperature: read_i16(payload, 7),
    })
}

// ── Frame helpers ─────────────────────────────────────────────────────────────

/// Writes a complete command frame.  `frame` must be exactly
/// [`COMMAND_FRAME_SIZE`] bytes long.
fn fill_command(frame: &mut [u8], cmd: &Command) {
    let payload = write_header(frame, MSG_TYPE_COMMAND, COMMAND_PAYLOAD_SIZE);
    payload[0] = cmd.action as u8;
    write_i16(payload, 1, cmd.temperature);
    write_i16(payload, 3, cmd.duration);
    seal(frame);
}

/// Writes a complete event frame.  `frame` must be exactly
/// [`EVENT_FRAME_SIZE`] bytes long.
fn fill_event(frame: &mut [u8], event: &Event) {
    let payload = write_header(frame, MSG_TYPE_EVENT, EVENT_PAYLOAD_SIZE);
    payload[0] = event.state as u8;
    write_i16(payload, 1, event.current_temperature);
    write_i16(payload, 3, event.remaining_time);
    write_i16(payload, 5, event.programmed_duration);
    write_i16(payload, 7, event.programmed_temperature);
    seal(frame);
}

/// Returns the first `frame_len` bytes of `buf`, or a capacity error.
fn frame_slot(buf: &mut [u8], frame_len: usize) -> Result<&mut [u8], EncodeError> {
    let capacity = buf.len();
    buf.get_mut(..frame_len).ok_or(EncodeError::BufferTooSmall {
        needed: frame_len,
        capacity,
    })
}

/// Writes the kind and length header and returns the payload region.
fn write_header(frame: &mut [u8], msg_type: u8, payload_len: usize) -> &mut [u8] {
    frame[0] = msg_type;
    frame[1..HEADER_SIZE].copy_from_slice(&(payload_len as u16).to_le_bytes());
    &mut frame[HEADER_SIZE..HEADER_SIZE + payload_len]
}

/// Appends the checksum over everything before the last two bytes.
fn seal(frame: &mut [u8]) {
    let body_len = frame.len() - CHECKSUM_SIZE;
    let crc = crc16_usb(&frame[..body_len]);
    frame[body_len..].copy_from_slice(&crc.to_le_bytes());
}

/// Validates the envelope of a frame and returns its payload.
fn open_frame(bytes: &[u8], msg_type: u8, payload_len: usize) -> Result<&[u8], DecodeError> {
    let frame_len = HEADER_SIZE + payload_len + CHECKSUM_SIZE;
    if bytes.len() < frame_len {
        return Err(DecodeError::TooShort {
            needed: frame_len,
            available: bytes.len(),
        });
    }

    if bytes[0] != msg_type {
        return Err(DecodeError::WrongMessageKind {
            expected: msg_type,
            found: bytes[0],
        });
    }

    let declared = usize::from(read_u16(bytes, 1));
    if declared != payload_len {
        return Err(DecodeError::PayloadSizeMismatch {
            expected: payload_len,
            declared,
        });
    }

    let body_len = HEADER_SIZE + payload_len;
    let received = read_u16(bytes, body_len);
    let calculated = crc16_usb(&bytes[..body_len]);
    if received != calculated {
        debug!(received, calculated, "frame checksum mismatch");
        return Err(DecodeError::ChecksumMismatch {
            received,
            calculated,
        });
    }

    Ok(&bytes[HEADER_SIZE..body_len])
}

// ── Utility helpers ───────────────────────────────────────────────────────────

fn read_u16(buf: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([buf[offset], buf[offset + 1]])
}

fn read_i16(buf: &[u8], offset: usize) -> i16 {
    i16::from_le_bytes([buf[offset], buf[offset + 1]])
}

fn write_i16(buf: &mut [u8], offset: usize, value: i16) {
    buf[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

// ── Tests ─────────────────────────────────────────────────────────────────────
