//! Reassembles frames from a byte stream.
//!
//! Stream transports (TCP, serial) give no guarantee that one `read()` returns
//! exactly one frame.  [`FrameBuffer`] accumulates bytes and cuts complete
//! frames out of the stream.
//!
//! A candidate frame must start with a known message kind, declare exactly
//! that kind's payload size and carry a matching checksum.  When any of these
//! fails, only the first byte is dropped and the scan resumes from the next
//! plausible kind byte, so one damaged header never swallows the frames that
//! follow it.  Payload contents (action and state codes) are still checked by
//! [`crate::protocol::codec`].

use tracing::{debug, warn};

use crate::protocol::checksum::crc16_usb;
use crate::protocol::messages::{
    CHECKSUM_SIZE, COMMAND_PAYLOAD_SIZE, EVENT_PAYLOAD_SIZE, HEADER_SIZE, MSG_TYPE_COMMAND,
    MSG_TYPE_EVENT,
};

/// Payload size carried by frames of `kind`, or `None` for unknown kinds.
fn payload_size(kind: u8) -> Option<usize> {
    match kind {
        MSG_TYPE_COMMAND => Some(COMMAND_PAYLOAD_SIZE),
        MSG_TYPE_EVENT => Some(EVENT_PAYLOAD_SIZE),
        _ => None,
    }
}

/// Accumulates stream bytes and yields complete frames.
///
/// # Examples
///
/// ```rust
/// use koven_core::protocol::{encode_command, Command, FrameBuffer};
///
/// let bytes = encode_command(&Command::stop());
/// let mut buf = FrameBuffer::new();
/// buf.push(&bytes[..4]);
/// assert!(buf.next_frame().is_none());
/// buf.push(&bytes[4..]);
/// assert_eq!(buf.next_frame(), Some(bytes));
/// ```
#[derive(Debug, Default)]
pub struct FrameBuffer {
    buffer: Vec<u8>,
    discarded: u64,
}

impl FrameBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(256),
            discarded: 0,
        }
    }

    /// Appends bytes received from the transport.
    pub fn push(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Removes and returns the next complete, checksum-valid frame, if one
    /// is buffered.
    pub fn next_frame(&mut self) -> Option<Vec<u8>> {
        loop {
            // Skip straight to the next byte that could start a frame.
            let start = self
                .buffer
                .iter()
                .position(|&b| payload_size(b).is_some())
                .unwrap_or(self.buffer.len());
            self.discard(start);

            if self.buffer.len() < HEADER_SIZE {
                return None;
            }

            let declared = usize::from(u16::from_le_bytes([self.buffer[1], self.buffer[2]]));
            if payload_size(self.buffer[0]) != Some(declared) {
                self.discard(1);
                continue;
            }

            let body_len = HEADER_SIZE + declared;
            let frame_len = body_len + CHECKSUM_SIZE;
            if self.buffer.len() < frame_len {
                return None;
            }

            let stored = u16::from_le_bytes([self.buffer[body_len], self.buffer[body_len + 1]]);
            if crc16_usb(&self.buffer[..body_len]) != stored {
                debug!(kind = self.buffer[0], "checksum mismatch; resynchronising");
                self.discard(1);
                continue;
            }

            return Some(self.buffer.drain(..frame_len).collect());
        }
    }

    fn discard(&mut self, n: usize) {
        if n > 0 {
            self.buffer.drain(..n);
            self.discarded += n as u64;
        }
    }

    /// Number of bytes currently waiting for the rest of a frame.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Total bytes dropped while resynchronising.
    pub fn discarded(&self) -> u64 {
        self.discarded
    }

    /// Drops all buffered bytes, e.g. after the transport reconnects.
    pub fn clear(&mut self) {
        if !self.buffer.is_empty() {
            warn!(bytes = self.buffer.len(), "discarding partial frame");
        }
        self.buffer.clear();
    }
}
