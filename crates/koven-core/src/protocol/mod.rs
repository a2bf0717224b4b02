//! Protocol module containing message types, the CRC-16/USB checksum, the
//! binary frame codec and stream reassembly.

pub mod checksum;
pub mod codec;
pub mod messages;
pub mod stream;

pub use checksum::crc16_usb;
pub use codec::{
    decode_command, decode_event, encode_command, encode_command_into, encode_event,
    encode_event_into, DecodeError, EncodeError,
};
pub use messages::*;
pub use stream::FrameBuffer;
