//! CRC-16/USB checksum used to protect every frame.
//!
//! Parameters: polynomial 0x8005, initial value 0xFFFF, input and output
//! reflected, final XOR 0xFFFF.  The reflected form of the polynomial
//! (0xA001) lets us shift least-significant-bit first and skip the explicit
//! bit-reversal passes.

const POLY_REFLECTED: u16 = 0xA001;
const INIT: u16 = 0xFFFF;
const XOR_OUT: u16 = 0xFFFF;

/// Computes the CRC-16/USB checksum of `data`.
///
/// # Examples
///
/// ```rust
/// use koven_core::protocol::checksum::crc16_usb;
///
/// assert_eq!(crc16_usb(b"123456789"), 0xB4C8);
/// assert_eq!(crc16_usb(&[]), 0x0000);
/// ```
pub fn crc16_usb(data: &[u8]) -> u16 {
    let mut crc = INIT;
    for &byte in data {
        crc ^= u16::from(byte);
        for _ in 0..8 {
            if crc & 0x0001 != 0 {
                crc = (crc >> 1) ^ POLY_REFLECTED;
            } else {
                crc >>= 1;
            }
        }
    }
    crc ^ XOR_OUT
}
