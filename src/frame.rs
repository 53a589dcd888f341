//! RTU frame codec for the fixed FC04 float read
//!
//! Request (8 bytes on the wire):
//!
//! ```text
//! [slave, 0x04, reg_hi, reg_lo, 0x00, 0x02, crc_lo, crc_hi]
//! ```
//!
//! Response (9 bytes):
//!
//! ```text
//! [slave, 0x04, 0x04, d0, d1, d2, d3, crc_lo, crc_hi]
//! ```
//!
//! Validation order is header first, then CRC. A frame with both a bad
//! header and a bad CRC is reported as [`ErrorCode::WrongHeaderBytes`].

use std::fmt::Write;

use tracing::debug;

use crate::bytes::{bytes_to_f32, f32_to_bytes, ByteOrder};
use crate::constants::{
    FC_READ_INPUT_REGISTERS, FRAME_SIZE, REGISTER_COUNT, REPLY_BYTE_COUNT, REQUEST_CRC_SPAN,
    REQUEST_SIZE, RESPONSE_CRC_SPAN, RESPONSE_DATA_OFFSET,
};
use crate::crc::crc16;
use crate::error::ErrorCode;

/// Request frame as written to the channel.
pub type RequestFrame = [u8; REQUEST_SIZE];

/// Response frame as read from the channel.
pub type ResponseFrame = [u8; FRAME_SIZE];

/// Build the read request for `register` on `slave_id`.
///
/// # Example
///
/// ```rust
/// use mfm_modbus::frame::build_request;
///
/// let frame = build_request(1, 0x0000);
/// assert_eq!(frame, [0x01, 0x04, 0x00, 0x00, 0x00, 0x02, 0x71, 0xCB]);
/// ```
pub fn build_request(slave_id: u8, register: u16) -> RequestFrame {
    let [reg_hi, reg_lo] = register.to_be_bytes();
    let [count_hi, count_lo] = REGISTER_COUNT.to_be_bytes();

    let mut frame = [
        slave_id,
        FC_READ_INPUT_REGISTERS,
        reg_hi,
        reg_lo,
        count_hi,
        count_lo,
        0,
        0,
    ];
    let crc = crc16(&frame[..REQUEST_CRC_SPAN]);
    frame[REQUEST_CRC_SPAN..].copy_from_slice(&crc.to_le_bytes());

    debug!(
        "Building request: slave={}, register=0x{:04X}, CRC={:04X}",
        slave_id, register, crc
    );
    frame
}

/// Validate a response and decode its float.
///
/// Returns the value on success, or [`ErrorCode::WrongHeaderBytes`] /
/// [`ErrorCode::CrcError`]. Never returns `Err(ErrorCode::NoError)`.
pub fn parse_response(
    frame: &ResponseFrame,
    slave_id: u8,
    order: ByteOrder,
) -> Result<f32, ErrorCode> {
    let header = [frame[0], frame[1], frame[2]];
    let expected = [slave_id, FC_READ_INPUT_REGISTERS, REPLY_BYTE_COUNT];
    if header != expected {
        debug!(
            "Response header mismatch: expected {:02X?}, got {:02X?}",
            expected, header
        );
        return Err(ErrorCode::WrongHeaderBytes);
    }

    let [crc_lo, crc_hi] = [frame[RESPONSE_CRC_SPAN], frame[RESPONSE_CRC_SPAN + 1]];
    let received_crc = u16::from_le_bytes([crc_lo, crc_hi]);
    let calculated_crc = crc16(&frame[..RESPONSE_CRC_SPAN]);
    if received_crc != calculated_crc {
        debug!(
            "CRC mismatch: expected 0x{:04X}, got 0x{:04X}",
            calculated_crc, received_crc
        );
        return Err(ErrorCode::CrcError);
    }

    let data = [
        frame[RESPONSE_DATA_OFFSET],
        frame[RESPONSE_DATA_OFFSET + 1],
        frame[RESPONSE_DATA_OFFSET + 2],
        frame[RESPONSE_DATA_OFFSET + 3],
    ];
    Ok(bytes_to_f32(data, order))
}

/// Build the response a meter would send for `value`.
///
/// Used by simulators and tests; the client never sends this shape.
pub fn build_response(slave_id: u8, value: f32, order: ByteOrder) -> ResponseFrame {
    let mut frame = [0u8; FRAME_SIZE];
    frame[0] = slave_id;
    frame[1] = FC_READ_INPUT_REGISTERS;
    frame[2] = REPLY_BYTE_COUNT;
    let data_span = RESPONSE_DATA_OFFSET..RESPONSE_CRC_SPAN;
    frame[data_span].copy_from_slice(&f32_to_bytes(value, order));
    let crc = crc16(&frame[..RESPONSE_CRC_SPAN]);
    frame[RESPONSE_CRC_SPAN..].copy_from_slice(&crc.to_le_bytes());
    frame
}

/// Format raw bytes as spaced uppercase hex for packet logging.
pub fn format_hex_packet(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() * 3);
    for (i, byte) in data.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        // Writing to a String cannot fail
        let _ = write!(&mut out, "{:02X}", byte);
    }
    out
}
