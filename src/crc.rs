//! CRC-16/MODBUS
//!
//! Bitwise (table-free) implementation: seed `0xFFFF`, reflected polynomial
//! `0xA001`. On the wire the checksum is sent low byte first.

use crate::constants::{CRC_POLYNOMIAL, CRC_SEED};

/// Compute the Modbus CRC-16 of `data`.
///
/// # Example
///
/// ```rust
/// use mfm_modbus::crc::crc16;
///
/// let crc = crc16(&[0x01, 0x04, 0x00, 0x00, 0x00, 0x02]);
/// assert_eq!(crc.to_le_bytes(), [0x71, 0xCB]);
/// ```
pub fn crc16(data: &[u8]) -> u16 {
    let mut crc = CRC_SEED;
    for &byte in data {
        crc ^= u16::from(byte);
        for _ in 0..8 {
            if crc & 0x0001 != 0 {
                crc = (crc >> 1) ^ CRC_POLYNOMIAL;
            } else {
                crc >>= 1;
            }
        }
    }
    crc
}

/// Check that the last two bytes of `frame` are the little-endian CRC of
/// everything before them.
pub fn verify(frame: &[u8]) -> bool {
    if frame.len() < 2 {
        return false;
    }
    let split = frame.len() - 2;
    let received = u16::from_le_bytes([frame[split], frame[split + 1]]);
    crc16(&frame[..split]) == received
}

#[cfg(test)]
mod tests {
    use super::*;
    use crc::{Crc, CRC_16_MODBUS};
    use proptest::prelude::*;

    const REFERENCE: Crc<u16> = Crc::<u16>::new(&CRC_16_MODBUS);

    #[test]
    fn test_crc16_empty_data() {
        assert_eq!(crc16(&[]), 0xFFFF);
    }

    #[test]
    fn test_crc16_read_input_request() {
        // 01 04 00 00 00 02 -> CRC 71 CB on the wire
        let crc = crc16(&[0x01, 0x04, 0x00, 0x00, 0x00, 0x02]);
        assert_eq!(crc, 0xCB71);
        assert_eq!(crc.to_le_bytes(), [0x71, 0xCB]);
    }

    #[test]
    fn test_crc16_known_vectors() {
        // Read holding registers, slave 1, address 0, 1 register: 01 03 00 00 00 01 84 0A
        assert_eq!(crc16(&[0x01, 0x03, 0x00, 0x00, 0x00, 0x01]), 0x0A84);
        // Read holding registers, slave 17, address 0x006B, 3 registers: ... 76 87
        assert_eq!(crc16(&[0x11, 0x03, 0x00, 0x6B, 0x00, 0x03]), 0x8776);
        // CRC-16/MODBUS check value
        assert_eq!(crc16(b"123456789"), 0x4B37);
    }

    #[test]
    fn test_verify() {
        let mut frame = vec![0x01, 0x04, 0x00, 0x18, 0x00, 0x02];
        let crc = crc16(&frame);
        frame.extend_from_slice(&crc.to_le_bytes());
        assert!(verify(&frame));

        frame[7] ^= 0x01;
        assert!(!verify(&frame));

        assert!(!verify(&[0x01]));
    }

    proptest! {
        #[test]
        fn prop_matches_reference(data in proptest::collection::vec(any::<u8>(), 0..64)) {
            prop_assert_eq!(crc16(&data), REFERENCE.checksum(&data));
        }

        #[test]
        fn prop_appended_crc_verifies(data in proptest::collection::vec(any::<u8>(), 0..64)) {
            let mut frame = data.clone();
            frame.extend_from_slice(&crc16(&data).to_le_bytes());
            prop_assert!(verify(&frame));
        }
    }
}
