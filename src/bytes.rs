//! # Byte Order Handling for Float Readings
//!
//! MFM meters publish each measurement as an IEEE-754 float spread over two
//! input registers, most significant byte first. Some compatible meters swap
//! the two words, so the order is selectable; the default is the meter's
//! native ABCD layout.
//!
//! ## Naming Convention
//!
//! Uses ABCD notation where:
//! - A = Most significant byte (MSB)
//! - B = Second byte
//! - C = Third byte
//! - D = Least significant byte (LSB)
//!
//! For 32-bit value `0x12345678`:
//! - `BigEndian (ABCD)`: \[0x12, 0x34, 0x56, 0x78\]
//! - `LittleEndian (DCBA)`: \[0x78, 0x56, 0x34, 0x12\]
//! - `BigEndianSwap (CDAB)`: \[0x56, 0x78, 0x12, 0x34\]
//! - `LittleEndianSwap (BADC)`: \[0x34, 0x12, 0x78, 0x56\]

use std::fmt;

/// Order of the four data bytes of a float reading as they appear on the wire.
///
/// # Example
///
/// ```rust
/// use mfm_modbus::ByteOrder;
///
/// let order = ByteOrder::from_str("CDAB").unwrap();
/// assert_eq!(order, ByteOrder::BigEndianSwap);
/// assert!(order.has_word_swap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ByteOrder {
    /// ABCD, the MFM native layout.
    #[default]
    BigEndian,

    /// DCBA
    LittleEndian,

    /// CDAB: big-endian words, low word first.
    BigEndianSwap,

    /// BADC
    LittleEndianSwap,
}

impl ByteOrder {
    /// Parse common string spellings.
    ///
    /// - "ABCD", "BE", "BIG_ENDIAN" → BigEndian
    /// - "DCBA", "LE", "LITTLE_ENDIAN" → LittleEndian
    /// - "CDAB", "BIG_ENDIAN_SWAP" → BigEndianSwap
    /// - "BADC", "LITTLE_ENDIAN_SWAP" → LittleEndianSwap
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_uppercase())
            .collect();
        match normalized.as_str() {
            "ABCD" | "BE" | "BIGENDIAN" => Some(Self::BigEndian),
            "DCBA" | "LE" | "LITTLEENDIAN" => Some(Self::LittleEndian),
            "CDAB" | "BIGENDIANSWAP" => Some(Self::BigEndianSwap),
            "BADC" | "LITTLEENDIANSWAP" => Some(Self::LittleEndianSwap),
            _ => None,
        }
    }

    /// Get descriptive name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BigEndian => "ABCD (Big-Endian)",
            Self::LittleEndian => "DCBA (Little-Endian)",
            Self::BigEndianSwap => "CDAB (Big-Endian Swap)",
            Self::LittleEndianSwap => "BADC (Little-Endian Swap)",
        }
    }

    /// Check if words are swapped.
    #[inline]
    pub fn has_word_swap(&self) -> bool {
        matches!(self, Self::BigEndianSwap | Self::LittleEndianSwap)
    }

    /// Rearrange wire bytes into ABCD (most significant first).
    #[inline]
    pub fn to_abcd(self, wire: [u8; 4]) -> [u8; 4] {
        let [w0, w1, w2, w3] = wire;
        match self {
            Self::BigEndian => [w0, w1, w2, w3],
            Self::LittleEndian => [w3, w2, w1, w0],
            Self::BigEndianSwap => [w2, w3, w0, w1],
            Self::LittleEndianSwap => [w1, w0, w3, w2],
        }
    }

    /// Rearrange ABCD bytes into this wire order. Inverse of [`ByteOrder::to_abcd`].
    #[inline]
    pub fn from_abcd(self, abcd: [u8; 4]) -> [u8; 4] {
        let [a, b, c, d] = abcd;
        match self {
            Self::BigEndian => [a, b, c, d],
            Self::LittleEndian => [d, c, b, a],
            Self::BigEndianSwap => [c, d, a, b],
            Self::LittleEndianSwap => [b, a, d, c],
        }
    }
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Float Assembly
// ============================================================================

/// Assemble an f32 from four wire bytes.
///
/// The bit pattern is built with explicit shifts, so the result does not
/// depend on the host's native byte order.
///
/// # Example
///
/// ```rust
/// use mfm_modbus::{bytes_to_f32, ByteOrder};
///
/// assert_eq!(bytes_to_f32([0x43, 0x66, 0x00, 0x00], ByteOrder::BigEndian), 230.0);
/// assert_eq!(bytes_to_f32([0x00, 0x00, 0x43, 0x66], ByteOrder::BigEndianSwap), 230.0);
/// ```
#[inline]
pub fn bytes_to_f32(wire: [u8; 4], order: ByteOrder) -> f32 {
    let [a, b, c, d] = order.to_abcd(wire);
    let bits = (u32::from(a) << 24) | (u32::from(b) << 16) | (u32::from(c) << 8) | u32::from(d);
    f32::from_bits(bits)
}

/// Split an f32 into four wire bytes. Inverse of [`bytes_to_f32`].
#[inline]
pub fn f32_to_bytes(value: f32, order: ByteOrder) -> [u8; 4] {
    let bits = value.to_bits();
    let abcd = [
        (bits >> 24) as u8,
        (bits >> 16) as u8,
        (bits >> 8) as u8,
        bits as u8,
    ];
    order.from_abcd(abcd)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORDERS: [ByteOrder; 4] = [
        ByteOrder::BigEndian,
        ByteOrder::LittleEndian,
        ByteOrder::BigEndianSwap,
        ByteOrder::LittleEndianSwap,
    ];

    #[test]
    fn test_from_str() {
        assert_eq!(ByteOrder::from_str("abcd"), Some(ByteOrder::BigEndian));
        assert_eq!(ByteOrder::from_str("DC-BA"), Some(ByteOrder::LittleEndian));
        assert_eq!(
            ByteOrder::from_str("big_endian_swap"),
            Some(ByteOrder::BigEndianSwap)
        );
        assert_eq!(
            ByteOrder::from_str("BADC"),
            Some(ByteOrder::LittleEndianSwap)
        );
        assert_eq!(ByteOrder::from_str("XYZW"), None);
    }

    #[test]
    fn test_default_is_abcd() {
        assert_eq!(ByteOrder::default(), ByteOrder::BigEndian);
        assert!(!ByteOrder::default().has_word_swap());
    }

    #[test]
    fn test_to_abcd_patterns() {
        let wire = [0x12, 0x34, 0x56, 0x78];
        assert_eq!(ByteOrder::BigEndian.to_abcd(wire), [0x12, 0x34, 0x56, 0x78]);
        assert_eq!(
            ByteOrder::LittleEndian.to_abcd(wire),
            [0x78, 0x56, 0x34, 0x12]
        );
        assert_eq!(
            ByteOrder::BigEndianSwap.to_abcd(wire),
            [0x56, 0x78, 0x12, 0x34]
        );
        assert_eq!(
            ByteOrder::LittleEndianSwap.to_abcd(wire),
            [0x34, 0x12, 0x78, 0x56]
        );
    }

    #[test]
    fn test_bytes_to_f32_meter_values() {
        // 230.0 V, 12.5 kW, 50.0 Hz as sent by the meter
        let order = ByteOrder::BigEndian;
        assert_eq!(bytes_to_f32([0x43, 0x66, 0x00, 0x00], order), 230.0);
        assert_eq!(bytes_to_f32([0x41, 0x48, 0x00, 0x00], order), 12.5);
        assert_eq!(bytes_to_f32([0x42, 0x48, 0x00, 0x00], order), 50.0);
    }

    #[test]
    fn test_bytes_to_f32_matches_from_be_bytes() {
        let wire = [0xC1, 0x23, 0x45, 0x67];
        assert_eq!(
            bytes_to_f32(wire, ByteOrder::BigEndian).to_bits(),
            f32::from_be_bytes(wire).to_bits()
        );
    }

    #[test]
    fn test_f32_to_bytes_inverts_every_order() {
        for order in ORDERS {
            let wire = f32_to_bytes(-1234.5, order);
            assert_eq!(bytes_to_f32(wire, order), -1234.5, "order {:?}", order);
        }
    }
}
