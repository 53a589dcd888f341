//! Wire and timing constants for the MFM read exchange
//!
//! The driver speaks a single Modbus RTU request shape: read input registers
//! (FC04) with a fixed quantity of two words, i.e. one IEEE-754 float.
//! Every size below follows from that choice.

// ============================================================================
// Frame Size Constants
// ============================================================================

/// Size of the response frame and of the shared frame buffer.
/// Format: Slave(1) + FC(1) + ByteCount(1) + Data(4) + CRC(2) = 9 bytes
pub const FRAME_SIZE: usize = 9;

/// Size of the request frame actually put on the wire.
/// Format: Slave(1) + FC(1) + Address(2) + Quantity(2) + CRC(2) = 8 bytes
pub const REQUEST_SIZE: usize = FRAME_SIZE - 1;

/// Number of request bytes covered by the CRC.
pub const REQUEST_CRC_SPAN: usize = REQUEST_SIZE - 2;

/// Number of response bytes covered by the CRC.
pub const RESPONSE_CRC_SPAN: usize = FRAME_SIZE - 2;

/// Offset of the first data byte in the response.
pub const RESPONSE_DATA_OFFSET: usize = 3;

// ============================================================================
// Protocol Constants
// ============================================================================

/// Read Input Registers (FC04)
pub const FC_READ_INPUT_REGISTERS: u8 = 0x04;

/// Registers requested per exchange (two 16-bit words = one f32).
pub const REGISTER_COUNT: u16 = 2;

/// Data bytes expected in the response (`REGISTER_COUNT * 2`).
pub const REPLY_BYTE_COUNT: u8 = 0x04;

/// Default slave address.
pub const DEFAULT_SLAVE_ID: u8 = 0x01;

/// CRC-16/MODBUS initial value.
pub const CRC_SEED: u16 = 0xFFFF;

/// CRC-16/MODBUS reflected polynomial.
pub const CRC_POLYNOMIAL: u16 = 0xA001;

// ============================================================================
// Timing Constants
// ============================================================================

/// Default time to wait for a response after sending (ms).
pub const DEFAULT_TURNAROUND_MS: u16 = 200;

/// Default quiet period enforced after each exchange (ms).
pub const DEFAULT_DRAIN_TIMEOUT_MS: u16 = 500;

/// Lower bound for both timing parameters (ms).
pub const MIN_DELAY_MS: u16 = 20;

/// Upper bound for both timing parameters (ms).
pub const MAX_DELAY_MS: u16 = 5000;

/// Delay between asserting transmit and writing the request (ms).
///
/// Some RS-485 converters return NaN readings without it.
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 2;

/// Sleep between polls while draining the channel (ms).
pub const DRAIN_POLL_INTERVAL_MS: u64 = 1;
