//! # MFM Modbus - RS-485 Driver for MFM Energy Meters
//!
//! Async Modbus RTU master that reads 32-bit float input registers from
//! MFM630/230/220/120/72 energy meters over a half-duplex RS-485 link.
//!
//! ## Features
//!
//! - **Single-purpose protocol**: function code 0x04, two registers, one float
//! - **Bounded exchanges**: every read finishes within turnaround + drain time
//! - **Half-duplex control**: RTS or GPIO driven DE/RE line, or none
//! - **Diagnostics**: last error code plus success/error counters
//! - **Pluggable transports**: any [`ByteChannel`] works, serial is built in
//!
//! ## Exchange
//!
//! | Step | Request (8 bytes) | Response (9 bytes) |
//! |------|-------------------|--------------------|
//! | Header | slave, 0x04, reg hi, reg lo | slave, 0x04, 0x04 |
//! | Payload | 0x00, 0x02 | 4 float bytes |
//! | CRC-16/MODBUS | low, high | low, high |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! # #[cfg(feature = "rtu")]
//! use mfm_modbus::{registers, MeterClient, SerialConfig};
//!
//! # #[cfg(feature = "rtu")]
//! #[tokio::main]
//! async fn main() -> mfm_modbus::ModbusResult<()> {
//!     let mut client = MeterClient::open_serial(&SerialConfig::new("/dev/ttyUSB0"))?;
//!     client.begin().await;
//!
//!     let reading = client.read(registers::MFM_TOTAL_KW, 1).await;
//!     match reading.value {
//!         Some(kw) if reading.is_ok() => println!("Total power: {:.2} kW", kw),
//!         _ => println!("Read failed: {}", reading.error),
//!     }
//!     Ok(())
//! }
//! # #[cfg(not(feature = "rtu"))]
//! # fn main() {}
//! ```

// ============================================================================
// Core modules
// ============================================================================

/// Error codes and error types
pub mod error;

/// Wire constants and timing bounds
pub mod constants;

/// CRC-16/MODBUS
pub mod crc;

/// Float assembly with selectable byte order
pub mod bytes;

/// Request/response frame codec
pub mod frame;

/// Byte channel and direction line abstractions
pub mod link;

/// Link timing configuration
pub mod config;

/// Exchange counters
pub mod diagnostics;

/// Meter client and transaction engine
pub mod client;

/// MFM register catalogue
pub mod registers;

// ============================================================================
// Transport adapters
// ============================================================================

/// Serial port channel and RTS direction line
#[cfg(feature = "rtu")]
pub mod serial;

/// GPIO direction line
#[cfg(feature = "gpio")]
pub mod gpio;

// ============================================================================
// Re-exports for convenience
// ============================================================================

// === Async runtime (users can use mfm_modbus::tokio) ===
pub use tokio;

// === Client API ===
pub use client::{MeterClient, Reading};
pub use config::LinkConfig;
pub use diagnostics::{Diagnostics, DiagnosticsSnapshot};

// === Error handling ===
pub use error::{ErrorCode, ModbusError, ModbusResult};

// === Data decoding ===
pub use bytes::{bytes_to_f32, f32_to_bytes, ByteOrder};

// === Transport traits ===
pub use link::{ByteChannel, DirectionControl, Link, NoDirection};

// === Protocol constants ===
pub use constants::{DEFAULT_SLAVE_ID, MAX_DELAY_MS, MIN_DELAY_MS};

#[cfg(feature = "rtu")]
pub use serial::{RtsDirection, SerialChannel, SerialConfig};

#[cfg(feature = "gpio")]
pub use gpio::{GpioConfig, GpioDirection};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library information
pub fn info() -> String {
    format!(
        "MFM Modbus v{} - RS-485 driver for MFM energy meters",
        VERSION
    )
}
