//! Error types for the meter driver
//!
//! Two layers of failure exist and they never mix:
//!
//! - [`ErrorCode`] classifies the outcome of a single request/response
//!   exchange. It is returned alongside the decoded value and held by the
//!   client until cleared or overwritten. Exchanges never fail with a
//!   `Result`; a bad bus is an everyday condition for a meter poller.
//! - [`ModbusError`] covers setup and adapter failures: opening a serial
//!   port, requesting a GPIO line, I/O errors surfaced by a channel.

use std::fmt;

use thiserror::Error;

/// Outcome classification of one read exchange.
///
/// Numeric values are stable and match the codes reported by MFM meter
/// tooling (`0` = no error ... `4` = timeout).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u16)]
pub enum ErrorCode {
    /// Exchange completed and the value is valid.
    #[default]
    NoError = 0,
    /// Response CRC did not match the frame contents.
    CrcError = 1,
    /// Slave id, function code or byte count in the response header was wrong.
    WrongHeaderBytes = 2,
    /// Fewer than a full frame of bytes could be read.
    InsufficientBytes = 3,
    /// No complete response within the turnaround window, or stray bytes
    /// still on the bus after the drain window.
    Timeout = 4,
}

impl ErrorCode {
    /// Numeric code.
    #[inline]
    pub fn code(self) -> u16 {
        self as u16
    }

    /// `true` for anything other than [`ErrorCode::NoError`].
    #[inline]
    pub fn is_error(self) -> bool {
        self != Self::NoError
    }

    /// Short description.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoError => "no error",
            Self::CrcError => "crc error",
            Self::WrongHeaderBytes => "wrong header bytes",
            Self::InsufficientBytes => "insufficient bytes",
            Self::Timeout => "timeout",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.as_str(), self.code())
    }
}

impl TryFrom<u16> for ErrorCode {
    type Error = ModbusError;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::NoError),
            1 => Ok(Self::CrcError),
            2 => Ok(Self::WrongHeaderBytes),
            3 => Ok(Self::InsufficientBytes),
            4 => Ok(Self::Timeout),
            other => Err(ModbusError::invalid_data(format!(
                "Unknown error code: {}",
                other
            ))),
        }
    }
}

/// Errors raised while setting up or driving a link.
#[derive(Error, Debug)]
pub enum ModbusError {
    /// Serial port / GPIO chip could not be opened.
    #[error("Connection error: {message}")]
    Connection { message: String },

    /// Read or write on an open channel failed.
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Invalid configuration value.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Value outside its domain.
    #[error("Invalid data: {message}")]
    InvalidData { message: String },
}

impl ModbusError {
    /// Port or chip could not be opened.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Channel read or write failed.
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Setting rejected before opening a link.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Value outside its domain.
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for ModbusError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

/// Result alias used by channel adapters and setup code.
pub type ModbusResult<T> = Result<T, ModbusError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::NoError.code(), 0);
        assert_eq!(ErrorCode::CrcError.code(), 1);
        assert_eq!(ErrorCode::WrongHeaderBytes.code(), 2);
        assert_eq!(ErrorCode::InsufficientBytes.code(), 3);
        assert_eq!(ErrorCode::Timeout.code(), 4);
        assert_eq!(ErrorCode::default(), ErrorCode::NoError);
    }

    #[test]
    fn test_error_code_try_from() {
        for code in 0..=4u16 {
            assert_eq!(ErrorCode::try_from(code).unwrap().code(), code);
        }
        assert!(matches!(
            ErrorCode::try_from(5),
            Err(ModbusError::InvalidData { .. })
        ));
    }

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::Timeout.to_string(), "timeout (4)");
        assert!(!ErrorCode::NoError.is_error());
        assert!(ErrorCode::CrcError.is_error());
    }

    #[test]
    fn test_modbus_error_display() {
        let err = ModbusError::configuration("baud rate must be non-zero");
        assert_eq!(
            err.to_string(),
            "Configuration error: baud rate must be non-zero"
        );

        let err = ModbusError::connection("Failed to open serial port /dev/ttyUSB0");
        assert_eq!(
            err.to_string(),
            "Connection error: Failed to open serial port /dev/ttyUSB0"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: ModbusError = io.into();
        assert!(matches!(err, ModbusError::Io { .. }));
        assert!(err.to_string().contains("pipe closed"));
    }
}
