//! # Serial Port Link
//!
//! RS-485 link over a serial device (hardware UART or USB adapter), backed
//! by `tokio-serial`.
//!
//! The port is shared between the byte channel and the optional RTS
//! direction line, since many USB adapters and UART drivers wire the
//! transceiver's DE/RE pins to RTS.
//!
//! ```rust,no_run
//! use mfm_modbus::{registers, MeterClient, SerialConfig};
//!
//! # async fn example() -> mfm_modbus::ModbusResult<()> {
//! let config = SerialConfig::new("/dev/ttyUSB0")
//!     .with_baud_rate(9600)
//!     .with_rts_direction(true);
//!
//! let mut client = MeterClient::open_serial(&config)?;
//! client.begin().await;
//! let hz = client.read_value(registers::MFM_FREQUENCY, 1).await;
//! # Ok(())
//! # }
//! ```

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::Mutex;
use tokio_serial::{SerialPort, SerialStream};
use tracing::{debug, info};

use crate::client::MeterClient;
use crate::config::LinkConfig;
use crate::error::{ModbusError, ModbusResult};
use crate::link::{ByteChannel, DirectionControl, Link};

type SharedPort = Arc<Mutex<SerialStream>>;

/// Default line speed of the meters.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Serial line settings.
#[derive(Debug, Clone)]
pub struct SerialConfig {
    pub port: String,
    pub baud_rate: u32,
    pub data_bits: tokio_serial::DataBits,
    pub stop_bits: tokio_serial::StopBits,
    pub parity: tokio_serial::Parity,
    /// Drive the transceiver direction through RTS.
    pub rts_direction: bool,
    /// RTS level that enables the driver.
    pub rts_active_high: bool,
    /// Link timing and decoding.
    pub link: LinkConfig,
}

impl SerialConfig {
    /// 9600 8N1, no RTS direction control.
    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            baud_rate: DEFAULT_BAUD_RATE,
            data_bits: tokio_serial::DataBits::Eight,
            stop_bits: tokio_serial::StopBits::One,
            parity: tokio_serial::Parity::None,
            rts_direction: false,
            rts_active_high: true,
            link: LinkConfig::default(),
        }
    }

    /// Set the line speed.
    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    /// Set the character size.
    pub fn with_data_bits(mut self, data_bits: tokio_serial::DataBits) -> Self {
        self.data_bits = data_bits;
        self
    }

    /// Set the stop bits.
    pub fn with_stop_bits(mut self, stop_bits: tokio_serial::StopBits) -> Self {
        self.stop_bits = stop_bits;
        self
    }

    /// Set the parity.
    pub fn with_parity(mut self, parity: tokio_serial::Parity) -> Self {
        self.parity = parity;
        self
    }

    /// Drive DE/RE through RTS.
    pub fn with_rts_direction(mut self, enabled: bool) -> Self {
        self.rts_direction = enabled;
        self
    }

    /// Set the RTS level that enables the driver.
    pub fn with_rts_active_high(mut self, active_high: bool) -> Self {
        self.rts_active_high = active_high;
        self
    }

    /// Set link timing and decoding.
    pub fn with_link(mut self, link: LinkConfig) -> Self {
        self.link = link;
        self
    }

    /// Time on the wire for one character (start + data + parity + stop).
    pub fn char_time(&self) -> Duration {
        let data = match self.data_bits {
            tokio_serial::DataBits::Five => 5,
            tokio_serial::DataBits::Six => 6,
            tokio_serial::DataBits::Seven => 7,
            tokio_serial::DataBits::Eight => 8,
        };
        let parity = match self.parity {
            tokio_serial::Parity::None => 0,
            _ => 1,
        };
        let stop = match self.stop_bits {
            tokio_serial::StopBits::One => 1,
            tokio_serial::StopBits::Two => 2,
        };
        let bits = 1 + data + parity + stop;
        Duration::from_micros(bits * 1_000_000 / u64::from(self.baud_rate.max(1)))
    }

    /// Time on the wire for `bytes` characters.
    pub fn transmit_time(&self, bytes: usize) -> Duration {
        self.char_time() * u32::try_from(bytes).unwrap_or(u32::MAX)
    }

    /// Reject settings no port can be opened with.
    pub fn validate(&self) -> ModbusResult<()> {
        if self.port.is_empty() {
            return Err(ModbusError::configuration("serial port name is empty"));
        }
        if self.baud_rate == 0 {
            return Err(ModbusError::configuration("baud rate must be non-zero"));
        }
        Ok(())
    }
}

/// Byte channel over an open serial port.
pub struct SerialChannel {
    port: SharedPort,
    rx: VecDeque<u8>,
    name: String,
    char_time: Duration,
    /// Bytes written since the last flush.
    unsent: usize,
}

impl SerialChannel {
    /// Open the port described by `config`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn open(config: &SerialConfig) -> ModbusResult<Self> {
        config.validate()?;
        let builder = tokio_serial::new(&config.port, config.baud_rate)
            .data_bits(config.data_bits)
            .stop_bits(config.stop_bits)
            .parity(config.parity);

        let port = SerialStream::open(&builder).map_err(|e| {
            ModbusError::connection(format!("Failed to open serial port {}: {}", config.port, e))
        })?;

        info!(
            "Opened serial port {} at {} baud ({:?} {:?} {:?})",
            config.port, config.baud_rate, config.data_bits, config.parity, config.stop_bits
        );

        Ok(Self {
            port: Arc::new(Mutex::new(port)),
            rx: VecDeque::new(),
            name: config.port.clone(),
            char_time: config.char_time(),
            unsent: 0,
        })
    }

    /// RTS direction line on the same port.
    pub fn rts_direction(&self, active_high: bool) -> RtsDirection {
        RtsDirection {
            port: Some(Arc::clone(&self.port)),
            active_high,
        }
    }

    /// Device path the channel was opened on.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl ByteChannel for SerialChannel {
    async fn bytes_available(&mut self) -> ModbusResult<usize> {
        let mut port = self.port.lock().await;
        let pending = port
            .bytes_to_read()
            .map_err(|e| ModbusError::io(format!("{}: {}", self.name, e)))?;
        if pending > 0 {
            let mut buf = vec![0u8; pending as usize];
            port.read_exact(&mut buf).await?;
            self.rx.extend(buf);
        }
        Ok(self.rx.len())
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }

    async fn write_bytes(&mut self, data: &[u8]) -> ModbusResult<()> {
        let mut port = self.port.lock().await;
        port.write_all(data).await?;
        self.unsent += data.len();
        Ok(())
    }

    async fn flush(&mut self) -> ModbusResult<()> {
        self.port.lock().await.flush().await?;
        // The driver returns before the UART has shifted out the last bytes
        let unsent = std::mem::take(&mut self.unsent);
        if unsent > 0 {
            let shift_out = self.char_time * u32::try_from(unsent).unwrap_or(u32::MAX);
            tokio::time::sleep(shift_out).await;
        }
        Ok(())
    }
}

/// Transceiver direction driven through the RTS modem line.
///
/// A detached instance (no port) is a no-op, for adapters that switch
/// direction in hardware.
#[derive(Default)]
pub struct RtsDirection {
    port: Option<SharedPort>,
    active_high: bool,
}

impl RtsDirection {
    /// Direction line that does nothing.
    pub fn detached() -> Self {
        Self::default()
    }

    /// `true` when RTS is actually driven.
    pub fn is_attached(&self) -> bool {
        self.port.is_some()
    }
}

impl DirectionControl for RtsDirection {
    async fn set_transmit(&mut self, transmit: bool) -> ModbusResult<()> {
        let port = match &self.port {
            Some(port) => port,
            None => return Ok(()),
        };
        let level = transmit == self.active_high;
        let mut port = port.lock().await;
        port.write_request_to_send(level)
            .map_err(|e| ModbusError::io(format!("Failed to set RTS: {}", e)))
    }
}

impl MeterClient<SerialChannel, RtsDirection> {
    /// Open a serial port and build a client on it.
    ///
    /// The direction line is RTS when `config.rts_direction` is set,
    /// otherwise a no-op. The line is left in receive mode.
    pub fn open_serial(config: &SerialConfig) -> ModbusResult<Self> {
        let channel = SerialChannel::open(config)?;
        let direction = if config.rts_direction {
            debug!(
                "Using RTS for direction control (active {})",
                if config.rts_active_high { "high" } else { "low" }
            );
            channel.rts_direction(config.rts_active_high)
        } else {
            RtsDirection::detached()
        };
        let link = Link::with_direction(channel, direction);
        Ok(MeterClient::from_link(link, config.link))
    }
}
