//! GPIO direction line
//!
//! Drives the DE/RE pins of an RS-485 transceiver from a Linux GPIO
//! character device through `tokio-gpiod`. Use this when the UART has no
//! usable RTS pin (e.g. a Raspberry Pi hat with DE wired to a GPIO).

use tokio_gpiod::{Chip, Lines, Options, Output};
use tracing::debug;

use crate::error::{ModbusError, ModbusResult};
use crate::link::DirectionControl;

/// Consumer label shown by `gpioinfo`.
const GPIO_CONSUMER: &str = "mfm-modbus";

/// GPIO line location and polarity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpioConfig {
    /// Chip name or path, e.g. `gpiochip0`.
    pub chip: String,
    /// Line offset on the chip.
    pub line: u32,
    /// Transmit is a low level.
    pub active_low: bool,
}

impl GpioConfig {
    /// Line `line` on `chip`, transmit active high.
    pub fn new(chip: impl Into<String>, line: u32) -> Self {
        Self {
            chip: chip.into(),
            line,
            active_low: false,
        }
    }

    /// Invert the transmit level.
    pub fn with_active_low(mut self, active_low: bool) -> Self {
        self.active_low = active_low;
        self
    }

    /// Physical level for a requested direction.
    pub fn level(&self, transmit: bool) -> bool {
        transmit != self.active_low
    }
}

/// Direction line on a requested GPIO output.
pub struct GpioDirection {
    lines: Lines<Output>,
    config: GpioConfig,
}

impl GpioDirection {
    /// Request the line as an output, initially in receive mode.
    pub async fn open(config: GpioConfig) -> ModbusResult<Self> {
        let chip = Chip::new(&config.chip).await.map_err(|e| {
            ModbusError::connection(format!("Failed to open GPIO chip '{}': {}", config.chip, e))
        })?;

        let opts = Options::output([config.line])
            .consumer(GPIO_CONSUMER)
            .values([config.level(false)]);
        let lines = chip.request_lines(opts).await.map_err(|e| {
            ModbusError::connection(format!(
                "Failed to request GPIO line {} on chip '{}': {}",
                config.line, config.chip, e
            ))
        })?;

        debug!(
            "GPIO direction line {}:{} ready (active_low={})",
            config.chip, config.line, config.active_low
        );
        Ok(Self { lines, config })
    }

    /// Chip and line settings.
    pub fn config(&self) -> &GpioConfig {
        &self.config
    }
}

impl DirectionControl for GpioDirection {
    async fn set_transmit(&mut self, transmit: bool) -> ModbusResult<()> {
        let level = self.config.level(transmit);
        self.lines.set_values([level]).await.map_err(|e| {
            ModbusError::io(format!(
                "Failed to write GPIO line {}: {}",
                self.config.line, e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_polarity() {
        let config = GpioConfig::new("gpiochip0", 17);
        assert!(config.level(true));
        assert!(!config.level(false));

        let config = config.with_active_low(true);
        assert!(!config.level(true));
        assert!(config.level(false));
    }

    #[tokio::test]
    async fn test_open_missing_chip_fails() {
        let config = GpioConfig::new("/dev/mfm-modbus-no-such-chip", 0);
        let result = GpioDirection::open(config).await;
        assert!(matches!(result, Err(ModbusError::Connection { .. })));
    }
}
