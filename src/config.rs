//! # Link Configuration
//!
//! Timing and decoding settings for one RS-485 link.
//!
//! Both timing parameters are clamped to
//! [`MIN_DELAY_MS`]..=[`MAX_DELAY_MS`]. Out-of-range input is never
//! rejected; it is pulled to the nearest bound.

use std::time::Duration;

use crate::bytes::ByteOrder;
use crate::constants::{
    DEFAULT_DRAIN_TIMEOUT_MS, DEFAULT_SETTLE_DELAY_MS, DEFAULT_TURNAROUND_MS, MAX_DELAY_MS,
    MIN_DELAY_MS,
};

/// Clamp a timing value to the supported range.
#[inline]
pub fn clamp_delay_ms(ms: u16) -> u16 {
    ms.clamp(MIN_DELAY_MS, MAX_DELAY_MS)
}

/// Link settings.
///
/// # Example
///
/// ```rust
/// use mfm_modbus::LinkConfig;
///
/// let config = LinkConfig::new()
///     .with_turnaround_ms(10)      // clamped to 20
///     .with_drain_timeout_ms(100);
///
/// assert_eq!(config.turnaround_ms(), 20);
/// assert_eq!(config.drain_timeout_ms(), 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkConfig {
    turnaround_ms: u16,
    drain_timeout_ms: u16,
    /// Pause between asserting transmit and writing the request.
    pub settle_delay: Duration,
    /// Wire order of the four float data bytes.
    pub byte_order: ByteOrder,
    /// Log every request/response frame as hex.
    pub packet_logging: bool,
}

impl LinkConfig {
    /// Create a configuration with the meter defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the response turnaround timeout (clamped).
    pub fn with_turnaround_ms(mut self, ms: u16) -> Self {
        self.set_turnaround_ms(ms);
        self
    }

    /// Set the post-exchange drain timeout (clamped).
    pub fn with_drain_timeout_ms(mut self, ms: u16) -> Self {
        self.set_drain_timeout_ms(ms);
        self
    }

    /// Set the pause between raising transmit and sending.
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Set the float byte order.
    pub fn with_byte_order(mut self, order: ByteOrder) -> Self {
        self.byte_order = order;
        self
    }

    /// Enable or disable hex frame logging.
    pub fn with_packet_logging(mut self, enabled: bool) -> Self {
        self.packet_logging = enabled;
        self
    }

    /// Set the response turnaround timeout in place (clamped).
    pub fn set_turnaround_ms(&mut self, ms: u16) {
        self.turnaround_ms = clamp_delay_ms(ms);
    }

    /// Set the drain timeout in place (clamped).
    pub fn set_drain_timeout_ms(&mut self, ms: u16) {
        self.drain_timeout_ms = clamp_delay_ms(ms);
    }

    /// Response turnaround timeout in milliseconds.
    pub fn turnaround_ms(&self) -> u16 {
        self.turnaround_ms
    }

    /// Drain timeout in milliseconds.
    pub fn drain_timeout_ms(&self) -> u16 {
        self.drain_timeout_ms
    }

    /// Response turnaround timeout.
    pub fn turnaround(&self) -> Duration {
        Duration::from_millis(u64::from(self.turnaround_ms))
    }

    /// Drain timeout.
    pub fn drain_timeout(&self) -> Duration {
        Duration::from_millis(u64::from(self.drain_timeout_ms))
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            turnaround_ms: DEFAULT_TURNAROUND_MS,
            drain_timeout_ms: DEFAULT_DRAIN_TIMEOUT_MS,
            settle_delay: Duration::from_millis(DEFAULT_SETTLE_DELAY_MS),
            byte_order: ByteOrder::BigEndian,
            packet_logging: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LinkConfig::default();
        assert_eq!(config.turnaround_ms(), 200);
        assert_eq!(config.drain_timeout_ms(), 500);
        assert_eq!(config.settle_delay, Duration::from_millis(2));
        assert_eq!(config.byte_order, ByteOrder::BigEndian);
        assert!(!config.packet_logging);
    }

    #[test]
    fn test_clamp_delay_ms() {
        assert_eq!(clamp_delay_ms(0), 20);
        assert_eq!(clamp_delay_ms(19), 20);
        assert_eq!(clamp_delay_ms(20), 20);
        assert_eq!(clamp_delay_ms(1234), 1234);
        assert_eq!(clamp_delay_ms(5000), 5000);
        assert_eq!(clamp_delay_ms(5001), 5000);
        assert_eq!(clamp_delay_ms(u16::MAX), 5000);
    }

    #[test]
    fn test_builder_pattern() {
        let config = LinkConfig::new()
            .with_turnaround_ms(9999)
            .with_drain_timeout_ms(1)
            .with_settle_delay(Duration::ZERO)
            .with_byte_order(ByteOrder::BigEndianSwap)
            .with_packet_logging(true);

        assert_eq!(config.turnaround_ms(), 5000);
        assert_eq!(config.drain_timeout_ms(), 20);
        assert_eq!(config.turnaround(), Duration::from_millis(5000));
        assert_eq!(config.drain_timeout(), Duration::from_millis(20));
        assert_eq!(config.settle_delay, Duration::ZERO);
        assert_eq!(config.byte_order, ByteOrder::BigEndianSwap);
        assert!(config.packet_logging);
    }
}
