//! Meter client: one request/response exchange per call
//!
//! [`MeterClient`] owns a [`Link`] and runs the whole read cycle for a
//! single float input register:
//!
//! ```text
//! Idle ──> Transmitting ──> AwaitingResponse ──> Validating ──> Draining ──> Done
//!  │ flush stale bytes        │ poll + yield          │ parse frame   │ quiet period
//!  │ DE high, settle, send    │ until 9 bytes         │               │ update counters
//!  │ DE low                   │ or turnaround expiry  │               │
//! ```
//!
//! Every call finishes in bounded time. Failures are never returned as
//! `Err`: the reading carries an [`ErrorCode`], [`MeterClient::read_value`]
//! returns `NaN` when no value was decoded, and the diagnostics counters
//! record the outcome. Retry policy belongs to the caller.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! # #[cfg(feature = "rtu")]
//! # async fn example() -> mfm_modbus::ModbusResult<()> {
//! use mfm_modbus::{registers, MeterClient, SerialConfig};
//!
//! let mut client = MeterClient::open_serial(&SerialConfig::new("/dev/ttyUSB0"))?;
//!
//! let voltage = client.read_value(registers::MFM_VOLTAGE_V1N, 1).await;
//! if voltage.is_nan() {
//!     println!("read failed: {}", client.get_error_code(true));
//! } else {
//!     println!("V1N = {:.1} V", voltage);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Concurrency
//!
//! Exchanges on one link must not overlap. `read` takes `&mut self`, so a
//! shared client needs an external lock (e.g. `tokio::sync::Mutex`).

use tokio::time::Instant;
use tracing::{debug, info, trace, warn};

use crate::bytes::ByteOrder;
use crate::config::LinkConfig;
use crate::constants::{DEFAULT_SLAVE_ID, FRAME_SIZE};
use crate::diagnostics::{Diagnostics, DiagnosticsSnapshot};
use crate::error::ErrorCode;
use crate::frame::{build_request, format_hex_packet, parse_response};
use crate::link::{ByteChannel, DirectionControl, Link, NoDirection};

/// Log a frame with direction marker.
fn log_packet(direction: &str, data: &[u8], slave_id: u8) {
    info!(
        "[MFM-RTU] {} slave:{} {}",
        direction,
        slave_id,
        format_hex_packet(data)
    );
}

/// Result of one exchange.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// Register that was read.
    pub register: u16,
    /// Slave that was addressed.
    pub slave_id: u8,
    /// Decoded value, if a valid frame was received.
    ///
    /// Can be `Some` together with [`ErrorCode::Timeout`] when the frame
    /// was valid but the bus stayed busy during the drain window.
    pub value: Option<f32>,
    /// Outcome classification.
    pub error: ErrorCode,
}

impl Reading {
    /// `true` when the exchange finished without error.
    pub fn is_ok(&self) -> bool {
        !self.error.is_error()
    }

    /// Value, or `NaN` when none was decoded.
    pub fn value_or_nan(&self) -> f32 {
        self.value.unwrap_or(f32::NAN)
    }
}

/// Modbus RTU master for MFM energy meters.
///
/// Generic over the byte channel and the transceiver direction line, so
/// transports are picked at construction time.
pub struct MeterClient<C, D = NoDirection> {
    link: Link<C, D>,
    config: LinkConfig,
    diagnostics: Diagnostics,
}

impl<C: ByteChannel> MeterClient<C, NoDirection> {
    /// Client on a channel without a direction line, default settings.
    pub fn new(channel: C) -> Self {
        Self::from_link(Link::new(channel), LinkConfig::default())
    }
}

impl<C: ByteChannel, D: DirectionControl> MeterClient<C, D> {
    /// Client on a channel with a direction line, default settings.
    pub fn with_direction(channel: C, direction: D) -> Self {
        Self::from_link(
            Link::with_direction(channel, direction),
            LinkConfig::default(),
        )
    }

    /// Client from an assembled link and configuration.
    pub fn from_link(link: Link<C, D>, config: LinkConfig) -> Self {
        Self {
            link,
            config,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: LinkConfig) -> Self {
        self.config = config;
        self
    }

    /// Put the transceiver into receive mode.
    ///
    /// Call once after wiring up the link so the bus is not driven before
    /// the first exchange.
    pub async fn begin(&mut self) {
        self.link.set_direction(false).await;
    }

    /// Run one exchange and return the full outcome.
    pub async fn read(&mut self, register: u16, slave_id: u8) -> Reading {
        let request = build_request(slave_id, register);

        // Idle -> Transmitting
        let stale = self.link.flush(std::time::Duration::ZERO).await;
        if stale > 0 {
            debug!("Discarded {} stale bytes before request", stale);
        }
        self.link.set_direction(true).await;
        if !self.config.settle_delay.is_zero() {
            tokio::time::sleep(self.config.settle_delay).await;
        }
        if self.config.packet_logging {
            log_packet(">>>", &request, slave_id);
        }
        if let Err(e) = self.link.send(&request).await {
            warn!(
                "Failed to send request to slave {} register 0x{:04X}: {}",
                slave_id, register, e
            );
        }
        // Mandatory before the slave can answer on a half-duplex bus
        self.link.set_direction(false).await;

        // Transmitting -> AwaitingResponse
        let mut error = ErrorCode::NoError;
        let turnaround = self.config.turnaround();
        let started = Instant::now();
        loop {
            if self.link.available().await >= FRAME_SIZE {
                break;
            }
            if started.elapsed() > turnaround {
                trace!("No complete response after {:?}", turnaround);
                error = ErrorCode::Timeout;
                break;
            }
            tokio::task::yield_now().await;
        }

        // AwaitingResponse -> Validating
        let mut value = None;
        if !error.is_error() {
            match self.link.read_frame().await {
                Some(frame) => {
                    if self.config.packet_logging {
                        log_packet("<<<", &frame, slave_id);
                    }
                    match parse_response(&frame, slave_id, self.config.byte_order) {
                        Ok(v) => value = Some(v),
                        Err(code) => error = code,
                    }
                }
                None => error = ErrorCode::InsufficientBytes,
            }
        }

        // Validating -> Draining
        let stray = self.link.flush(self.config.drain_timeout()).await;
        if self.link.available().await > 0 {
            debug!(
                "Bus still busy after {}ms drain ({} bytes dropped)",
                self.config.drain_timeout_ms(),
                stray
            );
            error = ErrorCode::Timeout;
        }

        // Draining -> Done
        self.diagnostics.record(error);
        if error.is_error() {
            warn!(
                "Read slave {} register 0x{:04X} failed: {}",
                slave_id, register, error
            );
        } else {
            debug!(
                "Read slave {} register 0x{:04X} = {:?}",
                slave_id, register, value
            );
        }

        Reading {
            register,
            slave_id,
            value,
            error,
        }
    }

    /// Read one register; `NaN` when no value was decoded.
    ///
    /// A valid frame followed by a busy bus still returns its value while
    /// the error code reads [`ErrorCode::Timeout`]. Check
    /// [`MeterClient::get_error_code`] to tell a noisy bus from a
    /// misconfigured slave or address.
    pub async fn read_value(&mut self, register: u16, slave_id: u8) -> f32 {
        self.read(register, slave_id).await.value_or_nan()
    }

    /// [`MeterClient::read_value`] on the default slave (1).
    pub async fn read_value_default(&mut self, register: u16) -> f32 {
        self.read_value(register, DEFAULT_SLAVE_ID).await
    }

    /// Read several registers, one exchange each, in order.
    ///
    /// Failures do not stop the sequence.
    pub async fn read_many(&mut self, registers: &[u16], slave_id: u8) -> Vec<Reading> {
        let mut readings = Vec::with_capacity(registers.len());
        for &register in registers {
            readings.push(self.read(register, slave_id).await);
        }
        readings
    }

    // ===== Diagnostics =====

    /// Last error code; `clear` resets it in the same call.
    pub fn get_error_code(&mut self, clear: bool) -> ErrorCode {
        self.diagnostics.error_code(clear)
    }

    /// Failed exchange count; `clear` resets it in the same call.
    pub fn get_error_count(&mut self, clear: bool) -> u32 {
        self.diagnostics.error_count(clear)
    }

    /// Successful exchange count; `clear` resets it in the same call.
    pub fn get_success_count(&mut self, clear: bool) -> u32 {
        self.diagnostics.success_count(clear)
    }

    /// Reset the last error code.
    pub fn clear_error_code(&mut self) {
        self.diagnostics.clear_error_code();
    }

    /// Reset the failed exchange count.
    pub fn clear_error_count(&mut self) {
        self.diagnostics.clear_error_count();
    }

    /// Reset the successful exchange count.
    pub fn clear_success_count(&mut self) {
        self.diagnostics.clear_success_count();
    }

    /// Counters without clearing them.
    pub fn diagnostics(&self) -> DiagnosticsSnapshot {
        self.diagnostics.snapshot()
    }

    // ===== Timing =====

    /// Set the response wait, clamped to 20..=5000 ms.
    pub fn set_turnaround_ms(&mut self, ms: u16) {
        self.config.set_turnaround_ms(ms);
    }

    /// Set the post-exchange drain timeout, clamped to 20..=5000 ms.
    pub fn set_timeout_ms(&mut self, ms: u16) {
        self.config.set_drain_timeout_ms(ms);
    }

    /// Response wait in milliseconds.
    pub fn get_turnaround_ms(&self) -> u16 {
        self.config.turnaround_ms()
    }

    /// Drain timeout in milliseconds.
    pub fn get_timeout_ms(&self) -> u16 {
        self.config.drain_timeout_ms()
    }

    // ===== Settings =====

    /// Enable or disable hex logging of every frame.
    pub fn set_packet_logging(&mut self, enabled: bool) {
        self.config.packet_logging = enabled;
    }

    /// Set the float byte order used to decode replies.
    pub fn set_byte_order(&mut self, order: ByteOrder) {
        self.config.byte_order = order;
    }

    /// Current link settings.
    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// Underlying link.
    pub fn link(&self) -> &Link<C, D> {
        &self.link
    }

    /// Underlying link, mutably.
    pub fn link_mut(&mut self) -> &mut Link<C, D> {
        &mut self.link
    }

    /// Give back the link, dropping diagnostics.
    pub fn into_link(self) -> Link<C, D> {
        self.link
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModbusResult;
    use crate::frame::build_response;
    use std::collections::VecDeque;
    use std::time::Duration;

    /// Channel that answers each request with a canned reply.
    #[derive(Default)]
    struct ReplyChannel {
        replies: VecDeque<Vec<u8>>,
        rx: VecDeque<u8>,
        written: Vec<Vec<u8>>,
    }

    impl ReplyChannel {
        fn replying(replies: Vec<Vec<u8>>) -> Self {
            Self {
                replies: replies.into(),
                ..Default::default()
            }
        }
    }

    impl ByteChannel for ReplyChannel {
        async fn bytes_available(&mut self) -> ModbusResult<usize> {
            Ok(self.rx.len())
        }

        fn read_byte(&mut self) -> Option<u8> {
            self.rx.pop_front()
        }

        async fn write_bytes(&mut self, data: &[u8]) -> ModbusResult<()> {
            self.written.push(data.to_vec());
            if let Some(reply) = self.replies.pop_front() {
                self.rx.extend(reply);
            }
            Ok(())
        }

        async fn flush(&mut self) -> ModbusResult<()> {
            Ok(())
        }
    }

    fn fast_config() -> LinkConfig {
        LinkConfig::new()
            .with_turnaround_ms(20)
            .with_drain_timeout_ms(20)
            .with_settle_delay(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_read_success() {
        let reply = build_response(1, 230.0, ByteOrder::BigEndian).to_vec();
        let channel = ReplyChannel::replying(vec![reply]);
        let mut client = MeterClient::new(channel).with_config(fast_config());

        let reading = client.read(0x0000, 1).await;
        assert!(reading.is_ok());
        assert_eq!(reading.value, Some(230.0));
        assert_eq!(
            client.link().channel().written[0],
            vec![0x01, 0x04, 0x00, 0x00, 0x00, 0x02, 0x71, 0xCB]
        );
        assert_eq!(client.get_success_count(false), 1);
        assert_eq!(client.get_error_count(false), 0);
    }

    #[tokio::test]
    async fn test_read_value_nan_on_wrong_slave() {
        let reply = build_response(2, 230.0, ByteOrder::BigEndian).to_vec();
        let channel = ReplyChannel::replying(vec![reply]);
        let mut client = MeterClient::new(channel).with_config(fast_config());

        let value = client.read_value(0x0000, 1).await;
        assert!(value.is_nan());
        assert_eq!(client.get_error_code(false), ErrorCode::WrongHeaderBytes);
    }

    #[tokio::test]
    async fn test_stale_bytes_are_flushed_before_request() {
        let reply = build_response(1, 50.0, ByteOrder::BigEndian).to_vec();
        let mut channel = ReplyChannel::replying(vec![reply]);
        channel.rx.extend([0xDE, 0xAD]);
        let mut client = MeterClient::new(channel).with_config(fast_config());

        assert_eq!(client.read_value(0x0038, 1).await, 50.0);
        assert_eq!(client.get_error_code(false), ErrorCode::NoError);
    }

    #[tokio::test]
    async fn test_read_many_keeps_going_after_failure() {
        let replies = vec![
            build_response(1, 1.0, ByteOrder::BigEndian).to_vec(),
            vec![0x01, 0x04],
            build_response(1, 3.0, ByteOrder::BigEndian).to_vec(),
        ];
        let channel = ReplyChannel::replying(replies);
        let mut client = MeterClient::new(channel).with_config(fast_config());

        let readings = client.read_many(&[0x0000, 0x0002, 0x0004], 1).await;
        assert_eq!(readings.len(), 3);
        assert_eq!(readings[0].value, Some(1.0));
        assert_eq!(readings[1].error, ErrorCode::Timeout);
        assert_eq!(readings[1].register, 0x0002);
        assert_eq!(readings[2].value, Some(3.0));
        assert_eq!(client.get_success_count(false), 2);
        assert_eq!(client.get_error_count(false), 1);
    }

    #[tokio::test]
    async fn test_word_swapped_meter() {
        let reply = build_response(1, 12.5, ByteOrder::BigEndianSwap).to_vec();
        let channel = ReplyChannel::replying(vec![reply]);
        let mut client = MeterClient::new(channel).with_config(fast_config());
        client.set_byte_order(ByteOrder::BigEndianSwap);

        assert_eq!(client.read_value_default(0x0018).await, 12.5);
    }

    #[test]
    fn test_timing_setters_clamp() {
        let mut client = MeterClient::new(ReplyChannel::default());
        assert_eq!(client.get_turnaround_ms(), 200);
        assert_eq!(client.get_timeout_ms(), 500);

        client.set_turnaround_ms(5);
        client.set_timeout_ms(60000);
        assert_eq!(client.get_turnaround_ms(), 20);
        assert_eq!(client.get_timeout_ms(), 5000);

        client.set_turnaround_ms(300);
        client.set_timeout_ms(700);
        assert_eq!(client.get_turnaround_ms(), 300);
        assert_eq!(client.get_timeout_ms(), 700);
    }

    #[test]
    fn test_reading_value_or_nan() {
        let reading = Reading {
            register: 0,
            slave_id: 1,
            value: None,
            error: ErrorCode::CrcError,
        };
        assert!(reading.value_or_nan().is_nan());
        assert!(!reading.is_ok());
    }
}
