//! Half-duplex link control
//!
//! A link is a byte channel plus an optional direction line. The two are
//! separate capabilities so any transport (hardware UART, USB adapter,
//! in-memory fake) can be paired with any way of driving the RS-485
//! transceiver's DE/RE pins, or with none at all.
//!
//! ```text
//!   MeterClient ──> Link ──┬──> ByteChannel       (bytes in/out)
//!                          └──> DirectionControl  (DE/RE line)
//! ```

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{trace, warn};

use crate::constants::{DRAIN_POLL_INTERVAL_MS, FRAME_SIZE};
use crate::error::ModbusResult;
use crate::frame::ResponseFrame;

/// Byte-oriented duplex channel.
///
/// `bytes_available` must not wait for data: it reports what has already
/// arrived. `read_byte` only hands out bytes counted by a previous
/// `bytes_available` call.
pub trait ByteChannel: Send {
    /// Number of received bytes ready to read.
    fn bytes_available(&mut self) -> impl Future<Output = ModbusResult<usize>> + Send;

    /// Take one received byte, if any.
    fn read_byte(&mut self) -> Option<u8>;

    /// Queue `data` for transmission.
    fn write_bytes(&mut self, data: &[u8]) -> impl Future<Output = ModbusResult<()>> + Send;

    /// Wait until queued bytes have physically left the transmitter.
    fn flush(&mut self) -> impl Future<Output = ModbusResult<()>> + Send;
}

/// Driver-enable line of a half-duplex transceiver.
pub trait DirectionControl: Send {
    /// `true` drives the bus (transmit), `false` listens (receive).
    fn set_transmit(&mut self, transmit: bool) -> impl Future<Output = ModbusResult<()>> + Send;
}

/// No direction line: the transceiver switches by itself or the link is
/// full duplex.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDirection;

impl DirectionControl for NoDirection {
    async fn set_transmit(&mut self, _transmit: bool) -> ModbusResult<()> {
        Ok(())
    }
}

/// Channel and direction line of one physical link.
#[derive(Debug)]
pub struct Link<C, D = NoDirection> {
    channel: C,
    direction: D,
    transmitting: bool,
}

impl<C: ByteChannel> Link<C, NoDirection> {
    /// Link without a direction line.
    pub fn new(channel: C) -> Self {
        Self::with_direction(channel, NoDirection)
    }
}

impl<C: ByteChannel, D: DirectionControl> Link<C, D> {
    /// Link with a direction line.
    pub fn with_direction(channel: C, direction: D) -> Self {
        Self {
            channel,
            direction,
            transmitting: false,
        }
    }

    /// Switch the transceiver direction.
    ///
    /// Line errors are logged and swallowed; the exchange carries on and
    /// will surface a bus problem as a timeout.
    pub async fn set_direction(&mut self, transmit: bool) {
        if let Err(e) = self.direction.set_transmit(transmit).await {
            warn!(
                "Failed to set link direction (transmit={}): {}",
                transmit, e
            );
        }
        self.transmitting = transmit;
    }

    /// Last direction requested via [`Link::set_direction`].
    pub fn is_transmitting(&self) -> bool {
        self.transmitting
    }

    /// Received bytes ready to read. Channel errors count as zero.
    pub async fn available(&mut self) -> usize {
        match self.channel.bytes_available().await {
            Ok(n) => n,
            Err(e) => {
                warn!("Failed to poll channel: {}", e);
                0
            }
        }
    }

    /// Write `data` and wait until it has left the transmitter.
    pub async fn send(&mut self, data: &[u8]) -> ModbusResult<()> {
        self.channel.write_bytes(data).await?;
        self.channel.flush().await
    }

    /// Read one full response frame if enough bytes are buffered.
    pub async fn read_frame(&mut self) -> Option<ResponseFrame> {
        if self.available().await < FRAME_SIZE {
            return None;
        }
        let mut frame = [0u8; FRAME_SIZE];
        for slot in frame.iter_mut() {
            *slot = self.channel.read_byte()?;
        }
        Some(frame)
    }

    /// Discard incoming bytes for `max_wait`.
    ///
    /// Bytes already buffered are always consumed, so a zero wait empties
    /// the channel and returns at once. Returns the number of bytes dropped.
    pub async fn flush(&mut self, max_wait: Duration) -> usize {
        let poll = Duration::from_millis(DRAIN_POLL_INTERVAL_MS);
        let started = Instant::now();
        let mut discarded = 0usize;
        loop {
            let pending = self.available().await;
            for _ in 0..pending {
                if self.channel.read_byte().is_none() {
                    break;
                }
                discarded += 1;
            }
            if started.elapsed() >= max_wait {
                break;
            }
            tokio::time::sleep(poll).await;
        }
        if discarded > 0 {
            trace!("Flushed {} stray bytes", discarded);
        }
        discarded
    }

    /// Byte channel.
    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// Byte channel, mutably.
    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    /// Direction line.
    pub fn direction(&self) -> &D {
        &self.direction
    }

    /// Split back into channel and direction line.
    pub fn into_parts(self) -> (C, D) {
        (self.channel, self.direction)
    }
}
