//! Per-link exchange counters and last error
//!
//! Owned by one [`MeterClient`](crate::MeterClient). Updated only at the end
//! of an exchange, so serialized exchanges need no extra locking.

use crate::error::ErrorCode;

/// Success/error counters and the last recorded error code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Diagnostics {
    last_error: ErrorCode,
    error_count: u32,
    success_count: u32,
}

impl Diagnostics {
    /// All counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one exchange.
    ///
    /// Exactly one counter moves. A failure overwrites the last error; a
    /// success resets it to [`ErrorCode::NoError`].
    pub fn record(&mut self, outcome: ErrorCode) {
        if outcome.is_error() {
            self.last_error = outcome;
            self.error_count = self.error_count.wrapping_add(1);
        } else {
            self.last_error = ErrorCode::NoError;
            self.success_count = self.success_count.wrapping_add(1);
        }
    }

    /// Last error code, optionally clearing it in the same call.
    pub fn error_code(&mut self, clear: bool) -> ErrorCode {
        let code = self.last_error;
        if clear {
            self.clear_error_code();
        }
        code
    }

    /// Total failed exchanges, optionally clearing the counter.
    pub fn error_count(&mut self, clear: bool) -> u32 {
        let count = self.error_count;
        if clear {
            self.clear_error_count();
        }
        count
    }

    /// Total successful exchanges, optionally clearing the counter.
    pub fn success_count(&mut self, clear: bool) -> u32 {
        let count = self.success_count;
        if clear {
            self.clear_success_count();
        }
        count
    }

    /// Reset the last error code.
    pub fn clear_error_code(&mut self) {
        self.last_error = ErrorCode::NoError;
    }

    /// Reset the failed exchange count.
    pub fn clear_error_count(&mut self) {
        self.error_count = 0;
    }

    /// Reset the successful exchange count.
    pub fn clear_success_count(&mut self) {
        self.success_count = 0;
    }

    /// Read without side effects.
    pub fn snapshot(&self) -> DiagnosticsSnapshot {
        DiagnosticsSnapshot {
            last_error: self.last_error,
            error_count: self.error_count,
            success_count: self.success_count,
        }
    }
}

/// Copy of the diagnostics at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticsSnapshot {
    pub last_error: ErrorCode,
    pub error_count: u32,
    pub success_count: u32,
}
