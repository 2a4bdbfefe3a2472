//! Playback cadence.
//!
//! The stepper never owns a timer. Whoever drives it (a GUI timer, a headless
//! loop) reads the period from here and calls `tick()` once per period.

use std::time::Duration;

use crate::error::{SimError, SimResult};

/// Default animation and sampling rate (Hz).
pub const DEFAULT_TICK_RATE_HZ: f64 = 60.0;

/// Fixed tick rate of a playback driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickRate {
    hz: f64,
}

impl Default for TickRate {
    fn default() -> Self {
        Self {
            hz: DEFAULT_TICK_RATE_HZ,
        }
    }
}

impl TickRate {
    /// Create a tick rate from a frequency in Hz (must be finite and positive).
    pub fn from_frequency(hz: f64) -> SimResult<Self> {
        if !(hz.is_finite() && hz > 0.0) {
            return Err(SimError::InvalidParameter {
                what: "tick rate must be finite and positive",
            });
        }
        Ok(Self { hz })
    }

    /// Get the tick frequency in Hz.
    pub fn frequency(&self) -> f64 {
        self.hz
    }

    /// Nominal period in seconds.
    pub fn period_s(&self) -> f64 {
        1.0 / self.hz
    }

    pub fn period(&self) -> Duration {
        Duration::from_secs_f64(self.period_s())
    }

    /// Whole-millisecond timer interval, truncated (60 Hz gives 16 ms).
    pub fn timer_interval_ms(&self) -> u64 {
        (1000.0 / self.hz) as u64
    }
}
