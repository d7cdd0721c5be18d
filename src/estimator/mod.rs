//! Windowed rate estimators for physiological signals.
//!
//! Every estimator follows the same contract: samples are observed as they
//! arrive, and the caller drives a `tick(now)` that closes a fixed-length window,
//! turns the window's event count into a per-minute rate and starts over. No
//! estimator reads the system clock; `now` is always supplied by the caller.

/// Capacity-bounded FIFO of scalar samples
pub mod buffer;

/// Local maxima search with minimum peak separation
pub mod peaks;

/// Pseudo heart rate from forehead intensity oscillation
pub mod heart_rate;

/// Blink rate from visible eye count transitions
pub mod blink;

pub use blink::{BlinkRateEstimator, BlinkSettings, BlinkWindowAnchor};
pub use buffer::SampleBuffer;
pub use heart_rate::{HeartRateEstimator, HeartRateSettings};
pub use peaks::find_peaks;

use crate::constants::SECONDS_PER_MINUTE;
use std::time::{Duration, Instant};

/// Fixed-length wall-clock window anchored at a caller-supplied instant
#[derive(Debug, Clone, Copy)]
pub struct RateWindow {
    start: Instant,
    length: Duration,
}

impl RateWindow {
    /// Create a window starting at `start`
    #[must_use]
    pub fn new(start: Instant, length: Duration) -> Self {
        Self { start, length }
    }

    /// Whether `now` is at or past the end of the window
    #[must_use]
    pub fn is_complete(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.start) >= self.length
    }

    /// Start a new window at `now`
    pub fn restart(&mut self, now: Instant) {
        self.start = now;
    }

    /// Instant the current window started
    #[must_use]
    pub fn start(&self) -> Instant {
        self.start
    }

    /// Window length
    #[must_use]
    pub fn length(&self) -> Duration {
        self.length
    }
}

/// Scale an event count observed over `window` to events per minute
#[must_use]
#[allow(clippy::cast_precision_loss)] // Counts are bounded by the buffer size
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // Result is rounded and non-negative
pub fn per_minute(count: usize, window: Duration) -> u32 {
    let secs = window.as_secs_f64();
    if secs <= 0.0 {
        return 0;
    }
    let rate = (count as f64 * SECONDS_PER_MINUTE / secs).round();
    rate.clamp(0.0, f64::from(u32::MAX)) as u32
}
