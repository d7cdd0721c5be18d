//! Blink rate estimation from visible eye counts.
//!
//! A drop in the number of eyes found by the eye detector is taken as a blink,
//! subject to a debounce interval. Accepted blinks are counted per window and
//! scaled to blinks per minute.

use super::{per_minute, RateWindow};
use crate::constants::{DEFAULT_BLINK_DEBOUNCE_SECS, DEFAULT_INITIAL_EYE_COUNT, WINDOW_SECS};
use log::debug;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Instant the blink window is measured from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlinkWindowAnchor {
    /// Window ends `window` after the last accepted blink or the last rate
    /// update, whichever is later. Frequent blinking postpones the update.
    #[default]
    LastBlink,
    /// Window ends `window` after it started, on a fixed cadence
    WindowStart,
}

/// Blink estimator parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlinkSettings {
    /// Window length between rate updates
    pub window: Duration,
    /// Minimum interval between two accepted blinks
    pub debounce: Duration,
    /// Eye count assumed before the first observation
    pub initial_eye_count: usize,
    /// What the window is measured from
    pub anchor: BlinkWindowAnchor,
}

impl Default for BlinkSettings {
    fn default() -> Self {
        Self {
            window: Duration::from_secs_f64(WINDOW_SECS),
            debounce: Duration::from_secs_f64(DEFAULT_BLINK_DEBOUNCE_SECS),
            initial_eye_count: DEFAULT_INITIAL_EYE_COUNT,
            anchor: BlinkWindowAnchor::default(),
        }
    }
}

/// Debounced blink counter with a windowed per-minute rate
#[derive(Debug, Clone)]
pub struct BlinkRateEstimator {
    settings: BlinkSettings,
    prev_eye_count: usize,
    blink_count: usize,
    last_blink: Instant,
    window: RateWindow,
    rate: u32,
}

impl BlinkRateEstimator {
    /// Create an estimator with default settings; `start` also seeds the debounce clock
    #[must_use]
    pub fn new(start: Instant) -> Self {
        Self::with_settings(start, BlinkSettings::default())
    }

    /// Create an estimator with explicit settings
    #[must_use]
    pub fn with_settings(start: Instant, settings: BlinkSettings) -> Self {
        Self {
            settings,
            prev_eye_count: settings.initial_eye_count,
            blink_count: 0,
            last_blink: start,
            window: RateWindow::new(start, settings.window),
            rate: 0,
        }
    }

    /// Record the number of eyes visible at `now`.
    ///
    /// Returns `true` if this observation was accepted as a blink.
    pub fn observe(&mut self, eye_count: usize, now: Instant) -> bool {
        let mut accepted = false;

        if eye_count < self.prev_eye_count
            && now.saturating_duration_since(self.last_blink) >= self.settings.debounce
        {
            self.blink_count += 1;
            self.last_blink = now;
            accepted = true;
            debug!("Blink {} in current window", self.blink_count);
        }

        self.prev_eye_count = eye_count;
        accepted
    }

    /// Close the window if it has elapsed, replacing the rate with the scaled
    /// blink count and zeroing the counter. Returns `true` when a window was closed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let anchor = match self.settings.anchor {
            BlinkWindowAnchor::LastBlink => self.last_blink,
            BlinkWindowAnchor::WindowStart => self.window.start(),
        };
        if now.saturating_duration_since(anchor) < self.settings.window {
            return false;
        }

        self.rate = per_minute(self.blink_count, self.settings.window);
        debug!("{} blinks in window -> {} per minute", self.blink_count, self.rate);

        self.blink_count = 0;
        self.window.restart(now);
        if self.settings.anchor == BlinkWindowAnchor::LastBlink {
            self.last_blink = now;
        }
        true
    }

    /// Last computed blink rate in blinks per minute (0 before the first window)
    #[must_use]
    pub fn rate(&self) -> u32 {
        self.rate
    }

    /// Blinks accepted in the current window
    #[must_use]
    pub fn blink_count(&self) -> usize {
        self.blink_count
    }

    #[must_use]
    pub fn settings(&self) -> &BlinkSettings {
        &self.settings
    }

    /// Forget all state and start a new window at `now`
    pub fn reset(&mut self, now: Instant) {
        self.prev_eye_count = self.settings.initial_eye_count;
        self.blink_count = 0;
        self.last_blink = now;
        self.window.restart(now);
        self.rate = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(t0: Instant, millis: u64) -> Instant {
        t0 + Duration::from_millis(millis)
    }

    #[test]
    fn test_drop_counts_as_blink() {
        let t0 = Instant::now();
        let mut estimator = BlinkRateEstimator::new(t0);

        assert!(estimator.observe(0, ms(t0, 500)));
        assert!(!estimator.observe(2, ms(t0, 600)));
        assert_eq!(estimator.blink_count(), 1);
    }

    #[test]
    fn test_rise_and_steady_are_not_blinks() {
        let t0 = Instant::now();
        let mut estimator = BlinkRateEstimator::new(t0);

        assert!(!estimator.observe(2, ms(t0, 500)));
        assert!(!estimator.observe(3, ms(t0, 1000)));
        assert!(!estimator.observe(3, ms(t0, 1500)));
        assert_eq!(estimator.blink_count(), 0);
    }

    #[test]
    fn test_debounce_merges_close_drops() {
        let t0 = Instant::now();
        let mut estimator = BlinkRateEstimator::new(t0);

        assert!(estimator.observe(1, ms(t0, 1000)));
        assert!(!estimator.observe(2, ms(t0, 1050)));
        // Second drop 0.2 s after the first accepted blink
        assert!(!estimator.observe(0, ms(t0, 1200)));
        assert_eq!(estimator.blink_count(), 1);

        assert!(!estimator.observe(2, ms(t0, 1250)));
        assert!(estimator.observe(1, ms(t0, 1300)));
        assert_eq!(estimator.blink_count(), 2);
    }

    #[test]
    fn test_debounce_applies_from_start() {
        let t0 = Instant::now();
        let mut estimator = BlinkRateEstimator::new(t0);
        assert!(!estimator.observe(0, ms(t0, 100)));
        assert_eq!(estimator.blink_count(), 0);
    }

    #[test]
    fn test_rate_from_last_blink_anchor() {
        let t0 = Instant::now();
        let mut estimator = BlinkRateEstimator::new(t0);

        estimator.observe(0, ms(t0, 1000));
        estimator.observe(2, ms(t0, 1100));
        estimator.observe(0, ms(t0, 2000));
        estimator.observe(2, ms(t0, 2100));
        estimator.observe(1, ms(t0, 3000));
        assert_eq!(estimator.blink_count(), 3);

        // Ten seconds after start, but only seven after the last blink
        assert!(!estimator.tick(ms(t0, 10_000)));
        assert_eq!(estimator.rate(), 0);

        assert!(estimator.tick(ms(t0, 13_000)));
        assert_eq!(estimator.rate(), 18);
        assert_eq!(estimator.blink_count(), 0);

        // Window restarts at the update
        assert!(!estimator.tick(ms(t0, 22_000)));
        assert!(estimator.tick(ms(t0, 23_000)));
        assert_eq!(estimator.rate(), 0);
    }

    #[test]
    fn test_rate_from_window_start_anchor() {
        let t0 = Instant::now();
        let settings = BlinkSettings {
            anchor: BlinkWindowAnchor::WindowStart,
            ..BlinkSettings::default()
        };
        let mut estimator = BlinkRateEstimator::with_settings(t0, settings);

        estimator.observe(0, ms(t0, 9_000));
        estimator.observe(2, ms(t0, 9_100));
        estimator.observe(1, ms(t0, 9_500));
        assert_eq!(estimator.blink_count(), 2);

        assert!(!estimator.tick(ms(t0, 9_999)));
        assert!(estimator.tick(ms(t0, 10_000)));
        assert_eq!(estimator.rate(), 12);

        assert!(!estimator.tick(ms(t0, 19_999)));
        assert!(estimator.tick(ms(t0, 20_000)));
        assert_eq!(estimator.rate(), 0);
    }

    #[test]
    fn test_tick_before_window_keeps_rate() {
        let t0 = Instant::now();
        let mut estimator = BlinkRateEstimator::new(t0);
        estimator.observe(0, ms(t0, 1000));
        estimator.tick(ms(t0, 11_000));
        assert_eq!(estimator.rate(), 6);

        for step in 1..20 {
            estimator.observe(2, ms(t0, 11_000 + step * 400));
            estimator.observe(0, ms(t0, 11_000 + step * 400 + 10));
            assert!(!estimator.tick(ms(t0, 11_000 + step * 400 + 20)));
            assert_eq!(estimator.rate(), 6);
        }
    }

    #[test]
    fn test_reset() {
        let t0 = Instant::now();
        let mut estimator = BlinkRateEstimator::new(t0);
        estimator.observe(0, ms(t0, 1000));
        estimator.tick(ms(t0, 11_000));

        estimator.reset(ms(t0, 12_000));
        assert_eq!(estimator.rate(), 0);
        assert_eq!(estimator.blink_count(), 0);
        // Previous count is back at the initial two eyes
        assert!(estimator.observe(1, ms(t0, 12_500)));
    }
}
