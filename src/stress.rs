//! Composite stress scoring from blink and heart rate estimates.

use crate::constants::{BLINK_RATE_HIGH, BLINK_RATE_LOW, HEART_RATE_HIGH, HEART_RATE_LOW, MAX_STRESS_SCORE};
use crate::estimator::{BlinkRateEstimator, BlinkSettings, HeartRateEstimator, HeartRateSettings};
use std::time::Instant;

/// Low and high ends of the normal blink and heart rate ranges
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StressThresholds {
    pub blink_low: f64,
    pub blink_high: f64,
    pub heart_low: f64,
    pub heart_high: f64,
}

impl Default for StressThresholds {
    fn default() -> Self {
        Self {
            blink_low: BLINK_RATE_LOW,
            blink_high: BLINK_RATE_HIGH,
            heart_low: HEART_RATE_LOW,
            heart_high: HEART_RATE_HIGH,
        }
    }
}

impl StressThresholds {
    /// Combine the two rates into a score in `0..=100`.
    ///
    /// Each rate is mapped linearly from its low threshold (0) to its high
    /// threshold (1) and clamped; the two factors contribute 50 points each.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // Clamped to 0..=100 first
    pub fn score(&self, blink_rate: f64, heart_rate: f64) -> u8 {
        let blink = normalized(blink_rate, self.blink_low, self.blink_high);
        let heart = normalized(heart_rate, self.heart_low, self.heart_high);
        let max = f64::from(MAX_STRESS_SCORE);
        ((blink + heart) * max / 2.0).round().clamp(0.0, max) as u8
    }
}

/// Position of `value` between `low` and `high`, clamped to `[0, 1]`
fn normalized(value: f64, low: f64, high: f64) -> f64 {
    let span = high - low;
    if !value.is_finite() {
        return if value > 0.0 { 1.0 } else { 0.0 };
    }
    if span <= 0.0 {
        return if value >= high { 1.0 } else { 0.0 };
    }
    ((value - low) / span).clamp(0.0, 1.0)
}

/// Stress score with the default 15-20 blinks/min and 60-100 BPM ranges
#[must_use]
pub fn stress_score(blink_rate: f64, heart_rate: f64) -> u8 {
    StressThresholds::default().score(blink_rate, heart_rate)
}

/// Measurements taken from one detected face in one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceSample {
    /// Number of eyes the eye detector found inside the face
    pub eye_count: usize,
    /// Mean forehead intensity, absent when the forehead crop is empty
    pub forehead_intensity: Option<f64>,
}

/// Current rate estimates and the score derived from them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StressReading {
    /// Blinks per minute
    pub blink_rate: u32,
    /// Beats per minute
    pub heart_rate: u32,
    /// Composite stress score in `0..=100`
    pub score: u8,
}

/// Drives the blink and heart rate estimators from per-frame face samples
#[derive(Debug, Clone)]
pub struct StressMonitor {
    blink: BlinkRateEstimator,
    heart: HeartRateEstimator,
    thresholds: StressThresholds,
}

impl StressMonitor {
    /// Create a monitor with default settings starting at `start`
    #[must_use]
    pub fn new(start: Instant) -> Self {
        Self::with_settings(
            start,
            BlinkSettings::default(),
            HeartRateSettings::default(),
            StressThresholds::default(),
        )
    }

    /// Create a monitor with explicit estimator settings and thresholds
    #[must_use]
    pub fn with_settings(
        start: Instant,
        blink: BlinkSettings,
        heart: HeartRateSettings,
        thresholds: StressThresholds,
    ) -> Self {
        Self {
            blink: BlinkRateEstimator::with_settings(start, blink),
            heart: HeartRateEstimator::with_settings(start, heart),
            thresholds,
        }
    }

    /// Feed one face sample observed at `now` and return the updated reading.
    ///
    /// A sample without forehead intensity neither feeds nor ticks the heart
    /// rate estimator.
    pub fn update(&mut self, sample: FaceSample, now: Instant) -> StressReading {
        self.blink.observe(sample.eye_count, now);
        self.blink.tick(now);

        if let Some(intensity) = sample.forehead_intensity {
            self.heart.observe(intensity);
            self.heart.tick(now);
        }

        self.reading()
    }

    /// Reading from the most recent rate estimates
    #[must_use]
    pub fn reading(&self) -> StressReading {
        let blink_rate = self.blink.rate();
        let heart_rate = self.heart.rate();
        StressReading {
            blink_rate,
            heart_rate,
            score: self.thresholds.score(f64::from(blink_rate), f64::from(heart_rate)),
        }
    }

    #[must_use]
    pub fn blink(&self) -> &BlinkRateEstimator {
        &self.blink
    }

    #[must_use]
    pub fn heart(&self) -> &HeartRateEstimator {
        &self.heart
    }

    /// Reset both estimators to start over at `now`
    pub fn reset(&mut self, now: Instant) {
        self.blink.reset(now);
        self.heart.reset(now);
    }
}
