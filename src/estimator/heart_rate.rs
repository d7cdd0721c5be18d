//! Pseudo heart rate estimation from forehead brightness.
//!
//! Mean forehead intensity oscillates faintly with blood volume. Each window
//! the buffered intensities are searched for peaks and the peak count is
//! scaled to beats per minute.

use super::{find_peaks, per_minute, RateWindow, SampleBuffer};
use crate::constants::{DEFAULT_BUFFER_CAPACITY, DEFAULT_MIN_SAMPLES, DEFAULT_PEAK_DISTANCE, WINDOW_SECS};
use log::debug;
use std::time::{Duration, Instant};

/// Heart rate estimator parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeartRateSettings {
    /// Window length between rate updates
    pub window: Duration,
    /// Maximum number of buffered samples
    pub buffer_capacity: usize,
    /// Samples required for a peak search
    pub min_samples: usize,
    /// Minimum separation between counted peaks
    pub peak_distance: usize,
}

impl Default for HeartRateSettings {
    fn default() -> Self {
        Self {
            window: Duration::from_secs_f64(WINDOW_SECS),
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            min_samples: DEFAULT_MIN_SAMPLES,
            peak_distance: DEFAULT_PEAK_DISTANCE,
        }
    }
}

/// Windowed peak-counting heart rate estimator
#[derive(Debug, Clone)]
pub struct HeartRateEstimator {
    settings: HeartRateSettings,
    buffer: SampleBuffer,
    window: RateWindow,
    rate: u32,
}

impl HeartRateEstimator {
    /// Create an estimator with default settings whose first window starts at `start`
    #[must_use]
    pub fn new(start: Instant) -> Self {
        Self::with_settings(start, HeartRateSettings::default())
    }

    /// Create an estimator with explicit settings
    #[must_use]
    pub fn with_settings(start: Instant, settings: HeartRateSettings) -> Self {
        Self {
            settings,
            buffer: SampleBuffer::new(settings.buffer_capacity),
            window: RateWindow::new(start, settings.window),
            rate: 0,
        }
    }

    /// Add one intensity sample
    pub fn observe(&mut self, intensity: f64) {
        self.buffer.push(intensity);
    }

    /// Close the window if it has elapsed.
    ///
    /// With enough samples the rate is replaced by the scaled peak count; a
    /// short or peakless window leaves the previous rate in place. The buffer
    /// is cleared either way. Returns `true` when a window was closed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.window.is_complete(now) {
            return false;
        }

        if self.buffer.len() >= self.settings.min_samples {
            let peaks = find_peaks(self.buffer.make_contiguous(), self.settings.peak_distance);
            if peaks.is_empty() {
                debug!("No peaks in {} samples, keeping {} BPM", self.buffer.len(), self.rate);
            } else {
                self.rate = per_minute(peaks.len(), self.window.length());
                debug!("{} peaks in {} samples -> {} BPM", peaks.len(), self.buffer.len(), self.rate);
            }
        } else {
            debug!(
                "Only {} of {} samples, keeping {} BPM",
                self.buffer.len(),
                self.settings.min_samples,
                self.rate
            );
        }

        self.buffer.clear();
        self.window.restart(now);
        true
    }

    /// Last computed heart rate in beats per minute (0 before the first estimate)
    #[must_use]
    pub fn rate(&self) -> u32 {
        self.rate
    }

    /// Buffered samples of the current window
    #[must_use]
    pub fn buffer(&self) -> &SampleBuffer {
        &self.buffer
    }

    #[must_use]
    pub fn settings(&self) -> &HeartRateSettings {
        &self.settings
    }

    /// Forget all state and start a new window at `now`
    pub fn reset(&mut self, now: Instant) {
        self.buffer.clear();
        self.window.restart(now);
        self.rate = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Triangle wave with `peaks` apexes spaced `period` samples apart
    fn triangle_wave(peaks: usize, period: usize) -> Vec<f64> {
        let half = period / 2;
        (0..peaks * period + 1)
            .map(|i| {
                let phase = i % period;
                let height = if phase <= half { phase } else { period - phase };
                height as f64
            })
            .collect()
    }

    #[test]
    fn test_rate_is_zero_before_first_window() {
        let t0 = Instant::now();
        let mut estimator = HeartRateEstimator::new(t0);
        for sample in triangle_wave(5, 20) {
            estimator.observe(sample);
        }
        assert_eq!(estimator.rate(), 0);
    }

    #[test]
    fn test_tick_before_window_is_noop() {
        let t0 = Instant::now();
        let mut estimator = HeartRateEstimator::new(t0);
        for sample in triangle_wave(4, 20) {
            estimator.observe(sample);
        }

        assert!(!estimator.tick(t0 + Duration::from_secs(9)));
        assert_eq!(estimator.rate(), 0);
        assert_eq!(estimator.buffer().len(), 81);
    }

    #[test]
    fn test_peak_count_scaled_to_bpm() {
        let t0 = Instant::now();
        let mut estimator = HeartRateEstimator::new(t0);
        // 81 samples, apexes at 10, 30, 50, 70
        for sample in triangle_wave(4, 20) {
            estimator.observe(sample);
        }

        assert!(estimator.tick(t0 + Duration::from_secs(10)));
        assert_eq!(estimator.rate(), 24);
        assert!(estimator.buffer().is_empty());
    }

    #[test]
    fn test_too_few_samples_keeps_stale_rate() {
        let t0 = Instant::now();
        let mut estimator = HeartRateEstimator::new(t0);
        for sample in triangle_wave(4, 20) {
            estimator.observe(sample);
        }
        estimator.tick(t0 + Duration::from_secs(10));
        assert_eq!(estimator.rate(), 24);

        // 29 samples: below the threshold
        for sample in triangle_wave(1, 20).into_iter().chain(std::iter::repeat(0.0)).take(29) {
            estimator.observe(sample);
        }
        assert!(estimator.tick(t0 + Duration::from_secs(20)));
        assert_eq!(estimator.rate(), 24);
        assert!(estimator.buffer().is_empty());
    }

    #[test]
    fn test_exactly_min_samples_is_enough() {
        let t0 = Instant::now();
        let mut estimator = HeartRateEstimator::new(t0);
        // 30 samples with apexes at 5 and 15 and 25 (period 10)
        for sample in triangle_wave(3, 10).into_iter().take(30) {
            estimator.observe(sample);
        }
        assert_eq!(estimator.buffer().len(), 30);

        estimator.tick(t0 + Duration::from_secs(10));
        assert_eq!(estimator.rate(), 18);
    }

    #[test]
    fn test_flat_signal_keeps_stale_rate() {
        let t0 = Instant::now();
        let mut estimator = HeartRateEstimator::new(t0);
        for sample in triangle_wave(2, 20) {
            estimator.observe(sample);
        }
        estimator.tick(t0 + Duration::from_secs(10));
        assert_eq!(estimator.rate(), 12);

        for _ in 0..50 {
            estimator.observe(128.0);
        }
        estimator.tick(t0 + Duration::from_secs(20));
        assert_eq!(estimator.rate(), 12);
    }

    #[test]
    fn test_buffer_capped_at_capacity() {
        let t0 = Instant::now();
        let mut estimator = HeartRateEstimator::new(t0);
        for i in 0..250i32 {
            estimator.observe(f64::from(i));
        }
        assert_eq!(estimator.buffer().len(), DEFAULT_BUFFER_CAPACITY);
        assert_eq!(estimator.buffer().iter().next(), Some(150.0));
    }

    #[test]
    fn test_window_restarts_at_tick() {
        let t0 = Instant::now();
        let mut estimator = HeartRateEstimator::new(t0);
        assert!(estimator.tick(t0 + Duration::from_secs(12)));
        assert!(!estimator.tick(t0 + Duration::from_secs(21)));
        assert!(estimator.tick(t0 + Duration::from_secs(22)));
    }

    #[test]
    fn test_reset() {
        let t0 = Instant::now();
        let mut estimator = HeartRateEstimator::new(t0);
        for sample in triangle_wave(4, 20) {
            estimator.observe(sample);
        }
        estimator.tick(t0 + Duration::from_secs(10));
        estimator.observe(1.0);

        estimator.reset(t0 + Duration::from_secs(11));
        assert_eq!(estimator.rate(), 0);
        assert!(estimator.buffer().is_empty());
        assert!(!estimator.tick(t0 + Duration::from_secs(20)));
    }
}
