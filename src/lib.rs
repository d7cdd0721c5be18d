//! Webcam affect monitoring: stress level and mood tracking.
//!
//! Two pipelines share the same capture, detection and configuration layers:
//!
//! - The stress detector counts blinks from Haar eye detections and derives
//!   a pseudo heart rate from forehead brightness fluctuations, then maps
//!   both onto a 0-100 stress score.
//! - The mood tracker classifies each face as happy, sad or neutral from its
//!   edge density and eye-band brightness and exports the history as CSV
//!   plus a bar chart.
//!
//! The estimators take an explicit clock so they can be driven without a
//! camera:
//!
//! ```
//! use affect_monitor::stress::{FaceSample, StressMonitor};
//! use std::time::{Duration, Instant};
//!
//! let start = Instant::now();
//! let mut monitor = StressMonitor::new(start);
//!
//! let sample = FaceSample { eye_count: 2, forehead_intensity: Some(120.0) };
//! let reading = monitor.update(sample, start + Duration::from_millis(33));
//! assert_eq!(reading.score, 0);
//! ```
//!
//! ## Mood history
//!
//! ```no_run
//! use affect_monitor::mood::{classify_mood, MoodLog};
//!
//! # fn main() -> affect_monitor::Result<()> {
//! let mut log = MoodLog::new();
//! let now = chrono::Local::now().naive_local();
//! log.record(classify_mood(0.2, 120.0), now);
//!
//! log.save_csv("mood_history.csv")?;
//! log.render_chart("mood_distribution.png")?;
//! # Ok(())
//! # }
//! ```

/// Webcam and video file frame sources
pub mod capture;

/// Haar cascade region detection
pub mod detection;

/// Blink and heart rate estimation over fixed windows
pub mod estimator;

/// Pixel statistics over face regions
pub mod features;

/// Stress score and the combined per-frame monitor
pub mod stress;

/// Mood classification, history and export
pub mod mood;

/// Utility functions for rectangles and numeric conversions
pub mod utils;

/// Error types and result handling
pub mod error;

/// Main application module
pub mod app;

/// Constants used throughout the application
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
