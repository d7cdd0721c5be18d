//! Configuration management for the affect monitor

use crate::constants::{
    BLINK_RATE_HIGH, BLINK_RATE_LOW, DEFAULT_BLINK_DEBOUNCE_SECS, DEFAULT_BUFFER_CAPACITY, DEFAULT_INITIAL_EYE_COUNT,
    DEFAULT_MIN_SAMPLES, DEFAULT_MOOD_CHART, DEFAULT_MOOD_CSV, DEFAULT_PEAK_DISTANCE, EYE_MIN_NEIGHBORS,
    EYE_SCALE_FACTOR, FACE_MIN_NEIGHBORS, FACE_SCALE_FACTOR, HAPPY_EDGE_DENSITY, HAPPY_EYE_BRIGHTNESS,
    HEART_RATE_HIGH, HEART_RATE_LOW, SAD_EDGE_DENSITY, SAD_EYE_BRIGHTNESS, WINDOW_SECS,
};
use crate::detection::CascadeParams;
use crate::estimator::{BlinkSettings, BlinkWindowAnchor, HeartRateSettings};
use crate::mood::MoodThresholds;
use crate::stress::StressThresholds;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Cascade classifier files
    pub models: ModelConfig,

    /// Cascade search parameters
    pub detection: DetectionConfig,

    /// Blink and heart rate estimation
    pub estimator: EstimatorConfig,

    /// Stress score ranges
    pub stress: StressConfig,

    /// Mood classification thresholds
    pub mood: MoodConfig,

    /// Display configuration
    pub display: DisplayConfig,

    /// Mood history export paths
    pub export: ExportConfig,
}

/// Cascade file paths
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Frontal face Haar cascade
    pub face_cascade: PathBuf,

    /// Eye Haar cascade
    pub eye_cascade: PathBuf,
}

/// Cascade search parameters for faces and eyes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    pub face_scale_factor: f64,
    pub face_min_neighbors: i32,
    pub eye_scale_factor: f64,
    pub eye_min_neighbors: i32,
}

/// Rate estimator parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Seconds between rate updates
    pub window_secs: f64,

    /// Maximum buffered forehead samples
    pub buffer_capacity: usize,

    /// Samples required for a heart rate update
    pub min_samples: usize,

    /// Minimum distance between counted peaks, in samples
    pub peak_distance: usize,

    /// Minimum seconds between two accepted blinks
    pub blink_debounce_secs: f64,

    /// Eye count assumed before the first frame
    pub initial_eye_count: usize,

    /// What the blink window is measured from
    pub blink_window_anchor: BlinkWindowAnchor,
}

/// Normal blink and heart rate ranges
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StressConfig {
    pub blink_rate_low: f64,
    pub blink_rate_high: f64,
    pub heart_rate_low: f64,
    pub heart_rate_high: f64,
}

/// Mood rule thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MoodConfig {
    pub happy_edge_density: f64,
    pub happy_eye_brightness: f64,
    pub sad_edge_density: f64,
    pub sad_eye_brightness: f64,
}

/// Display configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Default GUI mode
    pub gui_mode: String,

    /// Flip image horizontally
    pub flip_x: bool,

    /// Flip image vertically
    pub flip_y: bool,

    /// Brightness adjustment (-100 to 100)
    pub brightness: i32,
}

/// Mood tracker output files
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub mood_csv: PathBuf,
    pub mood_chart: PathBuf,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            face_cascade: PathBuf::from("assets/haarcascade_frontalface_default.xml"),
            eye_cascade: PathBuf::from("assets/haarcascade_eye.xml"),
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            face_scale_factor: FACE_SCALE_FACTOR,
            face_min_neighbors: FACE_MIN_NEIGHBORS,
            eye_scale_factor: EYE_SCALE_FACTOR,
            eye_min_neighbors: EYE_MIN_NEIGHBORS,
        }
    }
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            window_secs: WINDOW_SECS,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            min_samples: DEFAULT_MIN_SAMPLES,
            peak_distance: DEFAULT_PEAK_DISTANCE,
            blink_debounce_secs: DEFAULT_BLINK_DEBOUNCE_SECS,
            initial_eye_count: DEFAULT_INITIAL_EYE_COUNT,
            blink_window_anchor: BlinkWindowAnchor::LastBlink,
        }
    }
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            blink_rate_low: BLINK_RATE_LOW,
            blink_rate_high: BLINK_RATE_HIGH,
            heart_rate_low: HEART_RATE_LOW,
            heart_rate_high: HEART_RATE_HIGH,
        }
    }
}

impl Default for MoodConfig {
    fn default() -> Self {
        Self {
            happy_edge_density: HAPPY_EDGE_DENSITY,
            happy_eye_brightness: HAPPY_EYE_BRIGHTNESS,
            sad_edge_density: SAD_EDGE_DENSITY,
            sad_eye_brightness: SAD_EYE_BRIGHTNESS,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            gui_mode: "all".to_string(),
            flip_x: false,
            flip_y: false,
            brightness: 0,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            mood_csv: PathBuf::from(DEFAULT_MOOD_CSV),
            mood_chart: PathBuf::from(DEFAULT_MOOD_CHART),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        serde_yaml::from_str(&content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Face cascade parameters
    #[must_use]
    pub fn face_params(&self) -> CascadeParams {
        CascadeParams {
            scale_factor: self.detection.face_scale_factor,
            min_neighbors: self.detection.face_min_neighbors,
        }
    }

    /// Eye cascade parameters
    #[must_use]
    pub fn eye_params(&self) -> CascadeParams {
        CascadeParams {
            scale_factor: self.detection.eye_scale_factor,
            min_neighbors: self.detection.eye_min_neighbors,
        }
    }

    /// Blink estimator settings
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the window or debounce is not a
    /// representable duration.
    pub fn blink_settings(&self) -> Result<BlinkSettings> {
        Ok(BlinkSettings {
            window: seconds("Window length", self.estimator.window_secs)?,
            debounce: seconds("Blink debounce", self.estimator.blink_debounce_secs)?,
            initial_eye_count: self.estimator.initial_eye_count,
            anchor: self.estimator.blink_window_anchor,
        })
    }

    /// Heart rate estimator settings
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the window is not a representable duration.
    pub fn heart_rate_settings(&self) -> Result<HeartRateSettings> {
        Ok(HeartRateSettings {
            window: seconds("Window length", self.estimator.window_secs)?,
            buffer_capacity: self.estimator.buffer_capacity,
            min_samples: self.estimator.min_samples,
            peak_distance: self.estimator.peak_distance,
        })
    }

    #[must_use]
    pub fn stress_thresholds(&self) -> StressThresholds {
        StressThresholds {
            blink_low: self.stress.blink_rate_low,
            blink_high: self.stress.blink_rate_high,
            heart_low: self.stress.heart_rate_low,
            heart_high: self.stress.heart_rate_high,
        }
    }

    #[must_use]
    pub fn mood_thresholds(&self) -> MoodThresholds {
        MoodThresholds {
            happy_edge_density: self.mood.happy_edge_density,
            happy_eye_brightness: self.mood.happy_eye_brightness,
            sad_edge_density: self.mood.sad_edge_density,
            sad_eye_brightness: self.mood.sad_eye_brightness,
        }
    }

    /// Validate configuration values (cascade files are checked when loaded)
    pub fn validate(&self) -> Result<()> {
        self.face_params()
            .validate()
            .map_err(|e| Error::ConfigError(format!("Face detection: {e}")))?;
        self.eye_params()
            .validate()
            .map_err(|e| Error::ConfigError(format!("Eye detection: {e}")))?;

        // Validate estimator parameters
        let estimator = &self.estimator;
        if !estimator.window_secs.is_finite() || estimator.window_secs <= 0.0 {
            return Err(Error::ConfigError("Window length must be a positive number of seconds".to_string()));
        }
        if estimator.buffer_capacity == 0 {
            return Err(Error::ConfigError("Buffer capacity must be greater than 0".to_string()));
        }
        if estimator.min_samples > estimator.buffer_capacity {
            return Err(Error::ConfigError(format!(
                "Minimum samples ({}) cannot exceed buffer capacity ({})",
                estimator.min_samples, estimator.buffer_capacity
            )));
        }
        if estimator.peak_distance == 0 {
            return Err(Error::ConfigError("Peak distance must be at least 1 sample".to_string()));
        }
        if !estimator.blink_debounce_secs.is_finite() || estimator.blink_debounce_secs < 0.0 {
            return Err(Error::ConfigError("Blink debounce must be a non-negative number of seconds".to_string()));
        }
        self.blink_settings()?;

        // Validate score ranges
        if !is_ordered(self.stress.blink_rate_low, self.stress.blink_rate_high) {
            return Err(Error::ConfigError("Blink rate low must be below blink rate high".to_string()));
        }
        if !is_ordered(self.stress.heart_rate_low, self.stress.heart_rate_high) {
            return Err(Error::ConfigError("Heart rate low must be below heart rate high".to_string()));
        }

        // Validate display settings
        if !(-100..=100).contains(&self.display.brightness) {
            return Err(Error::ConfigError("Brightness must be between -100 and 100".to_string()));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Affect Monitor Configuration

# Haar cascade files
models:
  face_cascade: "assets/haarcascade_frontalface_default.xml"
  eye_cascade: "assets/haarcascade_eye.xml"

# Cascade search parameters
detection:
  face_scale_factor: 1.3
  face_min_neighbors: 5
  eye_scale_factor: 1.1
  eye_min_neighbors: 3

# Blink and heart rate estimation
estimator:
  window_secs: 10.0
  buffer_capacity: 100
  min_samples: 30
  peak_distance: 10
  blink_debounce_secs: 0.3
  initial_eye_count: 2
  blink_window_anchor: "last_blink"

# Normal ranges for the stress score
stress:
  blink_rate_low: 15.0
  blink_rate_high: 20.0
  heart_rate_low: 60.0
  heart_rate_high: 100.0

# Mood rules
mood:
  happy_edge_density: 0.1
  happy_eye_brightness: 100.0
  sad_edge_density: 0.05
  sad_eye_brightness: 80.0

# Display settings
display:
  gui_mode: "all"
  flip_x: false
  flip_y: false
  brightness: 0

# Mood tracker output
export:
  mood_csv: "mood_history.csv"
  mood_chart: "mood_distribution.png"
"#;

fn seconds(name: &str, value: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(value)
        .map_err(|e| Error::ConfigError(format!("{name} of {value} seconds is not a valid duration: {e}")))
}

fn is_ordered(low: f64, high: f64) -> bool {
    low < high
}
