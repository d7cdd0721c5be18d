//! Constants used throughout the application

/// Length of one rate window in seconds
pub const WINDOW_SECS: f64 = 10.0;

/// Seconds per minute, used to scale window counts into rates
pub const SECONDS_PER_MINUTE: f64 = 60.0;

/// Maximum number of intensity samples kept for heart rate estimation
pub const DEFAULT_BUFFER_CAPACITY: usize = 100;

/// Samples required before a peak search is attempted
pub const DEFAULT_MIN_SAMPLES: usize = 30;

/// Minimum separation between two counted peaks, in samples
pub const DEFAULT_PEAK_DISTANCE: usize = 10;

/// Minimum time between two accepted blinks in seconds
pub const DEFAULT_BLINK_DEBOUNCE_SECS: f64 = 0.3;

/// Visible eye count assumed before the first observation
pub const DEFAULT_INITIAL_EYE_COUNT: usize = 2;

/// Blink rate thresholds (blinks per minute)
pub const BLINK_RATE_LOW: f64 = 15.0;
pub const BLINK_RATE_HIGH: f64 = 20.0;

/// Heart rate thresholds (beats per minute)
pub const HEART_RATE_LOW: f64 = 60.0;
pub const HEART_RATE_HIGH: f64 = 100.0;

/// Upper bound of the composite stress score
pub const MAX_STRESS_SCORE: u8 = 100;

/// Cascade parameters for face detection
pub const FACE_SCALE_FACTOR: f64 = 1.3;
pub const FACE_MIN_NEIGHBORS: i32 = 5;

/// Cascade parameters for eye detection (`OpenCV` defaults)
pub const EYE_SCALE_FACTOR: f64 = 1.1;
pub const EYE_MIN_NEIGHBORS: i32 = 3;

/// Canny hysteresis thresholds for edge density
pub const CANNY_LOW_THRESHOLD: f64 = 100.0;
pub const CANNY_HIGH_THRESHOLD: f64 = 200.0;

/// Mood thresholds on edge density (0-255 scale) and eye band brightness
pub const HAPPY_EDGE_DENSITY: f64 = 0.1;
pub const HAPPY_EYE_BRIGHTNESS: f64 = 100.0;
pub const SAD_EDGE_DENSITY: f64 = 0.05;
pub const SAD_EYE_BRIGHTNESS: f64 = 80.0;

/// Default export locations for the mood tracker
pub const DEFAULT_MOOD_CSV: &str = "mood_history.csv";
pub const DEFAULT_MOOD_CHART: &str = "mood_distribution.png";

/// Timestamp format used in the mood log
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Where system `OpenCV` packages install their Haar cascades
pub const SYSTEM_CASCADE_DIRS: [&str; 5] = [
    "/usr/share/opencv4/haarcascades",
    "/usr/share/opencv/haarcascades",
    "/usr/local/share/opencv4/haarcascades",
    "/opt/homebrew/share/opencv4/haarcascades",
    "/opt/local/share/opencv4/haarcascades",
];

/// Key codes that end the main loop
pub const KEY_ESCAPE: i32 = 27;
pub const KEY_QUIT: i32 = b'q' as i32;
