//! Main application module: shared configuration and frame loop helpers.

/// Blink/heart rate stress detector
pub mod stress;

/// Mood tracker with CSV and chart export
pub mod mood;

pub use mood::MoodApp;
pub use stress::StressApp;

use crate::capture::VideoSource;
use crate::config::Config;
use crate::constants::{KEY_ESCAPE, KEY_QUIT};
use crate::error::Result;
use log::{info, warn};
use opencv::{
    core::{Mat, Point, Scalar},
    highgui::{self, WINDOW_NORMAL},
    imgproc::{self, FONT_HERSHEY_SIMPLEX, LINE_8},
};

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Camera index or video file path
    pub video_source: VideoSource,
    /// GUI display mode
    pub gui_mode: GuiMode,
    /// Image inversion mode
    pub invert_mode: InvertMode,
    /// Brightness adjustment value
    pub brightness: f32,
    /// Thresholds, cascade paths and export paths
    pub settings: Config,
}

impl AppConfig {
    /// Configuration for a video source with everything else at defaults
    #[must_use]
    pub fn new(video_source: VideoSource) -> Self {
        Self {
            video_source,
            gui_mode: GuiMode::All,
            invert_mode: InvertMode::None,
            brightness: 0.0,
            settings: Config::default(),
        }
    }
}

/// GUI display mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuiMode {
    /// Show the annotated camera window
    All,
    /// No GUI (headless)
    None,
}

impl GuiMode {
    /// Parse a mode name, defaulting to [`GuiMode::All`]
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "none" | "headless" => GuiMode::None,
            _ => GuiMode::All,
        }
    }
}

/// Image inversion mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvertMode {
    /// No inversion
    None,
    /// Mirror horizontally
    X,
    /// Flip vertically
    Y,
    /// Both horizontal and vertical
    XY,
}

impl InvertMode {
    /// Parse a mode name, defaulting to [`InvertMode::None`]
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "x" => InvertMode::X,
            "y" => InvertMode::Y,
            "xy" | "yx" => InvertMode::XY,
            _ => InvertMode::None,
        }
    }

    /// Mode from separate horizontal and vertical flags
    #[must_use]
    pub fn from_flags(flip_x: bool, flip_y: bool) -> Self {
        match (flip_x, flip_y) {
            (false, false) => InvertMode::None,
            (true, false) => InvertMode::X,
            (false, true) => InvertMode::Y,
            (true, true) => InvertMode::XY,
        }
    }
}

/// Apply image transformations (brightness, inversion)
pub(crate) fn apply_transformations(frame: &mut Mat, brightness: f32, invert_mode: InvertMode) -> Result<()> {
    if brightness != 0.0 {
        let value = f64::from(brightness);
        let brightness_scalar = Scalar::new(value, value, value, 0.0);
        let temp = frame.clone();
        opencv::core::add(&temp, &brightness_scalar, frame, &Mat::default(), -1)?;
    }

    let flip_code = match invert_mode {
        InvertMode::None => return Ok(()),
        InvertMode::X => 1,
        InvertMode::Y => 0,
        InvertMode::XY => -1,
    };
    let temp = frame.clone();
    opencv::core::flip(&temp, frame, flip_code)?;

    Ok(())
}

/// Create the display window when the GUI is enabled
pub(crate) fn open_window(gui_mode: GuiMode, title: &str) -> Result<()> {
    if gui_mode == GuiMode::All {
        highgui::named_window(title, WINDOW_NORMAL)?;
    }
    Ok(())
}

/// Show `frame` and poll the keyboard; `true` means quit was requested
pub(crate) fn show_and_poll(gui_mode: GuiMode, title: &str, frame: &Mat) -> Result<bool> {
    if gui_mode == GuiMode::None {
        return Ok(false);
    }

    highgui::imshow(title, frame)?;
    let key = highgui::wait_key(1)?;
    if key == KEY_ESCAPE || key & 0xFF == KEY_QUIT {
        info!("Exit requested by user");
        return Ok(true);
    }
    Ok(false)
}

/// Close all display windows
pub(crate) fn close_windows(gui_mode: GuiMode) -> Result<()> {
    if gui_mode == GuiMode::All {
        highgui::destroy_all_windows()?;
    }
    Ok(())
}

/// Return `primary`, logging a failed cleanup step instead of propagating it
pub(crate) fn keep_primary<T>(primary: Result<T>, cleanup: Result<()>, step: &str) -> Result<T> {
    if let Err(e) = cleanup {
        warn!("Failed to {}: {}", step, e);
    }
    primary
}

/// Draw one line of overlay text
pub(crate) fn draw_text(frame: &mut Mat, text: &str, origin: Point, scale: f64, color: Scalar) -> Result<()> {
    imgproc::put_text(frame, text, origin, FONT_HERSHEY_SIMPLEX, scale, color, 2, LINE_8, false)?;
    Ok(())
}
