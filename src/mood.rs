//! Mood classification from face statistics and the mood history log.

use crate::constants::{
    HAPPY_EDGE_DENSITY, HAPPY_EYE_BRIGHTNESS, SAD_EDGE_DENSITY, SAD_EYE_BRIGHTNESS, TIMESTAMP_FORMAT,
};
use crate::features::MoodFeatures;
use crate::utils::safe_cast::{f64_to_i32_clamp, usize_to_i32};
use crate::{Error, Result};
use chrono::NaiveDateTime;
use log::{info, warn};
use opencv::core::{Mat, Point, Rect, Scalar, Vector, CV_8UC3};
use opencv::imgcodecs;
use opencv::imgproc::{self, FONT_HERSHEY_SIMPLEX, LINE_8};
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::Path;

/// Mood label assigned to a face
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Sad,
    Neutral,
}

impl Mood {
    /// All labels in display order
    pub const ALL: [Mood; 3] = [Mood::Happy, Mood::Sad, Mood::Neutral];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Sad => "sad",
            Mood::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Edge density and eye brightness cut-offs for the mood rules
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoodThresholds {
    pub happy_edge_density: f64,
    pub happy_eye_brightness: f64,
    pub sad_edge_density: f64,
    pub sad_eye_brightness: f64,
}

impl Default for MoodThresholds {
    fn default() -> Self {
        Self {
            happy_edge_density: HAPPY_EDGE_DENSITY,
            happy_eye_brightness: HAPPY_EYE_BRIGHTNESS,
            sad_edge_density: SAD_EDGE_DENSITY,
            sad_eye_brightness: SAD_EYE_BRIGHTNESS,
        }
    }
}

impl MoodThresholds {
    /// Busy, bright faces are happy; flat, dark faces are sad; the rest neutral
    #[must_use]
    pub fn classify(&self, features: MoodFeatures) -> Mood {
        if features.edge_density > self.happy_edge_density && features.eye_brightness > self.happy_eye_brightness {
            Mood::Happy
        } else if features.edge_density < self.sad_edge_density && features.eye_brightness < self.sad_eye_brightness {
            Mood::Sad
        } else {
            Mood::Neutral
        }
    }
}

/// Classify with the default thresholds
#[must_use]
pub fn classify_mood(edge_density: f64, eye_brightness: f64) -> Mood {
    MoodThresholds::default().classify(MoodFeatures {
        edge_density,
        eye_brightness,
    })
}

/// One logged classification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodRecord {
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: NaiveDateTime,
    pub mood: Mood,
}

fn serialize_timestamp<S: Serializer>(timestamp: &NaiveDateTime, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(&timestamp.format(TIMESTAMP_FORMAT))
}

/// In-memory mood history for one run
#[derive(Debug, Clone, Default)]
pub struct MoodLog {
    records: Vec<MoodRecord>,
}

impl MoodLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a classification made at `timestamp`
    pub fn record(&mut self, mood: Mood, timestamp: NaiveDateTime) {
        self.records.push(MoodRecord { timestamp, mood });
    }

    #[must_use]
    pub fn records(&self) -> &[MoodRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Count per label, most frequent first; labels that never occurred are omitted
    #[must_use]
    pub fn distribution(&self) -> Vec<(Mood, usize)> {
        let mut counts: Vec<(Mood, usize)> = Mood::ALL
            .iter()
            .map(|&mood| (mood, self.records.iter().filter(|r| r.mood == mood).count()))
            .filter(|&(_, count)| count > 0)
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        counts
    }

    /// Write the history as `timestamp,mood` rows with a header line
    pub fn save_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_path(path.as_ref())?;
        writer.write_record(["timestamp", "mood"])?;
        for record in &self.records {
            writer.serialize(record)?;
        }
        writer.flush()?;

        info!("Mood history saved to '{}'", path.as_ref().display());
        Ok(())
    }

    /// Render the label distribution as a bar chart image.
    ///
    /// Returns `Ok(false)` without writing anything when the log is empty.
    pub fn render_chart<P: AsRef<Path>>(&self, path: P) -> Result<bool> {
        let distribution = self.distribution();
        if distribution.is_empty() {
            warn!("No mood history to plot");
            return Ok(false);
        }

        let chart = draw_bar_chart(&distribution)?;
        let path_str = path
            .as_ref()
            .to_str()
            .ok_or_else(|| Error::ExportError(format!("Non UTF-8 chart path: {}", path.as_ref().display())))?;
        if !imgcodecs::imwrite(path_str, &chart, &Vector::new())? {
            return Err(Error::ExportError(format!("Failed to write chart to {path_str}")));
        }

        info!("Mood distribution plot saved to '{path_str}'");
        Ok(true)
    }
}

const CHART_WIDTH: i32 = 1200;
const CHART_HEIGHT: i32 = 600;
const MARGIN_LEFT: i32 = 90;
const MARGIN_RIGHT: i32 = 40;
const MARGIN_TOP: i32 = 70;
const MARGIN_BOTTOM: i32 = 80;
const BAR_FILL: f64 = 0.8;

fn black() -> Scalar {
    Scalar::new(0.0, 0.0, 0.0, 0.0)
}

fn put_label(canvas: &mut Mat, text: &str, origin: Point, scale: f64, thickness: i32) -> Result<()> {
    imgproc::put_text(canvas, text, origin, FONT_HERSHEY_SIMPLEX, scale, black(), thickness, LINE_8, false)?;
    Ok(())
}

fn draw_bar_chart(distribution: &[(Mood, usize)]) -> Result<Mat> {
    let mut canvas = Mat::new_rows_cols_with_default(CHART_HEIGHT, CHART_WIDTH, CV_8UC3, Scalar::all(255.0))?;

    let plot_left = MARGIN_LEFT;
    let plot_right = CHART_WIDTH - MARGIN_RIGHT;
    let plot_top = MARGIN_TOP;
    let plot_bottom = CHART_HEIGHT - MARGIN_BOTTOM;
    let plot_height = f64::from(plot_bottom - plot_top);

    put_label(&mut canvas, "Mood Distribution", Point::new(CHART_WIDTH / 2 - 150, 40), 1.0, 2)?;
    put_label(&mut canvas, "Mood", Point::new(CHART_WIDTH / 2 - 30, CHART_HEIGHT - 20), 0.8, 2)?;
    put_label(&mut canvas, "Count", Point::new(10, plot_top - 15), 0.8, 2)?;

    // Axes
    imgproc::line(&mut canvas, Point::new(plot_left, plot_bottom), Point::new(plot_right, plot_bottom), black(), 2, LINE_8, 0)?;
    imgproc::line(&mut canvas, Point::new(plot_left, plot_top), Point::new(plot_left, plot_bottom), black(), 2, LINE_8, 0)?;

    let max_count = distribution.iter().map(|&(_, count)| count).max().unwrap_or(1).max(1);
    let slot_width = (plot_right - plot_left) / usize_to_i32(distribution.len())?;
    let bar_width = f64_to_i32_clamp(f64::from(slot_width) * BAR_FILL, 1, slot_width);
    let bar_color = Scalar::new(180.0, 119.0, 31.0, 0.0);

    #[allow(clippy::cast_precision_loss)] // Counts are far below 2^52
    let scale = plot_height / max_count as f64;

    for (i, &(mood, count)) in distribution.iter().enumerate() {
        let slot_left = plot_left + usize_to_i32(i)? * slot_width;
        let bar_left = slot_left + (slot_width - bar_width) / 2;
        #[allow(clippy::cast_precision_loss)]
        let bar_height = f64_to_i32_clamp(count as f64 * scale, 1, plot_bottom - plot_top);

        imgproc::rectangle(
            &mut canvas,
            Rect::new(bar_left, plot_bottom - bar_height, bar_width, bar_height),
            bar_color,
            -1,
            LINE_8,
            0,
        )?;
        put_label(&mut canvas, mood.as_str(), Point::new(bar_left + bar_width / 2 - 35, plot_bottom + 30), 0.8, 2)?;
        put_label(
            &mut canvas,
            &count.to_string(),
            Point::new(bar_left + bar_width / 2 - 10, (plot_bottom - bar_height - 10).max(plot_top)),
            0.7,
            2,
        )?;
    }

    Ok(canvas)
}
