use super::{
    apply_transformations, close_windows, draw_text, keep_primary, open_window, show_and_poll, AppConfig, GuiMode,
};
use crate::{
    capture::{Capture, FrameSource},
    detection::{CascadeDetector, RegionDetector},
    error::Result,
    features::{mood_features, to_gray},
    mood::{Mood, MoodLog, MoodThresholds},
    utils::clip_rect,
};
use chrono::{Local, NaiveDateTime};
use log::info;
use opencv::{
    core::{Mat, Point, Rect, Scalar},
    imgproc::{self, LINE_8},
    prelude::*,
};
use std::path::PathBuf;

const WINDOW_TITLE: &str = "Mood Tracker";

/// Webcam mood tracker that exports its history on exit
pub struct MoodApp {
    config: AppConfig,
    source: Box<dyn FrameSource>,
    face_detector: Box<dyn RegionDetector>,
    thresholds: MoodThresholds,
    log: MoodLog,
}

impl MoodApp {
    /// Load the face cascade and open the capture device
    ///
    /// # Errors
    ///
    /// Fails before any frame is read if the configuration is invalid, the
    /// cascade cannot be loaded or the device cannot be opened.
    pub fn new(config: AppConfig) -> Result<Self> {
        info!("Initializing mood tracker");
        config.settings.validate()?;

        let face_cascade = &config.settings.models.face_cascade;
        let face_detector = CascadeDetector::locate(face_cascade, config.settings.face_params())?;
        let capture = Capture::open(config.video_source.clone())?;

        Ok(Self::with_components(config, Box::new(capture), Box::new(face_detector)))
    }

    /// Assemble the app from existing components
    #[must_use]
    pub fn with_components(
        config: AppConfig,
        source: Box<dyn FrameSource>,
        face_detector: Box<dyn RegionDetector>,
    ) -> Self {
        let thresholds = config.settings.mood_thresholds();
        Self {
            config,
            source,
            face_detector,
            thresholds,
            log: MoodLog::new(),
        }
    }

    /// Track moods until the quit key or end of stream, then export.
    ///
    /// The device is released and the history exported whether the loop
    /// ends normally or with an error; a loop error takes precedence over an
    /// export error.
    pub fn run(&mut self) -> Result<()> {
        let tracked = self.track();
        let finished = self.finish();
        tracked?;
        finished
    }

    fn track(&mut self) -> Result<()> {
        open_window(self.config.gui_mode, WINDOW_TITLE)?;
        if self.config.gui_mode == GuiMode::All {
            info!("Press 'q' to quit");
        }

        while let Some(mut frame) = self.source.next_frame()? {
            apply_transformations(&mut frame, self.config.brightness, self.config.invert_mode)?;
            self.process_frame(&mut frame, Local::now().naive_local())?;

            if show_and_poll(self.config.gui_mode, WINDOW_TITLE, &frame)? {
                break;
            }
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        keep_primary(Ok(()), self.source.release(), "release capture device")?;
        keep_primary(Ok(()), close_windows(self.config.gui_mode), "close windows")?;

        info!("Logged {} mood observations", self.log.len());
        self.log.save_csv(self.csv_path())?;
        self.log.render_chart(self.chart_path())?;
        Ok(())
    }

    /// Classify, log and annotate every face in one frame
    pub fn process_frame(&mut self, frame: &mut Mat, timestamp: NaiveDateTime) -> Result<Vec<(Rect, Mood)>> {
        let gray = to_gray(frame)?;
        let faces = self.face_detector.detect(&gray)?;

        let mut moods = Vec::with_capacity(faces.len());
        for face in faces {
            let Some(region) = clip_rect(face, frame.cols(), frame.rows()) else {
                continue;
            };
            let roi = Mat::roi(frame, region)?;
            let face_bgr = roi.try_clone()?;
            let Some(features) = mood_features(&face_bgr)? else {
                continue;
            };

            let mood = self.thresholds.classify(features);
            self.log.record(mood, timestamp);
            moods.push((region, mood));
        }

        for (region, mood) in &moods {
            imgproc::rectangle(frame, *region, Scalar::new(255.0, 0.0, 0.0, 0.0), 2, LINE_8, 0)?;
            draw_text(
                frame,
                &format!("Mood: {mood}"),
                Point::new(region.x, region.y - 10),
                0.9,
                Scalar::new(0.0, 255.0, 0.0, 0.0),
            )?;
        }

        Ok(moods)
    }

    #[must_use]
    pub fn log(&self) -> &MoodLog {
        &self.log
    }

    #[must_use]
    pub fn csv_path(&self) -> PathBuf {
        self.config.settings.export.mood_csv.clone()
    }

    #[must_use]
    pub fn chart_path(&self) -> PathBuf {
        self.config.settings.export.mood_chart.clone()
    }
}
