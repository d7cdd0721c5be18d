use super::{
    apply_transformations, close_windows, draw_text, keep_primary, open_window, show_and_poll, AppConfig, GuiMode,
};
use crate::{
    capture::{Capture, FrameSource},
    detection::{CascadeDetector, RegionDetector},
    error::Result,
    features::{forehead_intensity, to_gray},
    stress::{FaceSample, StressMonitor, StressReading},
    utils::{clip_rect, largest_rect, offset_rect},
};
use log::{debug, info};
use opencv::{
    core::{Mat, Point, Rect, Scalar},
    imgproc::{self, LINE_8},
    prelude::*,
};
use std::time::Instant;

const WINDOW_TITLE: &str = "Stress Level Detector";

/// Result of processing a single frame
#[derive(Debug, Clone, PartialEq)]
pub struct StressFrame {
    /// Every face found in the frame
    pub faces: Vec<Rect>,
    /// Face the estimators were fed from
    pub primary_face: Option<Rect>,
    /// Eyes inside the primary face, in frame coordinates
    pub eyes: Vec<Rect>,
    /// Reading after this frame, if a face was present
    pub reading: Option<StressReading>,
}

/// Webcam stress detector
pub struct StressApp {
    config: AppConfig,
    source: Box<dyn FrameSource>,
    face_detector: Box<dyn RegionDetector>,
    eye_detector: Box<dyn RegionDetector>,
    monitor: StressMonitor,
}

impl StressApp {
    /// Load the cascades and open the capture device
    ///
    /// # Errors
    ///
    /// Fails before any frame is read if the configuration is invalid, a
    /// cascade cannot be loaded or the device cannot be opened.
    pub fn new(config: AppConfig) -> Result<Self> {
        info!("Initializing stress detector");
        config.settings.validate()?;

        let models = &config.settings.models;
        let face_detector = CascadeDetector::locate(&models.face_cascade, config.settings.face_params())?;
        let eye_detector = CascadeDetector::locate(&models.eye_cascade, config.settings.eye_params())?;
        let capture = Capture::open(config.video_source.clone())?;

        Self::with_components(
            config,
            Box::new(capture),
            Box::new(face_detector),
            Box::new(eye_detector),
            Instant::now(),
        )
    }

    /// Assemble the app from existing components; estimator windows start at `start`
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ConfigError`] if the estimator durations are invalid.
    pub fn with_components(
        config: AppConfig,
        source: Box<dyn FrameSource>,
        face_detector: Box<dyn RegionDetector>,
        eye_detector: Box<dyn RegionDetector>,
        start: Instant,
    ) -> Result<Self> {
        let monitor = StressMonitor::with_settings(
            start,
            config.settings.blink_settings()?,
            config.settings.heart_rate_settings()?,
            config.settings.stress_thresholds(),
        );
        Ok(Self {
            config,
            source,
            face_detector,
            eye_detector,
            monitor,
        })
    }

    /// Run until the quit key or end of stream; returns the final reading.
    ///
    /// The source is released and the windows closed even when the loop
    /// fails; cleanup failures are logged and never replace the loop result.
    pub fn run(&mut self) -> Result<StressReading> {
        info!("Starting stress level detection");
        let tracked = self.track();

        let tracked = keep_primary(tracked, self.source.release(), "release capture device");
        let frame_count = keep_primary(tracked, close_windows(self.config.gui_mode), "close windows")?;
        info!("Processed {} frames", frame_count);
        Ok(self.monitor.reading())
    }

    fn track(&mut self) -> Result<u64> {
        open_window(self.config.gui_mode, WINDOW_TITLE)?;
        if self.config.gui_mode == GuiMode::All {
            info!("Press 'q' to quit");
        }

        let mut frame_count: u64 = 0;
        while let Some(mut frame) = self.source.next_frame()? {
            apply_transformations(&mut frame, self.config.brightness, self.config.invert_mode)?;

            let result = self.process_frame(&mut frame, Instant::now())?;
            frame_count += 1;
            if let Some(reading) = result.reading {
                debug!(
                    "Frame {}: stress {}%, blinks {}/min, heart {} BPM",
                    frame_count, reading.score, reading.blink_rate, reading.heart_rate
                );
            }

            if show_and_poll(self.config.gui_mode, WINDOW_TITLE, &frame)? {
                break;
            }
        }
        Ok(frame_count)
    }

    /// Detect, measure and annotate one frame observed at `now`.
    ///
    /// Only the largest face feeds the estimators. Frames without a face
    /// produce no sample and no overlay.
    pub fn process_frame(&mut self, frame: &mut Mat, now: Instant) -> Result<StressFrame> {
        let gray = to_gray(frame)?;
        let faces = self.face_detector.detect(&gray)?;

        let Some(primary) = largest_rect(&faces).and_then(|face| clip_rect(face, frame.cols(), frame.rows())) else {
            return Ok(StressFrame {
                faces,
                primary_face: None,
                eyes: Vec::new(),
                reading: None,
            });
        };

        let face_roi = Mat::roi(&gray, primary)?;
        let face_gray = face_roi.try_clone()?;
        let eyes: Vec<Rect> = self
            .eye_detector
            .detect(&face_gray)?
            .into_iter()
            .map(|eye| offset_rect(eye, primary))
            .collect();

        // Sample before anything is drawn onto the frame
        let sample = FaceSample {
            eye_count: eyes.len(),
            forehead_intensity: forehead_intensity(frame, primary)?,
        };
        let reading = self.monitor.update(sample, now);

        draw_overlay(frame, &faces, &eyes, reading)?;

        Ok(StressFrame {
            faces,
            primary_face: Some(primary),
            eyes,
            reading: Some(reading),
        })
    }

    #[must_use]
    pub fn monitor(&self) -> &StressMonitor {
        &self.monitor
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

fn draw_overlay(frame: &mut Mat, faces: &[Rect], eyes: &[Rect], reading: StressReading) -> Result<()> {
    let green = Scalar::new(0.0, 255.0, 0.0, 0.0);
    let red = Scalar::new(0.0, 0.0, 255.0, 0.0);

    for eye in eyes {
        imgproc::rectangle(frame, *eye, green, 2, LINE_8, 0)?;
    }
    for face in faces {
        imgproc::rectangle(frame, *face, green, 2, LINE_8, 0)?;
    }

    draw_text(frame, &format!("Stress Level: {}%", reading.score), Point::new(10, 30), 1.0, red)?;
    draw_text(frame, &format!("Blink Rate: {}/min", reading.blink_rate), Point::new(10, 70), 1.0, red)?;
    draw_text(frame, &format!("Heart Rate: {} BPM", reading.heart_rate), Point::new(10, 110), 1.0, red)?;

    Ok(())
}
