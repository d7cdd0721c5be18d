//! Frame sources: webcams and video files.

use crate::{Error, Result};
use log::{debug, info, warn};
use opencv::core::Mat;
use opencv::prelude::*;
use opencv::videoio::{self, VideoCapture, CAP_PROP_BUFFERSIZE};

/// Pull-based source of BGR frames
pub trait FrameSource {
    /// Next frame, or `None` at end of stream or on a failed read
    fn next_frame(&mut self) -> Result<Option<Mat>>;

    /// Give the underlying device back; further reads return `None`
    fn release(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Video source type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoSource {
    /// Webcam index
    Camera(i32),
    /// Video file path
    File(String),
}

impl std::fmt::Display for VideoSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VideoSource::Camera(index) => write!(f, "camera {index}"),
            VideoSource::File(path) => write!(f, "video file {path}"),
        }
    }
}

/// `OpenCV` capture device, released on drop
pub struct Capture {
    source: VideoSource,
    capture: VideoCapture,
    released: bool,
}

impl Capture {
    /// Open a camera or video file
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeviceUnavailable`] if the device cannot be opened.
    pub fn open(source: VideoSource) -> Result<Self> {
        let capture = match &source {
            VideoSource::Camera(index) => {
                info!("Opening camera {}", index);
                let mut cap = VideoCapture::new(*index, videoio::CAP_ANY)?;
                if cap.is_opened()? {
                    // Reduce buffer size for lower latency (webcam only)
                    if !cap.set(CAP_PROP_BUFFERSIZE, 1.0)? {
                        debug!("Camera ignored buffer size request");
                    }
                }
                cap
            }
            VideoSource::File(path) => {
                info!("Opening video file: {}", path);
                VideoCapture::from_file(path, videoio::CAP_ANY)?
            }
        };

        if !capture.is_opened()? {
            return Err(Error::DeviceUnavailable(format!("Could not open {source}")));
        }

        Ok(Self {
            source,
            capture,
            released: false,
        })
    }

    #[must_use]
    pub fn source(&self) -> &VideoSource {
        &self.source
    }

    #[must_use]
    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl FrameSource for Capture {
    fn next_frame(&mut self) -> Result<Option<Mat>> {
        if self.released {
            return Ok(None);
        }

        let mut frame = Mat::default();
        if !self.capture.read(&mut frame)? || frame.empty() {
            debug!("No frame from {}", self.source);
            return Ok(None);
        }
        Ok(Some(frame))
    }

    fn release(&mut self) -> Result<()> {
        if !self.released {
            self.released = true;
            self.capture.release()?;
            info!("Released {}", self.source);
        }
        Ok(())
    }
}

impl Drop for Capture {
    fn drop(&mut self) {
        if let Err(e) = FrameSource::release(self) {
            warn!("Failed to release {}: {}", self.source, e);
        }
    }
}
