//! Helper types and functions for integration tests

#![allow(dead_code)]

use affect_monitor::capture::FrameSource;
use affect_monitor::detection::RegionDetector;
use affect_monitor::{Error, Result};
use opencv::core::{Mat, Rect, Scalar, CV_8UC3};
use opencv::prelude::*;
use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Create a BGR frame filled with one gray level
pub fn solid_frame(rows: i32, cols: i32, value: f64) -> Mat {
    Mat::new_rows_cols_with_default(rows, cols, CV_8UC3, Scalar::all(value)).unwrap()
}

/// Frame source that replays prepared frames, optionally failing at the end
pub struct ScriptedSource {
    frames: VecDeque<Mat>,
    fail_at_end: bool,
    released: Rc<Cell<u32>>,
}

impl ScriptedSource {
    pub fn new(frames: Vec<Mat>) -> Self {
        Self {
            frames: frames.into(),
            fail_at_end: false,
            released: Rc::new(Cell::new(0)),
        }
    }

    /// Return a read error once the frames run out
    pub fn failing_at_end(mut self) -> Self {
        self.fail_at_end = true;
        self
    }

    /// Counter of `release` calls, readable after the source is moved
    pub fn release_counter(&self) -> Rc<Cell<u32>> {
        Rc::clone(&self.released)
    }
}

impl FrameSource for ScriptedSource {
    fn next_frame(&mut self) -> Result<Option<Mat>> {
        match self.frames.pop_front() {
            Some(frame) => Ok(Some(frame)),
            None if self.fail_at_end => Err(Error::InvalidInput("scripted read failure".to_string())),
            None => Ok(None),
        }
    }

    fn release(&mut self) -> Result<()> {
        self.released.set(self.released.get() + 1);
        Ok(())
    }
}

/// Detector returning the same rectangles for every image
pub struct FixedDetector {
    regions: Vec<Rect>,
}

impl FixedDetector {
    pub fn new(regions: Vec<Rect>) -> Self {
        Self { regions }
    }

    pub fn none() -> Self {
        Self::new(Vec::new())
    }
}

impl RegionDetector for FixedDetector {
    fn detect(&mut self, _gray: &Mat) -> Result<Vec<Rect>> {
        Ok(self.regions.clone())
    }
}

/// Detector replaying one result per call, then returning nothing
pub struct ScriptedDetector {
    results: VecDeque<Vec<Rect>>,
}

impl ScriptedDetector {
    pub fn new(results: Vec<Vec<Rect>>) -> Self {
        Self { results: results.into() }
    }
}

impl RegionDetector for ScriptedDetector {
    fn detect(&mut self, _gray: &Mat) -> Result<Vec<Rect>> {
        Ok(self.results.pop_front().unwrap_or_default())
    }
}

/// Two eye-sized rectangles in face coordinates
pub fn two_eyes() -> Vec<Rect> {
    vec![Rect::new(10, 15, 12, 8), Rect::new(38, 15, 12, 8)]
}
