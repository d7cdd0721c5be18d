//! Face and eye detection with Haar cascade classifiers.

use crate::constants::{
    EYE_MIN_NEIGHBORS, EYE_SCALE_FACTOR, FACE_MIN_NEIGHBORS, FACE_SCALE_FACTOR, SYSTEM_CASCADE_DIRS,
};
use crate::{Error, Result};
use log::{debug, info};
use opencv::core::{Mat, Rect, Size, Vector};
use opencv::objdetect::CascadeClassifier;
use opencv::prelude::*;
use std::path::{Path, PathBuf};

/// Anything that finds rectangular regions of one object class in a grayscale image
pub trait RegionDetector {
    /// Detect regions in `gray`; an empty vector means nothing was found
    fn detect(&mut self, gray: &Mat) -> Result<Vec<Rect>>;
}

/// Multi-scale cascade search parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CascadeParams {
    /// Image pyramid scale step
    pub scale_factor: f64,
    /// Neighbouring candidates required to keep a detection
    pub min_neighbors: i32,
}

impl CascadeParams {
    /// Parameters used for frontal faces
    #[must_use]
    pub fn face() -> Self {
        Self {
            scale_factor: FACE_SCALE_FACTOR,
            min_neighbors: FACE_MIN_NEIGHBORS,
        }
    }

    /// Parameters used for eyes inside a face crop
    #[must_use]
    pub fn eye() -> Self {
        Self {
            scale_factor: EYE_SCALE_FACTOR,
            min_neighbors: EYE_MIN_NEIGHBORS,
        }
    }

    /// Check that the parameters are usable
    pub fn validate(&self) -> Result<()> {
        if self.scale_factor.is_nan() || self.scale_factor <= 1.0 {
            return Err(Error::InvalidInput(format!(
                "Cascade scale factor must be greater than 1.0, got {}",
                self.scale_factor
            )));
        }
        if self.min_neighbors < 0 {
            return Err(Error::InvalidInput(format!(
                "Cascade min neighbors must not be negative, got {}",
                self.min_neighbors
            )));
        }
        Ok(())
    }
}

/// `OpenCV` Haar cascade classifier
pub struct CascadeDetector {
    classifier: CascadeClassifier,
    params: CascadeParams,
}

impl CascadeDetector {
    /// Load a cascade from an XML file
    ///
    /// # Errors
    ///
    /// Fails if the file is missing or does not contain a cascade.
    pub fn new<P: AsRef<Path>>(path: P, params: CascadeParams) -> Result<Self> {
        params.validate()?;

        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::DetectorError(format!("Cascade file not found: {}", path.display())));
        }
        let path_str = path
            .to_str()
            .ok_or_else(|| Error::DetectorError(format!("Non UTF-8 cascade path: {}", path.display())))?;

        let classifier = CascadeClassifier::new(path_str)?;
        if classifier.empty()? {
            return Err(Error::DetectorError(format!("Failed to load cascade: {}", path.display())));
        }

        info!("Loaded cascade {}", path.display());
        Ok(Self { classifier, params })
    }

    /// Load a cascade, looking in the system `OpenCV` data directories when
    /// `path` does not exist
    ///
    /// # Errors
    ///
    /// Fails if no candidate file exists or it does not contain a cascade.
    pub fn locate<P: AsRef<Path>>(path: P, params: CascadeParams) -> Result<Self> {
        let dirs: Vec<&Path> = SYSTEM_CASCADE_DIRS.iter().map(Path::new).collect();
        Self::new(locate_cascade(path, &dirs), params)
    }

    #[must_use]
    pub fn params(&self) -> CascadeParams {
        self.params
    }
}

/// `path` if it exists, else the first file with the same name in `search_dirs`.
///
/// Falls back to `path` itself so the load error names the configured file.
pub fn locate_cascade<P: AsRef<Path>>(path: P, search_dirs: &[&Path]) -> PathBuf {
    let path = path.as_ref();
    if path.exists() {
        return path.to_path_buf();
    }
    let Some(name) = path.file_name() else {
        return path.to_path_buf();
    };

    match search_dirs.iter().map(|dir| dir.join(name)).find(|candidate| candidate.exists()) {
        Some(found) => {
            debug!("{} not found, using {}", path.display(), found.display());
            found
        }
        None => path.to_path_buf(),
    }
}

impl RegionDetector for CascadeDetector {
    fn detect(&mut self, gray: &Mat) -> Result<Vec<Rect>> {
        if gray.rows() <= 0 || gray.cols() <= 0 {
            return Ok(Vec::new());
        }

        let mut found = Vector::<Rect>::new();
        self.classifier.detect_multi_scale(
            gray,
            &mut found,
            self.params.scale_factor,
            self.params.min_neighbors,
            0,
            Size::new(0, 0),
            Size::new(0, 0),
        )?;
        Ok(found.to_vec())
    }
}
