//! Pixel statistics over face regions.
//!
//! Every function here treats an empty region as "no measurement" and
//! returns `None` instead of an error.

use crate::constants::{CANNY_HIGH_THRESHOLD, CANNY_LOW_THRESHOLD};
use crate::utils::clip_rect;
use crate::Result;
use opencv::core::{self, Mat, Rect};
use opencv::imgproc;
use opencv::prelude::*;

/// Statistics used to classify the mood of one face
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoodFeatures {
    /// Mean of the Canny edge map (0-255)
    pub edge_density: f64,
    /// Mean brightness of the eye band (rows h/4 to h/2)
    pub eye_brightness: f64,
}

/// Convert a BGR, BGRA or single-channel image to grayscale
pub fn to_gray(image: &Mat) -> Result<Mat> {
    let code = match image.channels() {
        1 => return Ok(image.try_clone()?),
        4 => imgproc::COLOR_BGRA2GRAY,
        _ => imgproc::COLOR_BGR2GRAY,
    };
    let mut gray = Mat::default();
    imgproc::cvt_color(image, &mut gray, code, 0)?;
    Ok(gray)
}

fn is_empty_region(image: &Mat) -> bool {
    image.rows() <= 0 || image.cols() <= 0
}

/// Mean intensity of an image after grayscale conversion
pub fn mean_intensity(image: &Mat) -> Result<Option<f64>> {
    if is_empty_region(image) {
        return Ok(None);
    }
    let gray = to_gray(image)?;
    let mean = core::mean(&gray, &Mat::default())?;
    Ok(Some(mean[0]))
}

/// Top third of a face rectangle
#[must_use]
pub fn forehead_region(face: Rect) -> Option<Rect> {
    let height = face.height / 3;
    if height <= 0 || face.width <= 0 {
        return None;
    }
    Some(Rect::new(face.x, face.y, face.width, height))
}

/// Mean forehead intensity of `face` within `frame`
pub fn forehead_intensity(frame: &Mat, face: Rect) -> Result<Option<f64>> {
    let Some(region) = forehead_region(face).and_then(|r| clip_rect(r, frame.cols(), frame.rows())) else {
        return Ok(None);
    };
    let roi = Mat::roi(frame, region)?;
    let forehead = roi.try_clone()?;
    mean_intensity(&forehead)
}

/// Mean of the Canny edge map of a grayscale image
pub fn edge_density(gray: &Mat) -> Result<Option<f64>> {
    if is_empty_region(gray) {
        return Ok(None);
    }
    let mut edges = Mat::default();
    imgproc::canny(gray, &mut edges, CANNY_LOW_THRESHOLD, CANNY_HIGH_THRESHOLD, 3, false)?;

    let total = core::sum_elems(&edges)?[0];
    let pixels = f64::from(edges.rows()) * f64::from(edges.cols());
    Ok(Some(total / pixels))
}

/// Mean brightness of rows `h/4 .. h/2` of a grayscale image
pub fn eye_band_brightness(gray: &Mat) -> Result<Option<f64>> {
    let rows = gray.rows();
    let top = rows / 4;
    let band = Rect::new(0, top, gray.cols(), rows / 2 - top);
    if band.height <= 0 || band.width <= 0 {
        return Ok(None);
    }
    let roi = Mat::roi(gray, band)?;
    let eye_band = roi.try_clone()?;
    let mean = core::mean(&eye_band, &Mat::default())?;
    Ok(Some(mean[0]))
}

/// Mood statistics for a cropped BGR face, `None` if the crop is too small
pub fn mood_features(face: &Mat) -> Result<Option<MoodFeatures>> {
    if is_empty_region(face) {
        return Ok(None);
    }
    let gray = to_gray(face)?;

    let (Some(edge_density), Some(eye_brightness)) = (edge_density(&gray)?, eye_band_brightness(&gray)?) else {
        return Ok(None);
    };
    Ok(Some(MoodFeatures {
        edge_density,
        eye_brightness,
    }))
}
