//! Grayscale conversion and Otsu binarization ahead of text recognition.

use std::io::Cursor;

use image::{DynamicImage, GrayImage, ImageFormat};
use imageproc::contrast::otsu_level;
use imageproc::distance_transform::Norm;
use imageproc::morphology;

use crate::config::PipelineConfig;
use crate::error::ExtractError;

/// The two views of one input image the pipeline works from.
#[derive(Debug, Clone)]
pub struct PreparedImage {
    /// Grayscale original, used by the line detector.
    pub gray: GrayImage,
    /// Thresholded copy handed to the recognizer.
    pub binary: GrayImage,
}

pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, ExtractError> {
    Ok(image::load_from_memory(bytes)?)
}

/// Global threshold at the Otsu level: brighter than the level becomes white.
#[must_use]
pub fn binarize(gray: &GrayImage) -> GrayImage {
    let level = otsu_level(gray);
    let mut binary = gray.clone();
    for pixel in binary.pixels_mut() {
        pixel.0[0] = if pixel.0[0] > level { 255 } else { 0 };
    }
    binary
}

#[must_use]
pub fn prepare_image(image: &DynamicImage, config: &PipelineConfig) -> PreparedImage {
    let gray = image.to_luma8();
    let mut binary = binarize(&gray);
    if config.dilate_radius > 0 {
        binary = morphology::dilate(&binary, Norm::LInf, config.dilate_radius);
    }
    PreparedImage { gray, binary }
}

pub fn encode_png(image: &GrayImage) -> Result<Vec<u8>, ExtractError> {
    let mut cursor = Cursor::new(Vec::new());
    image.write_to(&mut cursor, ImageFormat::Png)?;
    Ok(cursor.into_inner())
}
