use image::{DynamicImage, GrayImage};
use imageproc::contrast::adaptive_threshold;
use imageproc::distance_transform::Norm;
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology::close;

/// Convert image to grayscale
pub fn to_grayscale(img: &DynamicImage) -> GrayImage {
    img.to_luma8()
}

/// Apply Gaussian blur to reduce noise
pub fn apply_blur(img: &GrayImage, sigma: f32) -> GrayImage {
    gaussian_blur_f32(img, sigma)
}

/// Adaptive threshold with the foreground (dark leaf mass) mapped to white.
///
/// `adaptive_threshold` marks pixels at or above their local block mean, which
/// selects the bright background; inverting leaves the leaf matter as
/// foreground for labeling.
pub fn threshold_foreground(img: &GrayImage, block_radius: u32) -> GrayImage {
    let mut binary = adaptive_threshold(img, block_radius);
    image::imageops::invert(&mut binary);
    binary
}

/// Morphological closing to merge fragmented leaf regions before labeling.
pub fn close_regions(img: &GrayImage, radius: u8) -> GrayImage {
    close(img, Norm::LInf, radius)
}
