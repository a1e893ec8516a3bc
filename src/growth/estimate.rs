use super::CameraModel;
use crate::models::BoundingBox;

/// Round to the 2-decimal precision stored records carry.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Estimate physical height from a detection box via the fixed-tilt camera
/// model: `(mount_height * pixel_height) / focal_length / tan(angle)`.
///
/// Total over any [`CameraModel`], which excludes singular angles at
/// construction.
pub fn estimate_height(bbox: &BoundingBox, camera: &CameraModel) -> f64 {
    let pixel_height = f64::from(bbox.pixel_height());
    let height = (camera.height_cm() * pixel_height)
        / camera.focal_length_px()
        / camera.angle_degrees().to_radians().tan();
    round2(height)
}

/// Flat pixel-area to physical-area conversion with one calibrated constant.
///
/// Deliberately crude: no perspective correction is applied, matching the
/// calibration procedure the scale factor was measured under.
pub fn estimate_leaf_area(bbox: &BoundingBox, scale_factor: f64) -> f64 {
    let pixel_area = f64::from(bbox.pixel_width()) * f64::from(bbox.pixel_height());
    round2(pixel_area * scale_factor)
}
