use leafgauge::{BoundingBox, CameraModel, GrowthEngine, GrowthThresholds};

/// Engine with the deployed calibration: 45° tilt, 30 cm mount height,
/// 800 px focal length, 0.05 cm²/px² area scale.
pub fn default_engine() -> GrowthEngine {
    let camera = CameraModel::new(45.0, 30.0, 800.0).expect("valid calibration");
    GrowthEngine::new(camera, GrowthThresholds::default(), 0.05)
}

pub fn bbox(x_min: u32, y_min: u32, x_max: u32, y_max: u32) -> BoundingBox {
    BoundingBox::new(x_min, y_min, x_max, y_max)
}
