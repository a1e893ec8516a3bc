pub mod classify;
pub mod estimate;

use serde::Deserialize;

use crate::models::{BoundingBox, DrawInstruction, GrowthAssessment, LeafMeasurement};
use estimate::round2;

pub use classify::{GrowthThresholds, StageThreshold};
pub use estimate::{estimate_height, estimate_leaf_area};

/// Errors from calibration and detector-boundary validation. Degenerate boxes
/// and empty detection sets are valid degenerate results, not errors.
#[derive(Debug, thiserror::Error)]
pub enum GrowthError {
    #[error(
        "camera angle {angle_degrees}° has no usable tangent; calibrate strictly between 0° and 90°"
    )]
    CameraAngle { angle_degrees: f64 },

    #[error("camera calibration {field} must be a positive number, got {value}")]
    Calibration { field: &'static str, value: f64 },

    #[error("growth stage table must contain at least one stage")]
    EmptyStageTable,

    #[error("malformed detection at index {index}: {reason}")]
    MalformedDetection { index: usize, reason: String },
}

/// Fixed geometric calibration for the deployed camera: tilt from vertical,
/// mount height above the reference plane, and calibrated focal length.
///
/// Immutable for the lifetime of a run; changing it means recalibrating, not
/// flipping a runtime parameter.
#[derive(Debug, Clone, Copy)]
pub struct CameraModel {
    angle_degrees: f64,
    height_cm: f64,
    focal_length_px: f64,
}

impl CameraModel {
    /// Validate and freeze a calibration.
    ///
    /// The tangent is zero or undefined at every multiple of 90°, so angles
    /// outside the open interval (0°, 90°) are rejected here, at
    /// configuration time, rather than exploding per box later.
    pub fn new(
        angle_degrees: f64,
        height_cm: f64,
        focal_length_px: f64,
    ) -> Result<Self, GrowthError> {
        if !angle_degrees.is_finite() || angle_degrees <= 0.0 || angle_degrees >= 90.0 {
            return Err(GrowthError::CameraAngle { angle_degrees });
        }
        if !height_cm.is_finite() || height_cm <= 0.0 {
            return Err(GrowthError::Calibration {
                field: "height_cm",
                value: height_cm,
            });
        }
        if !focal_length_px.is_finite() || focal_length_px <= 0.0 {
            return Err(GrowthError::Calibration {
                field: "focal_length_px",
                value: focal_length_px,
            });
        }
        Ok(Self {
            angle_degrees,
            height_cm,
            focal_length_px,
        })
    }

    pub fn angle_degrees(&self) -> f64 {
        self.angle_degrees
    }

    pub fn height_cm(&self) -> f64 {
        self.height_cm
    }

    pub fn focal_length_px(&self) -> f64 {
        self.focal_length_px
    }
}

/// How the representative height of an assessment is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeightPolicy {
    /// Height of the last enumerated valid detection. This matches the
    /// behavior of the deployed appliance and is the compatibility default.
    #[default]
    LastDetection,
    /// Tallest valid detection in the image.
    MaxHeight,
    /// Mean height across valid detections, rounded to 2 decimals.
    MeanHeight,
}

/// Growth metrics engine: converts detector boxes into physical measurements
/// and a per-image stage verdict.
///
/// Owns only configuration. Every call is a pure function of its inputs, so
/// one engine can serve any number of callers with disjoint inputs.
#[derive(Debug, Clone)]
pub struct GrowthEngine {
    camera: CameraModel,
    thresholds: GrowthThresholds,
    scale_factor: f64,
    height_policy: HeightPolicy,
}

impl GrowthEngine {
    pub fn new(camera: CameraModel, thresholds: GrowthThresholds, scale_factor: f64) -> Self {
        Self {
            camera,
            thresholds,
            scale_factor,
            height_policy: HeightPolicy::default(),
        }
    }

    pub fn with_height_policy(mut self, policy: HeightPolicy) -> Self {
        self.height_policy = policy;
        self
    }

    pub fn camera(&self) -> &CameraModel {
        &self.camera
    }

    pub fn thresholds(&self) -> &GrowthThresholds {
        &self.thresholds
    }

    /// Measure a single detection box.
    pub fn measure(&self, bbox: &BoundingBox) -> LeafMeasurement {
        LeafMeasurement {
            height_cm: estimate_height(bbox, &self.camera),
            area_cm2: estimate_leaf_area(bbox, self.scale_factor),
        }
    }

    /// Fold all detections of one image into a growth assessment.
    ///
    /// Degenerate boxes are skipped and counted, never measured. An empty or
    /// all-degenerate input yields a zero assessment carrying the configured
    /// empty stage.
    pub fn assess(&self, boxes: &[BoundingBox]) -> GrowthAssessment {
        let mut heights = Vec::with_capacity(boxes.len());
        let mut total_leaf_area_cm2 = 0.0;
        let mut skipped_boxes = 0u32;

        for bbox in boxes {
            if !bbox.is_valid() {
                skipped_boxes += 1;
                continue;
            }
            let measurement = self.measure(bbox);
            total_leaf_area_cm2 += measurement.area_cm2;
            heights.push(measurement.height_cm);
        }

        let leaf_count = heights.len() as u32;
        if leaf_count == 0 {
            return GrowthAssessment {
                leaf_count: 0,
                total_leaf_area_cm2: 0.0,
                representative_height_cm: 0.0,
                stage: self.thresholds.empty_stage().to_string(),
                skipped_boxes,
            };
        }

        let representative_height_cm = match self.height_policy {
            HeightPolicy::LastDetection => heights.last().copied().unwrap_or(0.0),
            HeightPolicy::MaxHeight => heights.iter().copied().fold(0.0, f64::max),
            HeightPolicy::MeanHeight => {
                round2(heights.iter().sum::<f64>() / f64::from(leaf_count))
            }
        };

        let stage = self
            .thresholds
            .classify(representative_height_cm, leaf_count, total_leaf_area_cm2)
            .to_string();

        GrowthAssessment {
            leaf_count,
            total_leaf_area_cm2,
            representative_height_cm,
            stage,
            skipped_boxes,
        }
    }

    /// Per-box labels the way the appliance burns them into the detected
    /// frame: the stage is recomputed after every box against the running
    /// cumulative count and area, so earlier labels can read less mature than
    /// the final verdict.
    pub fn annotations(&self, boxes: &[BoundingBox]) -> Vec<DrawInstruction> {
        let mut instructions = Vec::new();
        let mut leaf_count = 0u32;
        let mut total_leaf_area_cm2 = 0.0;

        for bbox in boxes {
            if !bbox.is_valid() {
                continue;
            }
            let measurement = self.measure(bbox);
            leaf_count += 1;
            total_leaf_area_cm2 += measurement.area_cm2;
            let stage =
                self.thresholds
                    .classify(measurement.height_cm, leaf_count, total_leaf_area_cm2);
            instructions.push(DrawInstruction {
                bbox: *bbox,
                label: format!("{} ({}cm)", stage, measurement.height_cm),
            });
        }

        instructions
    }
}
