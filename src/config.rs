use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::growth::{CameraModel, GrowthEngine, GrowthThresholds, HeightPolicy, StageThreshold};

const DEFAULT_ANGLE_DEGREES: f64 = 45.0;
const DEFAULT_HEIGHT_CM: f64 = 30.0;
const DEFAULT_FOCAL_LENGTH_PX: f64 = 800.0;
const DEFAULT_SCALE_FACTOR: f64 = 0.05;
const DEFAULT_CAPTURE_PROGRAM: &str = "libcamera-jpeg";

#[derive(Debug, Deserialize, Default)]
struct ApplianceConfigFile {
    camera: Option<CameraConfigFile>,
    area: Option<AreaConfigFile>,
    stages: Option<Vec<StageThreshold>>,
    empty_stage: Option<String>,
    height_policy: Option<HeightPolicy>,
    capture: Option<CaptureConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
struct CameraConfigFile {
    angle_degrees: Option<f64>,
    height_cm: Option<f64>,
    focal_length_px: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
struct AreaConfigFile {
    scale_factor: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
struct CaptureConfigFile {
    program: Option<String>,
    args: Option<Vec<String>>,
}

/// External still-capture command settings.
#[derive(Debug, Clone)]
pub struct CaptureSettings {
    pub program: String,
    pub args: Vec<String>,
}

/// Resolved, validated appliance configuration. Immutable for the run:
/// calibration is never re-derived or mutated per frame.
#[derive(Debug, Clone)]
pub struct ApplianceConfig {
    pub camera: CameraModel,
    pub thresholds: GrowthThresholds,
    pub scale_factor: f64,
    pub height_policy: HeightPolicy,
    pub capture: CaptureSettings,
}

impl ApplianceConfig {
    /// Load from an explicit path, the `LEAFGAUGE_CONFIG` environment
    /// variable, or fall back to deployment defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var("LEAFGAUGE_CONFIG").ok().map(PathBuf::from);
        let file_cfg = match path.or(env_path.as_deref()) {
            Some(p) => read_config_file(p)?,
            None => ApplianceConfigFile::default(),
        };
        Self::from_file(file_cfg)
    }

    fn from_file(file: ApplianceConfigFile) -> Result<Self> {
        let cam = file.camera.unwrap_or_default();
        // CameraModel::new rejects singular angles, so a bad calibration
        // aborts startup here instead of failing per box later.
        let camera = CameraModel::new(
            cam.angle_degrees.unwrap_or(DEFAULT_ANGLE_DEGREES),
            cam.height_cm.unwrap_or(DEFAULT_HEIGHT_CM),
            cam.focal_length_px.unwrap_or(DEFAULT_FOCAL_LENGTH_PX),
        )?;

        let mut thresholds = match file.stages {
            Some(stages) => GrowthThresholds::new(stages)?,
            None => GrowthThresholds::default(),
        };
        if let Some(stage) = file.empty_stage {
            thresholds = thresholds.with_empty_stage(stage);
        }

        let scale_factor = file
            .area
            .unwrap_or_default()
            .scale_factor
            .unwrap_or(DEFAULT_SCALE_FACTOR);
        if !scale_factor.is_finite() || scale_factor <= 0.0 {
            anyhow::bail!("area.scale_factor must be a positive number, got {scale_factor}");
        }

        let capture_file = file.capture.unwrap_or_default();
        let capture = CaptureSettings {
            program: capture_file
                .program
                .unwrap_or_else(|| DEFAULT_CAPTURE_PROGRAM.to_string()),
            args: capture_file.args.unwrap_or_else(default_capture_args),
        };

        Ok(Self {
            camera,
            thresholds,
            scale_factor,
            height_policy: file.height_policy.unwrap_or_default(),
            capture,
        })
    }

    /// Build the metrics engine this configuration describes.
    pub fn engine(&self) -> GrowthEngine {
        GrowthEngine::new(self.camera, self.thresholds.clone(), self.scale_factor)
            .with_height_policy(self.height_policy)
    }
}

fn default_capture_args() -> Vec<String> {
    ["--width", "1024", "--height", "768", "--quality", "85", "--nopreview"]
        .iter()
        .map(|arg| arg.to_string())
        .collect()
}

fn read_config_file(path: &Path) -> Result<ApplianceConfigFile> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("failed to parse config file {}", path.display()))
}
