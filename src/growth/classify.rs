use serde::Deserialize;

use super::GrowthError;

/// Upper limits for one growth stage.
#[derive(Debug, Clone, Deserialize)]
pub struct StageThreshold {
    pub name: String,
    pub max_height_cm: f64,
    pub max_leaf_count: u32,
    pub max_leaf_area_cm2: f64,
}

/// Ordered stage table, least to most mature.
///
/// Classification returns the first stage whose three limits all exceed the
/// observed values; when nothing matches, the last stage is the fallback.
#[derive(Debug, Clone)]
pub struct GrowthThresholds {
    stages: Vec<StageThreshold>,
    empty_stage: String,
}

impl GrowthThresholds {
    /// Build a table from an ordered stage list. The stage reported for a
    /// zero-detection assessment defaults to the first stage's name.
    pub fn new(stages: Vec<StageThreshold>) -> Result<Self, GrowthError> {
        let empty_stage = match stages.first() {
            Some(stage) => stage.name.clone(),
            None => return Err(GrowthError::EmptyStageTable),
        };
        Ok(Self {
            stages,
            empty_stage,
        })
    }

    /// Override the stage reported when an image has no valid detections.
    pub fn with_empty_stage(mut self, name: impl Into<String>) -> Self {
        self.empty_stage = name.into();
        self
    }

    pub fn stages(&self) -> &[StageThreshold] {
        &self.stages
    }

    pub fn empty_stage(&self) -> &str {
        &self.empty_stage
    }

    /// Classify observed metrics against the stage table.
    ///
    /// Comparisons are strict-less-than on all three limits: a value exactly
    /// at a stage's bound falls through toward the more mature stages.
    pub fn classify(&self, height_cm: f64, leaf_count: u32, leaf_area_cm2: f64) -> &str {
        for stage in &self.stages {
            if height_cm < stage.max_height_cm
                && leaf_count < stage.max_leaf_count
                && leaf_area_cm2 < stage.max_leaf_area_cm2
            {
                return &stage.name;
            }
        }
        match self.stages.last() {
            Some(stage) => &stage.name,
            None => &self.empty_stage,
        }
    }
}

impl Default for GrowthThresholds {
    /// The deployed appliance's calibrated stage table.
    fn default() -> Self {
        Self {
            stages: vec![
                StageThreshold {
                    name: "Seedling".to_string(),
                    max_height_cm: 5.0,
                    max_leaf_count: 4,
                    max_leaf_area_cm2: 15.0,
                },
                StageThreshold {
                    name: "Vegetative".to_string(),
                    max_height_cm: 15.0,
                    max_leaf_count: 8,
                    max_leaf_area_cm2: 50.0,
                },
                StageThreshold {
                    name: "Mature".to_string(),
                    max_height_cm: 25.0,
                    max_leaf_count: 12,
                    max_leaf_area_cm2: 100.0,
                },
            ],
            empty_stage: "Seedling".to_string(),
        }
    }
}
