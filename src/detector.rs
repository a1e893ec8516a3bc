use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::growth::GrowthError;
use crate::models::BoundingBox;

/// Convert one loose detector row into a validated box.
///
/// Rows arrive as `[x_min, y_min, x_max, y_max]` in pixel coordinates; values
/// are truncated to whole pixels the way the inference script casts them.
/// Degenerate (zero-extent) boxes convert successfully and are skipped by the
/// engine at assessment time; only malformed rows are errors.
pub fn box_from_raw(index: usize, raw: &[f64]) -> Result<BoundingBox, GrowthError> {
    if raw.len() != 4 {
        return Err(GrowthError::MalformedDetection {
            index,
            reason: format!("expected 4 coordinates, got {}", raw.len()),
        });
    }
    for &value in raw {
        if !value.is_finite() {
            return Err(GrowthError::MalformedDetection {
                index,
                reason: format!("non-finite coordinate {value}"),
            });
        }
        if value < 0.0 {
            return Err(GrowthError::MalformedDetection {
                index,
                reason: format!("negative coordinate {value}"),
            });
        }
    }
    Ok(BoundingBox::new(
        raw[0] as u32,
        raw[1] as u32,
        raw[2] as u32,
        raw[3] as u32,
    ))
}

/// Validate a whole detector output batch.
pub fn boxes_from_raw(rows: &[Vec<f64>]) -> Result<Vec<BoundingBox>, GrowthError> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| box_from_raw(index, row))
        .collect()
}

/// Read the JSON sidecar the external detector writes: an array of
/// `[x_min, y_min, x_max, y_max]` rows.
pub fn boxes_from_json_file(path: &Path) -> Result<Vec<BoundingBox>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read detections file {}", path.display()))?;
    let rows: Vec<Vec<f64>> = serde_json::from_str(&text).with_context(|| {
        format!(
            "detections file {} is not an array of coordinate rows",
            path.display()
        )
    })?;
    Ok(boxes_from_raw(&rows)?)
}
