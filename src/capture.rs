use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result};
use time::OffsetDateTime;

use crate::config::CaptureSettings;

/// Timestamp key component shared by capture filenames and store keys,
/// `YYYYmmdd_HHMMSS` in local time (UTC when the local offset is unknown).
pub fn timestamp() -> Result<String> {
    let format = time::format_description::parse("[year][month][day]_[hour][minute][second]")?;
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    Ok(now.format(&format)?)
}

/// Run the configured external still-capture command, writing to `output`.
pub fn capture_to(settings: &CaptureSettings, output: &Path) -> Result<()> {
    let status = Command::new(&settings.program)
        .arg("-o")
        .arg(output)
        .args(&settings.args)
        .status()
        .with_context(|| format!("failed to launch capture command {}", settings.program))?;
    if !status.success() {
        anyhow::bail!("capture command {} exited with {status}", settings.program);
    }
    Ok(())
}
