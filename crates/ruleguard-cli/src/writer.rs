use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

/// Where a JSON report goes.
///
/// An existing directory, or a missing path ending in a separator, receives
/// `validation_<timestamp>.json`. Any other path is used as the file itself, with
/// missing parent directories created.
pub fn resolve_file_path(path: Option<&str>, timestamp: &str) -> Result<PathBuf> {
    let base_path = path.unwrap_or(".");
    let path = Path::new(base_path);
    let filename = format!("validation_{}.json", timestamp);

    if path.is_dir() {
        return Ok(path.join(filename));
    }
    if path.exists() {
        return Ok(path.to_path_buf());
    }
    if base_path.ends_with('/') || base_path.ends_with('\\') {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
        return Ok(path.join(filename));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }
    Ok(path.to_path_buf())
}

pub fn write_report(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents)
        .with_context(|| format!("Failed to write report: {}", path.display()))?;
    tracing::info!(path = %path.display(), "report written");
    Ok(())
}
