//! Storage layout for downloaded forecast files.
//!
//! Files live at `<root>/<model dir>/<YYYYMMDDHH>_f<hour:03>.nc`. Deriving a
//! path has no side effects; parent directories are created separately,
//! right before a fetch.

use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use forecast_common::{time_stem, ModelId};
use tokio::fs;

/// Extension of every downloaded forecast file.
pub const FILE_EXTENSION: &str = "nc";

/// Largest forecast hour that fits the three-digit filename padding.
pub const MAX_FORECAST_HOUR: u32 = 999;

/// Maps (model, initialization time, forecast hour) to files under a root.
#[derive(Debug, Clone)]
pub struct StorageLayout {
    root: PathBuf,
}

impl StorageLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding every file for a model.
    pub fn model_dir(&self, model: &ModelId) -> PathBuf {
        self.root.join(model.directory_name())
    }

    /// Canonical path for one forecast hour.
    pub fn target(&self, model: &ModelId, initialization_time: DateTime<Utc>, forecast_hour: u32) -> PathBuf {
        self.model_dir(model)
            .join(file_name(initialization_time, forecast_hour))
    }
}

/// Filename for one forecast hour, e.g. `2025051800_f006.nc`.
pub fn file_name(initialization_time: DateTime<Utc>, forecast_hour: u32) -> String {
    format!(
        "{}_f{:03}.{}",
        time_stem(initialization_time),
        forecast_hour,
        FILE_EXTENSION
    )
}

/// Create the parent directory of `path` if it is missing.
///
/// Safe to call concurrently; an existing directory is not an error.
pub async fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent).await,
        _ => Ok(()),
    }
}

/// Whether something is already stored at `path`.
///
/// A truncated file left by an interrupted fetch counts as present.
pub async fn exists(path: &Path) -> bool {
    fs::try_exists(path).await.unwrap_or(false)
}
