//! Status reporter: lists the files currently under the storage root.
//!
//! Reads the filesystem directly, so it only ever reflects what has landed
//! on disk. A file still being written may show up in a listing.

use std::path::{Path, PathBuf};

use forecast_common::{ForecastError, ForecastResult};
use serde::Serialize;
use tracing::debug;
use walkdir::WalkDir;

/// Response body for the status endpoint.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StatusReport {
    pub data_directory: String,
    pub total_files: usize,
    pub files: Vec<String>,
}

impl StatusReport {
    pub fn new(data_directory: &Path, files: Vec<String>) -> Self {
        Self {
            data_directory: data_directory.display().to_string(),
            total_files: files.len(),
            files,
        }
    }
}

/// Relative paths of every regular file under `root`, sorted.
///
/// Fails if the root itself cannot be read. Entries that vanish or become
/// unreadable while the scan is running are skipped.
pub async fn list_downloaded(root: &Path) -> ForecastResult<Vec<String>> {
    let root: PathBuf = root.to_path_buf();
    tokio::task::spawn_blocking(move || scan(&root))
        .await
        .map_err(|e| ForecastError::Internal(format!("status scan task failed: {}", e)))?
}

fn scan(root: &Path) -> ForecastResult<Vec<String>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(ForecastError::StorageAccess(format!(
                    "cannot read {}: {}",
                    root.display(),
                    e
                )));
            }
            Err(e) => {
                debug!(error = %e, "Skipping unreadable entry");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        if let Ok(relative) = entry.path().strip_prefix(root) {
            files.push(to_slash_path(relative));
        }
    }

    Ok(files)
}

fn to_slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
