//! Temporary storage roots for tests.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::TempDir;
use walkdir::WalkDir;

/// A storage root in a temporary directory, removed on drop.
pub struct TempStore {
    dir: TempDir,
}

impl TempStore {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("failed to create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Absolute path of a file relative to the root.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// Create a file (and its parent directories) with the given contents.
    pub fn write(&self, relative: &str, contents: &[u8]) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create parent dir");
        }
        std::fs::write(&path, contents).expect("failed to write file");
        path
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.path(relative).exists()
    }

    /// Sorted relative paths of every regular file under the root.
    pub fn files(&self) -> Vec<String> {
        let mut files: Vec<String> = WalkDir::new(self.root())
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| {
                e.path()
                    .strip_prefix(self.root())
                    .ok()
                    .map(|p| p.to_string_lossy().replace('\\', "/"))
            })
            .collect();
        files.sort();
        files
    }

    /// Wait until at least `count` files exist under the root.
    ///
    /// Returns the files found, or panics after `timeout`.
    pub async fn wait_for_files(&self, count: usize, timeout: Duration) -> Vec<String> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let files = self.files();
            if files.len() >= count {
                return files;
            }
            if tokio::time::Instant::now() >= deadline {
                panic!(
                    "timed out waiting for {} files under {}, found {:?}",
                    count,
                    self.root().display(),
                    files
                );
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

impl Default for TempStore {
    fn default() -> Self {
        Self::new()
    }
}
