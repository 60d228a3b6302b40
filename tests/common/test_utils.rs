//! Test utilities for temporary file handling

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// RAII wrapper for temporary test directories with automatic cleanup
///
/// The directory and its contents are deleted when this struct is dropped
pub struct TempTestDir {
    dir: TempDir,
}

impl TempTestDir {
    /// Create a new temporary test directory
    pub fn new(test_name: &str) -> std::io::Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(&format!("cricstats_test_{}_", test_name))
            .tempdir()?;
        Ok(TempTestDir { dir })
    }

    /// Get the path to the temporary directory
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `contents` to `name` inside the directory
    pub fn write_file(&self, name: &str, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.dir.path().join(name);
        fs::write(&path, contents)?;
        Ok(path)
    }
}
