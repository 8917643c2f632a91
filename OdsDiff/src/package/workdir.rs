//! Scoped working directories

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::Result;

/// A working directory removed when dropped
///
/// Removal failures are logged and never propagated.
#[derive(Debug)]
pub struct WorkDir {
    path: PathBuf,
    dir: Option<TempDir>,
}

impl WorkDir {
    /// Create a directory named `<name>_files.<random>` under `root`
    ///
    /// # Errors
    /// Returns an error if `root` cannot be created or written to.
    pub fn new(root: &Path, name: &str) -> Result<Self> {
        fs::create_dir_all(root)?;
        let dir = tempfile::Builder::new()
            .prefix(&format!("{name}_files."))
            .tempdir_in(root)?;
        tracing::debug!("Created working directory {}", dir.path().display());
        Ok(Self {
            path: dir.path().to_path_buf(),
            dir: Some(dir),
        })
    }

    /// Directory path
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of an entry inside the directory
    #[must_use]
    pub fn join(&self, entry: impl AsRef<Path>) -> PathBuf {
        self.path.join(entry)
    }
}

impl Drop for WorkDir {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            if let Err(e) = dir.close() {
                tracing::warn!(
                    "Failed to remove working directory {}: {}",
                    self.path.display(),
                    e
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removed_on_drop() {
        let root = tempfile::tempdir().unwrap();
        let work = WorkDir::new(root.path(), "sheet-origin").unwrap();
        let path = work.path().to_path_buf();

        assert!(path.is_dir());
        assert!(
            path.file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with("sheet-origin_files.")
        );
        fs::write(work.join("content.xml"), "<x/>").unwrap();

        drop(work);
        assert!(!path.exists());
    }
}
