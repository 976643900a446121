//! File-based locking to prevent concurrent runs.
//!
//! Two updates writing the same output tree would race on the rule files,
//! so `update` holds an advisory lock inside the output directory.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::error::RulecastError;

/// Lock file name, created inside the output directory
pub const LOCK_FILE: &str = ".rulecast.lock";

/// Holds an exclusive lock on `<dir>/.rulecast.lock`.
/// The lock is released when the guard is dropped.
#[derive(Debug)]
pub struct LockGuard {
    _file: File,
    path: PathBuf,
}

impl LockGuard {
    /// Attempt to acquire the lock for `dir`, creating the directory if needed.
    ///
    /// Fails immediately if another instance holds it.
    pub fn acquire(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {:?}", dir))?;

        let path = dir.join(LOCK_FILE);

        // Open without truncation: no window between create and lock
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .with_context(|| format!("Failed to open lock file: {:?}", path))?;

        file.try_lock_exclusive()
            .map_err(|_| RulecastError::Locked(path.display().to_string()))?;

        Ok(Self { _file: file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
