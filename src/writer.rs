//! Content-hash gated file writes.
//!
//! A rendered dialect is only written when its SHA-256 digest differs from
//! the file already on disk. Empty output never touches an existing file.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::io;
use std::path::Path;
use tracing::{debug, info};

use crate::fs_abstraction::FileSystem;

/// Result of one incremental write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum WriteOutcome {
    /// Nothing to write; any existing file was left as is
    SkippedEmpty,
    /// Stored content already matches
    Unchanged,
    /// File replaced with `lines` rule lines
    Written { lines: usize },
}

impl WriteOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, WriteOutcome::Written { .. })
    }
}

/// Writes rule files through a [`FileSystem`], skipping unchanged content.
pub struct IncrementalWriter<'a, F: FileSystem + ?Sized> {
    fs: &'a F,
}

impl<'a, F: FileSystem + ?Sized> IncrementalWriter<'a, F> {
    pub fn new(fs: &'a F) -> Self {
        Self { fs }
    }

    /// Persist `lines` joined by `\n` (no trailing newline) at `path`.
    pub fn write(&self, path: &Path, lines: &[String]) -> io::Result<WriteOutcome> {
        if lines.is_empty() {
            debug!("No rules for {:?}, keeping existing file", path);
            return Ok(WriteOutcome::SkippedEmpty);
        }

        let content = lines.join("\n");
        let new_digest = digest(content.as_bytes());

        // An unreadable file is treated as absent and overwritten
        if let Ok(existing) = self.fs.read(path) {
            if digest(&existing) == new_digest {
                debug!("Content unchanged, skipping {:?}", path);
                return Ok(WriteOutcome::Unchanged);
            }
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !self.fs.exists(parent) {
                self.fs.create_dir_all(parent)?;
            }
        }

        self.fs.write_atomic(path, content.as_bytes())?;
        info!("Updated {:?} ({} rules)", path, lines.len());

        Ok(WriteOutcome::Written { lines: lines.len() })
    }
}

fn digest(bytes: &[u8]) -> [u8; 32] {
    Sha256::digest(bytes).into()
}
