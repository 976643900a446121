//! Structured run results and the failure report file.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::formatter::Dialect;
use crate::fs_abstraction::FileSystem;
use crate::merger::MergeStats;
use crate::rule::RuleFamily;
use crate::utils::{format_count, truncate};
use crate::writer::WriteOutcome;

/// A source that could not be retrieved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedSource {
    pub task: String,
    pub url: String,
    pub reason: String,
}

/// Result of writing one dialect file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub dialect: Dialect,
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<WriteOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileReport {
    pub fn from_result(dialect: Dialect, path: PathBuf, result: io::Result<WriteOutcome>) -> Self {
        match result {
            Ok(outcome) => Self {
                dialect,
                path,
                outcome: Some(outcome),
                error: None,
            },
            Err(e) => Self {
                dialect,
                path,
                outcome: None,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Overall state of one task after a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// At least one file was rewritten
    Updated,
    /// Every file already matched (or there was nothing to write)
    Unchanged,
    /// Merged and rendered, nothing written
    DryRun,
    /// A source failed; no file was touched
    FetchFailed,
    /// Merged, but at least one file could not be written
    WriteFailed,
}

/// Result of one task.
#[derive(Debug, Clone, Serialize)]
pub struct TaskReport {
    pub name: String,
    pub family: RuleFamily,
    pub status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<MergeStats>,
    pub files: Vec<FileReport>,
    pub failed_sources: Vec<FailedSource>,
}

impl TaskReport {
    pub fn fetch_failed(name: &str, family: RuleFamily, failed_sources: Vec<FailedSource>) -> Self {
        Self {
            name: name.to_string(),
            family,
            status: TaskStatus::FetchFailed,
            stats: None,
            files: Vec::new(),
            failed_sources,
        }
    }

    /// Number of files actually rewritten
    pub fn written(&self) -> usize {
        self.files
            .iter()
            .filter(|f| f.outcome.is_some_and(|o| o.is_written()))
            .count()
    }
}

/// Result of a whole run, in task declaration order.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub dry_run: bool,
    pub tasks: Vec<TaskReport>,
}

impl RunReport {
    /// Every failed source across all tasks
    pub fn failures(&self) -> impl Iterator<Item = &FailedSource> {
        self.tasks.iter().flat_map(|t| t.failed_sources.iter())
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    pub fn has_write_errors(&self) -> bool {
        self.tasks.iter().any(|t| t.status == TaskStatus::WriteFailed)
    }

    /// Total number of files rewritten
    pub fn files_written(&self) -> usize {
        self.tasks.iter().map(TaskReport::written).sum()
    }

    /// Human readable summary, one line per task
    pub fn summary(&self) -> String {
        let mut out = String::new();
        out.push_str(" TASK                      TYPE     RULES      STATUS\n");
        out.push_str(" ───────────────────────── ──────── ────────── ────────────\n");

        for task in &self.tasks {
            let rules = task
                .stats
                .as_ref()
                .map(|s| format_count(s.entries))
                .unwrap_or_else(|| "-".to_string());
            let status = match task.status {
                TaskStatus::Updated => format!("updated ({})", task.written()),
                TaskStatus::Unchanged => "unchanged".to_string(),
                TaskStatus::DryRun => "dry-run".to_string(),
                TaskStatus::FetchFailed => "FETCH FAILED".to_string(),
                TaskStatus::WriteFailed => "WRITE FAILED".to_string(),
            };
            out.push_str(&format!(
                " {:<25} {:<8} {:>10} {}\n",
                truncate(&task.name, 25),
                task.family,
                rules,
                status
            ));
        }

        out
    }
}

/// Render the failure report body.
pub fn render_failure_report(started_at: DateTime<Utc>, failures: &[&FailedSource]) -> String {
    let mut lines = vec![
        format!("# rulecast run {}", started_at.to_rfc3339()),
        "# The following sources could not be retrieved; previous rule files were kept:"
            .to_string(),
    ];
    lines.extend(failures.iter().map(|f| f.url.clone()));
    lines.join("\n")
}

/// Write the failure report if the run had failures.
///
/// Returns `true` when a report was written.
pub fn write_failure_report<F: FileSystem + ?Sized>(
    fs: &F,
    path: &Path,
    report: &RunReport,
) -> io::Result<bool> {
    let failures: Vec<_> = report.failures().collect();
    if failures.is_empty() {
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !fs.exists(parent) {
            fs.create_dir_all(parent)?;
        }
    }

    let content = render_failure_report(report.started_at, &failures);
    fs.write_atomic(path, content.as_bytes())?;
    warn!(
        "{} source(s) failed, listed in {:?}",
        failures.len(),
        path
    );
    Ok(true)
}

/// Remove a failure report left over from a previous run.
pub fn clear_failure_report<F: FileSystem + ?Sized>(fs: &F, path: &Path) -> io::Result<()> {
    if fs.exists(path) {
        fs.remove_file(path)?;
        info!("Removed previous failure report {:?}", path);
    }
    Ok(())
}
