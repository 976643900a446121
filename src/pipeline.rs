//! Fetch, merge, render and write every task.
//!
//! Sources of one task are fetched sequentially in declared order because
//! the merge is order sensitive. Tasks share nothing and run concurrently;
//! reports come back in declaration order. A task with any failed source
//! writes nothing, so its previous files stay byte-for-byte intact.

use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::formatter::{render, Dialect, RenderedOutput};
use crate::fs_abstraction::FileSystem;
use crate::fetcher::SourceFetcher;
use crate::merger::merge_sources;
use crate::report::{FailedSource, FileReport, RunReport, TaskReport, TaskStatus};
use crate::rule::RuleFamily;
use crate::task::TaskSpec;
use crate::utils::format_count;
use crate::writer::IncrementalWriter;

/// Maps a task to its output files: `<root>/<dialect>/<family>/<name>.list`
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, dialect: Dialect, family: RuleFamily, name: &str) -> PathBuf {
        self.root
            .join(dialect.as_str())
            .join(family.as_str())
            .join(format!("{}.list", name))
    }
}

/// Runs tasks against a fetcher and a filesystem.
pub struct Pipeline<'a, F: SourceFetcher + ?Sized, S: FileSystem + ?Sized> {
    fetcher: &'a F,
    fs: &'a S,
    layout: OutputLayout,
    concurrency: usize,
    dry_run: bool,
}

impl<'a, F: SourceFetcher + ?Sized, S: FileSystem + ?Sized> Pipeline<'a, F, S> {
    pub fn new(fetcher: &'a F, fs: &'a S, layout: OutputLayout) -> Self {
        Self {
            fetcher,
            fs,
            layout,
            concurrency: 1,
            dry_run: false,
        }
    }

    /// Number of tasks processed at the same time
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Fetch, merge and render, but never write
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Run all tasks. Never fails as a whole: problems are reported per task.
    pub async fn run(&self, tasks: &[TaskSpec]) -> RunReport {
        let started_at = Utc::now();
        info!("Processing {} task(s)...", tasks.len());

        let reports: Vec<TaskReport> = stream::iter(tasks.iter().map(|task| self.run_task(task)))
            .buffered(self.concurrency)
            .collect()
            .await;

        RunReport {
            started_at,
            dry_run: self.dry_run,
            tasks: reports,
        }
    }

    /// Run a single task.
    pub async fn run_task(&self, task: &TaskSpec) -> TaskReport {
        debug!(
            "Task [{}] type={} policy={} strict={}",
            task.name, task.family, task.policy, task.strict
        );

        let mut texts = Vec::with_capacity(task.sources.len());
        let mut failed_sources = Vec::new();

        // Keep going after a failure so every broken source gets reported
        for url in &task.sources {
            match self.fetcher.fetch(url).await {
                Ok(text) => texts.push(text),
                Err(e) => {
                    error!("[{}] {}", task.name, e);
                    failed_sources.push(FailedSource {
                        task: task.name.clone(),
                        url: url.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        if !failed_sources.is_empty() {
            warn!("[{}] Skipped, keeping previous rule files", task.name);
            return TaskReport::fetch_failed(&task.name, task.family, failed_sources);
        }

        let outcome = merge_sources(task, &texts);
        let stats = outcome.stats;
        info!(
            "[{}] {} rules ({} rejected, {} filtered, {} duplicates, {} widened)",
            task.name,
            format_count(stats.entries),
            stats.rejected,
            stats.filtered,
            stats.duplicates,
            stats.widened
        );
        if !stats.rejected_samples.is_empty() {
            debug!("[{}] rejected samples: {:?}", task.name, stats.rejected_samples);
        }

        let rendered = render(&outcome.table, &task.policy);

        let (status, files) = if self.dry_run {
            (TaskStatus::DryRun, Vec::new())
        } else {
            let files = self.write_outputs(task, &rendered);
            (status_for(&files), files)
        };

        TaskReport {
            name: task.name.clone(),
            family: task.family,
            status,
            stats: Some(stats),
            files,
            failed_sources: Vec::new(),
        }
    }

    /// Render paths and write all three dialects; one failure does not stop
    /// the others.
    fn write_outputs(&self, task: &TaskSpec, rendered: &RenderedOutput) -> Vec<FileReport> {
        let writer = IncrementalWriter::new(self.fs);

        Dialect::ALL
            .iter()
            .map(|&dialect| {
                let path = self.layout.path(dialect, task.family, &task.name);
                let result = writer.write(&path, rendered.lines(dialect));
                if let Err(e) = &result {
                    error!("[{}] Failed to write {:?}: {}", task.name, path, e);
                }
                FileReport::from_result(dialect, path, result)
            })
            .collect()
    }
}

fn status_for(files: &[FileReport]) -> TaskStatus {
    if files.iter().any(|f| f.error.is_some()) {
        TaskStatus::WriteFailed
    } else if files.iter().any(|f| f.outcome.is_some_and(|o| o.is_written())) {
        TaskStatus::Updated
    } else {
        TaskStatus::Unchanged
    }
}
