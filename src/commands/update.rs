//! Update command implementation.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::fetcher::HttpFetcher;
use crate::fs_abstraction::real_fs;
use crate::lock::LockGuard;
use crate::pipeline::{OutputLayout, Pipeline};
use crate::report::{clear_failure_report, write_failure_report};

/// Run the update command
pub async fn run(only: &[String], dry_run: bool, json: bool, config_path: &Path) -> Result<()> {
    let config = Config::load(config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;
    let tasks = config.task_specs(only)?;

    if dry_run {
        info!("Dry-run mode: no file will be written");
    }

    // Held until the end of the run
    let _lock = if dry_run {
        None
    } else {
        Some(LockGuard::acquire(&config.output_dir)?)
    };

    let fs = real_fs();
    if !dry_run {
        clear_failure_report(fs, &config.failure_report).with_context(|| {
            format!(
                "Failed to remove previous failure report {:?}",
                config.failure_report
            )
        })?;
    }

    let fetcher = HttpFetcher::new(&config.fetch)?;
    let pipeline = Pipeline::new(&fetcher, fs, OutputLayout::new(&config.output_dir))
        .with_concurrency(config.concurrency)
        .with_dry_run(dry_run);

    let report = pipeline.run(&tasks).await;

    if !dry_run {
        if let Err(e) = write_failure_report(fs, &config.failure_report, &report) {
            error!(
                "Failed to write failure report {:?}: {}",
                config.failure_report, e
            );
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!();
        print!("{}", report.summary());
        println!();
    }

    let failed = report.failures().count();
    if failed > 0 {
        warn!("Previous rule files were kept for tasks with failed sources");
        anyhow::bail!("{} source(s) could not be retrieved", failed);
    }
    if report.has_write_errors() {
        anyhow::bail!("Some rule files could not be written");
    }

    info!(
        "Update complete: {} file(s) written",
        report.files_written()
    );
    Ok(())
}
