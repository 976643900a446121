//! Validate command implementation.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::config::Config;

/// Run the validate command
pub fn run(config_path: &Path) -> Result<()> {
    let config = Config::load(config_path)
        .with_context(|| format!("Configuration {:?} is invalid", config_path))?;

    let sources: usize = config.tasks.iter().map(|t| t.url.as_slice().len()).sum();
    info!(
        "Configuration {:?} is valid: {} task(s), {} source(s)",
        config_path,
        config.tasks.len(),
        sources
    );
    println!("OK");
    Ok(())
}
