//! Init command implementation.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::config::Config;
use crate::fs_abstraction::{real_fs, FileSystem};

/// Run the init command
pub fn run(config_path: &Path, force: bool) -> Result<()> {
    write_default_config(real_fs(), config_path, force)?;
    info!("Wrote default configuration to {:?}", config_path);
    Ok(())
}

fn write_default_config<F: FileSystem + ?Sized>(fs: &F, path: &Path, force: bool) -> Result<()> {
    if fs.exists(path) && !force {
        anyhow::bail!(
            "{:?} already exists. Use --force to overwrite it",
            path
        );
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !fs.exists(parent) {
            fs.create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }
    }

    fs.write_atomic(path, Config::generate_default_yaml().as_bytes())
        .with_context(|| format!("Failed to write {:?}", path))?;
    Ok(())
}
