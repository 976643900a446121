//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rulecast")]
#[command(author, version, about = "Normalize and merge proxy rule lists")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "rulecast.yaml", global = true)]
    pub config: PathBuf,

    /// Quiet mode (for cron/CI jobs)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug output)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch every source, merge and write the rule files
    Update {
        /// Only run these tasks (repeatable, default: all)
        #[arg(short, long = "task", value_name = "NAME")]
        task: Vec<String>,

        /// Fetch and merge but don't write any file
        #[arg(long)]
        dry_run: bool,

        /// Print the run report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show how a single line would be cleaned, classified and rendered
    Check {
        /// Raw source line
        line: String,

        /// Read bare domains as exact matches
        #[arg(long)]
        strict: bool,

        /// Policy label used for the qualified dialect
        #[arg(long, default_value = "Proxy")]
        policy: String,
    },

    /// List configured tasks
    Tasks {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Validate the config file without fetching anything
    Validate,

    /// Write a commented default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show version
    Version,
}
