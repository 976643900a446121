//! rulecast - normalize and merge proxy rule lists
//!
//! Turns heterogeneous public rule lists into deduplicated, ordered rule
//! files for several proxy clients.

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use rulecast::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let log_level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Update {
            task,
            dry_run,
            json,
        } => rulecast::commands::update::run(&task, dry_run, json, &cli.config).await,
        Commands::Check {
            line,
            strict,
            policy,
        } => rulecast::commands::check::run(&line, strict, &policy),
        Commands::Tasks { json } => rulecast::commands::tasks::run(&cli.config, json),
        Commands::Validate => rulecast::commands::validate::run(&cli.config),
        Commands::Init { force } => rulecast::commands::init::run(&cli.config, force),
        Commands::Version => {
            println!("rulecast {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
