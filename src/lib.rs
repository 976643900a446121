//! # rulecast - Rule List Normalizer and Merger
//!
//! Fetches public proxy rule lists written in many community dialects
//! (AdGuard, Clash, Surge, Quantumult X, SmartDNS, plain hosts), reduces
//! every line to a small closed vocabulary, merges the sources of a task
//! with specificity-aware deduplication and writes the result in three
//! output dialects.
//!
//! ## Features
//!
//! - **Order preserving** - The position of a rule is its precedence; merges never reorder
//! - **Specificity aware** - A suffix rule supersedes the exact rule for the same domain
//! - **Incremental** - Files are only rewritten when their SHA-256 digest changes
//! - **Failure isolated** - A task with a broken source keeps its previous files
//! - **Atomic** - Rule files are replaced in one step, never half written
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        rulecast                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  CLI (clap)                                                 │
//! │    └── Commands: update, check, tasks, validate, init      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Config (serde_yaml)                                        │
//! │    └── Ordered task list -> TaskSpec                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Pipeline (tokio + futures)                                 │
//! │    ├── Fetcher (reqwest + rustls, SourceFetcher trait)      │
//! │    ├── Cleaner -> Classifier -> Merger (RuleTable)          │
//! │    └── Formatter: qualified, classic, bare                  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Writer (sha2, FileSystem trait)                            │
//! │    └── <output>/<dialect>/<family>/<task>.list              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Report                                                     │
//! │    └── Run summary, JSON report, failed source list         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```
//! use rulecast::formatter::render;
//! use rulecast::merger::merge_sources;
//! use rulecast::rule::RuleFamily;
//! use rulecast::task::TaskSpec;
//!
//! let task = TaskSpec::new("ads", "Reject", RuleFamily::Domain, true, vec![]);
//! let first = "||ads.example.com^\nexample.org";
//! let second = "DOMAIN-SUFFIX,example.org";
//!
//! let outcome = merge_sources(&task, &[first, second]);
//! let output = render(&outcome.table, &task.policy);
//!
//! assert_eq!(output.bare, vec!["ads.example.com", "+.example.org"]);
//! assert_eq!(outcome.stats.widened, 1);
//! ```
//!
//! ## Modules
//!
//! - [`classifier`] - Map a cleaned line onto the rule vocabulary
//! - [`cleaner`] - Strip comments, list markers and quotes
//! - [`cli`] - Command-line interface definitions
//! - [`commands`] - CLI command implementations
//! - [`config`] - Configuration parsing and validation
//! - [`error`] - Error types
//! - [`fetcher`] - HTTP client for downloading sources
//! - [`formatter`] - Render merged rules into output dialects
//! - [`fs_abstraction`] - Filesystem trait for testability
//! - [`lock`] - File locking for concurrent execution prevention
//! - [`merger`] - Order preserving multi-source merge
//! - [`pipeline`] - Task orchestration
//! - [`report`] - Run reports and the failure report file
//! - [`rule`] - Rule vocabulary
//! - [`task`] - Task description
//! - [`utils`] - Common utility functions (formatting, truncation)
//! - [`validation`] - Input validation for config values
//! - [`writer`] - Content-hash gated file writes

pub mod classifier;
pub mod cleaner;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod formatter;
pub mod fs_abstraction;
pub mod lock;
pub mod merger;
pub mod pipeline;
pub mod report;
pub mod rule;
pub mod task;
pub mod utils;
pub mod validation;
pub mod writer;

pub use cli::{Cli, Commands};
pub use config::Config;
pub use error::RulecastError;
