//! Error types for rulecast.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RulecastError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Response from {url} too large: {size} bytes (max: {max} bytes)")]
    TooLarge { url: String, size: u64, max: u64 },

    #[error("Another update is already running (lock: {0})")]
    Locked(String),
}

impl RulecastError {
    /// Source address this error relates to, if any.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Fetch { url, .. } | Self::TooLarge { url, .. } => Some(url),
            _ => None,
        }
    }
}
