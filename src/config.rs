//! Configuration management for rulecast.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::rule::RuleFamily;
use crate::task::TaskSpec;
use crate::validation::{validate_policy, validate_source_url, validate_task_name};

/// Upper bound for concurrently processed tasks
const MAX_CONCURRENCY: usize = 32;

/// Upper bound for the base retry delay (10 minutes)
const MAX_RETRY_DELAY_MS: u64 = 10 * 60 * 1000;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root directory for generated rule files
    pub output_dir: PathBuf,

    /// File listing sources that failed to download
    pub failure_report: PathBuf,

    /// Number of tasks processed in parallel
    pub concurrency: usize,

    /// HTTP fetch settings
    pub fetch: FetchConfig,

    /// Rule sets to build, in order
    pub tasks: Vec<TaskEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("rules"),
            failure_report: PathBuf::from("error.txt"),
            concurrency: 4,
            fetch: FetchConfig::default(),
            tasks: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config = Self::from_yaml(&content)
            .with_context(|| format!("Invalid config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Parse and validate configuration from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Config =
            serde_yaml::from_str(content).context("Failed to parse config YAML")?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.tasks.is_empty() {
            anyhow::bail!("No tasks configured");
        }

        if self.concurrency == 0 || self.concurrency > MAX_CONCURRENCY {
            anyhow::bail!(
                "Invalid concurrency {}. Must be between 1 and {}",
                self.concurrency,
                MAX_CONCURRENCY
            );
        }

        self.fetch.validate()?;

        let mut names = HashSet::new();
        for task in &self.tasks {
            task.validate()?;
            if !names.insert(task.name.as_str()) {
                anyhow::bail!("Duplicate task name '{}'", task.name);
            }
        }

        Ok(())
    }

    /// Save configuration to YAML file atomically
    ///
    /// Uses tempfile + rename pattern to prevent corruption on crash.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let path = path.as_ref();
        let content = serde_yaml::to_string(self).with_context(|| "Failed to serialize config")?;

        let parent_dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let mut temp_file = NamedTempFile::new_in(parent_dir)
            .context("Failed to create temporary file for config")?;

        temp_file.write_all(content.as_bytes())?;
        temp_file.as_file().sync_all()?;

        temp_file
            .persist(path)
            .with_context(|| format!("Failed to persist config file: {:?}", path))?;

        Ok(())
    }

    /// Build task specs, optionally restricted to the given names.
    ///
    /// Unknown names are an error so that typos do not silently skip work.
    pub fn task_specs(&self, only: &[String]) -> Result<Vec<TaskSpec>> {
        for name in only {
            if !self.tasks.iter().any(|t| &t.name == name) {
                anyhow::bail!("Unknown task '{}'", name);
            }
        }

        Ok(self
            .tasks
            .iter()
            .filter(|t| only.is_empty() || only.contains(&t.name))
            .map(TaskEntry::to_spec)
            .collect())
    }

    /// Generate default config with comments
    pub fn generate_default_yaml() -> String {
        include_str!("../templates/rulecast.yaml").to_string()
    }
}

/// HTTP fetch settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Per-request timeout
    pub timeout_secs: u64,

    /// Total attempts per source (1 = no retry)
    pub max_attempts: u32,

    /// Base delay between attempts, doubled on each retry
    pub retry_delay_ms: u64,

    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Maximum accepted body size per source
    pub max_size_bytes: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            max_attempts: 2,
            retry_delay_ms: 1000,
            user_agent: format!("rulecast/{}", env!("CARGO_PKG_VERSION")),
            max_size_bytes: 10 * 1024 * 1024,
        }
    }
}

impl FetchConfig {
    fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            anyhow::bail!("fetch.timeout_secs must be greater than 0");
        }
        if self.max_attempts == 0 {
            anyhow::bail!("fetch.max_attempts must be at least 1");
        }
        if self.retry_delay_ms > MAX_RETRY_DELAY_MS {
            anyhow::bail!(
                "fetch.retry_delay_ms {} is too large (max: {})",
                self.retry_delay_ms,
                MAX_RETRY_DELAY_MS
            );
        }
        if self.max_size_bytes == 0 {
            anyhow::bail!("fetch.max_size_bytes must be greater than 0");
        }
        if self.user_agent.contains('\r') || self.user_agent.contains('\n') {
            anyhow::bail!("fetch.user_agent must not contain line breaks");
        }
        Ok(())
    }
}

/// One task record as written in the config file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskEntry {
    pub name: String,
    pub policy: String,
    #[serde(rename = "type")]
    pub family: RuleFamily,
    /// Required for domain tasks: there is no safe implicit default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
    pub url: SourceUrls,
}

impl TaskEntry {
    fn validate(&self) -> Result<()> {
        validate_task_name(&self.name)?;
        validate_policy(&self.policy)
            .with_context(|| format!("Task '{}' has an invalid policy", self.name))?;

        if self.family == RuleFamily::Domain && self.strict.is_none() {
            anyhow::bail!(
                "Task '{}' is a domain task and must set 'strict' explicitly \
                 (true: bare domains are exact matches, false: suffix matches)",
                self.name
            );
        }

        let urls = self.url.as_slice();
        if urls.is_empty() {
            anyhow::bail!("Task '{}' has no source URL", self.name);
        }
        for url in urls {
            validate_source_url(url)
                .with_context(|| format!("Task '{}' has an invalid source", self.name))?;
        }

        Ok(())
    }

    /// Convert into the immutable engine representation.
    pub fn to_spec(&self) -> TaskSpec {
        TaskSpec::new(
            self.name.clone(),
            self.policy.clone(),
            self.family,
            self.strict.unwrap_or(false),
            self.url.as_slice().to_vec(),
        )
    }
}

/// A single URL or an ordered list of URLs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum SourceUrls {
    One(String),
    Many(Vec<String>),
}

impl SourceUrls {
    pub fn as_slice(&self) -> &[String] {
        match self {
            SourceUrls::One(url) => std::slice::from_ref(url),
            SourceUrls::Many(urls) => urls,
        }
    }
}
