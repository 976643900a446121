//! HTTP fetcher for downloading rule list sources.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::FetchConfig;
use crate::error::RulecastError;

/// Anything that can turn a source address into its text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    /// Fetch the full text of one source.
    async fn fetch(&self, url: &str) -> Result<String, RulecastError>;
}

/// HTTP client for fetching rule lists
pub struct HttpFetcher {
    client: Client,
    max_attempts: u32,
    retry_delay: Duration,
    max_size: u64,
}

impl HttpFetcher {
    /// Create a new fetcher from configuration
    pub fn new(config: &FetchConfig) -> Result<Self, RulecastError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| RulecastError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            max_attempts: config.max_attempts.max(1),
            retry_delay: Duration::from_millis(config.retry_delay_ms),
            max_size: config.max_size_bytes,
        })
    }

    /// Single attempt with size validation
    async fn fetch_once(&self, url: &str) -> Result<String, RulecastError> {
        let fetch_err = |reason: String| RulecastError::Fetch {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| fetch_err(e.to_string()))?;

        if !response.status().is_success() {
            return Err(fetch_err(format!("HTTP {}", response.status())));
        }

        if let Some(content_length) = response.content_length() {
            if content_length > self.max_size {
                return Err(RulecastError::TooLarge {
                    url: url.to_string(),
                    size: content_length,
                    max: self.max_size,
                });
            }
        }

        let body = response
            .text()
            .await
            .map_err(|e| fetch_err(format!("Failed to read response body: {}", e)))?;

        // Content-Length may be missing or wrong
        if body.len() as u64 > self.max_size {
            return Err(RulecastError::TooLarge {
                url: url.to_string(),
                size: body.len() as u64,
                max: self.max_size,
            });
        }

        Ok(body)
    }
}

#[async_trait]
impl SourceFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, RulecastError> {
        info!("Fetching {}", url);
        let mut last_error = None;

        for attempt in 0..self.max_attempts {
            if attempt > 0 {
                let delay = backoff_delay(self.retry_delay, attempt);
                debug!("Retry {} after {:?} for {}", attempt, delay, url);
                tokio::time::sleep(delay).await;
            }

            match self.fetch_once(url).await {
                Ok(body) => {
                    debug!("Fetched {} ({} bytes)", url, body.len());
                    return Ok(body);
                }
                // Retrying will not make the body smaller
                Err(e @ RulecastError::TooLarge { .. }) => return Err(e),
                Err(e) => last_error = Some(e),
            }
        }

        Err(last_error.unwrap_or_else(|| RulecastError::Fetch {
            url: url.to_string(),
            reason: "no attempt made".to_string(),
        }))
    }
}

/// Delay before retry number `attempt` (1-based): `base * 2^(attempt-1)`,
/// saturating instead of overflowing.
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(1u32 << attempt.saturating_sub(1).min(16))
}
