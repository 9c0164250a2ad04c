//! Bounded retries with exponential backoff
//!
//! | Attempt fails | Delay before next attempt                  |
//! |---------------|--------------------------------------------|
//! | 1st           | min(max, base * 2^0) * jitter              |
//! | 2nd           | min(max, base * 2^1) * jitter              |
//! | ...           | ...                                        |
//! | last          | none, the error is returned                |
//!
//! Jitter is drawn uniformly from [0.5, 1.0) for every delay.

use super::fetcher::PageFetcher;
use crate::config::RetryConfig;
use crate::{Result, SumiError};
use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;
use url::Url;

/// Retry parameters for a fetch session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: Duration::from_millis(config.base_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
        }
    }
}

impl RetryPolicy {
    /// Upper bound of the delay after the given zero-based failed attempt
    pub fn ceiling(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// Jittered delay after the given zero-based failed attempt
    pub fn delay(&self, attempt: u32) -> Duration {
        let jitter = rand::rng().random_range(0.5..1.0);
        self.ceiling(attempt).mul_f64(jitter)
    }
}

/// Wraps a fetcher with the retry policy
#[derive(Debug, Clone)]
pub struct RetryingFetcher<F> {
    inner: F,
    policy: RetryPolicy,
}

impl<F: PageFetcher> RetryingFetcher<F> {
    pub fn new(inner: F, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

#[async_trait]
impl<F: PageFetcher> PageFetcher for RetryingFetcher<F> {
    /// Fetches with retries, failing with [`SumiError::Fetch`] once every
    /// attempt has failed
    async fn fetch(&self, url: &Url) -> Result<String> {
        let max_attempts = self.policy.max_attempts;
        let mut attempt = 0;

        loop {
            match self.inner.fetch(url).await {
                Ok(markup) => {
                    if attempt > 0 {
                        tracing::debug!("Fetched {} on attempt {}", url, attempt + 1);
                    }
                    return Ok(markup);
                }
                Err(e) if attempt + 1 >= max_attempts => {
                    tracing::warn!("Giving up on {} after {} attempts: {}", url, max_attempts, e);
                    return Err(SumiError::Fetch {
                        url: url.to_string(),
                        attempts: max_attempts,
                        cause: e.to_string(),
                    });
                }
                Err(e) => {
                    let delay = self.policy.delay(attempt);
                    tracing::warn!(
                        "Attempt {}/{} for {} failed: {}; retrying in {:?}",
                        attempt + 1,
                        max_attempts,
                        url,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
