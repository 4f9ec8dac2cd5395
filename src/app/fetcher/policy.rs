//! Fetch policy
//!
//! The policy bundles where to fetch from and how hard to try. It is built
//! once from the fetcher settings and never changes during a fetch.

use std::time::Duration;

use url::Url;

use crate::errors::{ConfigError, ConfigResult};

/// Source URL and retry budget for one fetch operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPolicy {
    url: Url,
    max_retries: u32,
    retry_delay: Duration,
}

impl FetchPolicy {
    /// Create a policy, validating the URL
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if `url` does not parse or is not
    /// an http(s) URL
    pub fn new(url: &str, max_retries: u32, retry_delay: Duration) -> ConfigResult<Self> {
        let parsed = Url::parse(url).map_err(|e| ConfigError::InvalidUrl {
            url: url.to_string(),
            error: e.to_string(),
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                url: url.to_string(),
                error: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        Ok(Self::from_url(parsed, max_retries, retry_delay))
    }

    /// Create a policy from an already parsed URL
    pub fn from_url(url: Url, max_retries: u32, retry_delay: Duration) -> Self {
        Self {
            url,
            max_retries,
            retry_delay,
        }
    }

    /// Config server URL
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Retries allowed after the first attempt
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Wait between two attempts
    pub fn retry_delay(&self) -> Duration {
        self.retry_delay
    }

    /// Upper bound on attempts, first one included
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Upper bound on time spent waiting between attempts
    pub fn max_total_wait(&self) -> Duration {
        self.retry_delay.saturating_mul(self.max_retries)
    }
}
