//! The fetch-and-validate retry loop
//!
//! Each attempt requests the document once and classifies the result:
//! transport failures and incomplete documents are retried after a fixed
//! delay until the retry budget is spent; a body that is not JSON ends the
//! fetch immediately. Cancellation ends the fetch at once, whether it lands
//! during a request or during a retry wait.

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::app::client::ConfigSource;
use crate::app::fetcher::policy::FetchPolicy;
use crate::app::fetcher::types::{FetchOutcome, FetchReport, FetchState};
use crate::app::models::Configuration;

/// Retryable failure of a single attempt
#[derive(Debug)]
enum AttemptFailure {
    Transport(String),
    Validation(String),
}

impl AttemptFailure {
    fn into_exhausted(self) -> FetchOutcome {
        match self {
            AttemptFailure::Transport(last_error) => {
                FetchOutcome::TransportExhausted { last_error }
            }
            AttemptFailure::Validation(last_error) => {
                FetchOutcome::ValidationExhausted { last_error }
            }
        }
    }

    fn describe(&self) -> &str {
        match self {
            AttemptFailure::Transport(e) | AttemptFailure::Validation(e) => e,
        }
    }
}

/// Fetches and validates configuration documents from a [`ConfigSource`]
#[derive(Debug)]
pub struct ConfigFetcher<S> {
    source: S,
}

impl<S: ConfigSource> ConfigFetcher<S> {
    /// Create a fetcher on top of the given source
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Underlying source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Run the retry loop until a terminal state is reached
    ///
    /// Makes at most `policy.max_attempts()` requests, strictly one after the
    /// other. The token is raced against every request and every retry wait,
    /// and a cancelled token wins over whatever the interrupted attempt
    /// returned.
    pub async fn fetch(&self, policy: &FetchPolicy, cancel: &CancellationToken) -> FetchReport {
        let mut attempts_remaining = policy.max_retries();
        let mut attempts: u32 = 0;

        loop {
            if cancel.is_cancelled() {
                return finish(FetchOutcome::Cancelled, attempts);
            }

            attempts = attempts.saturating_add(1);
            debug!(
                "Attempt {}/{} against {}",
                attempts,
                policy.max_attempts(),
                policy.url()
            );

            let response = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                response = self.source.fetch_document(policy.url()) => Some(response),
            };
            let response = match response {
                Some(response) if !cancel.is_cancelled() => response,
                _ => {
                    info!("Fetch interrupted during attempt {}", attempts);
                    return finish(FetchOutcome::Cancelled, attempts);
                }
            };

            let failure = match response {
                Ok(document) => match Configuration::from_value(document) {
                    Ok(config) => {
                        info!(
                            "Fetched configuration for device '{}' on attempt {}",
                            config.id, attempts
                        );
                        return finish(FetchOutcome::Succeeded(config), attempts);
                    }
                    Err(shape) => AttemptFailure::Validation(shape.to_string()),
                },
                Err(e) if e.is_retryable() => AttemptFailure::Transport(e.to_string()),
                Err(e) => {
                    error!("Malformed response from {}: {}", policy.url(), e);
                    let reason = e.to_string();
                    return finish(FetchOutcome::MalformedResponse { reason }, attempts);
                }
            };

            if attempts_remaining < 1 {
                error!(
                    "Giving up after {} attempts: {}",
                    attempts,
                    failure.describe()
                );
                return finish(failure.into_exhausted(), attempts);
            }
            attempts_remaining -= 1;

            warn!(
                "Attempt {} failed: {}. Retrying in {}ms ({} retries left)",
                attempts,
                failure.describe(),
                policy.retry_delay().as_millis(),
                attempts_remaining
            );

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!("Fetch interrupted while waiting to retry");
                    return finish(FetchOutcome::Cancelled, attempts);
                }
                _ = tokio::time::sleep(policy.retry_delay()) => {}
            }
        }
    }
}

fn finish(outcome: FetchOutcome, attempts: u32) -> FetchReport {
    debug!("{} -> {}", FetchState::Attempting, outcome.state());
    FetchReport { outcome, attempts }
}
