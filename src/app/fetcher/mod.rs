//! Configuration fetcher
//!
//! Obtains a validated [`Configuration`](crate::app::models::Configuration)
//! from the config server within a bounded number of attempts.
//!
//! # Module Organization
//!
//! - [`policy`] - Source URL and retry budget
//! - [`types`] - Outcome, report and state machine types
//! - [`core`] - The retry loop itself
//!
//! # Basic Usage
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use config_fetcher::app::{ClientConfig, ConfigFetcher, FetchPolicy, HttpConfigSource};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let source = HttpConfigSource::new(&ClientConfig::default())?;
//! let fetcher = ConfigFetcher::new(source);
//! let policy = FetchPolicy::new("http://config.local/config/AC67DD", 10, Duration::from_secs(10))?;
//!
//! let report = fetcher.fetch(&policy, &CancellationToken::new()).await;
//! let config = report.into_result()?;
//! println!("device {} polls {} every {}s", config.id, config.endpoint, config.interval);
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod policy;
pub mod types;

#[cfg(test)]
mod tests;

pub use self::core::ConfigFetcher;
pub use policy::FetchPolicy;
pub use types::{FetchOutcome, FetchReport, FetchState};
