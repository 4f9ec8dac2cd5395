//! Core application logic for the config fetcher
//!
//! This module contains the fetch-and-validate retry loop, the transport it
//! talks through, the configuration data model and its persistence.
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::time::Duration;
//! use config_fetcher::app::{output, ClientConfig, ConfigFetcher, FetchPolicy, HttpConfigSource};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let fetcher = ConfigFetcher::new(HttpConfigSource::new(&ClientConfig::default())?);
//! let policy = FetchPolicy::new("http://config.local/config/AC67DD", 3, Duration::from_secs(5))?;
//!
//! let config = fetcher.fetch(&policy, &CancellationToken::new()).await.into_result()?;
//! output::persist(&config, Path::new("/etc/data-collector/config.json")).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod fetcher;
pub mod models;
pub mod output;
pub mod signals;

// Re-export main public API
pub use client::{ClientConfig, ConfigSource, HttpConfigSource};
pub use fetcher::{ConfigFetcher, FetchOutcome, FetchPolicy, FetchReport, FetchState};
pub use models::Configuration;
pub use signals::SignalHandler;
