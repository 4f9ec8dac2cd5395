//! Prelude module for the config fetcher library
//!
//! Re-exports the items needed for typical embedding with a single
//! `use config_fetcher::prelude::*;` statement.
//!
//! # Usage
//!
//! ```rust,no_run
//! use config_fetcher::prelude::*;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<()> {
//!     let settings = Settings::load(None, &SettingsOverrides::default()).await?;
//!     let fetcher = ConfigFetcher::new(HttpConfigSource::new(&ClientConfig::default())?);
//!     let config = retrieve(&fetcher, &settings, &CancellationToken::new()).await?;
//!     println!("device {} ready", config.id);
//!     Ok(())
//! }
//! ```

// Core result types
pub use crate::errors::{AppError, FetchFailure, Result};

// Fetching and persistence
pub use crate::app::{
    output, ClientConfig, ConfigFetcher, ConfigSource, Configuration, FetchOutcome, FetchPolicy,
    FetchReport, HttpConfigSource, SignalHandler,
};
pub use crate::cli::retrieve;
pub use crate::config::{Settings, SettingsOverrides};

pub use tokio_util::sync::CancellationToken;
