//! Config Fetcher Library
//!
//! Fetches a device configuration document from a config server at boot,
//! retrying while the server is unstable, validates the required keys and
//! persists the result for a dependent process.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod prelude;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};
