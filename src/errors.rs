//! Error types for the config fetcher
//!
//! Errors are grouped by concern: the fetcher's own settings file, the
//! transport used to reach the config server, terminal fetch outcomes and
//! persistence of the fetched configuration. `AppError` wraps all of them
//! for the CLI layer.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading the fetcher's own settings
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Settings file not found
    #[error("Settings file not found: {path}")]
    NotFound { path: PathBuf },

    /// Settings file exists but could not be read
    #[error("Failed to read settings file {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings file is not valid JSON or has the wrong shape
    #[error("Invalid settings file {path}: {source}")]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Settings file is not valid TOML or has the wrong shape
    #[error("Invalid settings file {path}: {source}")]
    InvalidToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Missing required setting
    #[error("Missing required setting: {field}")]
    MissingField { field: String },

    /// Invalid setting value
    #[error("Invalid value for {field}: {value}. {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// Invalid config server URL
    #[error("Invalid URL: {url} - {error}")]
    InvalidUrl { url: String, error: String },
}

/// A decoded document that is not a usable configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    /// Document is JSON but not an object
    #[error("Expected a JSON object, got {found}")]
    NotAnObject { found: String },

    /// Document is an empty object
    #[error("Configuration is empty")]
    Empty,

    /// One or more required keys are absent
    #[error("Missing required keys: {}", .keys.join(", "))]
    MissingKeys { keys: Vec<String> },

    /// Required key present with the wrong type
    #[error("Invalid value for '{key}': expected {expected}")]
    InvalidType { key: String, expected: String },
}

/// Failure of a single request against the config server
#[derive(Error, Debug)]
pub enum SourceError {
    /// Connection refused, DNS failure, timeout and friends
    #[error("HTTP request failed: {0}")]
    Transport(String),

    /// Server answered with a non-success status
    #[error("Server error: HTTP {status}")]
    Status { status: u16 },

    /// Body could not be decoded as JSON
    #[error("Response body is not valid JSON: {0}")]
    Decode(String),
}

impl SourceError {
    /// Check whether another attempt may succeed
    pub fn is_retryable(&self) -> bool {
        !matches!(self, SourceError::Decode(_))
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => SourceError::Status {
                status: status.as_u16(),
            },
            None => SourceError::Transport(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Decode(err.to_string())
    }
}

/// Terminal failure of a fetch operation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    /// Transport kept failing beyond the retry budget
    #[error("Config server unreachable after {attempts} attempts: {last_error}")]
    TransportExhausted { attempts: u32, last_error: String },

    /// Server kept returning incomplete configuration beyond the retry budget
    #[error("Config server returned incomplete configuration after {attempts} attempts: {last_error}")]
    ValidationExhausted { attempts: u32, last_error: String },

    /// Server returned a body that is not JSON
    #[error("Config server returned a malformed response: {reason}")]
    MalformedResponse { reason: String },

    /// Fetch interrupted before completion
    #[error("Fetch interrupted after {attempts} attempts")]
    Cancelled { attempts: u32 },
}

/// Errors raised while persisting or reading back the fetched configuration
#[derive(Error, Debug)]
pub enum OutputError {
    /// Serialization of the configuration failed
    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] serde_json::Error),

    /// I/O error while writing the output file
    #[error("Failed to write configuration to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Atomic rename of the temporary file failed
    #[error("Atomic file operation failed: could not rename {temp_path} to {final_path}")]
    AtomicOperationFailed {
        temp_path: PathBuf,
        final_path: PathBuf,
    },

    /// Persisted configuration could not be read
    #[error("Failed to read configuration from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Persisted configuration is not valid
    #[error("Persisted configuration {path} is invalid: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Settings error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Transport setup error
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Terminal fetch failure
    #[error(transparent)]
    Fetch(#[from] FetchFailure),

    /// Output error
    #[error(transparent)]
    Output(#[from] OutputError),
}

impl AppError {
    /// Check if the error is recoverable (a later invocation may succeed)
    pub fn is_recoverable(&self) -> bool {
        match self {
            AppError::Fetch(FetchFailure::TransportExhausted { .. })
            | AppError::Fetch(FetchFailure::ValidationExhausted { .. })
            | AppError::Output(OutputError::Write { .. }) => true,

            AppError::Fetch(FetchFailure::MalformedResponse { .. })
            | AppError::Fetch(FetchFailure::Cancelled { .. })
            | AppError::Config(_) => false,

            _ => false,
        }
    }

    /// Check if the error was caused by an interruption
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AppError::Fetch(FetchFailure::Cancelled { .. }))
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Config(_) => "config",
            AppError::Fetch(FetchFailure::TransportExhausted { .. }) => "transport",
            AppError::Fetch(FetchFailure::ValidationExhausted { .. }) => "validation",
            AppError::Fetch(FetchFailure::MalformedResponse { .. }) => "malformed",
            AppError::Fetch(FetchFailure::Cancelled { .. }) => "cancelled",
            AppError::Source(_) => "transport",
            AppError::Output(_) => "output",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Settings result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Transport result type alias
pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// Output result type alias
pub type OutputResult<T> = std::result::Result<T, OutputError>;
