//! Application constants for the config fetcher
//!
//! This module centralizes all constants used throughout the application,
//! organized by functional domain.

use std::time::Duration;

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Default user agent for all HTTP requests
    pub const USER_AGENT: &str = concat!("config-fetcher/", env!("CARGO_PKG_VERSION"));

    /// Default whole-request timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
}

/// Defaults for the fetcher settings
pub mod defaults {
    /// Config server used when none is configured
    pub const URL: &str = "http://82.165.112.45:4710/config/AC67DD";

    /// Retries after the first attempt
    pub const NR_RETRIES: u32 = 10;

    /// Seconds to wait between attempts
    pub const TIME_WAIT_SECS: f64 = 10.0;
}

/// Settings file lookup
pub mod settings {
    /// Locations searched when no settings file is given, in order
    pub const SEARCH_PATHS: &[&str] = &[
        "./config-fetcher.json",
        "/etc/config-fetcher/settings.json",
    ];
}

/// Fetched configuration layout
pub mod keys {
    /// Device identifier
    pub const ID: &str = "id";

    /// URL polled by the data-collector
    pub const ENDPOINT: &str = "endpoint";

    /// Polling interval in seconds
    pub const INTERVAL: &str = "interval";

    /// Keys every configuration must carry
    pub const REQUIRED: [&str; 3] = [ID, ENDPOINT, INTERVAL];
}

/// Output file handling
pub mod files {
    /// Suffix appended to the output path while it is being written
    pub const TEMP_FILE_SUFFIX: &str = ".tmp";

    /// Indentation of the persisted JSON document
    pub const JSON_INDENT: &[u8] = b"    ";
}

/// Process exit codes
pub mod exit {
    /// Configuration fetched and persisted
    pub const SUCCESS: i32 = 0;

    /// Any terminal failure
    pub const FAILURE: i32 = 1;

    /// Interrupted by a signal
    pub const INTERRUPTED: i32 = 130;
}
