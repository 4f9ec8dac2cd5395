//! Settings for the config fetcher
//!
//! The fetcher's own settings (where to fetch from, how often to retry, where
//! to write the result) come from a small settings file, optionally overridden
//! on the command line. These are distinct from the device configuration the
//! fetcher downloads.
//!
//! Precedence, lowest first:
//! 1. Built-in defaults
//! 2. Settings file (explicit `--settings`, or the first existing search path)
//! 3. Command-line overrides

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::app::FetchPolicy;
use crate::constants::{defaults, settings};
use crate::errors::{ConfigError, ConfigResult};

/// Settings file as written on disk
///
/// Every key is optional; missing keys fall back to defaults. Unknown keys are
/// rejected so that typos fail at boot instead of being silently ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsFile {
    /// Config server URL
    pub url_path: Option<String>,
    /// Retries after the first attempt
    pub nr_retries: Option<u32>,
    /// Seconds to wait between attempts
    pub time_wait: Option<f64>,
    /// Where the fetched configuration is written
    pub config_path: Option<PathBuf>,
}

/// Command-line overrides for individual settings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsOverrides {
    pub url_path: Option<String>,
    pub nr_retries: Option<u32>,
    pub time_wait: Option<f64>,
    pub config_path: Option<PathBuf>,
}

/// Fully resolved settings
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Config server URL
    pub url_path: String,
    /// Retries after the first attempt
    pub nr_retries: u32,
    /// Wait between attempts
    pub time_wait: Duration,
    /// Where the fetched configuration is written
    pub config_path: PathBuf,
    /// Settings file the values came from, if any
    pub source: Option<PathBuf>,
}

impl SettingsFile {
    /// Load a settings file
    ///
    /// Files ending in `.toml` are parsed as TOML, anything else as JSON.
    pub async fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let content =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| ConfigError::Unreadable {
                    path: path.to_path_buf(),
                    source,
                })?;

        let file = Self::parse(path, &content)?;
        info!("Loaded settings from: {}", path.display());
        Ok(file)
    }

    /// Parse settings content, choosing the format from the path's extension
    pub fn parse(path: &Path, content: &str) -> ConfigResult<Self> {
        let is_toml = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("toml"))
            .unwrap_or(false);

        if is_toml {
            toml::from_str(content).map_err(|source| ConfigError::InvalidToml {
                path: path.to_path_buf(),
                source,
            })
        } else {
            serde_json::from_str(content).map_err(|source| ConfigError::InvalidJson {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    /// Find a settings file in the standard locations
    pub fn find() -> Option<PathBuf> {
        Self::find_in(settings::SEARCH_PATHS.iter().map(PathBuf::from))
    }

    fn find_in(candidates: impl IntoIterator<Item = PathBuf>) -> Option<PathBuf> {
        for path in candidates {
            if path.is_file() {
                debug!("Found settings file: {}", path.display());
                return Some(path);
            }
        }

        debug!("No settings file found in standard locations");
        None
    }
}

impl Settings {
    /// Load settings with file lookup and command-line overrides
    ///
    /// An explicitly given settings file must exist. Without one, the standard
    /// locations are searched and defaults are used if none exists.
    pub async fn load(
        settings_path: Option<&Path>,
        overrides: &SettingsOverrides,
    ) -> ConfigResult<Self> {
        let path = match settings_path {
            Some(path) => Some(path.to_path_buf()),
            None => SettingsFile::find(),
        };

        let file = match &path {
            Some(path) => SettingsFile::load(path).await?,
            None => SettingsFile::default(),
        };

        let settings = Self::resolve(file, overrides, path)?;
        debug!("Resolved settings: {:?}", settings);
        Ok(settings)
    }

    /// Merge a settings file with overrides and validate the result
    pub fn resolve(
        file: SettingsFile,
        overrides: &SettingsOverrides,
        source: Option<PathBuf>,
    ) -> ConfigResult<Self> {
        let url_path = overrides
            .url_path
            .clone()
            .or(file.url_path)
            .unwrap_or_else(|| defaults::URL.to_string());

        let nr_retries = overrides
            .nr_retries
            .or(file.nr_retries)
            .unwrap_or(defaults::NR_RETRIES);

        let wait_secs = overrides
            .time_wait
            .or(file.time_wait)
            .unwrap_or(defaults::TIME_WAIT_SECS);
        let time_wait = parse_wait(wait_secs)?;

        let config_path = overrides
            .config_path
            .clone()
            .or(file.config_path)
            .ok_or_else(|| ConfigError::MissingField {
                field: "config_path".to_string(),
            })?;
        if config_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "config_path".to_string(),
                value: String::new(),
                reason: "Output path must not be empty".to_string(),
            });
        }

        Ok(Self {
            url_path,
            nr_retries,
            time_wait,
            config_path,
            source,
        })
    }

    /// Build the fetch policy described by these settings
    pub fn policy(&self) -> ConfigResult<FetchPolicy> {
        FetchPolicy::new(&self.url_path, self.nr_retries, self.time_wait)
    }
}

fn parse_wait(secs: f64) -> ConfigResult<Duration> {
    if secs < 0.0 {
        return Err(ConfigError::InvalidValue {
            field: "time_wait".to_string(),
            value: secs.to_string(),
            reason: "Wait must not be negative".to_string(),
        });
    }

    Duration::try_from_secs_f64(secs).map_err(|e| ConfigError::InvalidValue {
        field: "time_wait".to_string(),
        value: secs.to_string(),
        reason: e.to_string(),
    })
}
