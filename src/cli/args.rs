//! Command-line argument parsing for the config fetcher
//!
//! This module defines the CLI structure using clap derive macros.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::SettingsOverrides;

/// Config fetcher - provision device configuration at boot
#[derive(Parser, Debug)]
#[command(
    name = "config-fetcher",
    version,
    about = "Fetch device configuration from a config server and persist it",
    long_about = "Fetches a JSON device configuration from a config server, retrying on unstable responses,
validates it and writes it to disk so a dependent process can start once valid configuration exists."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Quiet mode - only errors are reported
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch the configuration and write it to disk
    #[command(name = "retrieve-config", alias = "retrive_config")]
    RetrieveConfig(RetrieveArgs),

    /// Verify that a previously written configuration is valid
    Check(CheckArgs),
}

/// Arguments for the retrieve-config command
#[derive(Args, Debug, Clone, Default)]
pub struct RetrieveArgs {
    /// Path to the fetcher settings file (JSON, or TOML with a .toml extension)
    #[arg(short, long, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Config server URL
    #[arg(short = 'u', long = "url", alias = "url_path", value_name = "URL")]
    pub url_path: Option<String>,

    /// Where to write the fetched configuration
    #[arg(short = 'C', long, alias = "config_path", value_name = "FILE")]
    pub config_path: Option<PathBuf>,

    /// Number of retries after the first attempt
    #[arg(short, long, alias = "nr_retries")]
    pub nr_retries: Option<u32>,

    /// Seconds to wait between attempts
    #[arg(short = 't', long, aliases = ["time_wait", "time_out"], value_name = "SECS")]
    pub time_wait: Option<f64>,
}

/// Arguments for the check command
#[derive(Args, Debug, Clone, Default)]
pub struct CheckArgs {
    /// Path to the fetcher settings file
    #[arg(short, long, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Configuration file to verify
    #[arg(short = 'C', long, alias = "config_path", value_name = "FILE")]
    pub config_path: Option<PathBuf>,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the logging level based on global arguments
    pub fn log_level(&self) -> tracing::Level {
        if self.global.quiet {
            tracing::Level::ERROR
        } else if self.global.debug {
            tracing::Level::DEBUG
        } else if self.global.verbose {
            tracing::Level::INFO
        } else {
            tracing::Level::WARN
        }
    }
}

impl RetrieveArgs {
    /// Settings given directly on the command line
    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            url_path: self.url_path.clone(),
            nr_retries: self.nr_retries,
            time_wait: self.time_wait,
            config_path: self.config_path.clone(),
        }
    }
}

impl CheckArgs {
    /// Settings given directly on the command line
    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            config_path: self.config_path.clone(),
            ..Default::default()
        }
    }
}
