//! Command-line interface components
//!
//! This module contains CLI-specific code for the config fetcher: argument
//! parsing and the command handlers.

pub mod args;
pub mod commands;

pub use args::{CheckArgs, Cli, Commands, GlobalArgs, RetrieveArgs};
pub use commands::{check, handle_check, handle_retrieve, retrieve};
