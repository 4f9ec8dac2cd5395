//! Config Fetcher CLI application
//!
//! Fetches device configuration at boot and writes it to disk. Exit status is
//! 0 when a valid configuration was written (or verified), 1 on any terminal
//! failure and 130 when interrupted.

use std::process;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use config_fetcher::app::SignalHandler;
use config_fetcher::cli::{handle_check, handle_retrieve, Cli, Commands};
use config_fetcher::constants::exit;
use config_fetcher::errors::Result;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize logging based on verbosity
    init_logging(&cli);

    info!("Config Fetcher v{} starting", env!("CARGO_PKG_VERSION"));

    let quiet = cli.global.quiet;
    let code = match run(cli).await {
        Ok(message) => {
            if !quiet {
                println!("{}", message);
            }
            exit::SUCCESS
        }
        Err(e) => {
            error!("{} error: {}", e.category(), e);
            if e.is_recoverable() {
                warn!("A later run may succeed once the config server recovers");
            }
            println!("ERROR: {}", e);
            if e.is_cancelled() {
                exit::INTERRUPTED
            } else {
                exit::FAILURE
            }
        }
    };

    process::exit(code);
}

/// Main application logic
async fn run(cli: Cli) -> Result<String> {
    let signals = SignalHandler::new(CancellationToken::new());
    let _listener = signals.setup();

    match cli.command {
        Commands::RetrieveConfig(args) => {
            info!("Executing retrieve-config command");
            let config = handle_retrieve(args, signals.token()).await?;
            Ok(format!("Configuration for device '{}' written", config.id))
        }
        Commands::Check(args) => {
            info!("Executing check command");
            let config = handle_check(args).await?;
            Ok(format!("Configuration for device '{}' is valid", config.id))
        }
    }
}

/// Initialize logging based on CLI verbosity settings
fn init_logging(cli: &Cli) {
    let log_level = cli.log_level();

    // RUST_LOG wins over the flags when it is set
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("config_fetcher={}", log_level)));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(cli.global.debug)
        .with_writer(std::io::stderr)
        .init();

    if cli.global.debug {
        info!("Debug logging enabled");
    }
}
