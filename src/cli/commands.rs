//! Command handlers for the config fetcher CLI
//!
//! This module connects parsed arguments to settings loading, the fetch loop
//! and persistence. Handlers return errors; exit codes are decided in `main`.

use std::path::Path;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::app::{
    output, ClientConfig, ConfigFetcher, ConfigSource, Configuration, HttpConfigSource,
};
use crate::cli::{CheckArgs, RetrieveArgs};
use crate::config::Settings;
use crate::errors::{FetchFailure, Result};

/// Handle the retrieve-config command
///
/// Loads settings, fetches the configuration over HTTP and writes it to the
/// configured output path. Settings problems surface before any network
/// activity.
pub async fn handle_retrieve(
    args: RetrieveArgs,
    cancel: CancellationToken,
) -> Result<Configuration> {
    let settings = Settings::load(args.settings.as_deref(), &args.overrides()).await?;
    let source = HttpConfigSource::new(&ClientConfig::default())?;
    let fetcher = ConfigFetcher::new(source);

    retrieve(&fetcher, &settings, &cancel).await
}

/// Fetch with the given fetcher and persist the result
pub async fn retrieve<S: ConfigSource>(
    fetcher: &ConfigFetcher<S>,
    settings: &Settings,
    cancel: &CancellationToken,
) -> Result<Configuration> {
    let policy = settings.policy()?;
    info!(
        "Fetching configuration from {} (retries: {}, wait: {:?})",
        policy.url(),
        policy.max_retries(),
        policy.retry_delay()
    );

    let report = fetcher.fetch(&policy, cancel).await;
    debug!(
        "Fetch finished in state '{}' after {} attempts",
        report.outcome.state(),
        report.attempts
    );
    let attempts = report.attempts;
    let config = report.into_result()?;

    // A signal after the last request still leaves the old file in place
    if cancel.is_cancelled() {
        return Err(FetchFailure::Cancelled { attempts }.into());
    }
    output::persist(&config, &settings.config_path).await?;
    Ok(config)
}

/// Handle the check command
///
/// Succeeds only if the configured output file exists and holds a valid
/// configuration. Makes no network requests.
pub async fn handle_check(args: CheckArgs) -> Result<Configuration> {
    let settings = Settings::load(args.settings.as_deref(), &args.overrides()).await?;
    check(&settings.config_path).await
}

/// Validate a persisted configuration file
pub async fn check(path: &Path) -> Result<Configuration> {
    let config = output::load(path).await?;
    info!(
        "Configuration at {} is valid for device '{}'",
        path.display(),
        config.id
    );
    Ok(config)
}
