//! Persistence of fetched configuration
//!
//! The configuration is written next to its destination under a temporary
//! name and renamed into place, so the data-collector never observes a
//! partially written file.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::app::models::Configuration;
use crate::constants::files;
use crate::errors::{OutputError, OutputResult};

/// Render a configuration as indented JSON with a trailing newline
pub fn render(config: &Configuration) -> OutputResult<Vec<u8>> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(files::JSON_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    config.serialize(&mut serializer)?;
    buffer.push(b'\n');
    Ok(buffer)
}

/// Write a configuration to `destination`, replacing any existing file
///
/// # Errors
///
/// Returns `OutputError` if the parent directory cannot be created, the
/// temporary file cannot be written, or the final rename fails. The
/// destination is left untouched in every error case.
pub async fn persist(config: &Configuration, destination: &Path) -> OutputResult<()> {
    let content = render(config)?;

    if let Some(parent) = destination.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| OutputError::Write {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }
    }

    let temp_path = temp_path_for(destination);
    if let Err(source) = tokio::fs::write(&temp_path, &content).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(OutputError::Write {
            path: temp_path,
            source,
        });
    }

    if let Err(e) = tokio::fs::rename(&temp_path, destination).await {
        tracing::error!("Rename into {} failed: {}", destination.display(), e);
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(OutputError::AtomicOperationFailed {
            temp_path,
            final_path: destination.to_path_buf(),
        });
    }

    tracing::info!(
        "Wrote configuration ({} keys, {} bytes) to {}",
        config.key_count(),
        content.len(),
        destination.display()
    );
    Ok(())
}

/// Read a persisted configuration back and validate it
pub async fn load(path: &Path) -> OutputResult<Configuration> {
    let content = tokio::fs::read(path)
        .await
        .map_err(|source| OutputError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let value: serde_json::Value =
        serde_json::from_slice(&content).map_err(|e| OutputError::Invalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    Configuration::from_value(value).map_err(|e| OutputError::Invalid {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn temp_path_for(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(files::TEMP_FILE_SUFFIX);
    destination.with_file_name(name)
}
