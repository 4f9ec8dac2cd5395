//! Transport to the config server
//!
//! `ConfigSource` is the seam between the retry loop and the network: one call
//! is one attempt, returning either a decoded JSON document or a classified
//! `SourceError`. `HttpConfigSource` is the reqwest implementation used by the
//! binary.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::errors::{SourceError, SourceResult};

pub mod config;

pub use config::ClientConfig;

/// A place configuration documents can be requested from
#[async_trait]
pub trait ConfigSource: Send + Sync {
    /// Perform one request and decode the body as JSON
    ///
    /// Non-success statuses and connection problems map to
    /// `SourceError::Status` / `SourceError::Transport`; a body that is not
    /// JSON maps to `SourceError::Decode`.
    async fn fetch_document(&self, url: &Url) -> SourceResult<Value>;
}

/// HTTP implementation of [`ConfigSource`]
#[derive(Debug, Clone)]
pub struct HttpConfigSource {
    client: Client,
}

impl HttpConfigSource {
    /// Creates a new source with the given client configuration
    pub fn new(config: &ClientConfig) -> SourceResult<Self> {
        let client = config.build_http_client()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ConfigSource for HttpConfigSource {
    async fn fetch_document(&self, url: &Url) -> SourceResult<Value> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?;
        let status = response.status();
        let body = response.bytes().await?;

        tracing::debug!("Received HTTP {} with {} byte body", status.as_u16(), body.len());

        serde_json::from_slice(&body).map_err(|e| {
            tracing::debug!("Undecodable body: {}", String::from_utf8_lossy(&body));
            SourceError::from(e)
        })
    }
}
