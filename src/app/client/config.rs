//! HTTP client configuration and building logic
//!
//! The config server is reached once per attempt, so the client only needs
//! bounded timeouts and an identifying user agent.

use std::time::Duration;

use reqwest::Client;

use crate::constants::http;
use crate::errors::{SourceError, SourceResult};

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Whole-request timeout, body included
    pub request_timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: http::DEFAULT_TIMEOUT,
            connect_timeout: http::CONNECT_TIMEOUT,
            user_agent: http::USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    /// Builds the HTTP client with the specified configuration
    pub fn build_http_client(&self) -> SourceResult<Client> {
        Client::builder()
            .timeout(self.request_timeout)
            .connect_timeout(self.connect_timeout)
            .user_agent(self.user_agent.as_str())
            .build()
            .map_err(|e| SourceError::Transport(format!("failed to build HTTP client: {}", e)))
    }
}
