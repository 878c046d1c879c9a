//! The HTTP seam between the client and the network.
//!
//! `TreasuryDirect` never talks to `reqwest` directly. It hands a fully built
//! URL to an [`HttpTransport`] and gets the entire response body back as text.
//! The service signals "not found" through the body rather than the status
//! line, so transports are expected to return the body for every status code
//! and only fail on network-level errors.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::fmt::Debug;

use super::config::TreasuryDirectConfig;
use super::error::{Result, TreasuryError};

/// Performs a single GET request and returns the full response body.
///
/// Implementations must not retain the response past the call. Errors are
/// returned to the caller of the `TreasuryDirect` operation unchanged.
#[async_trait]
pub trait HttpTransport: Send + Sync + Debug {
    async fn get(&self, url: &str) -> Result<String>;
}

/// Default transport backed by a `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Builds a transport that sends the configured user agent and applies
    /// the configured timeout to every request.
    ///
    /// # Errors
    ///
    /// Returns `TreasuryError::ConfigError` if the user agent is not a valid
    /// header value or the HTTP client cannot be constructed.
    pub fn new(config: &TreasuryDirectConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| TreasuryError::ConfigError(format!("Invalid user agent: {}", e)))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                TreasuryError::ConfigError(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }

    /// Wraps an existing `reqwest::Client`, keeping whatever defaults it was built with.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(
            "GET {} returned {} with {} bytes",
            url,
            status,
            body.len()
        );

        Ok(body)
    }
}
