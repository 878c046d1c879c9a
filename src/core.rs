use std::sync::Arc;

use reqwest::Url;

use super::config::TreasuryDirectConfig;
use super::error::{Result, TreasuryError};
use super::transport::{HttpTransport, ReqwestTransport};

#[derive(Debug, Clone)]
pub struct TreasuryDirect {
    /// Transport every GET goes through
    pub(crate) transport: Arc<dyn HttpTransport>,

    /// Base URL that request path segments are appended to
    pub(crate) base_url: Url,
}

/// Client for the TreasuryDirect securities web service.
///
/// The client holds nothing but immutable configuration: a shared transport
/// handle and a base URL. Every operation is a single request/response cycle,
/// so one instance can be cloned or shared across tasks freely.
///
/// Requests look like:
///
/// ```text
/// {base_url}/securities/announced?format=json&pagesize=10&type=Bill
/// └──────┬─┘ └─────────┬────────┘ └──────────────┬────────────────┘
///   config     fixed path       format=json + serialized options
/// ```
///
/// # Examples
///
/// Production client with defaults:
///
/// ```rust
/// # use treasurykit::TreasuryDirect;
/// let client = TreasuryDirect::new()?;
/// # Ok::<(), treasurykit::TreasuryError>(())
/// ```
///
/// Pointing at an alternate deployment:
///
/// ```rust
/// # use treasurykit::{TreasuryDirect, TreasuryDirectConfig};
/// let config = TreasuryDirectConfig {
///     base_url: "http://localhost:8080/TA_WS".to_string(),
///     ..TreasuryDirectConfig::default()
/// };
/// let client = TreasuryDirect::with_config(config)?;
/// # Ok::<(), treasurykit::TreasuryError>(())
/// ```
impl TreasuryDirect {
    /// Creates a client for the production service with the default user
    /// agent and a 30-second timeout.
    pub fn new() -> Result<Self> {
        Self::with_config(TreasuryDirectConfig::default())
    }

    /// Creates a client backed by `reqwest` using custom settings.
    ///
    /// # Errors
    ///
    /// Returns `TreasuryError::ConfigError` if the base URL is empty, the user
    /// agent is malformed, or the HTTP client cannot be built.
    pub fn with_config(config: TreasuryDirectConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(&config)?;
        Self::with_transport(Arc::new(transport), config.base_url)
    }

    /// Creates a client that sends its requests through `transport`.
    ///
    /// This is the seam for test doubles and for callers that already own a
    /// configured HTTP stack.
    ///
    /// # Errors
    ///
    /// Returns `TreasuryError::ConfigError` if `base_url` is empty, is not an
    /// absolute URL, or cannot carry path segments (e.g. `mailto:`).
    pub fn with_transport(
        transport: Arc<dyn HttpTransport>,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        let base_url = base_url.into();
        if base_url.is_empty() {
            return Err(TreasuryError::ConfigError(
                "baseUrl cannot be empty.".to_string(),
            ));
        }

        let base_url = Url::parse(&base_url)
            .map_err(|e| TreasuryError::ConfigError(format!("Invalid baseUrl {base_url:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(TreasuryError::ConfigError(format!(
                "baseUrl {:?} cannot hold a path.",
                base_url.as_str()
            )));
        }

        Ok(TreasuryDirect {
            transport,
            base_url,
        })
    }

    /// Builds the full request URL from path segments and query options.
    ///
    /// Each segment is percent-encoded on its own, so a value containing `/`,
    /// `?` or `#` stays inside its segment. `format=json` always comes first
    /// and cannot be overridden. Option parameters follow in the order given;
    /// a parameter that repeats an earlier key replaces its value.
    pub(crate) fn url(&self, segments: &[&str], params: Vec<(String, String)>) -> String {
        let mut query: Vec<(String, String)> = vec![("format".to_string(), "json".to_string())];
        for (key, value) in params {
            if key == "format" {
                tracing::trace!("Ignoring format={} option", value);
                continue;
            }
            match query.iter_mut().find(|(existing, _)| *existing == key) {
                Some(entry) => entry.1 = value,
                None => query.push((key, value)),
            }
        }

        let mut url = self.base_url.clone();
        // Cannot-be-a-base URLs are rejected in `with_transport`.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.set_fragment(None);
        url.query_pairs_mut().clear().extend_pairs(query);
        url.into()
    }

    /// Fetches `url` through the configured transport.
    ///
    /// Transport errors are returned as-is; the status code is never inspected.
    pub async fn get(&self, url: &str) -> Result<String> {
        tracing::debug!("Requesting {}", url);
        self.transport.get(url).await
    }

    /// Returns the base URL requests are built from.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }
}
