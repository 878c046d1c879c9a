use std::time::Duration;

/// Production address of the TreasuryDirect securities web service.
pub const DEFAULT_BASE_URL: &str = "https://www.treasurydirect.gov/TA_WS/";

/// Configuration for the TreasuryDirect client
#[derive(Debug, Clone)]
pub struct TreasuryDirectConfig {
    /// User agent string for HTTP requests
    pub user_agent: String,
    /// HTTP request timeout
    pub timeout: Duration,
    /// Base URL that every request path is appended to
    pub base_url: String,
}

impl Default for TreasuryDirectConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("treasurykit/{}", env!("CARGO_PKG_VERSION")),
            timeout: Duration::from_secs(30),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl TreasuryDirectConfig {
    /// Creates a new TreasuryDirectConfig with custom settings
    ///
    /// # Basic usage
    ///
    /// ```rust
    /// use treasurykit::{TreasuryDirect, TreasuryDirectConfig};
    /// use std::time::Duration;
    ///
    /// let config = TreasuryDirectConfig::new(
    ///     "YourAppName contact@example.com",
    ///     Duration::from_secs(10),
    ///     None,
    /// );
    /// let client = TreasuryDirect::with_config(config)?;
    /// # Ok::<(), treasurykit::TreasuryError>(())
    /// ```
    pub fn new(
        user_agent: impl Into<String>,
        timeout: Duration,
        base_url: Option<String>,
    ) -> Self {
        Self {
            user_agent: user_agent.into(),
            timeout,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }
}
