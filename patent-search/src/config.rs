//! Collection configuration with sensible defaults.
//!
//! [`CollectConfig`] controls timeouts, the rendered-page settle delays,
//! download parallelism and the backend endpoints. The defaults mirror the
//! public services; tests point the endpoints at local mock servers.

use crate::error::CollectError;

/// Google Patents search page.
pub const GOOGLE_PATENTS_URL: &str = "https://patents.google.com/";

/// PatentsView patent query endpoint.
pub const PATENTSVIEW_URL: &str = "https://api.patentsview.org/patents/query";

/// USPTO full-text publication search endpoint.
pub const USPTO_SEARCH_URL: &str =
    "https://developer.uspto.gov/ibd-api/v1/application/publications";

/// Configuration for a collection run.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for custom behaviour.
#[derive(Debug, Clone)]
pub struct CollectConfig {
    /// Timeout in seconds for every HTTP request (API queries, probes, transfers).
    pub timeout_seconds: u64,
    /// Timeout in seconds for each call into the rendered-page provider.
    pub render_timeout_seconds: u64,
    /// Wait after navigating to the search page, in milliseconds.
    pub navigate_settle_ms: u64,
    /// Wait after submitting the query, in milliseconds.
    pub submit_settle_ms: u64,
    /// Maximum number of artifact downloads in flight at once.
    pub download_concurrency: usize,
    /// Write buffer size for artifact transfers, in bytes.
    pub chunk_size: usize,
    /// Custom User-Agent string. If `None`, rotates through a built-in list
    /// of realistic browser User-Agents.
    pub user_agent: Option<String>,
    /// Search page for the rendered backend.
    pub google_patents_url: String,
    /// Endpoint for the PatentsView backend.
    pub patentsview_url: String,
    /// Endpoint for the USPTO search backend.
    pub uspto_search_url: String,
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            render_timeout_seconds: 30,
            navigate_settle_ms: 2_000,
            submit_settle_ms: 3_000,
            download_concurrency: 4,
            chunk_size: 8_192,
            user_agent: None,
            google_patents_url: GOOGLE_PATENTS_URL.to_owned(),
            patentsview_url: PATENTSVIEW_URL.to_owned(),
            uspto_search_url: USPTO_SEARCH_URL.to_owned(),
        }
    }
}

impl CollectConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `timeout_seconds` and `render_timeout_seconds` must be greater than 0
    /// - `download_concurrency` must be greater than 0
    /// - `chunk_size` must be greater than 0
    /// - every endpoint must parse as an absolute URL
    pub fn validate(&self) -> Result<(), CollectError> {
        if self.timeout_seconds == 0 {
            return Err(CollectError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.render_timeout_seconds == 0 {
            return Err(CollectError::Config(
                "render_timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.download_concurrency == 0 {
            return Err(CollectError::Config(
                "download_concurrency must be greater than 0".into(),
            ));
        }
        if self.chunk_size == 0 {
            return Err(CollectError::Config(
                "chunk_size must be greater than 0".into(),
            ));
        }
        for (name, value) in [
            ("google_patents_url", &self.google_patents_url),
            ("patentsview_url", &self.patentsview_url),
            ("uspto_search_url", &self.uspto_search_url),
        ] {
            url::Url::parse(value)
                .map_err(|e| CollectError::Config(format!("{name} is not a valid URL: {e}")))?;
        }
        Ok(())
    }
}
