//! Error types for the patent-search crate.
//!
//! Every variant renders as `"<kind>: <detail>"` so callers can tell a
//! rejected query apart from a degraded result without matching on
//! transport-level error types.

/// Errors that can occur while collecting patents.
#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    /// The query was empty after trimming. Raised before any network call.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// A backend could not be reached or answered with a non-2xx status.
    ///
    /// Absorbed by [`crate::backend::SourceBackend::fetch`]; a run never
    /// fails because of it.
    #[error("source unavailable: {0}")]
    SourceUnavailable(String),

    /// Invalid collection configuration.
    #[error("config error: {0}")]
    Config(String),

    /// The HTTP client could not be constructed or a request could not be built.
    #[error("HTTP error: {0}")]
    Http(String),

    /// A response body could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),

    /// The rendered-page provider failed to navigate, submit or read back.
    #[error("render error: {0}")]
    Render(String),
}

/// Convenience type alias for patent-search results.
pub type Result<T> = std::result::Result<T, CollectError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_query() {
        let err = CollectError::InvalidQuery("query is empty".into());
        assert_eq!(err.to_string(), "invalid query: query is empty");
    }

    #[test]
    fn display_source_unavailable() {
        let err = CollectError::SourceUnavailable("PatentsView returned 503".into());
        assert_eq!(
            err.to_string(),
            "source unavailable: PatentsView returned 503"
        );
    }

    #[test]
    fn display_config() {
        let err = CollectError::Config("download_concurrency must be > 0".into());
        assert_eq!(
            err.to_string(),
            "config error: download_concurrency must be > 0"
        );
    }

    #[test]
    fn display_http_parse_render() {
        assert_eq!(
            CollectError::Http("connection refused".into()).to_string(),
            "HTTP error: connection refused"
        );
        assert_eq!(
            CollectError::Parse("expected JSON object".into()).to_string(),
            "parse error: expected JSON object"
        );
        assert_eq!(
            CollectError::Render("no element matches".into()).to_string(),
            "render error: no element matches"
        );
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CollectError>();
    }
}
