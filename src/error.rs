//! Error types for the patent-harvest host.

/// Top-level error type for the harvest host.
#[derive(Debug, thiserror::Error)]
pub enum HarvestError {
    /// Configuration file could not be parsed or serialized.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The collection run was rejected.
    #[error(transparent)]
    Collect(#[from] patent_search::CollectError),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, HarvestError>;
