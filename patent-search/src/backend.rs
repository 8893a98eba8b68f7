//! Trait definition for pluggable patent sources.
//!
//! Each source (Google Patents, PatentsView, USPTO search) implements
//! [`SourceBackend`] so the collector can query any of them the same way.

use crate::error::CollectError;
use crate::types::{BackendKind, RawPayload};

/// A pluggable patent source.
///
/// Implementors turn a free-text query into backend-specific raw payloads.
/// Each backend handles its own:
///
/// - query encoding
/// - transport (HTTP GET or rendered-page provider)
/// - envelope parsing, down to a list of per-patent JSON values
///
/// All implementations must be `Send + Sync` so several sources can be
/// queried concurrently.
pub trait SourceBackend: Send + Sync {
    /// Query the source and return at most `max_results` raw payloads.
    ///
    /// # Errors
    ///
    /// Returns [`CollectError::SourceUnavailable`] on transport failures and
    /// non-2xx responses, or [`CollectError::Parse`] / [`CollectError::Render`]
    /// when the response cannot be read at all. A response that parses but
    /// carries no results is `Ok(vec![])`.
    fn fetch_raw(
        &self,
        query: &str,
        max_results: usize,
    ) -> impl std::future::Future<Output = Result<Vec<RawPayload>, CollectError>> + Send;

    /// Returns which [`BackendKind`] this implementation represents.
    fn kind(&self) -> BackendKind;

    /// Query the source, absorbing failures into an empty result.
    ///
    /// Rejects an empty query or a zero cap locally, calls
    /// [`fetch_raw`](Self::fetch_raw), logs any error at warn level and
    /// truncates the result to `max_results`. One unavailable source never
    /// aborts a multi-source run.
    fn fetch(
        &self,
        query: &str,
        max_results: usize,
    ) -> impl std::future::Future<Output = Vec<RawPayload>> + Send {
        async move {
            let backend = self.kind();
            if query.trim().is_empty() || max_results == 0 {
                tracing::warn!(%backend, max_results, "fetch called with empty query or zero cap");
                return Vec::new();
            }
            tracing::trace!(%backend, query, max_results, "fetching");
            match self.fetch_raw(query, max_results).await {
                Ok(mut payloads) => {
                    payloads.truncate(max_results);
                    tracing::debug!(%backend, count = payloads.len(), "backend returned payloads");
                    payloads
                }
                Err(err) => {
                    tracing::warn!(%backend, error = %err, "backend query failed");
                    Vec::new()
                }
            }
        }
    }
}
