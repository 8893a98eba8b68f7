//! Patent source implementations.
//!
//! Each module provides a struct implementing [`crate::backend::SourceBackend`].
//! [`Source`] wraps all three so a heterogeneous list can be collected in one run.

pub mod google_patents;
pub mod patentsview;
pub mod uspto;

pub use google_patents::GooglePatentsBackend;
pub use patentsview::PatentsViewBackend;
pub use uspto::UsptoSearchBackend;

use crate::backend::SourceBackend;
use crate::error::CollectError;
use crate::render::RenderProvider;
use crate::types::{BackendKind, RawPayload};

/// Any one of the supported sources.
pub enum Source<'p, P> {
    /// Rendered Google Patents search.
    GooglePatents(GooglePatentsBackend<'p, P>),
    /// PatentsView query API.
    PatentsView(PatentsViewBackend),
    /// USPTO full-text search API.
    UsptoSearch(UsptoSearchBackend),
}

impl<P: RenderProvider> SourceBackend for Source<'_, P> {
    async fn fetch_raw(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<RawPayload>, CollectError> {
        match self {
            Self::GooglePatents(backend) => backend.fetch_raw(query, max_results).await,
            Self::PatentsView(backend) => backend.fetch_raw(query, max_results).await,
            Self::UsptoSearch(backend) => backend.fetch_raw(query, max_results).await,
        }
    }

    fn kind(&self) -> BackendKind {
        match self {
            Self::GooglePatents(backend) => backend.kind(),
            Self::PatentsView(backend) => backend.kind(),
            Self::UsptoSearch(backend) => backend.kind(),
        }
    }
}
