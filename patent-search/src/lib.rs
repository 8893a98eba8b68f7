//! # patent-search
//!
//! Source-agnostic patent collection.
//!
//! A query is dispatched to one or more patent sources, each source's
//! payloads are normalized into a common [`Record`], artifact links are
//! deduplicated, and the linked PDFs are downloaded into a caller-chosen
//! directory.
//!
//! ## Design
//!
//! - Three sources behind one [`SourceBackend`] trait: Google Patents (via a
//!   caller-owned [`RenderProvider`]), PatentsView and USPTO search
//! - Per-source field tables; normalization never fails, missing fields
//!   become the [`types::UNKNOWN`] sentinel
//! - Graceful degradation: an unavailable source yields zero records, a bad
//!   link yields one failed outcome, the run carries on
//! - Downloads are probed, streamed in bounded buffers and run concurrently
//!
//! Only an empty query is fatal, and it is rejected before any request.

pub mod backend;
pub mod backends;
pub mod config;
pub mod download;
pub mod error;
pub mod http;
pub mod normalize;
pub mod orchestrator;
pub mod progress;
pub mod render;
pub mod types;

pub use backend::SourceBackend;
pub use backends::{GooglePatentsBackend, PatentsViewBackend, Source, UsptoSearchBackend};
pub use config::CollectConfig;
pub use download::ArtifactDownloader;
pub use error::{CollectError, Result};
pub use normalize::normalize;
pub use orchestrator::collect::{Collector, RunState};
pub use orchestrator::dedup::dedupe;
pub use progress::{DownloadEvent, ProgressCallback};
pub use render::{RenderProvider, StaticPageProvider};
pub use types::{
    ArtifactReference, BackendKind, DownloadOutcome, DownloadResult, FailureReason, RawPayload,
    Record, SkipReason, Summary,
};

/// Collect patents for `query` from a single source with a fresh collector.
///
/// Convenience wrapper around [`Collector::run`].
///
/// # Errors
///
/// Returns [`CollectError::Config`] if `config` is invalid and
/// [`CollectError::InvalidQuery`] if `query` is blank.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> patent_search::Result<()> {
/// use patent_search::{CollectConfig, PatentsViewBackend};
///
/// let config = CollectConfig::default();
/// let backend = PatentsViewBackend::new(reqwest::Client::new(), &config);
/// let summary = patent_search::collect(
///     "cordless vacuum cleaners Dyson",
///     &backend,
///     10,
///     std::path::Path::new("patent_pdfs"),
///     config,
/// )
/// .await?;
/// println!("{} records, {} PDFs", summary.record_count(), summary.downloaded());
/// # Ok(())
/// # }
/// ```
pub async fn collect<B: SourceBackend>(
    query: &str,
    backend: &B,
    max_results: usize,
    output_dir: &std::path::Path,
    config: CollectConfig,
) -> Result<Summary> {
    let mut collector = Collector::new(config)?;
    collector.run(query, backend, max_results, output_dir).await
}
