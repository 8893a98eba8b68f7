//! Progress events for artifact downloads.
//!
//! Decouples the download phase from presentation: the host binary turns
//! these into an `indicatif` bar, tests collect them into a vector.

use crate::types::DownloadResult;

/// Progress events emitted during the download phase.
#[derive(Debug, Clone)]
pub enum DownloadEvent {
    /// The download phase is starting with this many unique references.
    PhaseStarted {
        /// Number of unique references about to be processed.
        total: usize,
    },

    /// A reference has been handed to the downloader.
    Started {
        /// Artifact URL.
        url: String,
    },

    /// A reference reached a terminal result.
    Finished {
        /// Artifact URL.
        url: String,
        /// Terminal result for this reference.
        result: DownloadResult,
    },
}

/// Callback type for receiving download progress events.
///
/// Called from concurrent download workers, hence `Send + Sync`.
pub type ProgressCallback = Box<dyn Fn(DownloadEvent) + Send + Sync>;
