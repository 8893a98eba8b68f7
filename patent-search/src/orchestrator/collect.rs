//! Collection run: query, normalize, cap, dedupe, download, report.
//!
//! A [`Collector`] walks one run through
//! `Idle → Querying → Normalizing → Deduplicating → Downloading → Reported`.
//! Runs take `&mut self`, so one collector never has two runs in flight.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use futures::StreamExt;

use crate::backend::SourceBackend;
use crate::config::CollectConfig;
use crate::download::ArtifactDownloader;
use crate::error::{CollectError, Result};
use crate::http;
use crate::normalize::normalize_all;
use crate::progress::{DownloadEvent, ProgressCallback};
use crate::types::{ArtifactReference, DownloadOutcome, DownloadResult, FailureReason, Record, Summary};

use super::dedup::dedupe;

/// Phase of a collection run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// No run in progress.
    Idle,
    /// Sources are being queried.
    Querying,
    /// Raw payloads are being mapped onto records.
    Normalizing,
    /// Artifact links are being collapsed into references.
    Deduplicating,
    /// Artifacts are being fetched.
    Downloading,
    /// The last run finished and its summary was returned.
    Reported,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Querying => "querying",
            Self::Normalizing => "normalizing",
            Self::Deduplicating => "deduplicating",
            Self::Downloading => "downloading",
            Self::Reported => "reported",
        };
        f.write_str(name)
    }
}

/// Drives collection runs against one or more sources.
pub struct Collector {
    config: CollectConfig,
    client: reqwest::Client,
    downloader: ArtifactDownloader,
    progress: Option<ProgressCallback>,
    state: RunState,
}

impl Collector {
    /// Validate `config` and build the shared HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`CollectError::Config`] for an invalid configuration or
    /// [`CollectError::Http`] if the client cannot be built.
    pub fn new(config: CollectConfig) -> Result<Self> {
        config.validate()?;
        let client = http::build_client(&config)?;
        let downloader = ArtifactDownloader::new(client.clone(), &config);
        Ok(Self {
            config,
            client,
            downloader,
            progress: None,
            state: RunState::Idle,
        })
    }

    /// Attach a callback that receives download progress events.
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    /// The shared HTTP client, for constructing backends and providers.
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Current phase.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Collect from a single source. See [`Collector::run_many`].
    ///
    /// # Errors
    ///
    /// Same as [`Collector::run_many`].
    pub async fn run<B: SourceBackend>(
        &mut self,
        query: &str,
        backend: &B,
        max_results: usize,
        output_dir: &Path,
    ) -> Result<Summary> {
        self.run_many(query, std::slice::from_ref(backend), max_results, output_dir)
            .await
    }

    /// Collect from every source in `sources` and download the unique
    /// artifacts into `output_dir`.
    ///
    /// Sources are queried concurrently; records keep source order, then
    /// backend order within a source, each source capped at `max_results`.
    /// Unavailable sources and failed downloads degrade the summary and
    /// never abort the run.
    ///
    /// # Errors
    ///
    /// Returns [`CollectError::InvalidQuery`] for an empty or whitespace-only
    /// query and [`CollectError::Config`] for `max_results == 0`, both before
    /// any network activity.
    pub async fn run_many<B: SourceBackend>(
        &mut self,
        query: &str,
        sources: &[B],
        max_results: usize,
        output_dir: &Path,
    ) -> Result<Summary> {
        self.transition(RunState::Querying);
        let query = query.trim();
        if query.is_empty() {
            self.transition(RunState::Idle);
            return Err(CollectError::InvalidQuery("query is empty".into()));
        }
        if max_results == 0 {
            self.transition(RunState::Idle);
            return Err(CollectError::Config(
                "max_results must be at least 1".into(),
            ));
        }

        let fetches = sources.iter().map(|source| async move {
            (source.kind(), source.fetch(query, max_results).await)
        });
        let fetched = futures::future::join_all(fetches).await;

        self.transition(RunState::Normalizing);
        let mut records: Vec<Record> = Vec::new();
        for (kind, raws) in &fetched {
            let mut batch = normalize_all(raws, *kind);
            batch.truncate(max_results);
            records.extend(batch);
        }

        self.transition(RunState::Deduplicating);
        let references = dedupe(&records);
        tracing::debug!(
            records = records.len(),
            references = references.len(),
            "deduplicated artifact links"
        );

        self.transition(RunState::Downloading);
        let outcomes = self
            .download_all(references.into_iter().collect(), output_dir)
            .await;

        let summary = Summary { records, outcomes };
        self.transition(RunState::Reported);
        tracing::info!(
            records = summary.record_count(),
            attempted = summary.attempted(),
            downloaded = summary.downloaded(),
            skipped = summary.skipped(),
            failed = summary.failed(),
            "collection run complete"
        );
        Ok(summary)
    }

    fn transition(&mut self, next: RunState) {
        tracing::debug!(from = %self.state, to = %next, "run state");
        self.state = next;
    }

    /// Download every reference, at most `download_concurrency` at a time.
    ///
    /// References sharing a file name run in the same worker, one after the
    /// other, so no two workers ever write the same path.
    async fn download_all(
        &self,
        references: Vec<ArtifactReference>,
        output_dir: &Path,
    ) -> Vec<DownloadOutcome> {
        if references.is_empty() {
            return Vec::new();
        }
        self.emit(DownloadEvent::PhaseStarted {
            total: references.len(),
        });

        if let Err(e) = tokio::fs::create_dir_all(output_dir).await {
            tracing::warn!(dir = %output_dir.display(), error = %e, "could not create output directory");
            let detail = format!("could not create {}: {e}", output_dir.display());
            return references
                .into_iter()
                .map(|reference| {
                    let result = DownloadResult::Failed(FailureReason::TransferError(detail.clone()));
                    self.emit(DownloadEvent::Finished {
                        url: reference.url.clone(),
                        result: result.clone(),
                    });
                    DownloadOutcome {
                        url: reference.url,
                        result,
                    }
                })
                .collect();
        }

        let groups = group_by_filename(references);
        let per_group: Vec<Vec<DownloadOutcome>> = futures::stream::iter(groups)
            .map(|group| self.download_group(group, output_dir))
            .buffer_unordered(self.config.download_concurrency)
            .collect()
            .await;

        per_group.into_iter().flatten().collect()
    }

    async fn download_group(
        &self,
        group: Vec<ArtifactReference>,
        output_dir: &Path,
    ) -> Vec<DownloadOutcome> {
        let mut outcomes = Vec::with_capacity(group.len());
        for reference in group {
            self.emit(DownloadEvent::Started {
                url: reference.url.clone(),
            });
            let result = self.downloader.download(&reference, output_dir).await;
            self.emit(DownloadEvent::Finished {
                url: reference.url.clone(),
                result: result.clone(),
            });
            outcomes.push(DownloadOutcome {
                url: reference.url,
                result,
            });
        }
        outcomes
    }

    fn emit(&self, event: DownloadEvent) {
        if let Some(callback) = &self.progress {
            callback(event);
        }
    }
}

/// Bucket references by target file name.
fn group_by_filename(references: Vec<ArtifactReference>) -> Vec<Vec<ArtifactReference>> {
    let mut groups: HashMap<String, Vec<ArtifactReference>> = HashMap::new();
    for reference in references {
        groups
            .entry(reference.filename.clone())
            .or_default()
            .push(reference);
    }
    groups.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(url: &str) -> ArtifactReference {
        ArtifactReference::from_link(url).expect("valid link")
    }

    #[test]
    fn colliding_filenames_share_a_group() {
        let groups = group_by_filename(vec![
            reference("https://a.example/x/US1.pdf"),
            reference("https://b.example/y/US1.pdf"),
            reference("https://a.example/US2.pdf"),
        ]);
        assert_eq!(groups.len(), 2);
        let shared = groups
            .iter()
            .find(|g| g[0].filename == "US1.pdf")
            .expect("US1 group");
        assert_eq!(shared.len(), 2);
    }

    #[test]
    fn new_collector_is_idle() {
        let collector = Collector::new(CollectConfig::default()).expect("valid config");
        assert_eq!(collector.state(), RunState::Idle);
    }

    #[test]
    fn new_rejects_invalid_config() {
        let config = CollectConfig {
            download_concurrency: 0,
            ..Default::default()
        };
        assert!(matches!(Collector::new(config), Err(CollectError::Config(_))));
    }

    #[test]
    fn run_state_display() {
        assert_eq!(RunState::Deduplicating.to_string(), "deduplicating");
        assert_eq!(RunState::Reported.to_string(), "reported");
    }
}
