//! Core types: normalized records, backend identification, artifact
//! references and download outcomes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Placeholder stored in any text field the backend did not provide.
pub const UNKNOWN: &str = "unknown";

/// Placeholder the legacy scrapers wrote for missing fields. Treated exactly
/// like an absent value wherever it shows up in a raw payload.
pub const LEGACY_MISSING: &str = "N/A";

/// Returns `true` when `value` is empty or one of the missing-value markers.
pub fn is_sentinel(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed == UNKNOWN || trimmed == LEGACY_MISSING
}

/// A backend response item before normalization.
///
/// REST backends hand back their JSON objects untouched; the rendered
/// backend packs the fields it scraped from each result block into an
/// object of the same kind.
pub type RawPayload = serde_json::Value;

/// One matched patent, normalized across backends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Backend identifier, or [`UNKNOWN`].
    pub id: String,
    /// Patent title, or [`UNKNOWN`].
    pub title: String,
    /// Abstract text, or [`UNKNOWN`].
    pub abstract_text: String,
    /// Inventor names in the order the backend returned them.
    pub inventors: Vec<String>,
    /// Date in the backend's own representation, or [`UNKNOWN`].
    pub filing_date: String,
    /// Link to a downloadable artifact. `None` is a valid state.
    pub artifact_link: Option<String>,
}

impl Default for Record {
    fn default() -> Self {
        Self {
            id: UNKNOWN.to_owned(),
            title: UNKNOWN.to_owned(),
            abstract_text: UNKNOWN.to_owned(),
            inventors: Vec::new(),
            filing_date: UNKNOWN.to_owned(),
            artifact_link: None,
        }
    }
}

/// The data sources patents can be collected from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BackendKind {
    /// Google Patents, read through a rendered-page provider.
    GooglePatents,
    /// PatentsView query API (`patents` envelope).
    PatentsView,
    /// USPTO full-text search API (`response.docs` envelope).
    UsptoSearch,
}

impl BackendKind {
    /// Returns the human-readable name of this backend.
    pub fn name(&self) -> &'static str {
        match self {
            Self::GooglePatents => "Google Patents",
            Self::PatentsView => "PatentsView",
            Self::UsptoSearch => "USPTO Search",
        }
    }

    /// Returns all available backend variants.
    pub fn all() -> &'static [BackendKind] {
        &[Self::GooglePatents, Self::PatentsView, Self::UsptoSearch]
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A deduplicated download target.
///
/// Equality and hashing cover the literal URL string; the filename is
/// derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactReference {
    /// The artifact URL exactly as the backend reported it.
    pub url: String,
    /// Basename of the URL path, used as the on-disk file name.
    pub filename: String,
}

impl ArtifactReference {
    /// Build a reference from a record's artifact link.
    ///
    /// Returns `None` for absent or sentinel links.
    pub fn from_link(link: &str) -> Option<Self> {
        if is_sentinel(link) {
            return None;
        }
        Some(Self {
            url: link.to_owned(),
            filename: url_basename(link),
        })
    }
}

/// Last segment of a URL's path, ignoring query string and fragment.
///
/// Falls back to plain string splitting for links that do not parse as
/// absolute URLs.
pub fn url_basename(link: &str) -> String {
    if let Ok(parsed) = url::Url::parse(link) {
        if let Some(last) = parsed.path_segments().and_then(|mut s| s.next_back()) {
            return last.to_owned();
        }
        return String::new();
    }
    let without_query = link.split(['?', '#']).next().unwrap_or(link);
    without_query
        .rsplit('/')
        .next()
        .unwrap_or(without_query)
        .to_owned()
}

/// Why a download was skipped without touching the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The URL path does not end in `.pdf`.
    NotPdf,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotPdf => f.write_str("not a PDF link"),
        }
    }
}

/// Why a download attempt failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The reachability probe did not resolve to a success status.
    /// `status` is `None` when no response arrived at all.
    Unreachable {
        /// HTTP status of the probe, if one was received.
        status: Option<u16>,
        /// Transport or status detail.
        detail: String,
    },
    /// The body transfer or the file write failed part-way.
    TransferError(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreachable {
                status: Some(code),
                detail,
            } => write!(f, "unreachable (status {code}): {detail}"),
            Self::Unreachable {
                status: None,
                detail,
            } => write!(f, "unreachable: {detail}"),
            Self::TransferError(detail) => write!(f, "transfer error: {detail}"),
        }
    }
}

/// Outcome of one artifact fetch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadResult {
    /// The artifact was written to this path.
    Success(PathBuf),
    /// The reference was not attempted.
    Skipped(SkipReason),
    /// The attempt failed; nothing was written under the final name.
    Failed(FailureReason),
}

impl DownloadResult {
    /// Returns `true` for [`DownloadResult::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// A download result paired with the URL it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOutcome {
    /// The artifact URL that was attempted.
    pub url: String,
    /// What happened.
    pub result: DownloadResult,
}

/// Aggregate outcome of one collection run.
#[derive(Debug, Clone, Default)]
pub struct Summary {
    /// Normalized records, in backend order.
    pub records: Vec<Record>,
    /// One outcome per unique artifact reference, in completion order.
    pub outcomes: Vec<DownloadOutcome>,
}

impl Summary {
    /// Number of normalized records.
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Number of unique references that went through the downloader.
    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of artifacts written to disk.
    pub fn downloaded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_success()).count()
    }

    /// Number of references skipped by the extension pre-filter.
    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.result, DownloadResult::Skipped(_)))
            .count()
    }

    /// Number of failed download attempts.
    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.result, DownloadResult::Failed(_)))
            .count()
    }

    /// Paths of every artifact written during the run.
    pub fn downloaded_paths(&self) -> Vec<&PathBuf> {
        self.outcomes
            .iter()
            .filter_map(|o| match &o.result {
                DownloadResult::Success(path) => Some(path),
                _ => None,
            })
            .collect()
    }
}
