//! patent-harvest: collect patents matching a query and download their PDFs.
//!
//! This crate is the host around [`patent_search`]: it loads the TOML
//! configuration, composes the query from the user's input, picks the
//! output directory, and renders the run summary. The pipeline itself
//! lives in the `patent-search` workspace member.

pub mod config;
pub mod error;
pub mod report;

pub use config::{BackendChoice, HarvestConfig};
pub use error::{HarvestError, Result};

use std::path::{Path, PathBuf};

/// Join an industry vertical and a company name into one query, the way
/// the collection form combines its two fields.
///
/// Either part may be empty; the result is trimmed and may itself be
/// empty, which the pipeline rejects.
pub fn compose_query(industry: &str, company: &str) -> String {
    format!("{} {}", industry.trim(), company.trim())
        .trim()
        .to_owned()
}

/// `<parent>/<prefix>_<YYYYmmdd_HHMMSS>` for the given local time.
pub fn timestamped_dir(
    parent: &Path,
    prefix: &str,
    now: chrono::DateTime<chrono::Local>,
) -> PathBuf {
    parent.join(format!("{prefix}_{}", now.format("%Y%m%d_%H%M%S")))
}
