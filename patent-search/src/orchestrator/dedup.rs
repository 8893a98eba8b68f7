//! Artifact deduplication by literal link.
//!
//! Two records point at the same artifact only when their links are
//! byte-identical. No normalisation and no redirect resolution happens
//! here, so two URLs that redirect to one document are two references.

use std::collections::HashSet;

use crate::types::{ArtifactReference, Record};

/// Collapse records into the set of unique artifact references.
///
/// Records with an absent or sentinel `artifact_link` contribute nothing.
/// Iteration order of the returned set is unspecified.
pub fn dedupe(records: &[Record]) -> HashSet<ArtifactReference> {
    records
        .iter()
        .filter_map(|record| record.artifact_link.as_deref())
        .filter_map(ArtifactReference::from_link)
        .collect()
}
