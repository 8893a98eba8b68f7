//! PatentsView: JSON query API with a boolean full-text query language.
//!
//! The query, field list and paging options are each sent as a JSON
//! document in its own query-string parameter. Results arrive under the
//! top-level `patents` key.

use serde_json::{json, Value};

use crate::backend::SourceBackend;
use crate::config::CollectConfig;
use crate::error::CollectError;
use crate::types::{BackendKind, RawPayload};

/// Fields requested from PatentsView for every patent.
const FIELDS: &[&str] = &[
    "patent_id",
    "patent_title",
    "patent_abstract",
    "inventors",
    "assignees",
    "patent_date",
];

/// PatentsView query API client.
pub struct PatentsViewBackend {
    client: reqwest::Client,
    endpoint: String,
}

impl PatentsViewBackend {
    /// Create a backend that sends requests through `client`.
    pub fn new(client: reqwest::Client, config: &CollectConfig) -> Self {
        Self {
            client,
            endpoint: config.patentsview_url.clone(),
        }
    }
}

/// Encode the query-string parameters for a title search.
pub(crate) fn query_params(query: &str, max_results: usize) -> Vec<(&'static str, String)> {
    vec![
        ("q", json!({ "_text_any": { "patent_title": query } }).to_string()),
        ("f", json!(FIELDS).to_string()),
        ("o", json!({ "per_page": max_results }).to_string()),
    ]
}

/// Pull the results array out of a PatentsView envelope.
///
/// A missing or non-array `patents` key means no results.
pub(crate) fn extract_results(envelope: Value) -> Vec<RawPayload> {
    match envelope {
        Value::Object(mut map) => match map.remove("patents") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

impl SourceBackend for PatentsViewBackend {
    async fn fetch_raw(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<RawPayload>, CollectError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&query_params(query, max_results))
            .send()
            .await
            .map_err(|e| CollectError::SourceUnavailable(format!("PatentsView request failed: {e}")))?
            .error_for_status()
            .map_err(|e| CollectError::SourceUnavailable(format!("PatentsView HTTP error: {e}")))?;

        let envelope: Value = response
            .json()
            .await
            .map_err(|e| CollectError::Parse(format!("PatentsView response is not JSON: {e}")))?;

        Ok(extract_results(envelope))
    }

    fn kind(&self) -> BackendKind {
        BackendKind::PatentsView
    }
}
