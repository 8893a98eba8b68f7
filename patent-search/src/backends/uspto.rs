//! USPTO full-text search: flat `searchText` parameter, Solr-style envelope.
//!
//! Results arrive under `response.docs`.

use serde_json::Value;

use crate::backend::SourceBackend;
use crate::config::CollectConfig;
use crate::error::CollectError;
use crate::types::{BackendKind, RawPayload};

/// USPTO publication search client.
pub struct UsptoSearchBackend {
    client: reqwest::Client,
    endpoint: String,
}

impl UsptoSearchBackend {
    /// Create a backend that sends requests through `client`.
    pub fn new(client: reqwest::Client, config: &CollectConfig) -> Self {
        Self {
            client,
            endpoint: config.uspto_search_url.clone(),
        }
    }
}

/// Pull `response.docs` out of the search envelope.
pub(crate) fn extract_results(envelope: Value) -> Vec<RawPayload> {
    match envelope.pointer("/response/docs") {
        Some(Value::Array(items)) => items.clone(),
        _ => Vec::new(),
    }
}

impl SourceBackend for UsptoSearchBackend {
    async fn fetch_raw(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<RawPayload>, CollectError> {
        let rows = max_results.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("searchText", query), ("start", "0"), ("rows", rows.as_str())])
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| CollectError::SourceUnavailable(format!("USPTO request failed: {e}")))?
            .error_for_status()
            .map_err(|e| CollectError::SourceUnavailable(format!("USPTO HTTP error: {e}")))?;

        let envelope: Value = response
            .json()
            .await
            .map_err(|e| CollectError::Parse(format!("USPTO response is not JSON: {e}")))?;

        Ok(extract_results(envelope))
    }

    fn kind(&self) -> BackendKind {
        BackendKind::UsptoSearch
    }
}
