//! Google Patents: rendered search page read through a [`RenderProvider`].
//!
//! The results page is assembled client-side, so the backend drives a
//! provider through the search form, waits a fixed settle time after each
//! step and scrapes whatever markup is present at that point.

use std::future::Future;
use std::time::Duration;

use scraper::{ElementRef, Html, Selector};
use serde_json::{Map, Value};

use crate::backend::SourceBackend;
use crate::config::CollectConfig;
use crate::error::CollectError;
use crate::render::RenderProvider;
use crate::types::{BackendKind, RawPayload};

/// Search box on the landing page.
pub const SEARCH_BOX_SELECTOR: &str = "input[name=\"q\"]";

/// Google Patents scraper driving a caller-owned render provider.
pub struct GooglePatentsBackend<'p, P> {
    provider: &'p P,
    search_url: String,
    navigate_settle: Duration,
    submit_settle: Duration,
    call_timeout: Duration,
}

impl<'p, P: RenderProvider> GooglePatentsBackend<'p, P> {
    /// Borrow `provider` for the duration of the backend's use.
    pub fn new(provider: &'p P, config: &CollectConfig) -> Self {
        Self {
            provider,
            search_url: config.google_patents_url.clone(),
            navigate_settle: Duration::from_millis(config.navigate_settle_ms),
            submit_settle: Duration::from_millis(config.submit_settle_ms),
            call_timeout: Duration::from_secs(config.render_timeout_seconds),
        }
    }

    /// Run one provider call under the configured timeout.
    async fn bounded<T>(
        &self,
        step: &str,
        call: impl Future<Output = Result<T, CollectError>>,
    ) -> Result<T, CollectError> {
        tokio::time::timeout(self.call_timeout, call)
            .await
            .map_err(|_| {
                CollectError::SourceUnavailable(format!(
                    "Google Patents {step} timed out after {}s",
                    self.call_timeout.as_secs()
                ))
            })?
    }
}

impl<P: RenderProvider> SourceBackend for GooglePatentsBackend<'_, P> {
    async fn fetch_raw(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<RawPayload>, CollectError> {
        self.bounded("navigate", self.provider.navigate(&self.search_url))
            .await?;
        tokio::time::sleep(self.navigate_settle).await;

        self.bounded(
            "submit",
            self.provider.type_and_submit(SEARCH_BOX_SELECTOR, query),
        )
        .await?;
        tokio::time::sleep(self.submit_settle).await;

        let html = self.bounded("read", self.provider.rendered_html()).await?;
        tracing::trace!(bytes = html.len(), "Google Patents page rendered");

        parse_results_html(&html, max_results)
    }

    fn kind(&self) -> BackendKind {
        BackendKind::GooglePatents
    }
}

/// Parse rendered Google Patents markup into raw payloads.
///
/// Each `div.search-result-item` becomes one JSON object with the keys
/// `title`, `link`, `abstract`, `inventors` and `filing_date`, holding
/// only the fields the block actually had. Markup without result blocks
/// yields an empty list.
pub(crate) fn parse_results_html(
    html: &str,
    max_results: usize,
) -> Result<Vec<RawPayload>, CollectError> {
    let document = Html::parse_document(html);

    let result_sel = selector("div.search-result-item")?;
    let title_sel = selector("h3")?;
    let link_sel = selector("a[href]")?;
    let abstract_sel = selector("div.abstract")?;
    let inventors_sel = selector("div.inventors")?;
    let date_sel = selector("div.filing-date")?;

    let mut payloads = Vec::new();

    for block in document.select(&result_sel).take(max_results) {
        let mut fields = Map::new();
        if let Some(title) = first_text(&block, &title_sel) {
            fields.insert("title".into(), Value::String(title));
        }
        if let Some(href) = block
            .select(&link_sel)
            .next()
            .and_then(|a| a.value().attr("href"))
        {
            fields.insert("link".into(), Value::String(href.to_owned()));
        }
        if let Some(text) = first_text(&block, &abstract_sel) {
            fields.insert("abstract".into(), Value::String(text));
        }
        if let Some(text) = first_text(&block, &inventors_sel) {
            fields.insert("inventors".into(), Value::String(text));
        }
        if let Some(text) = first_text(&block, &date_sel) {
            fields.insert("filing_date".into(), Value::String(text));
        }
        payloads.push(Value::Object(fields));
    }

    tracing::debug!(count = payloads.len(), "Google Patents results parsed");
    Ok(payloads)
}

fn selector(css: &str) -> Result<Selector, CollectError> {
    Selector::parse(css).map_err(|e| CollectError::Parse(format!("invalid selector {css}: {e:?}")))
}

fn first_text(block: &ElementRef<'_>, sel: &Selector) -> Option<String> {
    block
        .select(sel)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    const MOCK_RESULTS_HTML: &str = r#"<!DOCTYPE html>
<html><body>
<div class="search-result-item">
  <h3> Cyclonic separating apparatus </h3>
  <a href="https://patentimages.example.com/US1.pdf">PDF</a>
  <div class="abstract">A cyclonic separator for a vacuum cleaner.</div>
  <div class="inventors">James Dyson, Peter Gammack</div>
  <div class="filing-date">2019-03-04</div>
</div>
<div class="search-result-item">
  <h3>Cleaner head</h3>
  <a href="/patent/US2B2/en">View</a>
</div>
<div class="search-result-item">
  <div class="abstract">Orphan abstract.</div>
</div>
</body></html>"#;

    #[test]
    fn parse_extracts_all_fields() {
        let payloads = parse_results_html(MOCK_RESULTS_HTML, 10).expect("should parse");
        assert_eq!(payloads.len(), 3);

        assert_eq!(payloads[0]["title"], "Cyclonic separating apparatus");
        assert_eq!(payloads[0]["link"], "https://patentimages.example.com/US1.pdf");
        assert_eq!(payloads[0]["inventors"], "James Dyson, Peter Gammack");
        assert_eq!(payloads[0]["filing_date"], "2019-03-04");

        assert_eq!(payloads[1]["link"], "/patent/US2B2/en");
        assert!(payloads[1].get("abstract").is_none());

        assert!(payloads[2].get("title").is_none());
    }

    #[test]
    fn parse_respects_max_results() {
        let payloads = parse_results_html(MOCK_RESULTS_HTML, 2).expect("should parse");
        assert_eq!(payloads.len(), 2);
    }

    #[test]
    fn selector_mismatch_is_empty_not_error() {
        let payloads = parse_results_html("<html><body><p>No results</p></body></html>", 10);
        assert!(payloads.expect("should parse").is_empty());
    }

    /// Provider that records calls and serves canned markup.
    struct ScriptedProvider {
        html: String,
        calls: Mutex<Vec<String>>,
    }

    impl RenderProvider for ScriptedProvider {
        async fn navigate(&self, url: &str) -> Result<(), CollectError> {
            if let Ok(mut calls) = self.calls.lock() {
                calls.push(format!("navigate {url}"));
            }
            Ok(())
        }

        async fn type_and_submit(&self, selector: &str, text: &str) -> Result<(), CollectError> {
            if let Ok(mut calls) = self.calls.lock() {
                calls.push(format!("submit {selector} {text}"));
            }
            Ok(())
        }

        async fn rendered_html(&self) -> Result<String, CollectError> {
            Ok(self.html.clone())
        }
    }

    /// Provider whose navigation never completes.
    struct HangingProvider;

    impl RenderProvider for HangingProvider {
        async fn navigate(&self, _url: &str) -> Result<(), CollectError> {
            std::future::pending::<()>().await;
            Ok(())
        }

        async fn type_and_submit(&self, _selector: &str, _text: &str) -> Result<(), CollectError> {
            Ok(())
        }

        async fn rendered_html(&self) -> Result<String, CollectError> {
            Ok(String::new())
        }
    }

    fn fast_config() -> CollectConfig {
        CollectConfig {
            navigate_settle_ms: 0,
            submit_settle_ms: 0,
            render_timeout_seconds: 1,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn fetch_drives_provider_in_order() {
        let provider = ScriptedProvider {
            html: MOCK_RESULTS_HTML.to_owned(),
            calls: Mutex::new(Vec::new()),
        };
        let config = fast_config();
        let backend = GooglePatentsBackend::new(&provider, &config);

        let payloads = backend.fetch("cordless vacuum", 10).await;
        assert_eq!(payloads.len(), 3);

        let calls = provider.calls.lock().expect("lock").clone();
        assert_eq!(
            calls,
            vec![
                format!("navigate {}", config.google_patents_url),
                format!("submit {SEARCH_BOX_SELECTOR} cordless vacuum"),
            ]
        );
    }

    #[tokio::test]
    async fn hung_provider_times_out_to_empty() {
        let config = fast_config();
        let backend = GooglePatentsBackend::new(&HangingProvider, &config);

        let err = backend.fetch_raw("vacuum", 10).await.unwrap_err();
        assert!(matches!(err, CollectError::SourceUnavailable(_)));
        assert!(backend.fetch("vacuum", 10).await.is_empty());
    }

    #[test]
    fn kind_is_google_patents() {
        let config = fast_config();
        let backend = GooglePatentsBackend::new(&HangingProvider, &config);
        assert_eq!(backend.kind(), BackendKind::GooglePatents);
    }
}
