//! Rendered-page provider capability used by the Google Patents backend.
//!
//! The provider is owned by the caller: it is launched before a run, lent
//! to the backend by reference, and released by the caller afterwards
//! whatever the outcome. The backend only drives it through three calls.

use std::sync::Mutex;

use scraper::{Html, Selector};
use url::Url;

use crate::error::CollectError;

/// Something that can load a page, fill in a form field, and hand back the
/// resulting markup. Headless browsers are the usual implementation.
pub trait RenderProvider: Send + Sync {
    /// Load `url` as the current page.
    fn navigate(
        &self,
        url: &str,
    ) -> impl std::future::Future<Output = Result<(), CollectError>> + Send;

    /// Type `text` into the element matched by `selector` and submit it.
    fn type_and_submit(
        &self,
        selector: &str,
        text: &str,
    ) -> impl std::future::Future<Output = Result<(), CollectError>> + Send;

    /// Return the markup of the current page as rendered so far.
    fn rendered_html(&self) -> impl std::future::Future<Output = Result<String, CollectError>> + Send;
}

/// Current page held by [`StaticPageProvider`].
#[derive(Debug, Default, Clone)]
struct Page {
    url: Option<Url>,
    html: String,
}

/// A browserless [`RenderProvider`] built on plain HTTP.
///
/// `type_and_submit` emulates a GET form submission: it finds the input
/// matched by the selector on the current page, reads its `name`, resolves
/// the enclosing form's `action` against the page URL, and fetches
/// `action?name=text`. Pages that build their results with script come back
/// without result markup.
pub struct StaticPageProvider {
    client: reqwest::Client,
    page: Mutex<Page>,
}

impl StaticPageProvider {
    /// Create a provider that issues requests through `client`.
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            page: Mutex::new(Page::default()),
        }
    }

    fn current(&self) -> Result<Page, CollectError> {
        self.page
            .lock()
            .map(|p| p.clone())
            .map_err(|_| CollectError::Render("page state lock poisoned".into()))
    }

    fn replace(&self, page: Page) -> Result<(), CollectError> {
        let mut guard = self
            .page
            .lock()
            .map_err(|_| CollectError::Render("page state lock poisoned".into()))?;
        *guard = page;
        Ok(())
    }

    async fn load(&self, url: Url) -> Result<(), CollectError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| CollectError::Render(format!("page request failed: {e}")))?
            .error_for_status()
            .map_err(|e| CollectError::Render(format!("page HTTP error: {e}")))?;

        let final_url = response.url().clone();
        let html = response
            .text()
            .await
            .map_err(|e| CollectError::Render(format!("page read failed: {e}")))?;

        tracing::trace!(bytes = html.len(), url = %final_url, "page loaded");
        self.replace(Page {
            url: Some(final_url),
            html,
        })
    }
}

impl RenderProvider for StaticPageProvider {
    async fn navigate(&self, url: &str) -> Result<(), CollectError> {
        let url = Url::parse(url)
            .map_err(|e| CollectError::Render(format!("invalid navigation URL {url}: {e}")))?;
        self.load(url).await
    }

    async fn type_and_submit(&self, selector: &str, text: &str) -> Result<(), CollectError> {
        let page = self.current()?;
        let base = page
            .url
            .ok_or_else(|| CollectError::Render("submit before navigate".into()))?;
        let target = form_submission_url(&page.html, &base, selector, text)?;
        self.load(target).await
    }

    async fn rendered_html(&self) -> Result<String, CollectError> {
        Ok(self.current()?.html)
    }
}

/// Resolve the GET URL a browser would request when submitting `text`
/// through the field matched by `selector`.
pub(crate) fn form_submission_url(
    html: &str,
    base: &Url,
    selector: &str,
    text: &str,
) -> Result<Url, CollectError> {
    let document = Html::parse_document(html);
    let field_sel = Selector::parse(selector)
        .map_err(|e| CollectError::Render(format!("invalid selector {selector}: {e:?}")))?;

    let field = document
        .select(&field_sel)
        .next()
        .ok_or_else(|| CollectError::Render(format!("no element matches {selector}")))?;
    let name = field
        .value()
        .attr("name")
        .ok_or_else(|| CollectError::Render(format!("element {selector} has no name")))?;

    let action = field
        .ancestors()
        .filter_map(scraper::ElementRef::wrap)
        .find(|el| el.value().name() == "form")
        .and_then(|form| form.value().attr("action"))
        .filter(|action| !action.trim().is_empty());

    let mut target = match action {
        Some(action) => base
            .join(action)
            .map_err(|e| CollectError::Render(format!("invalid form action {action}: {e}")))?,
        None => base.clone(),
    };
    target.set_query(None);
    target.set_fragment(None);
    target.query_pairs_mut().append_pair(name, text);
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_PAGE: &str = r#"<!DOCTYPE html>
<html><body>
  <form action="/search" method="get">
    <input type="text" name="q" placeholder="Search">
  </form>
</body></html>"#;

    fn base() -> Url {
        Url::parse("https://patents.example.com/?hl=en").expect("valid URL")
    }

    #[test]
    fn submission_uses_form_action_and_field_name() {
        let url = form_submission_url(SEARCH_PAGE, &base(), "input[name=\"q\"]", "cordless vacuum")
            .expect("should resolve");
        assert_eq!(url.as_str(), "https://patents.example.com/search?q=cordless+vacuum");
    }

    #[test]
    fn submission_without_form_targets_current_page() {
        let html = r#"<html><body><input name="query"></body></html>"#;
        let url = form_submission_url(html, &base(), "input", "dyson").expect("should resolve");
        assert_eq!(url.as_str(), "https://patents.example.com/?query=dyson");
    }

    #[test]
    fn submission_fails_when_selector_matches_nothing() {
        let err = form_submission_url(SEARCH_PAGE, &base(), "textarea", "x").unwrap_err();
        assert!(err.to_string().contains("no element matches"));
    }

    #[test]
    fn submission_fails_for_nameless_field() {
        let html = r#"<html><body><form><input id="q"></form></body></html>"#;
        let err = form_submission_url(html, &base(), "#q", "x").unwrap_err();
        assert!(err.to_string().contains("has no name"));
    }

    #[tokio::test]
    async fn submit_before_navigate_is_render_error() {
        let provider = StaticPageProvider::new(reqwest::Client::new());
        let err = provider.type_and_submit("input", "x").await.unwrap_err();
        assert!(matches!(err, CollectError::Render(_)));
    }

    #[tokio::test]
    async fn failed_page_load_is_render_error() {
        use wiremock::matchers::method;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let provider = StaticPageProvider::new(reqwest::Client::new());
        let err = provider.navigate(&server.uri()).await.unwrap_err();
        assert!(matches!(err, CollectError::Render(_)));
        assert!(err.to_string().contains("page HTTP error"));
    }

    #[tokio::test]
    async fn navigate_then_submit_loads_results_page() {
        use wiremock::matchers::{method, path, query_param};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SEARCH_PAGE))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "robot mower"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<p>results</p>"))
            .mount(&server)
            .await;

        let provider = StaticPageProvider::new(reqwest::Client::new());
        provider.navigate(&format!("{}/", server.uri())).await.expect("navigate");
        provider
            .type_and_submit("input[name=\"q\"]", "robot mower")
            .await
            .expect("submit");
        assert_eq!(provider.rendered_html().await.expect("html"), "<p>results</p>");
    }

    #[tokio::test]
    async fn rendered_html_is_empty_before_navigation() {
        let provider = StaticPageProvider::new(reqwest::Client::new());
        assert_eq!(provider.rendered_html().await.expect("html"), "");
    }

    #[test]
    fn provider_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StaticPageProvider>();
    }
}
