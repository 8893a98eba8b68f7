//! Artifact download: extension pre-filter, reachability probe, streamed
//! transfer.
//!
//! Each step short-circuits into a terminal [`DownloadResult`]. Nothing is
//! retried here; a caller that wants retries calls [`ArtifactDownloader::download`]
//! again.

use std::path::{Path, PathBuf};

use futures::StreamExt;
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::config::CollectConfig;
use crate::types::{ArtifactReference, DownloadResult, FailureReason, SkipReason};

/// Suffix for in-flight transfers; renamed away once the body completes.
const PART_SUFFIX: &str = ".part";

/// Fetches artifacts into a target directory.
#[derive(Clone)]
pub struct ArtifactDownloader {
    client: reqwest::Client,
    chunk_size: usize,
}

impl ArtifactDownloader {
    /// Create a downloader that sends requests through `client`.
    pub fn new(client: reqwest::Client, config: &CollectConfig) -> Self {
        Self {
            client,
            chunk_size: config.chunk_size,
        }
    }

    /// Download one artifact into `target_dir`.
    ///
    /// 1. Links whose path does not end in `.pdf` are skipped with no request.
    /// 2. A `HEAD` probe (following redirects) must return a 2xx status.
    /// 3. The body is streamed to `<filename>.part` and renamed onto
    ///    `target_dir/<filename>` when complete.
    ///
    /// `target_dir` must already exist. An existing file with the same name
    /// is overwritten.
    pub async fn download(&self, reference: &ArtifactReference, target_dir: &Path) -> DownloadResult {
        if !has_pdf_extension(&reference.url) {
            tracing::debug!(url = %reference.url, "skipping non-PDF link");
            return DownloadResult::Skipped(SkipReason::NotPdf);
        }

        if let Err(reason) = self.probe(&reference.url).await {
            tracing::warn!(url = %reference.url, %reason, "artifact unreachable");
            return DownloadResult::Failed(reason);
        }

        match self.transfer(reference, target_dir).await {
            Ok(path) => {
                tracing::debug!(url = %reference.url, path = %path.display(), "artifact downloaded");
                DownloadResult::Success(path)
            }
            Err(reason) => {
                tracing::warn!(url = %reference.url, %reason, "artifact transfer failed");
                DownloadResult::Failed(reason)
            }
        }
    }

    async fn probe(&self, url: &str) -> Result<(), FailureReason> {
        let response = self
            .client
            .head(url)
            .send()
            .await
            .map_err(|e| FailureReason::Unreachable {
                status: None,
                detail: e.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(FailureReason::Unreachable {
                status: Some(status.as_u16()),
                detail: status.canonical_reason().unwrap_or("unexpected status").to_owned(),
            })
        }
    }

    async fn transfer(
        &self,
        reference: &ArtifactReference,
        target_dir: &Path,
    ) -> Result<PathBuf, FailureReason> {
        let final_path = target_dir.join(&reference.filename);
        let part_path = target_dir.join(format!("{}{PART_SUFFIX}", reference.filename));

        let response = self
            .client
            .get(&reference.url)
            .send()
            .await
            .map_err(|e| FailureReason::TransferError(format!("request failed: {e}")))?
            .error_for_status()
            .map_err(|e| FailureReason::TransferError(format!("HTTP error: {e}")))?;

        let written = match self.write_body(response, &part_path).await {
            Ok(bytes) => bytes,
            Err(detail) => {
                let _ = tokio::fs::remove_file(&part_path).await;
                return Err(FailureReason::TransferError(detail));
            }
        };

        if let Err(e) = tokio::fs::rename(&part_path, &final_path).await {
            let _ = tokio::fs::remove_file(&part_path).await;
            return Err(FailureReason::TransferError(format!(
                "could not move {} into place: {e}",
                part_path.display()
            )));
        }

        tracing::trace!(bytes = written, url = %reference.url, "transfer complete");
        Ok(final_path)
    }

    /// Stream the response body into `path`, returning the byte count.
    async fn write_body(&self, response: reqwest::Response, path: &Path) -> Result<u64, String> {
        let file = tokio::fs::File::create(path)
            .await
            .map_err(|e| format!("could not create {}: {e}", path.display()))?;
        let mut writer = BufWriter::with_capacity(self.chunk_size, file);
        let mut stream = response.bytes_stream();
        let mut written: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| format!("body read failed: {e}"))?;
            writer
                .write_all(&chunk)
                .await
                .map_err(|e| format!("write to {} failed: {e}", path.display()))?;
            written += chunk.len() as u64;
        }

        writer
            .flush()
            .await
            .map_err(|e| format!("flush of {} failed: {e}", path.display()))?;
        Ok(written)
    }
}

/// Returns `true` when the link's path ends in `.pdf`, ignoring case,
/// query string and fragment.
pub fn has_pdf_extension(link: &str) -> bool {
    let path = match url::Url::parse(link) {
        Ok(parsed) => parsed.path().to_owned(),
        Err(_) => link.split(['?', '#']).next().unwrap_or(link).to_owned(),
    };
    path.to_ascii_lowercase().ends_with(".pdf")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_extension_is_case_insensitive() {
        assert!(has_pdf_extension("https://a.example/US1.pdf"));
        assert!(has_pdf_extension("https://a.example/US1.PDF"));
        assert!(has_pdf_extension("https://a.example/US1.Pdf?download=1"));
        assert!(has_pdf_extension("/relative/US1.pdf#page=3"));
    }

    #[test]
    fn non_pdf_links_rejected() {
        assert!(!has_pdf_extension("https://a.example/patent/US1/en"));
        assert!(!has_pdf_extension("https://a.example/US1.pdf.html"));
        assert!(!has_pdf_extension("https://a.example/?file=US1.pdf"));
        assert!(!has_pdf_extension(""));
    }

    #[tokio::test]
    async fn non_pdf_skipped_without_network() {
        // Port 9 on localhost is never contacted: the pre-filter short-circuits.
        let downloader =
            ArtifactDownloader::new(reqwest::Client::new(), &CollectConfig::default());
        let reference = ArtifactReference::from_link("http://127.0.0.1:9/patent/US1/en")
            .expect("valid link");
        let dir = tempfile::tempdir().expect("tempdir");

        let result = downloader.download(&reference, dir.path()).await;
        assert_eq!(result, DownloadResult::Skipped(SkipReason::NotPdf));
        assert_eq!(std::fs::read_dir(dir.path()).expect("read dir").count(), 0);
    }
}
