//! Configuration file for the harvest host.

use patent_search::CollectConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which sources a run queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum BackendChoice {
    /// Google Patents through the static page provider.
    GooglePatents,
    /// PatentsView query API.
    #[default]
    PatentsView,
    /// USPTO full-text search API.
    Uspto,
    /// Every source, merged.
    All,
}

/// Top-level configuration for the harvest host.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestConfig {
    /// Source selection, limits, timeouts and endpoints.
    pub search: SearchSection,
    /// Where artifacts go.
    pub output: OutputSection,
}

/// `[search]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSection {
    /// Sources to query when `--backend` is not given.
    pub backend: BackendChoice,
    /// Result cap per source.
    pub max_results: usize,
    /// HTTP request timeout in seconds.
    pub timeout_seconds: u64,
    /// Render provider call timeout in seconds.
    pub render_timeout_seconds: u64,
    /// Wait after loading the Google Patents landing page, in milliseconds.
    pub navigate_settle_ms: u64,
    /// Wait after submitting the Google Patents search, in milliseconds.
    pub submit_settle_ms: u64,
    /// Parallel artifact downloads.
    pub download_concurrency: usize,
    /// Transfer write buffer in bytes.
    pub chunk_size: usize,
    /// Fixed User-Agent (None = rotate).
    pub user_agent: Option<String>,
    /// Google Patents landing page.
    pub google_patents_url: String,
    /// PatentsView endpoint.
    pub patentsview_url: String,
    /// USPTO search endpoint.
    pub uspto_search_url: String,
}

impl Default for SearchSection {
    fn default() -> Self {
        let defaults = CollectConfig::default();
        Self {
            backend: BackendChoice::default(),
            max_results: 10,
            timeout_seconds: defaults.timeout_seconds,
            render_timeout_seconds: defaults.render_timeout_seconds,
            navigate_settle_ms: defaults.navigate_settle_ms,
            submit_settle_ms: defaults.submit_settle_ms,
            download_concurrency: defaults.download_concurrency,
            chunk_size: defaults.chunk_size,
            user_agent: defaults.user_agent,
            google_patents_url: defaults.google_patents_url,
            patentsview_url: defaults.patentsview_url,
            uspto_search_url: defaults.uspto_search_url,
        }
    }
}

/// `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// Fixed output directory. When unset, a timestamped directory is
    /// created in the working directory.
    pub dir: Option<PathBuf>,
    /// Prefix of the timestamped directory name.
    pub prefix: String,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            dir: None,
            prefix: "patent_pdfs".to_owned(),
        }
    }
}

impl HarvestConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| crate::error::HarvestError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &std::path::Path) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::HarvestError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `~/.config/patent-harvest/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config)
                .join("patent-harvest")
                .join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("patent-harvest")
                .join("config.toml")
        } else {
            PathBuf::from("/tmp/patent-harvest-config/config.toml")
        }
    }

    /// The collection settings for the pipeline.
    pub fn collect_config(&self) -> CollectConfig {
        let s = &self.search;
        CollectConfig {
            timeout_seconds: s.timeout_seconds,
            render_timeout_seconds: s.render_timeout_seconds,
            navigate_settle_ms: s.navigate_settle_ms,
            submit_settle_ms: s.submit_settle_ms,
            download_concurrency: s.download_concurrency,
            chunk_size: s.chunk_size,
            user_agent: s.user_agent.clone(),
            google_patents_url: s.google_patents_url.clone(),
            patentsview_url: s.patentsview_url.clone(),
            uspto_search_url: s.uspto_search_url.clone(),
        }
    }
}
