//! Configuration management for sdsacquire.
//!
//! All settings have compiled-in defaults matching the public SDS viewer
//! deployment. A config file (discovered with the prefer crate, or passed via
//! `--config`) overrides them; a handful of CLI flags override the file.

pub mod browser;
mod loader;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

pub use browser::BrowserConfig;
pub use loader::{load_config_with_options, LoadOptions};

/// Catalog API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://apisdsviewer.fmc.com/api/ReportData/GetPagedData";

/// Base URL prepended to relative `pdfname` references.
pub const DEFAULT_BASE_URL: &str = "https://sdsviewer.fmc.com/SDS_DOCS/";

/// Default hard ceiling on download attempts per run.
pub const DEFAULT_DOWNLOAD_CAP: usize = 2500;

/// Default wait for a download to land on disk, in seconds.
pub const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 3;

/// Configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catalog API endpoint (POST).
    pub endpoint: String,
    /// Base URL for relative document references.
    pub base_url: String,
    /// Number of catalog items requested per page.
    #[serde(alias = "pageSize")]
    pub page_size: u32,
    /// Number of catalog pages fetched per run (pages 1..=pages).
    pub pages: u32,
    /// Maximum download attempts per run (0 = unlimited).
    #[serde(alias = "downloadCap")]
    pub download_cap: usize,
    /// Seconds to wait for each download to appear on disk.
    #[serde(alias = "downloadTimeoutSeconds")]
    pub download_timeout_seconds: u64,
    /// Directory receiving the downloaded PDFs.
    #[serde(alias = "outputDir")]
    pub output_dir: PathBuf,
    /// Directory holding the persisted catalog responses.
    pub response_dir: PathBuf,
    /// Base name of catalog response files (`{base}_page_{n}.json`).
    pub response_file_base: String,
    /// Catalog request timeout in seconds.
    pub request_timeout: u64,
    /// User agent for catalog requests ("impersonate" for a random browser UA).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Extra headers sent with catalog requests.
    pub headers: BTreeMap<String, String>,
    /// Browser session settings.
    pub browser: BrowserConfig,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: 5000,
            pages: 2,
            download_cap: DEFAULT_DOWNLOAD_CAP,
            download_timeout_seconds: DEFAULT_DOWNLOAD_TIMEOUT_SECS,
            output_dir: PathBuf::from("PDFs"),
            response_dir: PathBuf::from("."),
            response_file_base: "api_response".to_string(),
            request_timeout: 60,
            user_agent: None,
            headers: default_headers(),
            browser: BrowserConfig::default(),
            source_path: None,
        }
    }
}

/// Headers the catalog API expects from its own web front-end.
fn default_headers() -> BTreeMap<String, String> {
    [
        ("accept", "application/json, text/plain, */*"),
        ("accept-language", "en-US,en;q=0.9"),
        ("cache-control", "no-cache"),
        ("origin", "https://sdsviewer.fmc.com"),
        ("pragma", "no-cache"),
        ("referer", "https://sdsviewer.fmc.com/"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

impl Config {
    /// Load configuration using prefer crate for discovery.
    /// Falls back to defaults when no `sdsacquire` config file is found.
    pub async fn load() -> Self {
        match prefer::load("sdsacquire").await {
            Ok(pref_config) => {
                if let Some(path) = pref_config.source_path() {
                    match Self::load_from_path(path).await {
                        Ok(config) => config,
                        Err(e) => {
                            tracing::warn!("Ignoring unreadable config file: {:#}", e);
                            Self::default()
                        }
                    }
                } else {
                    Self::default()
                }
            }
            Err(_) => Self::default(),
        }
    }

    /// Load configuration from a specific file path.
    /// Supports JSON, TOML and YAML based on file extension.
    pub async fn load_from_path(path: &Path) -> anyhow::Result<Self> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let mut config = Self::parse(&contents, path)?;
        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parse config contents, choosing the format from the path extension.
    pub fn parse(contents: &str, path: &Path) -> anyhow::Result<Self> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

        let config = match ext {
            "toml" => toml::from_str(contents).context("Failed to parse TOML config")?,
            "yaml" | "yml" => serde_yaml::from_str(contents).context("Failed to parse YAML config")?,
            _ => serde_json::from_str(contents).context("Failed to parse JSON config")?,
        };
        Ok(config)
    }

    /// Resolve a configured path.
    /// - Paths starting with ~ are expanded
    /// - Absolute paths are returned as-is
    /// - Relative paths are resolved against `base_dir`
    pub fn resolve_path(path: &Path, base_dir: &Path) -> PathBuf {
        let raw = path.to_string_lossy();
        let expanded = shellexpand::tilde(raw.as_ref());
        let path = Path::new(expanded.as_ref());

        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }

    /// Make `output_dir` and `response_dir` absolute relative to `base_dir`.
    pub fn resolve_paths(&mut self, base_dir: &Path) {
        self.output_dir = Self::resolve_path(&self.output_dir, base_dir);
        self.response_dir = Self::resolve_path(&self.response_dir, base_dir);
    }

    /// Download wait as a Duration.
    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_seconds)
    }

    /// Catalog request timeout as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Path of the persisted response for a catalog page.
    pub fn response_path(&self, page: u32) -> PathBuf {
        self.response_dir
            .join(format!("{}_page_{}.json", self.response_file_base, page))
    }

    /// Paths of every response file a run produces, in page order.
    pub fn response_paths(&self) -> Vec<PathBuf> {
        (1..=self.pages).map(|page| self.response_path(page)).collect()
    }

    /// Serialize the effective configuration as TOML.
    pub fn to_toml(&self) -> anyhow::Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}
