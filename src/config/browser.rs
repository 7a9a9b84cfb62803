//! Browser session configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for the Chrome sessions used to trigger downloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Run in headless mode (default: true).
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Explicit Chrome/Chromium executable. Auto-detected when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chrome_path: Option<PathBuf>,

    /// Navigation timeout in seconds.
    #[serde(default = "default_navigation_timeout")]
    pub navigation_timeout: u64,

    /// Proxy server URL (e.g., "socks5://127.0.0.1:1080").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,

    /// Additional Chrome arguments.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub chrome_args: Vec<String>,

    /// Remote Chrome DevTools URL (e.g., "ws://localhost:9222").
    /// If set, connects to an existing browser instead of launching one.
    ///
    /// Limitations: every download shares the remote browser's profile, so
    /// cookies and cache carry over between documents. Files are saved by the
    /// remote browser into `output_dir` as seen from its own filesystem; the
    /// completion detector only finds them if that directory is shared with
    /// this machine (same host, or a mounted volume at the same path).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: default_headless(),
            chrome_path: None,
            navigation_timeout: default_navigation_timeout(),
            proxy: None,
            chrome_args: Vec::new(),
            remote_url: None,
        }
    }
}

impl BrowserConfig {
    /// Whether each download gets its own freshly launched browser and
    /// profile. False when attached to a remote browser.
    pub fn isolates_sessions(&self) -> bool {
        self.remote_url.is_none()
    }
}

pub fn default_headless() -> bool {
    true
}

pub fn default_navigation_timeout() -> u64 {
    30
}
