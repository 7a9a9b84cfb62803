//! Chrome (CDP) sessions via chromiumoxide.

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::info;

use crate::config::BrowserConfig;

#[cfg(feature = "browser")]
use std::time::Duration;

#[cfg(feature = "browser")]
use anyhow::Context;
#[cfg(feature = "browser")]
use async_trait::async_trait;
#[cfg(feature = "browser")]
use chromiumoxide::cdp::browser_protocol::browser::{
    SetDownloadBehaviorBehavior, SetDownloadBehaviorParams,
};
#[cfg(feature = "browser")]
use chromiumoxide::cdp::browser_protocol::page::NavigateParams;
#[cfg(feature = "browser")]
use chromiumoxide::{Browser, BrowserConfig as CdpBrowserConfig, Page};
#[cfg(feature = "browser")]
use futures::StreamExt;
#[cfg(feature = "browser")]
use tempfile::TempDir;
#[cfg(feature = "browser")]
use tokio::task::JoinHandle;
#[cfg(feature = "browser")]
use tracing::{debug, warn};

#[cfg(feature = "browser")]
use super::{create_download_profile, BrowserLauncher, BrowserSession, DOWNLOAD_ABORTED};

/// Common Chrome executable paths to check.
const CHROME_PATHS: &[&str] = &[
    // Linux
    "/usr/bin/google-chrome",
    "/usr/bin/google-chrome-stable",
    "/usr/bin/chromium",
    "/usr/bin/chromium-browser",
    "/snap/bin/chromium",
    // macOS
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
    // Common install locations
    "/opt/google/chrome/google-chrome",
];

const CHROME_COMMANDS: &[&str] = &[
    "google-chrome",
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
];

/// Locate a Chrome executable: explicit path first, then well-known install
/// locations, then `PATH`.
pub fn find_chrome(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        anyhow::bail!("Configured Chrome executable not found: {}", path.display());
    }

    for path in CHROME_PATHS {
        let p = Path::new(path);
        if p.exists() {
            info!("Found Chrome at: {}", path);
            return Ok(p.to_path_buf());
        }
    }

    for cmd in CHROME_COMMANDS {
        if let Ok(path) = which::which(cmd) {
            info!("Found Chrome in PATH: {}", path.display());
            return Ok(path);
        }
    }

    Err(anyhow::anyhow!(
        "Chrome/Chromium not found. Please install it:\n\
         - Arch/Manjaro: sudo pacman -S chromium\n\
         - Ubuntu/Debian: sudo apt install chromium-browser\n\
         - Fedora: sudo dnf install chromium\n\
         - Or set browser.chrome_path in the config file"
    ))
}

/// Launches one Chrome instance per download.
pub struct ChromeLauncher {
    config: BrowserConfig,
}

impl ChromeLauncher {
    pub fn new(config: BrowserConfig) -> Self {
        Self { config }
    }
}

/// A Chrome instance (or a tab on a remote one) dedicated to one download.
#[cfg(feature = "browser")]
pub struct ChromeSession {
    browser: Browser,
    page: Option<Page>,
    handler: JoinHandle<()>,
    profile: Option<TempDir>,
    navigation_timeout: Duration,
    owns_browser: bool,
}

#[cfg(feature = "browser")]
impl ChromeLauncher {
    async fn launch_local(&self, download_dir: &Path) -> Result<(Browser, JoinHandle<()>, TempDir)> {
        let chrome_path = find_chrome(self.config.chrome_path.as_deref())?;
        let profile = create_download_profile(download_dir)?;

        info!("Launching browser (headless={})", self.config.headless);

        let mut builder = CdpBrowserConfig::builder()
            .chrome_executable(chrome_path)
            .user_data_dir(profile.path());

        // with_head means NOT headless
        if !self.config.headless {
            builder = builder.with_head();
        }

        if let Some(ref proxy) = self.config.proxy {
            builder = builder.arg(format!("--proxy-server={}", proxy));
        }

        builder = builder
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--disable-infobars")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--no-sandbox")
            .arg("--disable-gpu");

        for arg in &self.config.chrome_args {
            builder = builder.arg(arg);
        }

        let config = builder
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build browser config: {}", e))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .context("Failed to launch browser")?;

        let handle = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        Ok((browser, handle, profile))
    }

    async fn connect_remote(&self, url: &str) -> Result<(Browser, JoinHandle<()>)> {
        info!("Connecting to remote browser at {}", url);

        let http_url = url
            .replace("ws://", "http://")
            .replace("wss://", "https://");
        let version_url = format!("{}/json/version", http_url.trim_end_matches('/'));

        let resp: serde_json::Value = reqwest::Client::new()
            .get(&version_url)
            .send()
            .await
            .context("Failed to connect to remote browser")?
            .json()
            .await
            .context("Failed to parse browser version info")?;

        let ws_url = resp
            .get("webSocketDebuggerUrl")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow::anyhow!("No webSocketDebuggerUrl in response"))?;

        let handler_config = chromiumoxide::handler::HandlerConfig {
            request_timeout: Duration::from_secs(self.config.navigation_timeout),
            ..Default::default()
        };

        let (browser, mut handler) = Browser::connect_with_config(ws_url, handler_config)
            .await
            .context("Failed to connect to remote browser")?;

        let handle = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        Ok((browser, handle))
    }
}

#[cfg(feature = "browser")]
#[async_trait]
impl BrowserLauncher for ChromeLauncher {
    type Session = ChromeSession;

    async fn launch(&self, download_dir: &Path) -> Result<ChromeSession> {
        let download_dir = std::fs::canonicalize(download_dir).with_context(|| {
            format!("Download directory unavailable: {}", download_dir.display())
        })?;

        if !self.config.isolates_sessions() {
            warn!(
                "Remote browser shares one profile across downloads; {} must be visible to it",
                download_dir.display()
            );
        }

        let (browser, handler, profile, owns_browser) = match self.config.remote_url.clone() {
            Some(remote_url) => {
                let (browser, handler) = self.connect_remote(&remote_url).await?;
                (browser, handler, None, false)
            }
            None => {
                let (browser, handler, profile) = self.launch_local(&download_dir).await?;
                (browser, handler, Some(profile), true)
            }
        };

        let mut session = ChromeSession {
            browser,
            page: None,
            handler,
            profile,
            navigation_timeout: Duration::from_secs(self.config.navigation_timeout),
            owns_browser,
        };

        if let Err(e) = session.prepare(&download_dir).await {
            session.close().await;
            return Err(e);
        }

        Ok(session)
    }
}

#[cfg(feature = "browser")]
impl ChromeSession {
    /// Allow downloads into `download_dir` and open the working tab.
    async fn prepare(&mut self, download_dir: &Path) -> Result<()> {
        let behavior = SetDownloadBehaviorParams::builder()
            .behavior(SetDownloadBehaviorBehavior::Allow)
            .download_path(download_dir.to_string_lossy().to_string())
            .build()
            .map_err(|e| anyhow::anyhow!("Invalid download behavior: {}", e))?;

        self.browser
            .execute(behavior)
            .await
            .context("Failed to set download behavior")?;

        let page = self.browser.new_page("about:blank").await?;
        self.page = Some(page);
        Ok(())
    }
}

#[cfg(feature = "browser")]
#[async_trait]
impl BrowserSession for ChromeSession {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        let page = self
            .page
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("browser session already closed"))?;

        info!("Navigating to {}", url);
        let nav_params = NavigateParams::builder()
            .url(url)
            .build()
            .map_err(|e| anyhow::anyhow!("Invalid URL: {}", e))?;

        let response = tokio::time::timeout(self.navigation_timeout, page.execute(nav_params))
            .await
            .map_err(|_| {
                anyhow::anyhow!(
                    "Navigation timed out after {}s for {}",
                    self.navigation_timeout.as_secs(),
                    url
                )
            })?
            .map_err(|e| anyhow::anyhow!("Navigation failed for {}: {}", url, e))?;

        match response.result.error_text.as_deref() {
            None => Ok(()),
            Some(DOWNLOAD_ABORTED) => {
                debug!("Navigation to {} was handed off as a download", url);
                Ok(())
            }
            Some(error) => Err(anyhow::anyhow!("Navigation failed for {}: {}", url, error)),
        }
    }

    async fn close(&mut self) {
        if let Some(page) = self.page.take() {
            let _ = page.close().await;
        }

        if self.owns_browser {
            if let Err(e) = self.browser.close().await {
                debug!("Browser close failed: {}", e);
            }
            let _ = self.browser.wait().await;
        }

        self.handler.abort();
        self.profile.take();
    }
}

// Stub for when browser feature is disabled
#[cfg(not(feature = "browser"))]
pub struct ChromeSession {
    _private: (),
}

#[cfg(not(feature = "browser"))]
#[async_trait::async_trait]
impl super::BrowserSession for ChromeSession {
    async fn navigate(&mut self, _url: &str) -> Result<()> {
        Err(anyhow::anyhow!(
            "Browser support not compiled. Rebuild with: cargo build --features browser"
        ))
    }

    async fn close(&mut self) {}
}

#[cfg(not(feature = "browser"))]
#[async_trait::async_trait]
impl super::BrowserLauncher for ChromeLauncher {
    type Session = ChromeSession;

    async fn launch(&self, _download_dir: &Path) -> Result<ChromeSession> {
        let _ = &self.config;
        Err(anyhow::anyhow!(
            "Browser support not compiled. Rebuild with: cargo build --features browser"
        ))
    }
}
