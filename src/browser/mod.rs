//! Browser sessions used to trigger document downloads.
//!
//! The download step never talks to Chrome directly: it asks a
//! [`BrowserLauncher`] for a fresh [`BrowserSession`] bound to a download
//! directory, navigates once, and closes it. The Chrome implementation lives
//! behind the `browser` feature.

mod chrome;
mod profile;

pub use chrome::{find_chrome, ChromeLauncher, ChromeSession};
pub use profile::{create_download_profile, download_preferences};

use std::path::Path;

use async_trait::async_trait;

/// Navigation result Chrome reports when a URL is handled as a download
/// instead of being rendered.
pub const DOWNLOAD_ABORTED: &str = "net::ERR_ABORTED";

/// A live browser session bound to one download directory.
#[async_trait]
pub trait BrowserSession: Send {
    /// Navigate to `url`, which is expected to start a file download.
    async fn navigate(&mut self, url: &str) -> anyhow::Result<()>;

    /// Tear down the session. Must be safe to call after a failed navigation.
    async fn close(&mut self);
}

/// Factory for isolated browser sessions.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    type Session: BrowserSession;

    /// Start a session whose downloads land in `download_dir` without prompting.
    async fn launch(&self, download_dir: &Path) -> anyhow::Result<Self::Session>;
}
