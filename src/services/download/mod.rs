//! Single-document download through a browser session.
//!
//! Each attempt gets its own session: launch, navigate to the document URL,
//! wait for the file to land in the output directory, move it to its
//! canonical name, close. Failures are reported as [`DownloadOutcome::Failed`]
//! so one bad document never stops a batch.

mod detector;
mod types;

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::browser::{BrowserLauncher, BrowserSession};

pub use detector::{snapshot_dir, wait_for_download, POLL_INTERVAL};
pub use types::{DownloadError, DownloadOutcome, DownloadTask};

/// Suffix of files the completion detector waits for.
pub const PDF_SUFFIX: &str = ".pdf";

/// Downloads documents one at a time using sessions from `L`.
pub struct Downloader<L: BrowserLauncher> {
    launcher: L,
    timeout: Duration,
}

impl<L: BrowserLauncher> Downloader<L> {
    /// Create a downloader that waits up to `timeout` for each file.
    pub fn new(launcher: L, timeout: Duration) -> Self {
        Self { launcher, timeout }
    }

    /// Download `url` into `output_dir` as `filename`.
    ///
    /// An existing file at the target path short-circuits without launching
    /// a browser.
    pub async fn download(&self, url: &str, filename: &str, output_dir: &Path) -> DownloadOutcome {
        let mut task = DownloadTask::new(url, filename, output_dir);

        match self.run(&mut task).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Download failed for {}: {}", url, e);
                DownloadOutcome::Failed {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn run(&self, task: &mut DownloadTask) -> Result<DownloadOutcome, DownloadError> {
        if task.filename.is_empty() {
            return Err(DownloadError::EmptyFilename(task.url.clone()));
        }

        tokio::fs::create_dir_all(&task.output_dir)
            .await
            .map_err(|e| DownloadError::io(&task.output_dir, e))?;

        let target = task.target_path();
        if tokio::fs::try_exists(&target).await.unwrap_or(false) {
            debug!("Skipping {}, already at {}", task.url, target.display());
            return Ok(DownloadOutcome::AlreadyExists { path: target });
        }

        let mut session = self
            .launcher
            .launch(&task.output_dir)
            .await
            .map_err(DownloadError::Launch)?;

        let result = self.fetch_with_session(&mut session, task).await;

        // Close the session regardless of the fetch outcome
        session.close().await;

        let path = result?;
        info!("Downloaded {} -> {}", task.url, path.display());
        Ok(DownloadOutcome::Downloaded { path })
    }

    async fn fetch_with_session(
        &self,
        session: &mut L::Session,
        task: &mut DownloadTask,
    ) -> Result<PathBuf, DownloadError> {
        task.snapshot = snapshot_dir(&task.output_dir)
            .await
            .map_err(|e| DownloadError::io(&task.output_dir, e))?;

        session
            .navigate(&task.url)
            .await
            .map_err(DownloadError::Navigation)?;

        let detected =
            wait_for_download(&task.output_dir, &task.snapshot, PDF_SUFFIX, self.timeout).await?;

        let target = task.target_path();
        if detected != target {
            tokio::fs::rename(&detected, &target)
                .await
                .map_err(|e| DownloadError::io(&detected, e))?;
        }
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// What the fake browser does on navigation.
    #[derive(Clone, Copy)]
    enum Behavior {
        /// Write `served.pdf` into the download dir.
        Serve,
        /// Navigation succeeds but nothing is written.
        Silent,
        /// Navigation itself errors.
        Refuse,
    }

    #[derive(Clone)]
    struct FakeLauncher {
        behavior: Behavior,
        launches: Arc<AtomicUsize>,
        closes: Arc<AtomicUsize>,
    }

    impl FakeLauncher {
        fn new(behavior: Behavior) -> Self {
            Self {
                behavior,
                launches: Arc::new(AtomicUsize::new(0)),
                closes: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    struct FakeSession {
        behavior: Behavior,
        dir: PathBuf,
        closes: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl BrowserSession for FakeSession {
        async fn navigate(&mut self, url: &str) -> anyhow::Result<()> {
            match self.behavior {
                Behavior::Serve => {
                    std::fs::write(self.dir.join("served.pdf"), url.as_bytes())?;
                    Ok(())
                }
                Behavior::Silent => Ok(()),
                Behavior::Refuse => anyhow::bail!("net::ERR_NAME_NOT_RESOLVED"),
            }
        }

        async fn close(&mut self) {
            self.closes.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl BrowserLauncher for FakeLauncher {
        type Session = FakeSession;

        async fn launch(&self, download_dir: &Path) -> anyhow::Result<FakeSession> {
            self.launches.fetch_add(1, Ordering::SeqCst);
            Ok(FakeSession {
                behavior: self.behavior,
                dir: download_dir.to_path_buf(),
                closes: self.closes.clone(),
            })
        }
    }

    #[tokio::test]
    async fn test_download_moves_file_to_canonical_name() {
        let dir = tempfile::tempdir().unwrap();
        let launcher = FakeLauncher::new(Behavior::Serve);
        let downloader = Downloader::new(launcher.clone(), Duration::from_secs(2));

        let outcome = downloader
            .download("https://example.com/docs/x.pdf", "x.pdf", dir.path())
            .await;

        let expected = dir.path().join("x.pdf");
        assert_eq!(outcome, DownloadOutcome::Downloaded { path: expected.clone() });
        assert!(expected.exists());
        assert!(!dir.path().join("served.pdf").exists());
        assert_eq!(launcher.launches.load(Ordering::SeqCst), 1);
        assert_eq!(launcher.closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_existing_target_skips_browser() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("x.pdf"), b"%PDF").unwrap();
        let launcher = FakeLauncher::new(Behavior::Serve);
        let downloader = Downloader::new(launcher.clone(), Duration::from_secs(1));

        let outcome = downloader
            .download("https://example.com/x.pdf", "x.pdf", dir.path())
            .await;

        assert!(matches!(outcome, DownloadOutcome::AlreadyExists { .. }));
        assert_eq!(launcher.launches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_timeout_is_failure_and_session_closed() {
        let dir = tempfile::tempdir().unwrap();
        let launcher = FakeLauncher::new(Behavior::Silent);
        let downloader = Downloader::new(launcher.clone(), Duration::from_millis(200));

        let outcome = downloader
            .download("https://example.com/y.pdf", "y.pdf", dir.path())
            .await;

        match outcome {
            DownloadOutcome::Failed { url, reason } => {
                assert_eq!(url, "https://example.com/y.pdf");
                assert!(reason.contains("Timed out"), "{}", reason);
            }
            other => panic!("expected failure, got {:?}", other),
        }
        assert_eq!(launcher.closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_navigation_error_is_failure_and_session_closed() {
        let dir = tempfile::tempdir().unwrap();
        let launcher = FakeLauncher::new(Behavior::Refuse);
        let downloader = Downloader::new(launcher.clone(), Duration::from_secs(1));

        let outcome = downloader
            .download("https://nowhere.invalid/z.pdf", "z.pdf", dir.path())
            .await;

        assert!(outcome.is_failure());
        assert_eq!(launcher.launches.load(Ordering::SeqCst), 1);
        assert_eq!(launcher.closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_filename_fails_without_launch() {
        let dir = tempfile::tempdir().unwrap();
        let launcher = FakeLauncher::new(Behavior::Serve);
        let downloader = Downloader::new(launcher.clone(), Duration::from_secs(1));

        let outcome = downloader.download("https://example.com/", "", dir.path()).await;

        assert!(outcome.is_failure());
        assert_eq!(launcher.launches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_creates_missing_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("PDFs");
        let downloader = Downloader::new(FakeLauncher::new(Behavior::Serve), Duration::from_secs(2));

        let outcome = downloader
            .download("https://example.com/a.pdf", "a.pdf", &out)
            .await;

        assert_eq!(outcome, DownloadOutcome::Downloaded { path: out.join("a.pdf") });
    }
}
