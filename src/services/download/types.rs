//! Download task, outcome and error types.

use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

/// State for a single download attempt. Never reused across attempts.
#[derive(Debug, Clone)]
pub struct DownloadTask {
    pub url: String,
    pub filename: String,
    pub output_dir: PathBuf,
    /// Directory entries present before navigation started.
    pub snapshot: HashSet<OsString>,
}

impl DownloadTask {
    pub fn new(url: &str, filename: &str, output_dir: &Path) -> Self {
        Self {
            url: url.to_string(),
            filename: filename.to_string(),
            output_dir: output_dir.to_path_buf(),
            snapshot: HashSet::new(),
        }
    }

    /// Canonical destination of the downloaded file.
    pub fn target_path(&self) -> PathBuf {
        self.output_dir.join(&self.filename)
    }
}

/// Result of one download attempt. Failures are data, not errors: the batch
/// records them and moves on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// File downloaded and moved to its canonical path.
    Downloaded { path: PathBuf },
    /// A file was already present at the canonical path; nothing was fetched.
    AlreadyExists { path: PathBuf },
    /// The attempt failed; `reason` is suitable for logs and reports.
    Failed { url: String, reason: String },
}

impl DownloadOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Reasons a single download attempt can fail.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Cannot derive a filename from {0}")]
    EmptyFilename(String),
    #[error("Failed to launch browser: {0:#}")]
    Launch(anyhow::Error),
    #[error("{0:#}")]
    Navigation(anyhow::Error),
    #[error("Timed out after {}ms waiting for a *{} file in {}", .timeout.as_millis(), .suffix, .dir.display())]
    Timeout {
        dir: PathBuf,
        suffix: String,
        timeout: Duration,
    },
    #[error("I/O error on {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DownloadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
