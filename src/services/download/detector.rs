//! Download completion detection.
//!
//! Browsers write to a temporary name (`*.crdownload`) and rename on
//! completion, so the first new entry carrying the expected suffix is a
//! finished download.

use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use super::DownloadError;

/// Delay between directory listings while waiting.
pub const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Names of all entries currently in `dir`.
pub async fn snapshot_dir(dir: &Path) -> std::io::Result<HashSet<OsString>> {
    let mut names = HashSet::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        names.insert(entry.file_name());
    }
    Ok(names)
}

/// New regular files in `dir` whose name ends with `suffix` (ASCII
/// case-insensitive), excluding anything in `before`. Smallest name first.
async fn new_matches(
    dir: &Path,
    before: &HashSet<OsString>,
    suffix: &str,
) -> std::io::Result<Vec<OsString>> {
    let mut matches = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        if before.contains(&name) {
            continue;
        }
        if !name.to_string_lossy().to_lowercase().ends_with(suffix) {
            continue;
        }
        if entry.file_type().await.map(|t| t.is_file()).unwrap_or(false) {
            matches.push(name);
        }
    }
    matches.sort();
    Ok(matches)
}

/// Wait until a file ending in `suffix` appears in `dir` that was not in
/// `before`, or fail with [`DownloadError::Timeout`] once `timeout` elapses.
///
/// The directory is checked at least once even with a zero timeout. When
/// several candidates show up in the same listing the lexicographically
/// smallest name is returned.
pub async fn wait_for_download(
    dir: &Path,
    before: &HashSet<OsString>,
    suffix: &str,
    timeout: Duration,
) -> Result<PathBuf, DownloadError> {
    let deadline = Instant::now() + timeout;
    let suffix = suffix.to_lowercase();

    loop {
        let found = new_matches(dir, before, &suffix)
            .await
            .map_err(|e| DownloadError::io(dir, e))?;
        if let Some(name) = found.into_iter().next() {
            let path = dir.join(name);
            debug!("Detected new download {}", path.display());
            return Ok(path);
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(DownloadError::Timeout {
                dir: dir.to_path_buf(),
                suffix,
                timeout,
            });
        }
        tokio::time::sleep(POLL_INTERVAL.min(deadline - now)).await;
    }
}
