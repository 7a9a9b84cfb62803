//! Throwaway Chrome profiles.
//!
//! Each session runs on its own user data directory so nothing (cookies,
//! half-finished downloads, download prompts) carries over between documents.
//! The profile preferences route PDFs to the download directory instead of the
//! built-in viewer.

use std::path::Path;

use anyhow::Context;
use serde_json::{json, Value};
use tempfile::TempDir;

/// Chrome `Preferences` contents for a download-only profile.
pub fn download_preferences(download_dir: &Path) -> Value {
    json!({
        "download": {
            "default_directory": download_dir.to_string_lossy(),
            "prompt_for_download": false,
            "directory_upgrade": true
        },
        "plugins": {
            "always_open_pdf_externally": true
        }
    })
}

/// Create a temporary user data directory with download preferences applied.
///
/// The directory is removed when the returned `TempDir` is dropped.
pub fn create_download_profile(download_dir: &Path) -> anyhow::Result<TempDir> {
    let profile = tempfile::Builder::new()
        .prefix("sdsacquire-profile-")
        .tempdir()
        .context("Failed to create browser profile directory")?;

    let default_dir = profile.path().join("Default");
    std::fs::create_dir_all(&default_dir).context("Failed to create profile Default dir")?;

    let prefs = serde_json::to_vec(&download_preferences(download_dir))?;
    std::fs::write(default_dir.join("Preferences"), prefs)
        .context("Failed to write profile preferences")?;

    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_preferences() {
        let prefs = download_preferences(Path::new("/data/PDFs"));
        assert_eq!(prefs["download"]["default_directory"], "/data/PDFs");
        assert_eq!(prefs["download"]["prompt_for_download"], false);
        assert_eq!(prefs["plugins"]["always_open_pdf_externally"], true);
    }

    #[test]
    fn test_profile_is_removed_on_drop() {
        let profile = create_download_profile(Path::new("/data/PDFs")).unwrap();
        let prefs_path = profile.path().join("Default").join("Preferences");
        let written: Value = serde_json::from_slice(&std::fs::read(&prefs_path).unwrap()).unwrap();
        assert_eq!(written["plugins"]["always_open_pdf_externally"], true);

        let root = profile.path().to_path_buf();
        drop(profile);
        assert!(!root.exists());
    }
}
