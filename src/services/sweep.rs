//! Post-download integrity and filename sweep.
//!
//! Walks the output directory, deletes PDFs that do not parse or have no
//! pages, and lowercases the names of the rest. An existing lowercase file is
//! never overwritten; the clash is reported instead.

use std::path::{Path, PathBuf};

use lopdf::Document;
use tracing::{debug, info, warn};

/// Summary of one sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// PDFs examined.
    pub scanned: usize,
    /// Corrupt or empty PDFs deleted.
    pub removed: usize,
    /// Files renamed to their lowercase name.
    pub renamed: usize,
    /// Files left alone because their lowercase name was taken.
    pub collisions: Vec<PathBuf>,
}

/// Page count of the PDF at `path`, or why it is unusable.
pub fn validate_pdf(path: &Path) -> Result<usize, String> {
    let doc = Document::load(path).map_err(|e| e.to_string())?;
    match doc.get_pages().len() {
        0 => Err("document has no pages".to_string()),
        pages => Ok(pages),
    }
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// Every `.pdf` file (any case) under `dir`, sorted. Unreadable
/// subdirectories are logged and skipped.
pub fn find_pdfs(dir: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let mut pending = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        let entries = match std::fs::read_dir(&current) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Cannot read {}: {}", current.display(), e);
                continue;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            match entry.file_type() {
                Ok(t) if t.is_dir() => pending.push(path),
                Ok(t) if t.is_file() && is_pdf(&path) => found.push(path),
                _ => {}
            }
        }
    }

    found.sort();
    found
}

/// Sibling path of `path` with the file name lowercased, if it has any
/// uppercase characters.
fn lowercase_target(path: &Path) -> Option<PathBuf> {
    let name = path.file_name()?.to_str()?;
    let lower = name.to_lowercase();
    (lower != name).then(|| path.with_file_name(lower))
}

/// Whether two paths name the same file (case-insensitive filesystems).
fn same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Run the sweep over `dir`. A missing directory yields an empty report.
pub fn sweep(dir: &Path) -> SweepReport {
    let mut report = SweepReport::default();

    if !dir.exists() {
        warn!("Sweep directory {} does not exist", dir.display());
        return report;
    }

    for path in find_pdfs(dir) {
        report.scanned += 1;

        match validate_pdf(&path) {
            Ok(pages) => debug!("{} ok ({} pages)", path.display(), pages),
            Err(reason) => {
                warn!("Removing invalid PDF {}: {}", path.display(), reason);
                match std::fs::remove_file(&path) {
                    Ok(()) => report.removed += 1,
                    Err(e) => warn!("Failed to remove {}: {}", path.display(), e),
                }
                continue;
            }
        }

        let Some(target) = lowercase_target(&path) else {
            continue;
        };

        if target.exists() && !same_file(&path, &target) {
            warn!(
                "Not renaming {}: {} already exists",
                path.display(),
                target.display()
            );
            report.collisions.push(path);
            continue;
        }

        match std::fs::rename(&path, &target) {
            Ok(()) => {
                debug!("Renamed {} -> {}", path.display(), target.display());
                report.renamed += 1;
            }
            Err(e) => warn!("Failed to rename {}: {}", path.display(), e),
        }
    }

    info!(
        "Sweep of {}: {} scanned, {} removed, {} renamed, {} collisions",
        dir.display(),
        report.scanned,
        report.removed,
        report.renamed,
        report.collisions.len()
    );
    report
}
