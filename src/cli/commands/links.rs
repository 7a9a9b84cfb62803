//! Link listing command.

use std::path::PathBuf;

use crate::cli::icons::info;
use crate::config::Config;
use crate::services::collect_references;
use crate::utils::{dedupe_references, derive_filename, resolve_url};

/// Print `url<TAB>filename` for every unique reference in the given catalog
/// files (or the configured page files).
pub async fn cmd_links(config: &Config, files: Vec<PathBuf>) -> anyhow::Result<()> {
    let files = if files.is_empty() {
        config.response_paths()
    } else {
        files
    };

    let references = collect_references(&files).await?;
    let found = references.len();
    let unique = dedupe_references(references);

    for reference in &unique {
        let url = resolve_url(reference, &config.base_url);
        let filename = derive_filename(&url);
        println!("{}\t{}", url, filename);
    }

    eprintln!(
        "{} {} references, {} unique",
        info(),
        found,
        unique.len()
    );
    Ok(())
}
