//! Batch orchestration.
//!
//! Fetch the catalog, extract and deduplicate references, download them one
//! at a time up to the cap, then sweep the output directory. Progress goes
//! out as [`BatchEvent`]s; the returned [`BatchReport`] is the final tally.

mod types;

use std::path::{Path, PathBuf};

use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::browser::BrowserLauncher;
use crate::catalog::{extract_pdfnames, remove_stale_responses, CatalogError, CatalogSource};
use crate::config::Config;
use crate::services::download::Downloader;
use crate::services::sweep::{sweep, SweepReport};
use crate::utils::{dedupe_references, derive_filename, resolve_url};

pub use types::{BatchEvent, BatchReport};

/// Extract references from each response file in order and concatenate them.
///
/// Missing files are logged and skipped; unreadable or malformed ones are
/// errors.
pub async fn collect_references(paths: &[PathBuf]) -> Result<Vec<String>, CatalogError> {
    let mut references = Vec::new();
    for path in paths {
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            warn!("Catalog response {} not found; skipping", path.display());
            continue;
        }
        references.extend(extract_pdfnames(path).await?);
    }
    Ok(references)
}

/// Number of attempts a run makes for `unique` references under `cap`.
pub fn planned_attempts(unique: usize, cap: usize) -> usize {
    if cap == 0 {
        unique
    } else {
        unique.min(cap)
    }
}

/// Run the sweep off the async executor.
pub async fn run_sweep(dir: &Path) -> Option<SweepReport> {
    let dir = dir.to_path_buf();
    match tokio::task::spawn_blocking(move || sweep(&dir)).await {
        Ok(report) => Some(report),
        Err(e) => {
            error!("Sweep task failed: {}", e);
            None
        }
    }
}

/// Drives one complete acquisition run.
pub struct BatchRunner<C: CatalogSource, L: BrowserLauncher> {
    catalog: C,
    downloader: Downloader<L>,
    config: Config,
    sweep: bool,
}

impl<C: CatalogSource, L: BrowserLauncher> BatchRunner<C, L> {
    pub fn new(catalog: C, launcher: L, config: Config) -> Self {
        let downloader = Downloader::new(launcher, config.download_timeout());
        Self {
            catalog,
            downloader,
            config,
            sweep: true,
        }
    }

    /// Skip the post-download sweep.
    pub fn without_sweep(mut self) -> Self {
        self.sweep = false;
        self
    }

    /// Execute the run. Only catalog failures are errors; per-document
    /// failures are recorded in the report.
    pub async fn run(&self, event_tx: mpsc::Sender<BatchEvent>) -> Result<BatchReport, CatalogError> {
        let response_paths = self.config.response_paths();

        let removed = remove_stale_responses(&response_paths).await?;
        if removed > 0 {
            info!("Removed {} stale catalog response file(s)", removed);
        }

        self.catalog.fetch().await?;

        let references = collect_references(&response_paths).await?;
        let mut report = BatchReport {
            references_found: references.len(),
            ..Default::default()
        };

        let references = dedupe_references(references);
        report.unique = references.len();

        let cap = self.config.download_cap;
        let total = planned_attempts(references.len(), cap);
        info!(
            "{} references ({} unique), attempting {}",
            report.references_found, report.unique, total
        );
        let _ = event_tx
            .send(BatchEvent::Started {
                unique: report.unique,
                total,
            })
            .await;

        let output_dir = &self.config.output_dir;
        for (index, reference) in references.iter().enumerate() {
            if cap > 0 && report.attempted >= cap {
                let skipped = references.len() - index;
                warn!("Download cap of {} reached; {} references skipped", cap, skipped);
                report.capped = true;
                let _ = event_tx.send(BatchEvent::CapReached { cap, skipped }).await;
                break;
            }

            let url = resolve_url(reference, &self.config.base_url);
            let filename = derive_filename(&url);
            report.attempted += 1;
            info!(
                "Downloading {} ({} remaining, {} completed)",
                url,
                references.len() - index,
                report.downloaded + report.already_existed
            );

            let _ = event_tx
                .send(BatchEvent::ItemStarted {
                    index,
                    url: url.clone(),
                    filename: filename.clone(),
                })
                .await;

            let outcome = self.downloader.download(&url, &filename, output_dir).await;
            report.record(&outcome);

            let _ = event_tx
                .send(BatchEvent::ItemFinished { index, outcome })
                .await;
        }

        if self.sweep {
            report.sweep = run_sweep(output_dir).await;
            if let Some(ref sweep_report) = report.sweep {
                let _ = event_tx
                    .send(BatchEvent::SweepFinished {
                        report: sweep_report.clone(),
                    })
                    .await;
            }
        }

        info!(
            "Batch finished: {} attempted, {} downloaded, {} already present, {} failed",
            report.attempted,
            report.downloaded,
            report.already_existed,
            report.failed()
        );
        Ok(report)
    }
}
