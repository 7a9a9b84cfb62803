//! Full batch run command.

use tokio::sync::mpsc;

use crate::browser::ChromeLauncher;
use crate::catalog::CatalogClient;
use crate::cli::icons::{dim_arrow, error, info, success, warn};
use crate::cli::progress::BatchProgress;
use crate::config::Config;
use crate::services::{BatchEvent, BatchRunner, DownloadOutcome};

use super::sweep::print_sweep_report;

/// Fetch the catalog, download every referenced document and sweep.
pub async fn cmd_run(config: &Config, no_sweep: bool, show_progress: bool) -> anyhow::Result<()> {
    let catalog = CatalogClient::new(config)?;
    let launcher = ChromeLauncher::new(config.browser.clone());

    let mut runner = BatchRunner::new(catalog, launcher, config.clone());
    if no_sweep {
        runner = runner.without_sweep();
    }

    println!(
        "{} Fetching catalog ({} page(s) of {})",
        info(),
        config.pages,
        config.page_size
    );

    // Event channel for progress updates
    let (event_tx, mut event_rx) = mpsc::channel::<BatchEvent>(100);

    let event_handler = tokio::spawn(async move {
        let mut progress: Option<BatchProgress> = None;
        let (mut downloaded, mut existing, mut failed) = (0usize, 0usize, 0usize);

        while let Some(event) = event_rx.recv().await {
            match event {
                BatchEvent::Started { unique, total } => {
                    println!(
                        "{} {} unique documents, downloading {}",
                        info(),
                        unique,
                        total
                    );
                    if show_progress {
                        progress = Some(BatchProgress::new(total as u64));
                    }
                }
                BatchEvent::ItemStarted { filename, .. } => {
                    if let Some(ref p) = progress {
                        p.start_item(&filename);
                    }
                }
                BatchEvent::ItemFinished { outcome, .. } => {
                    let is_failure = outcome.is_failure();
                    let line = match outcome {
                        DownloadOutcome::Downloaded { path } => {
                            downloaded += 1;
                            format!("{} {}", success(), path.display())
                        }
                        DownloadOutcome::AlreadyExists { path } => {
                            existing += 1;
                            format!("{} {} (already present)", dim_arrow(), path.display())
                        }
                        DownloadOutcome::Failed { url, reason } => {
                            failed += 1;
                            format!("{} Failed to download {}: {}", error(), url, reason)
                        }
                    };
                    match progress {
                        Some(ref p) => {
                            p.finish_item();
                            p.set_summary(downloaded, existing, failed);
                            if is_failure {
                                p.println(&line);
                            }
                        }
                        None => println!("{}", line),
                    }
                }
                BatchEvent::CapReached { cap, skipped } => {
                    let line = format!(
                        "{} Download cap of {} reached, {} documents skipped",
                        warn(),
                        cap,
                        skipped
                    );
                    match progress {
                        Some(ref p) => p.println(&line),
                        None => println!("{}", line),
                    }
                }
                BatchEvent::SweepFinished { .. } => {
                    if let Some(p) = progress.take() {
                        p.finish();
                    }
                }
            }
        }

        if let Some(p) = progress {
            p.finish();
        }
    });

    let result = runner.run(event_tx).await;

    if let Err(e) = event_handler.await {
        tracing::warn!("Event handler task failed: {}", e);
    }

    let report = result?;

    println!(
        "{} Attempted {} of {} documents: {} downloaded, {} already present, {} failed",
        success(),
        report.attempted,
        report.unique,
        report.downloaded,
        report.already_existed,
        report.failed()
    );
    if report.capped {
        println!(
            "  {} Stopped at the download cap ({})",
            warn(),
            config.download_cap
        );
    }
    if let Some(ref sweep) = report.sweep {
        print_sweep_report(sweep);
    }

    Ok(())
}
