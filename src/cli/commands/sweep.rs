//! Sweep command.

use std::path::PathBuf;

use crate::cli::icons::{dim_arrow, success, warn};
use crate::config::Config;
use crate::services::batch::run_sweep;
use crate::services::SweepReport;

/// Sweep `dir` (or the configured output directory).
pub async fn cmd_sweep(config: &Config, dir: Option<PathBuf>) -> anyhow::Result<()> {
    let dir = dir.unwrap_or_else(|| config.output_dir.clone());
    let report = run_sweep(&dir)
        .await
        .ok_or_else(|| anyhow::anyhow!("Sweep of {} did not complete", dir.display()))?;

    print_sweep_report(&report);
    Ok(())
}

pub(super) fn print_sweep_report(report: &SweepReport) {
    println!(
        "{} Checked {} PDFs: {} removed, {} renamed",
        success(),
        report.scanned,
        report.removed,
        report.renamed
    );
    for path in &report.collisions {
        println!(
            "  {} {} not renamed: lowercase name already exists",
            warn(),
            path.display()
        );
    }
    if report.collisions.is_empty() && report.scanned == 0 {
        println!("  {} Nothing to sweep", dim_arrow());
    }
}
