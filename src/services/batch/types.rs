//! Batch events and report.

use crate::services::download::DownloadOutcome;
use crate::services::sweep::SweepReport;

/// Progress events emitted by [`BatchRunner`](super::BatchRunner).
#[derive(Debug, Clone)]
pub enum BatchEvent {
    /// References resolved; `total` downloads will be attempted.
    Started { unique: usize, total: usize },
    /// A download attempt is starting (`index` is zero-based).
    ItemStarted {
        index: usize,
        url: String,
        filename: String,
    },
    /// A download attempt finished.
    ItemFinished {
        index: usize,
        outcome: DownloadOutcome,
    },
    /// The cap stopped the loop with `skipped` references unprocessed.
    CapReached { cap: usize, skipped: usize },
    /// The post-download sweep finished.
    SweepFinished { report: SweepReport },
}

/// Result of a batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// References extracted across all catalog pages, duplicates included.
    pub references_found: usize,
    /// References left after deduplication.
    pub unique: usize,
    /// Download attempts made.
    pub attempted: usize,
    pub downloaded: usize,
    pub already_existed: usize,
    /// `(url, reason)` for each failed attempt.
    pub failures: Vec<(String, String)>,
    /// Whether the cap left references unprocessed.
    pub capped: bool,
    /// Sweep results, when the sweep ran.
    pub sweep: Option<SweepReport>,
}

impl BatchReport {
    pub(crate) fn record(&mut self, outcome: &DownloadOutcome) {
        match outcome {
            DownloadOutcome::Downloaded { .. } => self.downloaded += 1,
            DownloadOutcome::AlreadyExists { .. } => self.already_existed += 1,
            DownloadOutcome::Failed { url, reason } => {
                self.failures.push((url.clone(), reason.clone()))
            }
        }
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}
