//! Progress display for a batch run.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Single progress bar tracking sequential download attempts.
pub struct BatchProgress {
    bar: ProgressBar,
}

impl BatchProgress {
    /// Create a progress bar for `total` attempts.
    pub fn new(total: u64) -> Self {
        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {prefix} {wide_msg:.dim}")
                .map(|s| s.progress_chars("█▓░"))
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    /// Show the document currently being fetched.
    pub fn start_item(&self, filename: &str) {
        self.bar.set_message(truncate_filename(filename, 40));
    }

    pub fn finish_item(&self) {
        self.bar.inc(1);
    }

    /// Running totals, shown beside the current filename.
    pub fn set_summary(&self, downloaded: usize, existing: usize, failed: usize) {
        self.bar.set_prefix(format!(
            "Downloaded: {} | Existing: {} | Failed: {}",
            downloaded, existing, failed
        ));
    }

    /// Print a message above the bar without corrupting it.
    pub fn println(&self, message: &str) {
        self.bar.println(message);
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

/// Shorten long filenames for display, keeping the extension visible.
pub fn truncate_filename(name: &str, max_len: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_len || max_len < 8 {
        return name.to_string();
    }
    let tail = 6;
    let head = max_len - tail - 3;
    let start: String = chars[..head].iter().collect();
    let end: String = chars[chars.len() - tail..].iter().collect();
    format!("{}...{}", start, end)
}
