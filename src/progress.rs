//! Progress reporting utilities using indicatif.
//!
//! A single bar tracks the scan loop (`Processing N of M`). In quiet mode
//! the bar is hidden entirely so nothing but errors reaches the terminal.

use indicatif::{ProgressBar, ProgressStyle};

/// Progress reporter for the scan loop.
pub struct Progress {
    bar: ProgressBar,
}

impl Progress {
    /// Create a progress bar for `total` documents.
    ///
    /// # Arguments
    ///
    /// * `total` - Number of documents the scan will process
    /// * `quiet` - If true, no progress bar is displayed
    #[must_use]
    pub fn new(total: u64, quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(total)
        };

        let style = ProgressStyle::with_template(
            "{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style.progress_chars("=>-"));

        Self { bar }
    }

    /// Advance past one document, showing its name.
    pub fn on_document(&self, name: &str) {
        self.bar.set_message(name.to_string());
        self.bar.inc(1);
    }

    /// Finish and remove the bar from the terminal.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
