//! Console progress bar driven by conversion checkpoints

use indicatif::{ProgressBar, ProgressStyle};
use statcsv_convert::progress::COMPLETE;
use statcsv_convert::CheckpointSink;

/// Renders checkpoints as a percentage bar on stderr
pub struct ProgressBarCheckpoint {
    bar: ProgressBar,
}

impl ProgressBarCheckpoint {
    pub fn new(message: &str) -> Self {
        Self::with_bar(ProgressBar::new(COMPLETE as u64), message)
    }

    /// Wrap an existing bar, e.g. a hidden one in tests
    pub fn with_bar(bar: ProgressBar, message: &str) -> Self {
        let style = ProgressStyle::default_bar()
            .template("{msg}\n{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}%")
            .map(|s| s.progress_chars("#>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        bar.set_message(message.to_string());
        Self { bar }
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}

impl CheckpointSink for ProgressBarCheckpoint {
    fn publish(&mut self, percent: i64) -> std::io::Result<()> {
        let position = percent.clamp(0, COMPLETE) as u64;
        self.bar.set_position(position);
        if percent >= COMPLETE {
            self.bar.finish();
        }
        Ok(())
    }
}
