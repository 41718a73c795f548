//! Terminal progress bar for uploads

use indicatif::{ProgressBar, ProgressStyle};
use s3deploy_engine::ProgressReporter;

/// Upload progress rendered with indicatif; cleared once the batch finishes.
pub struct UploadProgressBar {
    bar: ProgressBar,
}

impl UploadProgressBar {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("Uploading [{bar:60.cyan/dim}]  {percent}%")
                .expect("valid template")
                .progress_chars("=> "),
        );
        Self { bar }
    }

    /// A bar that never draws, for `--json` output.
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }
}

impl Default for UploadProgressBar {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for UploadProgressBar {
    fn start(&self, segments: u64) {
        self.bar.reset();
        self.bar.set_length(segments);
    }

    fn tick(&self, segments: u64) {
        self.bar.inc(segments);
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
