//! Upload progress
//!
//! Progress is reported in a fixed number of display segments
//! ([`BAR_SEGMENTS`](s3deploy_core::constants::BAR_SEGMENTS)) regardless of batch size.

use s3deploy_core::constants::BAR_SEGMENTS;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Receiver of progress updates, typically a terminal progress bar.
pub trait ProgressReporter: Send + Sync {
    /// A batch starts; `segments` is the full length of the display.
    fn start(&self, segments: u64);

    /// Advance the display by `segments`.
    fn tick(&self, segments: u64);

    /// All items are done and the display has been advanced to its full length.
    fn finish(&self);
}

/// Discards all updates.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn start(&self, _segments: u64) {}
    fn tick(&self, _segments: u64) {}
    fn finish(&self) {}
}

/// Converts per-item completions of one batch into segment ticks.
pub struct SegmentTracker<'a> {
    reporter: &'a dyn ProgressReporter,
    total_items: usize,
    processed: AtomicUsize,
    ticked: AtomicU64,
}

impl<'a> SegmentTracker<'a> {
    pub fn start(reporter: &'a dyn ProgressReporter, total_items: usize) -> Self {
        reporter.start(BAR_SEGMENTS);
        Self {
            reporter,
            total_items,
            processed: AtomicUsize::new(0),
            ticked: AtomicU64::new(0),
        }
    }

    /// Record one finished item. Returns the number of items processed so far.
    pub fn item_done(&self) -> usize {
        let processed = self.processed.fetch_add(1, Ordering::SeqCst) + 1;
        if self.total_items > 0 {
            let target = (processed.min(self.total_items) as u64 * BAR_SEGMENTS)
                / self.total_items as u64;
            let previous = self.ticked.fetch_max(target, Ordering::SeqCst);
            if target > previous {
                self.reporter.tick(target - previous);
            }
        }
        processed
    }

    /// Flush the display to completion.
    pub fn finish(&self) {
        let previous = self.ticked.swap(BAR_SEGMENTS, Ordering::SeqCst);
        if BAR_SEGMENTS > previous {
            self.reporter.tick(BAR_SEGMENTS - previous);
        }
        self.reporter.finish();
    }

    pub fn processed(&self) -> usize {
        self.processed.load(Ordering::SeqCst)
    }
}
