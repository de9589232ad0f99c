// src/progress.rs
use std::path::Path;

use crate::data::ResultRecord;

/// Lightweight progress reporting for a run.
/// Frontends implement this to surface status; every method is optional.
pub trait Progress {
    /// Called at the start with the number of terms.
    fn begin(&mut self, _total: usize) {}

    /// Called once per term, after its record was stored.
    fn item_done(&mut self, _index: usize, _record: &ResultRecord) {}

    /// Called after each checkpoint write.
    fn checkpoint(&mut self, _written: usize, _path: &Path) {}

    /// Called at the end of a run that got through every term.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}

/// CLI progress: one log line per term and per checkpoint.
#[derive(Default)]
pub struct LogProgress {
    total: usize,
    failed: usize,
}

impl Progress for LogProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        logf!("Starting run over {total} terms");
    }

    fn item_done(&mut self, index: usize, record: &ResultRecord) {
        if record.outcome.is_success() {
            logf!("[{}/{}] {}: ok", index + 1, self.total, record.term);
        } else {
            self.failed += 1;
            logw!("[{}/{}] {}: {}", index + 1, self.total, record.term, record.outcome);
        }
    }

    fn checkpoint(&mut self, written: usize, path: &Path) {
        logf!("Checkpoint: {written} results saved to {}", path.display());
    }

    fn finish(&mut self) {
        logf!("All terms processed: {} ok, {} failed", self.total.saturating_sub(self.failed), self.failed);
    }
}
