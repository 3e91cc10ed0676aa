// src/progress.rs
/// Lightweight progress reporting used by long-running batches (extraction).
/// Frontends implement this to surface status to users.
pub trait Progress {
    /// Called at the start with the total number of targets.
    fn begin(&mut self, _total: usize) {}

    /// Called when one target completes.
    fn item_done(&mut self, _company_id: &str, _records: usize) {}

    fn item_failed(&mut self, _company_id: &str, _reason: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
