// Work list statistics

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time view of a work list
///
/// Totals only grow. Taken under the structural lock, so
/// `inserted == len + drained + cleaned + deleted` holds for every snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WorkListStats {
    /// Live nodes
    pub len: usize,
    /// Live nodes without a committed result
    pub pending: usize,
    pub inserted: u64,
    /// Commits, including failed and panicked ones
    pub processed: u64,
    pub failed: u64,
    pub panicked: u64,
    /// Results handed to readers
    pub drained: u64,
    /// Tombstoned nodes removed by reads
    pub cleaned: u64,
    /// Nodes removed through `delete`
    pub deleted: u64,
    /// Dispatched nodes deleted before their result was committed; the work is
    /// skipped if no worker had started it, otherwise the result is dropped
    pub discarded: u64,
}

impl WorkListStats {
    /// Committed but not yet drained
    pub fn ready(&self) -> usize {
        self.len - self.pending
    }
}

#[derive(Debug, Default)]
pub(crate) struct StatsCounters {
    pub inserted: AtomicU64,
    pub processed: AtomicU64,
    pub failed: AtomicU64,
    pub panicked: AtomicU64,
    pub drained: AtomicU64,
    pub cleaned: AtomicU64,
    pub deleted: AtomicU64,
    pub discarded: AtomicU64,
}

impl StatsCounters {
    pub fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self, len: usize, pending: usize) -> WorkListStats {
        WorkListStats {
            len,
            pending,
            inserted: self.inserted.load(Ordering::Relaxed),
            processed: self.processed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            panicked: self.panicked.load(Ordering::Relaxed),
            drained: self.drained.load(Ordering::Relaxed),
            cleaned: self.cleaned.load(Ordering::Relaxed),
            deleted: self.deleted.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
        }
    }
}
