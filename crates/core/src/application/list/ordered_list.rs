// Ordered Work List - public API

use super::builder::WorkListBuilder;
use super::shared::{Completed, Shared};
use crate::application::stats::WorkListStats;
use crate::application::worker::ShutdownToken;
use crate::domain::NodeHandle;
use crate::error::{Result, WorkPoolError};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::info;

/// Ordered concurrent work queue
///
/// Payloads are transformed by a fixed pool of worker threads in any order,
/// but [`read`](Self::read) only ever releases the oldest contiguous run of
/// finished results. A slow old item holds back newer finished ones.
///
/// # Example
/// ```text
/// let list = OrderedWorkList::builder()
///     .processor(|s: &String| ProcessOutcome::keep(s.to_uppercase()))
///     .workers(4)
///     .build()?;
///
/// list.insert("a".to_string());
/// list.insert("b".to_string());
/// list.wait_idle(Duration::from_secs(1));
/// assert_eq!(list.read(None), vec!["A", "B"]);
/// ```
pub struct OrderedWorkList<T> {
    shared: Arc<Shared<T>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl<T: Send + Sync + 'static> OrderedWorkList<T> {
    pub fn builder() -> WorkListBuilder<T> {
        WorkListBuilder::new()
    }

    pub(crate) fn from_parts(shared: Arc<Shared<T>>, workers: Vec<JoinHandle<()>>) -> Self {
        Self {
            shared,
            workers: Mutex::new(workers),
        }
    }

    /// Append a payload. Never blocks on worker availability.
    ///
    /// The returned handle can cancel the node through [`delete`](Self::delete).
    pub fn insert(&self, payload: T) -> NodeHandle {
        self.shared.insert(payload)
    }

    /// Begin dispatching on a list built with `defer_start`. Idempotent.
    pub fn start(&self) {
        if self.shared.start() {
            info!(queue = %self.shared.name, pending = self.pending(), "Dispatch started");
        }
    }
}

impl<T> OrderedWorkList<T> {
    /// Drain results in insertion order, oldest first
    ///
    /// Stops at the first node still pending, or after `max` results.
    /// Tombstoned nodes are removed on the way and never returned.
    pub fn read(&self, max: Option<usize>) -> Vec<T> {
        self.shared
            .drain(max)
            .into_iter()
            .map(|completed| completed.value)
            .collect()
    }

    /// Like [`read`](Self::read), but keeps the error each processor reported
    pub fn read_detailed(&self, max: Option<usize>) -> Vec<Completed<T>> {
        self.shared.drain(max)
    }

    /// Remove a node before it is read
    ///
    /// Returns false if the handle is stale (already read, deleted or cleaned).
    /// If a worker is still processing the node, its result is discarded.
    pub fn delete(&self, handle: NodeHandle) -> bool {
        self.shared.delete(handle)
    }

    /// Live nodes
    pub fn len(&self) -> usize {
        self.shared.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live nodes without a committed result
    pub fn pending(&self) -> usize {
        self.shared.pending()
    }

    pub fn name(&self) -> &str {
        &self.shared.name
    }

    pub fn stats(&self) -> WorkListStats {
        self.shared.stats()
    }

    /// Block until no node is pending. Returns false on timeout.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        self.shared.wait_idle(timeout)
    }

    /// Stop dispatching
    ///
    /// Workers finish whatever they hold; nodes not yet dispatched stay
    /// pending. Already completed results can still be read.
    pub fn close(&self) {
        self.shared.close();
    }

    pub fn is_closed(&self) -> bool {
        self.shared.is_closed()
    }

    /// Close signal for async callers
    pub fn shutdown_token(&self) -> ShutdownToken {
        self.shared.token.clone()
    }

    /// Close and wait for every worker thread to exit
    pub fn join(&self) -> Result<()> {
        self.close();

        let handles: Vec<JoinHandle<()>> = std::mem::take(&mut *self.workers.lock());
        let mut panicked = Vec::new();
        for handle in handles {
            let name = handle.thread().name().unwrap_or("worker").to_string();
            if handle.join().is_err() {
                panicked.push(name);
            }
        }

        if panicked.is_empty() {
            Ok(())
        } else {
            Err(WorkPoolError::WorkerPanicked(panicked.join(", ")))
        }
    }
}

impl<T> Drop for OrderedWorkList<T> {
    fn drop(&mut self) {
        self.shared.close();
    }
}

impl<T> std::fmt::Debug for OrderedWorkList<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderedWorkList")
            .field("name", &self.shared.name)
            .field("len", &self.len())
            .field("pending", &self.pending())
            .field("closed", &self.is_closed())
            .finish()
    }
}
