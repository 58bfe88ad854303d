// Shared list state - everything the API, dispatcher and workers touch
//
// All structural mutation (insert, drain, delete, commit) happens under
// `state`. The counters are atomics so callers can read them lock-free, but
// they are only ever written while `state` is held, together with the node
// change they describe.

use super::arena::NodeArena;
use crate::application::dispatcher;
use crate::application::stats::{StatsCounters, WorkListStats};
use crate::application::worker::{ShutdownSender, ShutdownToken, WorkItem};
use crate::domain::{NodeHandle, ProcessError, ProcessOutcome};
use crate::port::Processor;
use crossbeam_channel::Sender;
use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, trace};

/// A drained result with the error its processor reported, if any
#[derive(Debug, Clone, PartialEq)]
pub struct Completed<T> {
    pub value: T,
    pub error: Option<ProcessError>,
}

pub(crate) struct ListState<T> {
    pub arena: NodeArena<T>,
    /// Dropped on close so workers drain out once dispatchers finish
    pub work_tx: Option<Sender<WorkItem<T>>>,
    pub dispatcher_running: bool,
    pub started: bool,
}

pub(crate) struct Shared<T> {
    pub name: String,
    pub state: Mutex<ListState<T>>,
    /// Dispatcher parks here while every pending node is in flight
    pub wakeup: Condvar,
    /// Signalled whenever the pending count drops
    pub idle: Condvar,
    pub count: AtomicUsize,
    pub pending: AtomicUsize,
    pub stats: StatsCounters,
    pub processor: Arc<dyn Processor<T>>,
    pub token: ShutdownToken,
    shutdown: ShutdownSender,
}

impl<T> Shared<T> {
    pub fn new(
        name: String,
        processor: Arc<dyn Processor<T>>,
        work_tx: Sender<WorkItem<T>>,
        shutdown: ShutdownSender,
    ) -> Self {
        let token = shutdown.subscribe();
        Self {
            name,
            state: Mutex::new(ListState {
                arena: NodeArena::new(),
                work_tx: Some(work_tx),
                dispatcher_running: false,
                started: false,
            }),
            wakeup: Condvar::new(),
            idle: Condvar::new(),
            count: AtomicUsize::new(0),
            pending: AtomicUsize::new(0),
            stats: StatsCounters::default(),
            processor,
            token,
            shutdown,
        }
    }

    pub fn len(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }

    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    pub fn is_closed(&self) -> bool {
        self.token.is_shutdown()
    }

    /// Oldest contiguous run of processed nodes, tombstones removed on the way
    pub fn drain(&self, max: Option<usize>) -> Vec<Completed<T>> {
        let limit = max.unwrap_or(usize::MAX);
        let mut out = Vec::new();
        if limit == 0 {
            return out;
        }

        let mut pending_dropped = false;
        let mut state = self.state.lock();
        let mut current = state.arena.tail();

        while let Some(index) = current {
            if out.len() >= limit {
                break;
            }
            let Some(node) = state.arena.node(index) else {
                break;
            };
            // Always advance to the former predecessor, removed or not
            let (newer, tombstoned, processed) =
                (node.newer, node.is_tombstoned(), node.is_processed());

            if tombstoned {
                if let Some(node) = state.arena.unlink(index) {
                    self.count.fetch_sub(1, Ordering::AcqRel);
                    if !node.is_processed() {
                        self.pending.fetch_sub(1, Ordering::AcqRel);
                        pending_dropped = true;
                    }
                    StatsCounters::bump(&self.stats.cleaned);
                }
                current = newer;
                continue;
            }

            if !processed {
                break;
            }

            if let Some(node) = state.arena.unlink(index) {
                self.count.fetch_sub(1, Ordering::AcqRel);
                StatsCounters::bump(&self.stats.drained);
                if let (Some(value), error) = node.into_parts() {
                    out.push(Completed { value, error });
                }
            }
            current = newer;
        }
        drop(state);

        if pending_dropped {
            self.idle.notify_all();
            self.wakeup.notify_all();
        }
        if !out.is_empty() {
            trace!(queue = %self.name, drained = out.len(), "Drained results");
        }
        out
    }

    /// Eager removal by handle
    pub fn delete(&self, handle: NodeHandle) -> bool {
        let mut state = self.state.lock();
        let Some(node) = state.arena.remove(handle) else {
            return false;
        };

        self.count.fetch_sub(1, Ordering::AcqRel);
        let was_pending = !node.is_processed();
        if was_pending {
            self.pending.fetch_sub(1, Ordering::AcqRel);
        }
        StatsCounters::bump(&self.stats.deleted);
        drop(state);

        if was_pending {
            self.idle.notify_all();
            self.wakeup.notify_all();
        }
        debug!(queue = %self.name, handle = %handle, state = %node.state(), "Node deleted");
        true
    }

    /// Check that a dispatched node is still linked before it is handed on
    ///
    /// A stale handle means the node was deleted while waiting for a worker;
    /// the item is dropped unprocessed and counted as discarded.
    pub fn accept(&self, handle: NodeHandle) -> bool {
        let state = self.state.lock();
        if state.arena.get(handle).is_some() {
            return true;
        }
        StatsCounters::bump(&self.stats.discarded);
        drop(state);

        debug!(queue = %self.name, handle = %handle, "Node deleted before processing, skipping");
        false
    }

    /// Worker commit: result, tombstone and pending decrement in one critical section
    pub fn commit(&self, handle: NodeHandle, committed: Result<ProcessOutcome<T>, ProcessError>) {
        let mut state = self.state.lock();
        let Some(node) = state.arena.get_mut(handle) else {
            StatsCounters::bump(&self.stats.discarded);
            debug!(queue = %self.name, handle = %handle, "Node removed before commit, discarding result");
            return;
        };

        let (failed, panicked) = match &committed {
            Ok(outcome) => (outcome.is_error(), false),
            Err(_) => (false, true),
        };
        let applied = match committed {
            Ok(outcome) => node.complete(outcome),
            Err(err) => node.abandon(err),
        };
        if let Err(e) = applied {
            error!(queue = %self.name, handle = %handle, error = %e, "Rejected commit");
            return;
        }

        self.pending.fetch_sub(1, Ordering::AcqRel);
        StatsCounters::bump(&self.stats.processed);
        if failed {
            StatsCounters::bump(&self.stats.failed);
        }
        if panicked {
            StatsCounters::bump(&self.stats.panicked);
        }
        drop(state);

        trace!(queue = %self.name, handle = %handle, "Committed");
        self.idle.notify_all();
        self.wakeup.notify_all();
    }

    /// Put dispatched-but-never-sent nodes back to pending
    pub fn release_dispatch(&self, handles: &[NodeHandle]) {
        let mut state = self.state.lock();
        for handle in handles {
            if let Some(node) = state.arena.get_mut(*handle) {
                node.release_dispatch();
            }
        }
        state.dispatcher_running = false;
    }

    /// Block until nothing is pending or the timeout expires
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now().checked_add(timeout);
        let mut state = self.state.lock();
        while self.pending() > 0 {
            match deadline {
                Some(deadline) => {
                    if self.idle.wait_until(&mut state, deadline).timed_out() {
                        return self.pending() == 0;
                    }
                }
                None => self.idle.wait(&mut state),
            }
        }
        true
    }

    pub fn stats(&self) -> WorkListStats {
        let _state = self.state.lock();
        self.stats.snapshot(self.len(), self.pending())
    }

    /// Signal close. Returns false if already closed.
    pub fn close(&self) -> bool {
        if !self.shutdown.shutdown() {
            return false;
        }
        let mut state = self.state.lock();
        state.work_tx.take();
        drop(state);

        self.wakeup.notify_all();
        info!(queue = %self.name, pending = self.pending(), "Work list closed");
        true
    }
}

impl<T: Send + Sync + 'static> Shared<T> {
    /// Link a new node in as head
    pub fn insert(self: &Arc<Self>, payload: T) -> NodeHandle {
        let mut state = self.state.lock();
        let handle = state.arena.push_head(payload);
        self.count.fetch_add(1, Ordering::AcqRel);
        self.pending.fetch_add(1, Ordering::AcqRel);
        StatsCounters::bump(&self.stats.inserted);
        self.ensure_dispatcher(&mut state);
        drop(state);

        self.wakeup.notify_all();
        trace!(queue = %self.name, handle = %handle, "Inserted");
        handle
    }

    /// Begin dispatching. Returns false if already started or closed.
    pub fn start(self: &Arc<Self>) -> bool {
        let mut state = self.state.lock();
        if state.started || self.is_closed() {
            return false;
        }
        state.started = true;
        self.ensure_dispatcher(&mut state);
        true
    }

    /// Spawn a dispatcher if there is work and none is running
    fn ensure_dispatcher(self: &Arc<Self>, state: &mut ListState<T>) {
        if !state.started || state.dispatcher_running || self.is_closed() {
            return;
        }
        if self.pending() == 0 {
            return;
        }
        let Some(work_tx) = state.work_tx.clone() else {
            return;
        };

        match dispatcher::spawn(Arc::clone(self), work_tx) {
            Ok(_) => state.dispatcher_running = true,
            Err(e) => {
                // Pending nodes stay queued; the next insert or start retries
                error!(queue = %self.name, error = %e, "Failed to spawn dispatcher");
            }
        }
    }
}
