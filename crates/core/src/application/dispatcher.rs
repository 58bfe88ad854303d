// Dispatcher - discovers pending nodes and hands them to idle workers
//
// One dispatcher per list at a time. Each round snapshots every pending node
// under the structural lock, marks them dispatched, releases the lock, then
// pushes them oldest-first through the rendezvous channel. Nodes inserted
// after the snapshot wait for the next round. The dispatcher exits when no
// node is pending or the list is closed; the next insert starts a new one.

use crate::application::list::Shared;
use crate::application::worker::constants::DISPATCHER_THREAD_PREFIX;
use crate::application::worker::WorkItem;
use crate::domain::NodeHandle;
use crossbeam_channel::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

pub(crate) fn spawn<T: Send + Sync + 'static>(
    shared: Arc<Shared<T>>,
    work_tx: Sender<WorkItem<T>>,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name(format!("{}-{}", DISPATCHER_THREAD_PREFIX, shared.name))
        .spawn(move || run(&shared, &work_tx))
}

/// Dispatch loop. Blocks on the channel while no worker is free.
pub(crate) fn run<T>(shared: &Shared<T>, work_tx: &Sender<WorkItem<T>>) {
    debug!(queue = %shared.name, "Dispatcher started");

    while let Some(batch) = next_batch(shared) {
        debug!(
            queue = %shared.name,
            batch = batch.len(),
            pending = shared.pending(),
            "Dispatching batch"
        );

        let mut items = batch.into_iter();
        while let Some(item) = items.next() {
            // Non-blocking stop check between hand-offs
            if shared.is_closed() {
                let unsent = unsent_handles(item.handle, items);
                shared.release_dispatch(&unsent);
                debug!(queue = %shared.name, unsent = unsent.len(), "Dispatcher stopped by close");
                return;
            }

            // Deleted while waiting in this batch
            if !shared.accept(item.handle) {
                continue;
            }

            if let Err(err) = work_tx.send(item) {
                let unsent = unsent_handles(err.into_inner().handle, items);
                shared.release_dispatch(&unsent);
                warn!(queue = %shared.name, unsent = unsent.len(), "No workers left, dispatcher exiting");
                return;
            }
        }
    }
}

/// Next snapshot of pending nodes, or `None` when the dispatcher should exit.
/// Parks while every pending node is already with a worker.
fn next_batch<T>(shared: &Shared<T>) -> Option<Vec<WorkItem<T>>> {
    let mut state = shared.state.lock();
    loop {
        if shared.is_closed() {
            state.dispatcher_running = false;
            debug!(queue = %shared.name, "Dispatcher stopped by close");
            return None;
        }
        if shared.pending() == 0 {
            state.dispatcher_running = false;
            debug!(queue = %shared.name, "No pending work, dispatcher exiting");
            return None;
        }

        let batch: Vec<WorkItem<T>> = state
            .arena
            .take_pending()
            .into_iter()
            .map(|(handle, payload)| WorkItem { handle, payload })
            .collect();
        if !batch.is_empty() {
            return Some(batch);
        }

        shared.wakeup.wait(&mut state);
    }
}

fn unsent_handles<T>(
    first: NodeHandle,
    rest: impl Iterator<Item = WorkItem<T>>,
) -> Vec<NodeHandle> {
    std::iter::once(first)
        .chain(rest.map(|item| item.handle))
        .collect()
}
