// Worker - processing loop for one pool thread

pub mod constants;
mod panic_guard;
mod shutdown;

use constants::WORKER_THREAD_PREFIX;
pub use shutdown::ShutdownToken;

pub(crate) use panic_guard::{execute_guarded, PanicGuardResult};
pub(crate) use shutdown::{shutdown_channel, ShutdownSender};

use crate::application::list::Shared;
use crate::domain::{NodeHandle, ProcessError};
use crossbeam_channel::Receiver;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{info, warn};

/// One unit handed from the dispatcher to a worker
pub(crate) struct WorkItem<T> {
    pub handle: NodeHandle,
    pub payload: Arc<T>,
}

/// Worker pulls nodes off the distribution channel until it closes
pub(crate) struct Worker<T> {
    id: usize,
    shared: Arc<Shared<T>>,
    inbox: Receiver<WorkItem<T>>,
}

impl<T: Send + Sync + 'static> Worker<T> {
    pub fn new(id: usize, shared: Arc<Shared<T>>, inbox: Receiver<WorkItem<T>>) -> Self {
        Self { id, shared, inbox }
    }

    pub fn spawn(self) -> std::io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name(format!(
                "{}-{}-{}",
                WORKER_THREAD_PREFIX, self.shared.name, self.id
            ))
            .spawn(move || self.run())
    }

    /// Run until every sender of the distribution channel is gone
    pub fn run(self) {
        info!(queue = %self.shared.name, worker_id = self.id, "Worker started");
        for item in self.inbox.iter() {
            self.process(item);
        }
        info!(queue = %self.shared.name, worker_id = self.id, "Worker stopped");
    }

    /// Invoke the processor and commit whatever it produced
    fn process(&self, item: WorkItem<T>) {
        if !self.shared.accept(item.handle) {
            return;
        }

        let processor = Arc::clone(&self.shared.processor);
        let payload = Arc::clone(&item.payload);

        // Execute with panic isolation: a panicking processor must not kill the worker
        let guarded = execute_guarded(AssertUnwindSafe(move || processor.process(&payload)));
        let committed = match guarded {
            PanicGuardResult::Success(outcome) => {
                if let Some(err) = &outcome.error {
                    warn!(
                        queue = %self.shared.name,
                        worker_id = self.id,
                        handle = %item.handle,
                        error = %err,
                        "Processing failed, committing returned payload"
                    );
                }
                Ok(outcome)
            }
            PanicGuardResult::Panicked(msg) => Err(ProcessError::Panicked(msg)),
        };

        self.shared.commit(item.handle, committed);
    }
}
