// Work List Builder - validates configuration and starts the worker pool

use super::ordered_list::OrderedWorkList;
use super::shared::Shared;
use crate::application::worker::constants::DISTRIBUTION_CHANNEL_CAPACITY;
use crate::application::worker::{shutdown_channel, Worker};
use crate::domain::QueueConfig;
use crate::error::{Result, WorkPoolError};
use crate::port::Processor;
use std::sync::Arc;
use tracing::info;

/// Builder for [`OrderedWorkList`]
///
/// The processor is mandatory; `build` fails fast without one and nothing
/// is started.
pub struct WorkListBuilder<T> {
    processor: Option<Arc<dyn Processor<T>>>,
    config: QueueConfig,
}

impl<T: Send + Sync + 'static> WorkListBuilder<T> {
    pub fn new() -> Self {
        Self {
            processor: None,
            config: QueueConfig::default(),
        }
    }

    pub fn processor(mut self, processor: impl Processor<T> + 'static) -> Self {
        self.processor = Some(Arc::new(processor));
        self
    }

    /// Use an already shared processor
    pub fn shared_processor(mut self, processor: Arc<dyn Processor<T>>) -> Self {
        self.processor = Some(processor);
        self
    }

    /// Replace name, worker count and start mode at once
    pub fn config(mut self, config: QueueConfig) -> Self {
        self.config = config;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = workers;
        self
    }

    /// Keep dispatch idle until `start()`, so the list can be populated first
    pub fn defer_start(mut self, defer_start: bool) -> Self {
        self.config.defer_start = defer_start;
        self
    }

    /// Spawn the worker pool and, unless deferred, start dispatching
    pub fn build(self) -> Result<OrderedWorkList<T>> {
        let processor = self.processor.ok_or(WorkPoolError::ProcessorMissing)?;
        self.config.validate()?;

        let QueueConfig {
            name,
            workers,
            defer_start,
        } = self.config;

        let (work_tx, work_rx) = crossbeam_channel::bounded(DISTRIBUTION_CHANNEL_CAPACITY);
        let (shutdown, _token) = shutdown_channel();
        let shared = Arc::new(Shared::new(name, processor, work_tx, shutdown));

        let mut handles = Vec::with_capacity(workers);
        for id in 0..workers {
            match Worker::new(id, Arc::clone(&shared), work_rx.clone()).spawn() {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    // Already spawned workers exit once the channel closes
                    shared.close();
                    return Err(WorkPoolError::Spawn(e));
                }
            }
        }
        drop(work_rx);

        let list = OrderedWorkList::from_parts(shared, handles);
        info!(queue = %list.name(), workers, defer_start, "Work list ready");
        if !defer_start {
            list.start();
        }
        Ok(list)
    }
}

impl<T: Send + Sync + 'static> Default for WorkListBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}
