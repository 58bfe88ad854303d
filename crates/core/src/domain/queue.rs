// Queue Domain Model

use crate::application::worker::constants::{DEFAULT_QUEUE_NAME, DEFAULT_WORKERS};
use crate::error::{Result, WorkPoolError};
use serde::{Deserialize, Serialize};

/// Queue identifier
pub type QueueId = String;

/// Work list configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Name used in thread names and log fields
    pub name: QueueId,
    /// Fixed worker pool size (>= 1)
    pub workers: usize,
    /// Build the pool idle; dispatch begins on `start()`
    pub defer_start: bool,
}

impl QueueConfig {
    pub fn new(name: impl Into<String>, workers: usize) -> Self {
        Self {
            name: name.into(),
            workers,
            defer_start: false,
        }
    }

    pub fn with_defer_start(mut self, defer_start: bool) -> Self {
        self.defer_start = defer_start;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(WorkPoolError::InvalidConfig(
                "workers must be at least 1".to_string(),
            ));
        }
        if self.name.trim().is_empty() {
            return Err(WorkPoolError::InvalidConfig(
                "queue name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self::new(DEFAULT_QUEUE_NAME, DEFAULT_WORKERS)
    }
}
