// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid node state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },
}

/// Per-item processing error.
///
/// Recorded on the committed node. Never stops the queue: the item is still
/// committed and the pending count still drops.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProcessError {
    #[error("Processing failed: {0}")]
    Failed(String),

    #[error("Processor panicked: {0}")]
    Panicked(String),
}

impl ProcessError {
    pub fn failed(msg: impl Into<String>) -> Self {
        ProcessError::Failed(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, DomainError>;
