// Central Error Type for the Work Pool

use thiserror::Error;

/// Pool-level error type
#[derive(Error, Debug)]
pub enum WorkPoolError {
    #[error("Processor not set")]
    ProcessorMissing,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Thread spawn failed: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Worker thread panicked: {0}")]
    WorkerPanicked(String),
}

/// Result type alias using WorkPoolError
pub type Result<T> = std::result::Result<T, WorkPoolError>;

impl From<config::ConfigError> for WorkPoolError {
    fn from(err: config::ConfigError) -> Self {
        WorkPoolError::Config(err.to_string())
    }
}
