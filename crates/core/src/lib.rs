// Workpool Core - Ordered concurrent work-processing queue
// Items go in FIFO, workers transform them out of order, results come out FIFO.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;
pub mod util;

pub use application::{
    Completed, OrderedWorkList, ShutdownToken, WorkListBuilder, WorkListStats,
};
pub use domain::{NodeHandle, ProcessError, ProcessOutcome, QueueConfig};
pub use error::{Result, WorkPoolError};
pub use port::Processor;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
