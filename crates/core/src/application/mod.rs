// Application Layer - Work list, dispatcher and worker pool

pub(crate) mod dispatcher;
pub mod list;
pub mod stats;
pub mod worker;

// Re-exports
pub use list::{Completed, OrderedWorkList, WorkListBuilder};
pub use stats::WorkListStats;
pub use worker::ShutdownToken;
