// Domain Layer - Nodes, outcomes and queue configuration

pub mod error;
pub mod node;
pub mod outcome;
pub mod queue;

// Re-exports
pub use error::{DomainError, ProcessError};
pub use node::{Node, NodeHandle, NodeState};
pub use outcome::ProcessOutcome;
pub use queue::{QueueConfig, QueueId};
