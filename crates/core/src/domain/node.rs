// Node Domain Model

use super::error::{DomainError, ProcessError, Result};
use super::outcome::ProcessOutcome;
use std::sync::Arc;

/// Node lifecycle.
///
/// `Pending -> Dispatched -> Completed`. A dispatched node can drop back to
/// `Pending` only when the dispatcher stops before handing it to a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    Pending,
    Dispatched,
    Completed,
}

impl std::fmt::Display for NodeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeState::Pending => write!(f, "PENDING"),
            NodeState::Dispatched => write!(f, "DISPATCHED"),
            NodeState::Completed => write!(f, "COMPLETED"),
        }
    }
}

/// Stable reference to an inserted node.
///
/// Slots are recycled; `generation` makes a handle to a removed node stale
/// instead of aliasing whatever reuses the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle {
    index: usize,
    generation: u64,
}

impl NodeHandle {
    pub(crate) fn new(index: usize, generation: u64) -> Self {
        Self { index, generation }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl std::fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.index, self.generation)
    }
}

/// One cell of the work chain.
///
/// Links are arena indices: `newer` points toward the head, `older` toward
/// the tail. Only the owning arena touches them.
#[derive(Debug)]
pub struct Node<T> {
    payload: Arc<T>,
    result: Option<T>,
    error: Option<ProcessError>,
    tombstone: bool,
    state: NodeState,
    pub(crate) newer: Option<usize>,
    pub(crate) older: Option<usize>,
}

impl<T> Node<T> {
    pub fn new(payload: T) -> Self {
        Self {
            payload: Arc::new(payload),
            result: None,
            error: None,
            tombstone: false,
            state: NodeState::Pending,
            newer: None,
            older: None,
        }
    }

    pub fn payload(&self) -> &T {
        &self.payload
    }

    /// Shared payload for handing to a worker without holding the structural lock
    pub fn shared_payload(&self) -> Arc<T> {
        Arc::clone(&self.payload)
    }

    pub fn state(&self) -> NodeState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state == NodeState::Pending
    }

    pub fn is_processed(&self) -> bool {
        self.state == NodeState::Completed
    }

    pub fn is_tombstoned(&self) -> bool {
        self.tombstone
    }

    pub fn result(&self) -> Option<&T> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&ProcessError> {
        self.error.as_ref()
    }

    /// Transition to Dispatched
    pub fn mark_dispatched(&mut self) -> Result<()> {
        if self.state != NodeState::Pending {
            return Err(DomainError::InvalidStateTransition {
                from: self.state.to_string(),
                to: NodeState::Dispatched.to_string(),
            });
        }
        self.state = NodeState::Dispatched;
        Ok(())
    }

    /// Undo a dispatch that never reached a worker
    pub fn release_dispatch(&mut self) {
        if self.state == NodeState::Dispatched {
            self.state = NodeState::Pending;
        }
    }

    /// Commit a processor outcome. The result is set exactly once.
    pub fn complete(&mut self, outcome: ProcessOutcome<T>) -> Result<()> {
        self.ensure_not_completed()?;
        self.result = Some(outcome.payload);
        self.error = outcome.error;
        if outcome.delete {
            self.tombstone = true;
        }
        self.state = NodeState::Completed;
        Ok(())
    }

    /// Commit a node whose processor produced no payload (panic).
    /// The node is tombstoned so it is never delivered.
    pub fn abandon(&mut self, error: ProcessError) -> Result<()> {
        self.ensure_not_completed()?;
        self.error = Some(error);
        self.tombstone = true;
        self.state = NodeState::Completed;
        Ok(())
    }

    pub fn into_parts(self) -> (Option<T>, Option<ProcessError>) {
        (self.result, self.error)
    }

    fn ensure_not_completed(&self) -> Result<()> {
        if self.state == NodeState::Completed {
            return Err(DomainError::InvalidStateTransition {
                from: self.state.to_string(),
                to: NodeState::Completed.to_string(),
            });
        }
        Ok(())
    }
}
