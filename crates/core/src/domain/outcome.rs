// Process Outcome - what a processor hands back for one payload

use super::error::ProcessError;

/// Result of running the processing function on one payload.
///
/// `payload` is committed as the node's result even when `error` is set.
/// `delete` tombstones the node so a read drops it instead of delivering it.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessOutcome<T> {
    pub payload: T,
    pub delete: bool,
    pub error: Option<ProcessError>,
}

impl<T> ProcessOutcome<T> {
    /// Deliver `payload` to readers
    pub fn keep(payload: T) -> Self {
        Self {
            payload,
            delete: false,
            error: None,
        }
    }

    /// Commit `payload` but drop the node on the next read
    pub fn delete(payload: T) -> Self {
        Self {
            payload,
            delete: true,
            error: None,
        }
    }

    /// Commit `payload` with an error attached
    pub fn failed(payload: T, error: ProcessError) -> Self {
        Self {
            payload,
            delete: false,
            error: Some(error),
        }
    }

    pub fn with_delete(mut self, delete: bool) -> Self {
        self.delete = delete;
        self
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let kept = ProcessOutcome::keep(1);
        assert!(!kept.delete);
        assert!(!kept.is_error());

        let deleted = ProcessOutcome::delete(2);
        assert!(deleted.delete);
        assert!(!deleted.is_error());

        let failed = ProcessOutcome::failed(3, ProcessError::failed("boom")).with_delete(true);
        assert_eq!(failed.payload, 3);
        assert!(failed.delete);
        assert_eq!(failed.error, Some(ProcessError::Failed("boom".to_string())));
    }
}
