// Processor Port
// The caller-supplied processing function that workers invoke per payload

use crate::domain::ProcessOutcome;

/// Processor trait
///
/// Implementations:
/// - any `Fn(&T) -> ProcessOutcome<T> + Send + Sync` closure
/// - mocks::MockProcessor for tests
///
/// Called from worker threads, never under the structural lock. Each
/// inserted payload is passed here exactly once.
pub trait Processor<T>: Send + Sync {
    /// Transform one payload
    ///
    /// The returned payload is committed even when `error` is set.
    fn process(&self, payload: &T) -> ProcessOutcome<T>;
}

impl<T, F> Processor<T> for F
where
    F: Fn(&T) -> ProcessOutcome<T> + Send + Sync,
{
    fn process(&self, payload: &T) -> ProcessOutcome<T> {
        self(payload)
    }
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::domain::ProcessError;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::time::Duration;

    /// Predicate deciding which payloads are tombstoned
    pub type DeletePredicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

    /// Mock processor behavior
    #[derive(Clone)]
    pub enum MockBehavior<T> {
        /// Return the payload unchanged
        Identity,
        /// Return the payload unchanged with an error attached
        Fail(String),
        /// Panic with message (for panic isolation testing)
        Panic(String),
        /// Return the payload unchanged, tombstoning it when the predicate holds
        DeleteWhere(DeletePredicate<T>),
    }

    /// Mock Processor for testing
    ///
    /// Records every payload it sees so tests can assert exactly-once
    /// processing.
    pub struct MockProcessor<T> {
        behavior: MockBehavior<T>,
        delay: Option<Duration>,
        calls: Mutex<Vec<T>>,
    }

    impl<T: Clone> MockProcessor<T> {
        pub fn new(behavior: MockBehavior<T>) -> Self {
            Self {
                behavior,
                delay: None,
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn identity() -> Self {
            Self::new(MockBehavior::Identity)
        }

        pub fn failing(message: impl Into<String>) -> Self {
            Self::new(MockBehavior::Fail(message.into()))
        }

        pub fn panicking(message: impl Into<String>) -> Self {
            Self::new(MockBehavior::Panic(message.into()))
        }

        pub fn deleting_where(predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
            Self::new(MockBehavior::DeleteWhere(Arc::new(predicate)))
        }

        /// Sleep this long inside every call
        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().len()
        }

        /// Payloads seen so far, in call order
        pub fn calls(&self) -> Vec<T> {
            self.calls.lock().clone()
        }
    }

    impl<T: Clone + Send> Processor<T> for MockProcessor<T> {
        fn process(&self, payload: &T) -> ProcessOutcome<T> {
            self.calls.lock().push(payload.clone());

            if let Some(delay) = self.delay {
                std::thread::sleep(delay);
            }

            match &self.behavior {
                MockBehavior::Identity => ProcessOutcome::keep(payload.clone()),
                MockBehavior::Fail(msg) => {
                    ProcessOutcome::failed(payload.clone(), ProcessError::failed(msg.clone()))
                }
                MockBehavior::Panic(msg) => {
                    panic!("{}", msg); // Actually panic for panic isolation testing
                }
                MockBehavior::DeleteWhere(predicate) => {
                    ProcessOutcome::keep(payload.clone()).with_delete(predicate(payload))
                }
            }
        }
    }
}
