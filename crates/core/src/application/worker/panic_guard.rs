// Panic isolation for worker safety
use std::panic::{catch_unwind, UnwindSafe};
use tracing::error;

/// Result of a panic-guarded execution
#[derive(Debug)]
pub enum PanicGuardResult<T> {
    /// Execution completed successfully
    Success(T),
    /// Execution panicked
    Panicked(String),
}

/// Execute a closure with panic isolation
///
/// If the closure panics, the panic is caught and returned as PanicGuardResult::Panicked.
/// This keeps one bad payload from killing a worker thread and shrinking the pool.
///
/// # Example
/// ```text
/// let result = execute_guarded(|| {
///     // This panic will be caught
///     panic!("test panic");
/// });
///
/// match result {
///     PanicGuardResult::Panicked(msg) => {
///         println!("Caught panic: {}", msg);
///     }
///     _ => {}
/// }
/// ```
pub fn execute_guarded<F, T>(f: F) -> PanicGuardResult<T>
where
    F: FnOnce() -> T + UnwindSafe,
{
    match catch_unwind(f) {
        Ok(result) => PanicGuardResult::Success(result),
        Err(panic_info) => {
            let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic_info.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            };

            error!(panic_msg = %panic_msg, "Processor panicked");
            PanicGuardResult::Panicked(panic_msg)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_passes_through() {
        match execute_guarded(|| 41 + 1) {
            PanicGuardResult::Success(v) => assert_eq!(v, 42),
            PanicGuardResult::Panicked(msg) => panic!("unexpected panic: {}", msg),
        }
    }

    #[test]
    fn test_str_panic_is_caught() {
        let result: PanicGuardResult<()> = execute_guarded(|| panic!("static message"));
        match result {
            PanicGuardResult::Panicked(msg) => assert_eq!(msg, "static message"),
            PanicGuardResult::Success(_) => panic!("expected panic"),
        }
    }

    #[test]
    fn test_formatted_panic_is_caught() {
        let id = 7;
        let result: PanicGuardResult<()> = execute_guarded(move || panic!("item {} failed", id));
        match result {
            PanicGuardResult::Panicked(msg) => assert_eq!(msg, "item 7 failed"),
            PanicGuardResult::Success(_) => panic!("expected panic"),
        }
    }
}
