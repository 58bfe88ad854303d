//! Shared helpers for the integration tests

#![allow(dead_code)]

use std::sync::Once;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Generous upper bound for `wait_idle` on slow CI machines
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(20);

static TRACING: Once = Once::new();

/// Install a test-writer subscriber once per test binary (RUST_LOG controls verbosity)
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });
}
