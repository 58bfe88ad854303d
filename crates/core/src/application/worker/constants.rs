// Worker constants (No magic values)

/// Queue name used when none is configured
pub const DEFAULT_QUEUE_NAME: &str = "default";

/// Worker pool size used when none is configured
pub const DEFAULT_WORKERS: usize = 4;

/// Environment variable prefix for config loading (WORKPOOL_WORKERS, ...)
pub const ENV_PREFIX: &str = "WORKPOOL";

/// Thread name prefix for pool workers: `<prefix>-<queue>-<id>`
pub const WORKER_THREAD_PREFIX: &str = "workpool-worker";

/// Thread name prefix for the dispatcher: `<prefix>-<queue>`
pub const DISPATCHER_THREAD_PREFIX: &str = "workpool-dispatcher";

/// Capacity of the distribution channel. Zero makes every send a rendezvous
/// with an idle worker.
pub const DISTRIBUTION_CHANNEL_CAPACITY: usize = 0;
