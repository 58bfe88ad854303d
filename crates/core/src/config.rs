// Configuration Loading
// Layered: built-in defaults < optional file < environment (WORKPOOL_*)

use crate::application::worker::constants::{DEFAULT_QUEUE_NAME, DEFAULT_WORKERS, ENV_PREFIX};
use crate::domain::QueueConfig;
use crate::error::Result;
use config::{Config, ConfigBuilder, Environment, File};
use std::path::Path;
use tracing::debug;

type Builder = ConfigBuilder<config::builder::DefaultState>;

fn defaults() -> Result<Builder> {
    Ok(Config::builder()
        .set_default("name", DEFAULT_QUEUE_NAME)?
        .set_default("workers", DEFAULT_WORKERS as u64)?
        .set_default("defer_start", false)?)
}

fn finish(builder: Builder, prefix: &str) -> Result<QueueConfig> {
    let config: QueueConfig = builder
        .add_source(Environment::with_prefix(prefix).try_parsing(true))
        .build()?
        .try_deserialize()?;
    config.validate()?;

    debug!(
        queue = %config.name,
        workers = config.workers,
        defer_start = config.defer_start,
        "Loaded queue config"
    );
    Ok(config)
}

/// Load from `WORKPOOL_NAME`, `WORKPOOL_WORKERS`, `WORKPOOL_DEFER_START`
pub fn from_env() -> Result<QueueConfig> {
    from_env_with_prefix(ENV_PREFIX)
}

/// Same as [`from_env`] with a caller-chosen variable prefix
pub fn from_env_with_prefix(prefix: &str) -> Result<QueueConfig> {
    finish(defaults()?, prefix)
}

/// Load a config file (format picked from the extension), then apply env overrides
pub fn from_file_and_env(path: impl AsRef<Path>) -> Result<QueueConfig> {
    let builder = defaults()?.add_source(File::from(path.as_ref()));
    finish(builder, ENV_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WorkPoolError;
    use std::io::Write;

    // Each test owns its prefix so parallel tests never see each other's vars

    #[test]
    fn test_defaults_without_env() {
        let config = from_env_with_prefix("WORKPOOL_TEST_UNSET").unwrap();
        assert_eq!(config, QueueConfig::default());
    }

    #[test]
    fn test_env_overrides() {
        std::env::set_var("WORKPOOL_TEST_OVR_NAME", "ingest");
        std::env::set_var("WORKPOOL_TEST_OVR_WORKERS", "8");
        std::env::set_var("WORKPOOL_TEST_OVR_DEFER_START", "true");

        let config = from_env_with_prefix("WORKPOOL_TEST_OVR").unwrap();
        assert_eq!(config.name, "ingest");
        assert_eq!(config.workers, 8);
        assert!(config.defer_start);
    }

    #[test]
    fn test_env_zero_workers_rejected() {
        std::env::set_var("WORKPOOL_TEST_ZERO_WORKERS", "0");

        let err = from_env_with_prefix("WORKPOOL_TEST_ZERO").unwrap_err();
        assert!(matches!(err, WorkPoolError::InvalidConfig(_)));
    }

    #[test]
    fn test_env_garbage_is_config_error() {
        std::env::set_var("WORKPOOL_TEST_BAD_WORKERS", "many");

        let err = from_env_with_prefix("WORKPOOL_TEST_BAD").unwrap_err();
        assert!(matches!(err, WorkPoolError::Config(_)));
    }

    #[test]
    fn test_file_values() {
        let path = std::env::temp_dir().join(format!("workpool-config-{}.toml", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "name = \"from-file\"\nworkers = 3").unwrap();
        drop(file);

        let config = from_file_and_env(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.name, "from-file");
        assert_eq!(config.workers, 3);
        assert!(!config.defer_start);
    }
}
