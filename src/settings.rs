//! Configuration loading.
//!
//! Sources are layered: an optional TOML file, then `HWWATCH_*` environment
//! variables (nested keys use `__`, e.g. `HWWATCH_FEED__TELEMETRY_FILE`).
//! Command-line flags are applied on top by the binary.
//!
//! ```toml
//! [feed]
//! telemetry_file = "/var/run/sensord/sensors.txt"
//! debounce_ms = 200
//! retry_attempts = 3
//! retry_delay_ms = 50
//!
//! [log]
//! level = "debug"
//! file = "logs/hwwatch.log"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::source::{RetryPolicy, DEFAULT_DEBOUNCE};

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "hwwatch.toml";

/// Settings for the telemetry feed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Absolute path of the file the sensor daemon writes.
    pub telemetry_file: PathBuf,
    pub debounce_ms: u64,
    pub retry_attempts: u32,
    pub retry_delay_ms: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        let retry = RetryPolicy::default();
        Self {
            telemetry_file: PathBuf::new(),
            debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
            retry_attempts: retry.attempts,
            retry_delay_ms: retry.delay.as_millis() as u64,
        }
    }
}

impl FeedConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Retry policy; at least one attempt is always made.
    pub fn retry(&self) -> RetryPolicy {
        RetryPolicy {
            attempts: self.retry_attempts.max(1),
            delay: Duration::from_millis(self.retry_delay_ms),
        }
    }
}

/// Settings for the log sink.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter directive; `RUST_LOG` takes precedence.
    pub level: String,
    /// Log file. The terminal UI owns stdout, so logs go here.
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "debug".to_string(),
            file: Some(PathBuf::from("logs/hwwatch.log")),
        }
    }
}

/// All settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub feed: FeedConfig,
    pub log: LogConfig,
}

impl Settings {
    /// Load settings from `path` (required) or the default config file (optional),
    /// then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix("HWWATCH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn toml_file(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(file, "{}", contents).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(settings.feed.telemetry_file.as_os_str().is_empty());
        assert_eq!(settings.feed.debounce(), Duration::from_millis(200));
        assert_eq!(settings.feed.retry(), RetryPolicy::default());
        assert_eq!(settings.log.level, "debug");
    }

    #[test]
    fn test_load_from_file() {
        let file = toml_file(
            r#"
            [feed]
            telemetry_file = "/var/run/sensord/sensors.txt"
            retry_attempts = 5

            [log]
            level = "info"
            "#,
        );

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(
            settings.feed.telemetry_file,
            PathBuf::from("/var/run/sensord/sensors.txt")
        );
        assert_eq!(settings.feed.retry().attempts, 5);
        // Unset keys keep their defaults.
        assert_eq!(settings.feed.debounce_ms, 200);
        assert_eq!(settings.log.level, "info");
        assert_eq!(settings.log.file, Some(PathBuf::from("logs/hwwatch.log")));
    }

    #[test]
    fn test_explicit_config_file_must_exist() {
        assert!(Settings::load(Some(Path::new("/nonexistent/hwwatch.toml"))).is_err());
    }

    #[test]
    fn test_zero_attempts_still_reads_once() {
        let feed = FeedConfig {
            retry_attempts: 0,
            ..FeedConfig::default()
        };
        assert_eq!(feed.retry().attempts, 1);
    }
}
