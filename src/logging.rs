//! Log sink setup.

use std::any::Any;
use std::fs::{self, OpenOptions};
use std::io;
use std::panic::{Location, PanicHookInfo};
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::settings::LogConfig;

/// Install the global `tracing` subscriber.
///
/// Logs go to the configured file (appended, no ANSI) unless `to_stderr`
/// is set or no file is configured. `RUST_LOG` overrides `config.level`.
pub fn init(config: &LogConfig, to_stderr: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    match config.file.as_deref() {
        Some(path) if !to_stderr => {
            if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                fs::create_dir_all(dir)
                    .with_context(|| format!("failed to create log directory {}", dir.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init()
                .map_err(|e| anyhow!(e))
        }
        _ => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .try_init()
            .map_err(|e| anyhow!(e)),
    }
}

/// Record a panic in the log before the terminal is torn down.
pub fn log_panic(info: &PanicHookInfo<'_>) {
    error!("{}", describe_panic(info.payload(), info.location()));
}

fn describe_panic(payload: &(dyn Any + Send), location: Option<&Location<'_>>) -> String {
    let message = if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "Box<dyn Any>"
    };

    match location {
        Some(loc) => format!(
            "panicked at {}:{}:{}: {}",
            loc.file(),
            loc.line(),
            loc.column(),
            message
        ),
        None => format!("panicked: {}", message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_panic_with_str_payload() {
        let location = Location::caller();
        let text = describe_panic(&"boom", Some(location));
        assert!(text.starts_with(&format!("panicked at {}:{}:", location.file(), location.line())));
        assert!(text.ends_with(": boom"));
    }

    #[test]
    fn test_describe_panic_with_string_payload() {
        let payload = String::from("index out of range");
        assert_eq!(describe_panic(&payload, None), "panicked: index out of range");
    }

    #[test]
    fn test_describe_panic_with_opaque_payload() {
        assert_eq!(describe_panic(&42_u32, None), "panicked: Box<dyn Any>");
    }
}
