//! Error types for the telemetry feed.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while watching, reading, or publishing telemetry.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The telemetry path is missing or unusable.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The OS file watch could not be established.
    #[error("Failed to watch {}: {source}", path.display())]
    WatchStart {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },

    /// I/O contention while the file was open. Safe to retry.
    #[error("Transient read error on {}: {source}", path.display())]
    TransientRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A read fault that retrying cannot fix.
    #[error("Fatal read error on {}: {reason}", path.display())]
    FatalRead { path: PathBuf, reason: String },

    /// The background publisher thread could not be spawned.
    #[error("Failed to start publisher for {}: {source}", path.display())]
    PublisherStart {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FeedError {
    /// Returns true if the operation that produced this error may be retried.
    pub fn is_transient(&self) -> bool {
        matches!(self, FeedError::TransientRead { .. })
    }

    /// Sort an I/O error raised while reading `path` into the transient/fatal split.
    pub(crate) fn from_io(path: &std::path::Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => FeedError::FatalRead {
                path: path.to_path_buf(),
                reason: err.to_string(),
            },
            _ => FeedError::TransientRead {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }
}
