//! Telemetry ingestion: file watching, reading, and snapshot publishing.
//!
//! The pipeline runs leaf-first:
//!
//! ```text
//! notify event ─▶ FileWatcher (debounce) ─▶ Publisher (retry + read + parse)
//!                                                  │ per-subscriber queues
//!                                                  ▼
//!                                           Subscription(s)
//! ```
//!
//! Two traits mark the seams: [`SnapshotReader`] is what the publisher calls
//! to produce a snapshot, and [`SnapshotSource`] is what a consumer polls.

mod broadcast;
mod parser;
mod publisher;
mod reader;
mod subscription;
mod watcher;

pub use parser::{infer_value, parse_line};
pub use publisher::{FeedStats, Publisher, RetryPolicy};
pub use reader::TelemetryReader;
pub use subscription::Subscription;
pub use watcher::{
    CancelHandle, ChangeSender, ChangeSubscription, Debouncer, FileWatcher, WatchSignal,
    DEFAULT_DEBOUNCE,
};

use std::fmt::Debug;
use std::path::Path;

use crate::error::FeedError;
use crate::model::Snapshot;

/// Produces one snapshot per call.
///
/// Implemented by [`TelemetryReader`] for the on-disk file. Errors for which
/// [`FeedError::is_transient`] is true are retried by the [`Publisher`].
pub trait SnapshotReader: Send + Debug {
    /// Read the current snapshot.
    fn read(&mut self) -> Result<Snapshot, FeedError>;

    /// The path this reader reads from.
    fn path(&self) -> &Path;

    /// Returns a human-readable description of the reader.
    fn description(&self) -> &str;
}

/// Trait for receiving published snapshots.
///
/// Consumers call [`poll`](SnapshotSource::poll) from their own loop, which
/// keeps all mutation of their display state on that loop's thread.
pub trait SnapshotSource: Send + Debug {
    /// Poll for the latest snapshot.
    ///
    /// Returns `Some(snapshot)` if new data is available, `None` otherwise.
    /// This method should be non-blocking.
    fn poll(&mut self) -> Option<Snapshot>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI header.
    fn description(&self) -> &str;

    /// Check if the source has stopped.
    ///
    /// Returns the error message if the feed hit a fatal error or was closed.
    fn error(&self) -> Option<String>;
}
