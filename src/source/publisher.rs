//! Bridges change signals to reads and broadcasts the results.
//!
//! ```text
//! FileWatcher ──WatchSignal──▶ publisher thread ──read (≤3 tries)──▶ SnapshotBroadcast
//!                                                                          │
//!                                                    Subscription ◀────────┤
//!                                                    Subscription ◀────────┘
//! ```

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use super::broadcast::SnapshotBroadcast;
use super::watcher::{CancelHandle, ChangeSubscription, WatchSignal};
use super::{SnapshotReader, Subscription};
use crate::error::FeedError;
use crate::model::Snapshot;

/// Bounded, fixed-delay retry for transient read errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per change cycle, including the first.
    pub attempts: u32,
    /// Pause after a transient failure before the next attempt.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_millis(50),
        }
    }
}

/// Counters describing what the publisher has done so far.
#[derive(Debug, Default)]
pub struct FeedStats {
    published: AtomicU64,
    dropped_cycles: AtomicU64,
}

impl FeedStats {
    /// Snapshots broadcast, including the one taken at construction.
    pub fn published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }

    /// Change cycles abandoned after exhausting the retry budget.
    pub fn dropped_cycles(&self) -> u64 {
        self.dropped_cycles.load(Ordering::Relaxed)
    }
}

/// Reads the telemetry file on every change signal and broadcasts the
/// resulting snapshot to all subscribers.
///
/// Construction performs one read immediately so subscribers have data
/// before the file ever changes. After that a dedicated thread waits for
/// [`WatchSignal::Changed`], reads with [`RetryPolicy`], and publishes.
/// A fatal read error stops the thread; it is reported through
/// [`Subscription`]'s `error()` and returned by [`Publisher::dispose`].
pub struct Publisher {
    broadcast: Arc<SnapshotBroadcast>,
    description: String,
    stats: Arc<FeedStats>,
    fatal: Arc<Mutex<Option<String>>>,
    cancel: CancelHandle,
    worker: Option<JoinHandle<Result<(), FeedError>>>,
}

impl Publisher {
    /// Take the first reading, then start serving `changes` in the background.
    ///
    /// A fatal error on the first read is returned here; a half-started feed
    /// is never handed out.
    pub fn new<R>(
        mut reader: R,
        changes: ChangeSubscription,
        retry: RetryPolicy,
    ) -> Result<Self, FeedError>
    where
        R: SnapshotReader + 'static,
    {
        let broadcast = Arc::new(SnapshotBroadcast::new(Snapshot::new()));
        let stats = Arc::new(FeedStats::default());
        let fatal = Arc::new(Mutex::new(None));
        let description = reader.description().to_string();
        let path = reader.path().to_path_buf();

        refresh(&mut reader, &broadcast, &retry, &stats)?;

        let cancel = changes.cancel_handle();
        let worker = {
            let broadcast = broadcast.clone();
            let stats = stats.clone();
            let fatal = fatal.clone();
            thread::Builder::new()
                .name("telemetry-publisher".to_string())
                .spawn(move || serve(reader, changes, broadcast, retry, stats, fatal))
                .map_err(|e| {
                    error!("Failed to start publisher thread for {}: {}", path.display(), e);
                    FeedError::PublisherStart { path, source: e }
                })?
        };

        debug!("Publisher constructed for {}", description);
        Ok(Self {
            broadcast,
            description,
            stats,
            fatal,
            cancel,
            worker: Some(worker),
        })
    }

    /// Subscribe to snapshots. The current snapshot is delivered first.
    pub fn subscribe(&self) -> Subscription {
        Subscription::new(self.broadcast.clone(), &self.description, self.fatal.clone())
    }

    pub fn stats(&self) -> Arc<FeedStats> {
        self.stats.clone()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Stop serving change signals and release the broadcast channel.
    ///
    /// Any change cycle already queued is finished first. Returns the fatal
    /// error that stopped the publisher thread, if there was one.
    pub fn dispose(mut self) -> Result<(), FeedError> {
        let result = self.shutdown();
        debug!("Publisher disposed for {}", self.description);
        result
    }

    fn shutdown(&mut self) -> Result<(), FeedError> {
        let Some(worker) = self.worker.take() else {
            return Ok(());
        };
        self.cancel.cancel();
        let joined = worker.join();
        self.broadcast.close();
        match joined {
            Ok(result) => result,
            Err(_) => Err(FeedError::FatalRead {
                path: PathBuf::from(&self.description),
                reason: "publisher thread panicked".to_string(),
            }),
        }
    }
}

impl Drop for Publisher {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            error!("Publisher for {} stopped with error: {}", self.description, e);
        }
    }
}

impl std::fmt::Debug for Publisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Publisher")
            .field("description", &self.description)
            .field("published", &self.stats.published())
            .field("running", &self.worker.is_some())
            .finish()
    }
}

/// Publisher thread body: one retrying read per change signal.
fn serve<R: SnapshotReader>(
    mut reader: R,
    mut changes: ChangeSubscription,
    broadcast: Arc<SnapshotBroadcast>,
    retry: RetryPolicy,
    stats: Arc<FeedStats>,
    fatal: Arc<Mutex<Option<String>>>,
) -> Result<(), FeedError> {
    while let Some(WatchSignal::Changed) = changes.recv_blocking() {
        if let Err(e) = refresh(&mut reader, &broadcast, &retry, &stats) {
            error!("Telemetry feed stopped: {}", e);
            *fatal.lock() = Some(e.to_string());
            return Err(e);
        }
    }
    debug!("Publisher thread exiting for {}", reader.description());
    Ok(())
}

/// Read with retries and broadcast on success.
///
/// Returns `Ok(false)` when the retry budget ran out; the cycle is dropped
/// and the next change signal starts with a fresh budget.
fn refresh<R: SnapshotReader + ?Sized>(
    reader: &mut R,
    broadcast: &SnapshotBroadcast,
    retry: &RetryPolicy,
    stats: &FeedStats,
) -> Result<bool, FeedError> {
    match read_with_retry(reader, retry)? {
        Some(snapshot) => {
            let count = snapshot.len();
            let reached = broadcast.publish(snapshot);
            stats.published.fetch_add(1, Ordering::Relaxed);
            info!(
                "Published {} readings from {} to {} subscribers",
                count,
                reader.description(),
                reached
            );
            Ok(true)
        }
        None => {
            stats.dropped_cycles.fetch_add(1, Ordering::Relaxed);
            warn!(
                "Giving up on {} after {} attempts; waiting for the next change",
                reader.description(),
                retry.attempts
            );
            Ok(false)
        }
    }
}

fn read_with_retry<R: SnapshotReader + ?Sized>(
    reader: &mut R,
    retry: &RetryPolicy,
) -> Result<Option<Snapshot>, FeedError> {
    for attempt in 1..=retry.attempts {
        match reader.read() {
            Ok(snapshot) => return Ok(Some(snapshot)),
            Err(e) if e.is_transient() => {
                let remaining = retry.attempts - attempt;
                warn!("{}, retries left: {}", e, remaining);
                if remaining > 0 {
                    thread::sleep(retry.delay);
                }
            }
            Err(e) => {
                error!("Unexpected error reading {}: {}", reader.description(), e);
                return Err(e);
            }
        }
    }
    Ok(None)
}
