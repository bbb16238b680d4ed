//! File-change detection for the telemetry file.
//!
//! [`FileWatcher`] observes the file's parent directory with `notify`,
//! filters events down to write/size changes of the configured file name,
//! debounces bursts, and forwards a [`WatchSignal::Changed`] to every live
//! [`ChangeSubscription`].

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use notify::event::{EventKind, ModifyKind};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::error::FeedError;

/// Window within which further raw events are suppressed.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);

/// Message delivered to a [`ChangeSubscription`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchSignal {
    /// The telemetry file changed.
    Changed,
    /// The subscription was cancelled through its [`CancelHandle`].
    Cancelled,
}

/// Sending half of a change subscription.
#[derive(Debug, Clone)]
pub struct ChangeSender {
    tx: mpsc::UnboundedSender<WatchSignal>,
}

impl ChangeSender {
    /// Signal a change. Returns `false` once the subscription is gone.
    pub fn notify(&self) -> bool {
        self.tx.send(WatchSignal::Changed).is_ok()
    }

    fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Ends a [`ChangeSubscription`] from another thread.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: mpsc::UnboundedSender<WatchSignal>,
}

impl CancelHandle {
    /// Wake the subscriber with [`WatchSignal::Cancelled`]. Signals already
    /// queued ahead of it are still delivered first.
    pub fn cancel(&self) {
        let _ = self.tx.send(WatchSignal::Cancelled);
    }
}

/// Receiving half of a change subscription. Dropping it unsubscribes.
#[derive(Debug)]
pub struct ChangeSubscription {
    rx: mpsc::UnboundedReceiver<WatchSignal>,
    cancel: CancelHandle,
}

impl ChangeSubscription {
    /// Create a connected sender/subscription pair.
    pub fn channel() -> (ChangeSender, ChangeSubscription) {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancelHandle { tx: tx.clone() };
        (ChangeSender { tx }, ChangeSubscription { rx, cancel })
    }

    /// A handle that can end this subscription.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Block until the next signal.
    ///
    /// Must not be called from inside an async runtime.
    pub fn recv_blocking(&mut self) -> Option<WatchSignal> {
        self.rx.blocking_recv()
    }

    /// Take a signal if one is queued.
    pub fn try_recv(&mut self) -> Option<WatchSignal> {
        self.rx.try_recv().ok()
    }
}

/// Trailing-edge-suppression debounce.
///
/// The first event of a burst is accepted; every event within `window` of
/// the last *accepted* event is dropped. There is no timer: a burst
/// collapses to its first event, not its last.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    last_accepted: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_accepted: None,
        }
    }

    /// Decide whether an event observed at `now` passes.
    pub fn accept(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_accepted {
            if now.saturating_duration_since(last) < self.window {
                return false;
            }
        }
        self.last_accepted = Some(now);
        true
    }
}

/// State shared between the watcher and the `notify` callback thread.
#[derive(Debug)]
struct Dispatch {
    enabled: AtomicBool,
    debouncer: Mutex<Debouncer>,
    subscribers: Mutex<Vec<ChangeSender>>,
}

impl Dispatch {
    fn new(window: Duration) -> Self {
        Self {
            enabled: AtomicBool::new(false),
            debouncer: Mutex::new(Debouncer::new(window)),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Handle one raw change event. Returns true if it was forwarded.
    fn on_raw_change(&self, now: Instant) -> bool {
        if !self.enabled.load(Ordering::Acquire) {
            return false;
        }
        if !self.debouncer.lock().accept(now) {
            return false;
        }

        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|s| s.notify());
        true
    }
}

/// Watches one telemetry file and raises debounced change signals.
pub struct FileWatcher {
    path: PathBuf,
    dispatch: Arc<Dispatch>,
    watcher: Option<RecommendedWatcher>,
}

impl FileWatcher {
    /// Create a watcher for `path`. Nothing is observed until [`start`](Self::start).
    pub fn new<P: AsRef<Path>>(path: P, debounce: Duration) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            dispatch: Arc::new(Dispatch::new(debounce)),
            watcher: None,
        }
    }

    /// Returns the path being watched.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_running(&self) -> bool {
        self.watcher.is_some()
    }

    /// Register for change signals. Dropping the returned subscription unsubscribes.
    pub fn subscribe(&self) -> ChangeSubscription {
        let (sender, subscription) = ChangeSubscription::channel();
        let mut subscribers = self.dispatch.subscribers.lock();
        subscribers.retain(|s| !s.is_closed());
        subscribers.push(sender);
        subscription
    }

    /// Begin observing the file's directory.
    ///
    /// Calling `start` on a running watcher is a no-op.
    pub fn start(&mut self) -> Result<(), FeedError> {
        if self.watcher.is_some() {
            debug!("start called but watcher already running");
            return Ok(());
        }

        let (directory, file_name) = split_watch_target(&self.path)?;

        let dispatch = self.dispatch.clone();
        let target = file_name;
        let handler = move |res: notify::Result<notify::Event>| {
            let Ok(event) = res else {
                return;
            };
            if !is_content_change(&event.kind) {
                return;
            }
            if !event.paths.iter().any(|p| p.file_name() == Some(target.as_os_str())) {
                return;
            }
            if dispatch.on_raw_change(Instant::now()) {
                debug!("File change detected: {:?}", event.paths);
            }
        };

        let mut watcher = notify::recommended_watcher(handler).map_err(|e| {
            error!("Failed to create file watcher for {}: {}", self.path.display(), e);
            FeedError::WatchStart {
                path: self.path.clone(),
                source: e,
            }
        })?;
        watcher
            .watch(&directory, RecursiveMode::NonRecursive)
            .map_err(|e| {
                error!("Failed to watch {}: {}", directory.display(), e);
                FeedError::WatchStart {
                    path: self.path.clone(),
                    source: e,
                }
            })?;

        self.dispatch.enabled.store(true, Ordering::Release);
        self.watcher = Some(watcher);
        info!("File watcher started for {}", self.path.display());
        Ok(())
    }

    /// Stop observing. Safe to call repeatedly or before `start`.
    pub fn stop(&mut self) {
        let Some(watcher) = self.watcher.take() else {
            debug!("stop called but watcher is not active");
            return;
        };
        self.dispatch.enabled.store(false, Ordering::Release);
        drop(watcher);
        info!("File watcher stopped for {}", self.path.display());
    }
}

impl std::fmt::Debug for FileWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWatcher")
            .field("path", &self.path)
            .field("running", &self.watcher.is_some())
            .finish()
    }
}

impl Drop for FileWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Split the configured path into the directory to watch and the file name to filter on.
fn split_watch_target(path: &Path) -> Result<(PathBuf, OsString), FeedError> {
    if path.as_os_str().to_string_lossy().trim().is_empty() {
        error!("Telemetry file path is not configured");
        return Err(FeedError::Configuration(
            "telemetry file path is not configured".to_string(),
        ));
    }

    let directory = path.parent().filter(|d| !d.as_os_str().is_empty());
    let file_name = path.file_name();
    match (directory, file_name) {
        (Some(dir), Some(name)) => Ok((dir.to_path_buf(), name.to_os_string())),
        _ => {
            error!("Configured telemetry file path is invalid: {}", path.display());
            Err(FeedError::Configuration(format!(
                "telemetry file path is invalid: {}",
                path.display()
            )))
        }
    }
}

/// Write-time and size changes; renames, accesses and removals are ignored.
fn is_content_change(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Modify(ModifyKind::Data(_) | ModifyKind::Metadata(_) | ModifyKind::Any)
    )
}
