//! Host-facing lifecycle for one telemetry pipeline.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::error::FeedError;
use crate::settings::FeedConfig;
use crate::source::{FeedStats, FileWatcher, Publisher, Subscription, TelemetryReader};

/// One watcher → reader → publisher pipeline for one telemetry file.
///
/// # Example
///
/// ```no_run
/// use hwwatch::{FeedConfig, SnapshotSource, TelemetryFeed};
///
/// let config = FeedConfig {
///     telemetry_file: "/var/run/sensord/sensors.txt".into(),
///     ..FeedConfig::default()
/// };
/// let mut feed = TelemetryFeed::open(&config)?;
/// feed.start_monitoring()?;
///
/// let mut subscription = feed.subscribe();
/// if let Some(snapshot) = subscription.poll() {
///     println!("{} readings", snapshot.len());
/// }
///
/// feed.dispose()?;
/// # Ok::<(), hwwatch::FeedError>(())
/// ```
#[derive(Debug)]
pub struct TelemetryFeed {
    path: PathBuf,
    watcher: FileWatcher,
    publisher: Publisher,
}

impl TelemetryFeed {
    /// Build the pipeline and take the first reading.
    ///
    /// The watch is not started yet; call [`start_monitoring`](Self::start_monitoring).
    pub fn open(config: &FeedConfig) -> Result<Self, FeedError> {
        let path = config.telemetry_file.clone();
        let watcher = FileWatcher::new(&path, config.debounce());
        let reader = TelemetryReader::new(&path);
        let publisher = Publisher::new(reader, watcher.subscribe(), config.retry())?;

        Ok(Self {
            path,
            watcher,
            publisher,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Start watching the file. A second call while running does nothing.
    pub fn start_monitoring(&mut self) -> Result<(), FeedError> {
        self.watcher.start()
    }

    /// Stop watching the file. Safe to call at any time.
    pub fn stop_monitoring(&mut self) {
        self.watcher.stop();
    }

    pub fn is_monitoring(&self) -> bool {
        self.watcher.is_running()
    }

    /// Subscribe to snapshots; the latest one is delivered first.
    pub fn subscribe(&self) -> Subscription {
        self.publisher.subscribe()
    }

    pub fn stats(&self) -> Arc<FeedStats> {
        self.publisher.stats()
    }

    /// Release the watch and the broadcast channel.
    pub fn dispose(self) -> Result<(), FeedError> {
        let TelemetryFeed {
            path,
            mut watcher,
            publisher,
        } = self;
        watcher.stop();
        let result = publisher.dispose();
        info!("Telemetry feed for {} disposed", path.display());
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ReadingValue;
    use crate::source::SnapshotSource;
    use std::fs;
    use std::time::{Duration, Instant};
    use tempfile::TempDir;

    fn config_for(path: &Path) -> FeedConfig {
        FeedConfig {
            telemetry_file: path.to_path_buf(),
            ..FeedConfig::default()
        }
    }

    /// Rewrite `path` until a published snapshot passes `check`.
    ///
    /// A single write can race the debounce: the accepted event may fire on
    /// the truncate, with the write itself suppressed. Rewriting after the
    /// debounce window guarantees a later read sees the full contents.
    fn write_until_published(
        path: &Path,
        contents: &str,
        subscription: &mut Subscription,
        check: impl Fn(&crate::model::Snapshot) -> bool,
    ) -> bool {
        let deadline = Instant::now() + Duration::from_secs(10);
        while Instant::now() < deadline {
            fs::write(path, contents).unwrap();
            std::thread::sleep(Duration::from_millis(300));
            while let Some(snapshot) = subscription.poll() {
                if check(&snapshot) {
                    return true;
                }
            }
        }
        false
    }

    #[test]
    fn test_open_publishes_initial_snapshot() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sensors.txt");
        fs::write(&path, "cpu_temp 45.5\nfan1 900\n").unwrap();

        let feed = TelemetryFeed::open(&config_for(&path)).unwrap();
        let mut subscription = feed.subscribe();

        let snapshot = subscription.poll().unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[1].value(), &ReadingValue::Int(900));
        feed.dispose().unwrap();
    }

    #[test]
    fn test_missing_file_opens_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("not-yet-written.txt");

        let feed = TelemetryFeed::open(&config_for(&path)).unwrap();
        assert_eq!(feed.subscribe().poll(), Some(Vec::new()));
        feed.dispose().unwrap();
    }

    #[test]
    fn test_start_with_unset_path_is_configuration_error() {
        let mut feed = TelemetryFeed::open(&FeedConfig::default()).unwrap();
        assert!(matches!(
            feed.start_monitoring(),
            Err(FeedError::Configuration(_))
        ));
        feed.dispose().unwrap();
    }

    #[test]
    fn test_start_and_stop_are_repeatable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sensors.txt");

        let mut feed = TelemetryFeed::open(&config_for(&path)).unwrap();
        feed.stop_monitoring();
        feed.start_monitoring().unwrap();
        feed.start_monitoring().unwrap();
        assert!(feed.is_monitoring());
        feed.stop_monitoring();
        feed.stop_monitoring();
        assert!(!feed.is_monitoring());
        feed.dispose().unwrap();
    }

    #[test]
    fn test_file_change_is_republished() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sensors.txt");
        fs::write(&path, "fan1 900\n").unwrap();

        let mut feed = TelemetryFeed::open(&config_for(&path)).unwrap();
        feed.start_monitoring().unwrap();
        let mut subscription = feed.subscribe();
        assert!(subscription.poll().is_some());

        let updated = write_until_published(&path, "fan1 1500\n", &mut subscription, |s| {
            s.first().map(|r| r.value()) == Some(&ReadingValue::Int(1500))
        });
        assert!(updated, "no snapshot with the new value was published");
        feed.dispose().unwrap();
    }
}
