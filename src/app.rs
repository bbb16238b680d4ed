//! Application state and navigation logic.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::{debug, error};

use crate::data::{DisplayCollection, MergeOutcome};
use crate::source::{FeedStats, SnapshotSource};
use crate::ui::Theme;

/// Main application state.
///
/// All mutation of [`DisplayCollection`] happens here, on the thread that
/// runs the UI loop.
pub struct App {
    pub running: bool,
    pub show_help: bool,

    // Data source
    source: Box<dyn SnapshotSource>,
    pub display: DisplayCollection,
    pub stats: Option<Arc<FeedStats>>,
    pub load_error: Option<String>,

    /// Snapshots merged since start.
    pub updates: u64,
    pub last_update: Option<Instant>,
    pub last_merge: MergeOutcome,

    // Navigation state
    pub selected_index: usize,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App reading from the given source.
    pub fn new(source: Box<dyn SnapshotSource>) -> Self {
        Self {
            running: true,
            show_help: false,
            source,
            display: DisplayCollection::new(),
            stats: None,
            load_error: None,
            updates: 0,
            last_update: None,
            last_merge: MergeOutcome::default(),
            selected_index: 0,
            theme: Theme::auto_detect(),
            status_message: None,
        }
    }

    /// Attach publisher counters for the header.
    pub fn with_stats(mut self, stats: Arc<FeedStats>) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Poll the source and merge any new snapshot into the display.
    ///
    /// Returns Ok(true) if a snapshot was merged, Ok(false) if there was
    /// nothing new. A source error stops the app; the message is kept in
    /// [`load_error`](Self::load_error) for the caller to report.
    pub fn reload_data(&mut self) -> Result<bool> {
        if let Some(err) = self.source.error() {
            if self.load_error.is_none() {
                error!("Feed {} stopped: {}", self.source.description(), err);
            }
            self.load_error = Some(err);
            self.running = false;
            return Ok(false);
        }

        let Some(snapshot) = self.source.poll() else {
            return Ok(false);
        };

        let outcome = self.display.merge(&snapshot);
        debug!(
            "Merged {} readings: {} updated, {} appended, {} rejected",
            snapshot.len(),
            outcome.updated,
            outcome.appended,
            outcome.rejected
        );
        if outcome.rejected > 0 {
            self.set_status_message(format!(
                "{} reading(s) ignored: kind changed",
                outcome.rejected
            ));
        }

        self.last_merge = outcome;
        self.updates += 1;
        self.last_update = Some(Instant::now());
        Ok(true)
    }

    /// Move selection down by one item.
    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    /// Move selection up by one item.
    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    /// Move selection down by n items.
    pub fn select_next_n(&mut self, n: usize) {
        let max = self.display.len().saturating_sub(1);
        self.selected_index = (self.selected_index + n).min(max);
    }

    /// Move selection up by n items.
    pub fn select_prev_n(&mut self, n: usize) {
        self.selected_index = self.selected_index.saturating_sub(n);
    }

    /// Jump to the first item.
    pub fn select_first(&mut self) {
        self.selected_index = 0;
    }

    /// Jump to the last item.
    pub fn select_last(&mut self) {
        self.selected_index = self.display.len().saturating_sub(1);
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn quit(&mut self) {
        self.running = false;
    }
}
