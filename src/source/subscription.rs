//! Subscriber side of the snapshot feed.
//!
//! Each subscription owns a queue from the publisher's broadcast. It starts
//! with the most recent snapshot, then holds every later one in publish
//! order until polled.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;

use super::broadcast::SnapshotBroadcast;
use super::SnapshotSource;
use crate::model::Snapshot;

/// A live subscription to a [`Publisher`](super::Publisher).
///
/// Each subscription is independent; dropping it unsubscribes.
///
/// # Example
///
/// ```
/// use hwwatch::{ChangeSubscription, Publisher, RetryPolicy, SnapshotSource, TelemetryReader};
///
/// let (_changes_tx, changes) = ChangeSubscription::channel();
/// let reader = TelemetryReader::new("/nonexistent/sensors.txt");
/// let publisher = Publisher::new(reader, changes, RetryPolicy::default()).unwrap();
///
/// let mut subscription = publisher.subscribe();
/// // The latest snapshot is delivered immediately.
/// assert!(subscription.poll().is_some());
/// assert!(subscription.poll().is_none());
/// ```
#[derive(Debug)]
pub struct Subscription {
    receiver: mpsc::UnboundedReceiver<Snapshot>,
    broadcast: Arc<SnapshotBroadcast>,
    description: String,
    /// Set once the publisher is gone and the queue is drained
    closed: bool,
    fatal: Arc<Mutex<Option<String>>>,
}

impl Subscription {
    pub(crate) fn new(
        broadcast: Arc<SnapshotBroadcast>,
        description: &str,
        fatal: Arc<Mutex<Option<String>>>,
    ) -> Self {
        Self {
            receiver: broadcast.subscribe(),
            broadcast,
            description: format!("feed: {}", description),
            closed: false,
            fatal,
        }
    }

    /// The most recently published snapshot, without consuming the queue.
    pub fn latest(&self) -> Snapshot {
        self.broadcast.latest()
    }

    /// Wait for the next snapshot.
    ///
    /// The first call returns the current snapshot immediately. Returns
    /// `None` once the publisher has been disposed and the queue is empty.
    ///
    /// ```
    /// use hwwatch::{ChangeSubscription, Publisher, RetryPolicy, TelemetryReader};
    ///
    /// # tokio_test::block_on(async {
    /// let (_changes_tx, changes) = ChangeSubscription::channel();
    /// let reader = TelemetryReader::new("/nonexistent/sensors.txt");
    /// let publisher = Publisher::new(reader, changes, RetryPolicy::default()).unwrap();
    ///
    /// let mut subscription = publisher.subscribe();
    /// assert_eq!(subscription.next().await, Some(Vec::new()));
    ///
    /// publisher.dispose().unwrap();
    /// assert_eq!(subscription.next().await, None);
    /// # });
    /// ```
    pub async fn next(&mut self) -> Option<Snapshot> {
        let snapshot = self.receiver.recv().await;
        if snapshot.is_none() {
            self.closed = true;
        }
        snapshot
    }
}

impl SnapshotSource for Subscription {
    fn poll(&mut self) -> Option<Snapshot> {
        match self.receiver.try_recv() {
            Ok(snapshot) => Some(snapshot),
            Err(mpsc::error::TryRecvError::Empty) => None,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                self.closed = true;
                None
            }
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        if let Some(fatal) = self.fatal.lock().clone() {
            return Some(fatal);
        }
        if self.closed {
            return Some("Feed closed".to_string());
        }
        None
    }
}
