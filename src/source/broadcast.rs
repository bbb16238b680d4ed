//! Replay-latest multicast of snapshots.
//!
//! Every subscriber gets its own unbounded queue. A new queue is seeded with
//! the most recent snapshot, then receives every later publish in order, so
//! a slow consumer falls behind but never skips a snapshot.

use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::model::Snapshot;

#[derive(Debug)]
struct State {
    latest: Snapshot,
    subscribers: Vec<mpsc::UnboundedSender<Snapshot>>,
    closed: bool,
}

/// Shared between a [`Publisher`](super::Publisher) and its subscriptions.
#[derive(Debug)]
pub(crate) struct SnapshotBroadcast {
    state: Mutex<State>,
}

impl SnapshotBroadcast {
    pub(crate) fn new(initial: Snapshot) -> Self {
        Self {
            state: Mutex::new(State {
                latest: initial,
                subscribers: Vec::new(),
                closed: false,
            }),
        }
    }

    /// Deliver `snapshot` to every live subscriber and keep it for late joiners.
    ///
    /// Returns the number of subscribers it reached.
    pub(crate) fn publish(&self, snapshot: Snapshot) -> usize {
        let mut state = self.state.lock();
        state.subscribers.retain(|tx| tx.send(snapshot.clone()).is_ok());
        state.latest = snapshot;
        state.subscribers.len()
    }

    /// Open a queue that starts with the latest snapshot.
    ///
    /// Seeding and registration happen under one lock, so no publish can
    /// land between them. After [`close`](Self::close) the queue holds the
    /// latest snapshot and then ends.
    pub(crate) fn subscribe(&self) -> mpsc::UnboundedReceiver<Snapshot> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut state = self.state.lock();
        let _ = tx.send(state.latest.clone());
        if !state.closed {
            state.subscribers.push(tx);
        }
        rx
    }

    pub(crate) fn latest(&self) -> Snapshot {
        self.state.lock().latest.clone()
    }

    /// Drop every sender. Queued snapshots are still delivered, then each
    /// subscription sees the end of the feed.
    pub(crate) fn close(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        state.subscribers.clear();
    }
}
