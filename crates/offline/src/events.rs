//! Notifications for presentation layers.
//!
//! Consumers subscribe once and re-read the [`LedgerStore`] when told that
//! something changed. Nothing in the core waits on a subscriber.
//!
//! [`LedgerStore`]: crate::LedgerStore

use tokio::sync::broadcast;

use crate::coordinator::SyncState;

const EVENT_CAPACITY: usize = 64;

/// Non-fatal, user-facing outcome of a background operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    /// A command was recorded locally while offline.
    SavedOffline,
    Synced { count: usize },
    SyncPaused { reason: String },
    BackOnline,
    WentOffline,
    Refreshed,
    RefreshFailed { reason: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LedgerEvent {
    /// Balances and the debt matrix were recomputed.
    LedgerRecomputed,
    SyncStateChanged(SyncState),
    Notice(Notice),
}

#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<LedgerEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self { tx }
    }
}

impl EventBus {
    pub fn subscribe(&self) -> broadcast::Receiver<LedgerEvent> {
        self.tx.subscribe()
    }

    pub fn emit(&self, event: LedgerEvent) {
        // No subscriber is not an error.
        let _ = self.tx.send(event);
    }

    pub fn notice(&self, notice: Notice) {
        self.emit(LedgerEvent::Notice(notice));
    }
}
