//! Drains the mutation queue against the remote authority.
//!
//! ```text
//!            regain / enqueue while online
//!   Idle ───────────────────────────────▶ Draining ──▶ Idle   (queue empty or offline)
//!    ▲                                       │
//!    │             regain / enqueue          ▼
//!    └──────────────────────────────── Paused(error)          (push failed)
//! ```
//!
//! Only one drain pass runs at a time; a trigger while draining is a no-op.
//! The pass suspends only inside `push_mutation`, so a connectivity change
//! or a new command can land between two pushes but never inside one step.

use std::cell::{Cell, RefCell};

use api_types::command::Command;

use crate::{
    error::StoreError,
    events::{EventBus, LedgerEvent, Notice},
    queue::MutationQueue,
    remote::RemoteAuthority,
    store::LocalStore,
};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SyncState {
    #[default]
    Idle,
    Draining,
    /// The last push (or the persistence of its confirmation) failed. The
    /// command is still at the head of the queue.
    Paused(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DrainOutcome {
    Offline,
    AlreadyDraining,
    Empty,
    Drained { delivered: usize },
    /// Connectivity was lost between two pushes.
    Interrupted { delivered: usize },
    Paused { delivered: usize, reason: String },
}

#[derive(Debug)]
pub struct SyncCoordinator {
    state: RefCell<SyncState>,
    online: Cell<bool>,
    events: EventBus,
}

impl SyncCoordinator {
    pub fn new(online: bool, events: EventBus) -> Self {
        Self {
            state: RefCell::new(SyncState::Idle),
            online: Cell::new(online),
            events,
        }
    }

    pub fn state(&self) -> SyncState {
        self.state.borrow().clone()
    }

    pub fn is_online(&self) -> bool {
        self.online.get()
    }

    /// Records a connectivity signal. Returns `true` on the offline to online
    /// edge, when the caller should attempt a drain.
    pub fn set_online(&self, online: bool) -> bool {
        let was_online = self.online.replace(online);
        match (was_online, online) {
            (false, true) => {
                tracing::info!("connectivity regained");
                self.events.notice(Notice::BackOnline);
                true
            }
            (true, false) => {
                tracing::info!("connectivity lost");
                self.events.notice(Notice::WentOffline);
                false
            }
            _ => false,
        }
    }

    fn transition(&self, next: SyncState) {
        let changed = {
            let mut state = self.state.borrow_mut();
            if *state == next {
                false
            } else {
                *state = next.clone();
                true
            }
        };
        if changed {
            tracing::debug!(state = ?next, "sync state changed");
            self.events.emit(LedgerEvent::SyncStateChanged(next));
        }
    }

    fn pause(&self, delivered: usize, reason: String) -> DrainOutcome {
        tracing::warn!(%reason, delivered, "sync paused");
        self.transition(SyncState::Paused(reason.clone()));
        self.events.notice(Notice::SyncPaused {
            reason: reason.clone(),
        });
        DrainOutcome::Paused { delivered, reason }
    }

    /// Pushes queued commands head first until the queue is empty, a push
    /// fails or connectivity is lost.
    ///
    /// `on_delivered` runs after a delivered command has been removed from
    /// the queue.
    pub async fn drain<S, R, F>(
        &self,
        queue: &RefCell<MutationQueue<S>>,
        remote: &R,
        mut on_delivered: F,
    ) -> DrainOutcome
    where
        S: LocalStore,
        R: RemoteAuthority,
        F: FnMut(&Command) -> Result<(), StoreError>,
    {
        if *self.state.borrow() == SyncState::Draining {
            return DrainOutcome::AlreadyDraining;
        }
        if !self.online.get() {
            return DrainOutcome::Offline;
        }
        if queue.borrow().is_empty() {
            self.transition(SyncState::Idle);
            return DrainOutcome::Empty;
        }

        self.transition(SyncState::Draining);
        let _guard = DrainGuard { coordinator: self };
        let mut delivered = 0;

        loop {
            if !self.online.get() {
                self.transition(SyncState::Idle);
                return DrainOutcome::Interrupted { delivered };
            }

            let Some(head) = queue.borrow().peek_head().cloned() else {
                break;
            };
            tracing::debug!(action = head.action(), remaining = queue.borrow().len(), "pushing command");

            if let Err(err) = remote.push_mutation(&head).await {
                return self.pause(delivered, err.to_string());
            }

            let confirmed = queue.borrow_mut().remove_head();
            if let Err(err) = confirmed {
                return self.pause(delivered, format!("failed to persist delivery: {err}"));
            }
            delivered += 1;
            if let Err(err) = on_delivered(&head) {
                return self.pause(delivered, format!("failed to persist delivery: {err}"));
            }
        }

        self.transition(SyncState::Idle);
        if delivered > 0 {
            tracing::info!(delivered, "queue drained");
            self.events.notice(Notice::Synced { count: delivered });
        }
        DrainOutcome::Drained { delivered }
    }
}

/// Releases the draining flag if a drain future is dropped mid-push.
struct DrainGuard<'a> {
    coordinator: &'a SyncCoordinator,
}

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        let draining = *self.coordinator.state.borrow() == SyncState::Draining;
        if draining {
            self.coordinator.transition(SyncState::Idle);
        }
    }
}
