//! The owned ledger object tying local state, the queue and the remote
//! together.
//!
//! State is kept in two layers:
//! - the *base*: the last fetched snapshot plus every command the remote has
//!   confirmed since, persisted under [`SNAPSHOT_KEY`];
//! - the *view*: the base with the queued commands applied, which is what
//!   balances are computed from and what consumers read.
//!
//! The store is single-threaded (`!Send`). Methods take `&self` so a drain
//! can be in flight while new commands are submitted; no borrow is held
//! across a network call.

use std::cell::RefCell;

use api_types::command::{Command, TransactionData};
use engine::{EngineError, Ledger, Participant};
use tokio::sync::broadcast;

use crate::{
    coordinator::{DrainOutcome, SyncCoordinator, SyncState},
    error::{Result, StoreError},
    events::{EventBus, LedgerEvent, Notice},
    queue::MutationQueue,
    reconcile::{reconcile, replay},
    remote::RemoteAuthority,
    snapshot::LedgerSnapshot,
    store::{LocalStore, SNAPSHOT_KEY, load_json, save_json},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RefreshOutcome {
    Refreshed,
    /// Local state was kept.
    Failed(String),
}

pub struct LedgerStore<S, R> {
    store: S,
    remote: R,
    queue: RefCell<MutationQueue<S>>,
    base: RefCell<LedgerSnapshot>,
    view: RefCell<LedgerSnapshot>,
    ledger: RefCell<Ledger>,
    coordinator: SyncCoordinator,
    events: EventBus,
}

impl<S, R> LedgerStore<S, R>
where
    S: LocalStore + Clone,
    R: RemoteAuthority,
{
    /// Restores the persisted snapshot and queue. Missing documents start
    /// empty; unreadable ones are an error.
    pub fn open(store: S, remote: R, online: bool) -> Result<Self> {
        let base: LedgerSnapshot = load_json(&store, SNAPSHOT_KEY)?.unwrap_or_default();
        let queue = MutationQueue::load(store.clone())?;
        let (view, _) = replay(&base, queue.iter());
        let ledger = view.ledger();
        let events = EventBus::default();

        tracing::info!(
            transactions = view.transactions.len(),
            pending = queue.len(),
            "ledger restored"
        );

        Ok(Self {
            store,
            remote,
            queue: RefCell::new(queue),
            base: RefCell::new(base),
            view: RefCell::new(view),
            ledger: RefCell::new(ledger),
            coordinator: SyncCoordinator::new(online, events.clone()),
            events,
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LedgerEvent> {
        self.events.subscribe()
    }

    pub fn ledger(&self) -> Ledger {
        self.ledger.borrow().clone()
    }

    /// The data consumers render: base plus queued commands.
    pub fn snapshot(&self) -> LedgerSnapshot {
        self.view.borrow().clone()
    }

    pub fn participants(&self) -> Vec<Participant> {
        self.view.borrow().resolved_participants()
    }

    pub fn pending(&self) -> Vec<Command> {
        self.queue.borrow().iter().cloned().collect()
    }

    pub fn sync_state(&self) -> SyncState {
        self.coordinator.state()
    }

    pub fn is_online(&self) -> bool {
        self.coordinator.is_online()
    }

    fn recompute(&self) {
        let ledger = self.view.borrow().ledger();
        for diagnostic in &ledger.diagnostics {
            tracing::debug!(%diagnostic, "transaction excluded from settlement");
        }
        *self.ledger.borrow_mut() = ledger;
        self.events.emit(LedgerEvent::LedgerRecomputed);
    }

    /// Queues `command`, applies it locally and, when online, drains.
    ///
    /// Returns once the command is durable; a store failure means it was
    /// neither queued nor applied.
    pub async fn submit(&self, command: Command) -> Result<DrainOutcome> {
        self.queue.borrow_mut().enqueue(command.clone())?;
        self.view.borrow_mut().apply(&command);
        self.recompute();
        tracing::info!(action = command.action(), "command queued");

        if !self.coordinator.is_online() {
            self.events.notice(Notice::SavedOffline);
        }
        Ok(self.drain().await)
    }

    /// Validates and submits a new expense.
    pub async fn add_transaction(&self, data: TransactionData) -> Result<DrainOutcome> {
        self.validate_transaction(&data)?;
        self.submit(Command::AddTransaction { data }).await
    }

    pub async fn toggle_visit(&self, index: usize, status: bool) -> Result<DrainOutcome> {
        self.submit(Command::ToggleVisit { index, status }).await
    }

    pub async fn toggle_pack(&self, item: &str, status: bool) -> Result<DrainOutcome> {
        self.submit(Command::TogglePack {
            item: item.to_string(),
            status,
        })
        .await
    }

    fn validate_transaction(&self, data: &TransactionData) -> std::result::Result<(), EngineError> {
        if data.desc.trim().is_empty() {
            return Err(EngineError::MissingField("description".to_string()));
        }
        if !data.amount.is_finite() || data.amount <= 0.0 {
            return Err(EngineError::InvalidAmount(
                "amount must be greater than zero".to_string(),
            ));
        }
        if data.payer.trim().is_empty() {
            return Err(EngineError::MissingField("payer".to_string()));
        }
        let beneficiary = data.beneficiary.trim();
        if data.is_individual && (beneficiary.is_empty() || beneficiary.eq_ignore_ascii_case("all"))
        {
            return Err(EngineError::MissingField("beneficiary".to_string()));
        }

        // Without configured participants anyone who pays becomes one.
        let view = self.view.borrow();
        if view.participants.is_empty() {
            return Ok(());
        }
        let known = |name: &str| view.participants.iter().any(|p| p.name == name);
        if !known(data.payer.trim()) {
            return Err(EngineError::UnknownParticipant(data.payer.trim().to_string()));
        }
        if data.is_individual && !known(beneficiary) {
            return Err(EngineError::UnknownParticipant(beneficiary.to_string()));
        }
        Ok(())
    }

    /// Runs one drain pass. Delivered commands are folded into the base.
    pub async fn drain(&self) -> DrainOutcome {
        self.coordinator
            .drain(&self.queue, &self.remote, |command| self.confirm(command))
            .await
    }

    /// Folds a delivered command into the base. The in-memory base only
    /// changes once the new one is persisted.
    fn confirm(&self, command: &Command) -> std::result::Result<(), StoreError> {
        let mut next = self.base.borrow().clone();
        next.apply(command);
        save_json(&self.store, SNAPSHOT_KEY, &next)?;
        *self.base.borrow_mut() = next;
        Ok(())
    }

    /// Edge-triggered connectivity signal. Regaining connectivity drains the
    /// queue and returns the outcome; any other signal returns `None`.
    pub async fn set_online(&self, online: bool) -> Option<DrainOutcome> {
        if self.coordinator.set_online(online) {
            return Some(self.drain().await);
        }
        None
    }

    /// Pulls the remote snapshot and reconciles it with the queue.
    ///
    /// Failures leave local state untouched. A store failure after a
    /// successful fetch is returned as an error.
    pub async fn refresh(&self) -> Result<RefreshOutcome> {
        let fetched = match self.remote.fetch_snapshot().await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::warn!(error = %err, "snapshot fetch failed, keeping local data");
                self.events.notice(Notice::RefreshFailed {
                    reason: err.to_string(),
                });
                return Ok(RefreshOutcome::Failed(err.to_string()));
            }
        };

        let merged = {
            let queue = self.queue.borrow();
            reconcile(fetched, queue.iter())
        };
        let merged = match merged {
            Ok(merged) => merged,
            Err(err) => {
                tracing::warn!(error = %err, "snapshot rejected, keeping local data");
                self.events.notice(Notice::RefreshFailed {
                    reason: err.to_string(),
                });
                return Ok(RefreshOutcome::Failed(err.to_string()));
            }
        };

        save_json(&self.store, SNAPSHOT_KEY, &merged.base)?;
        *self.base.borrow_mut() = merged.base;
        *self.view.borrow_mut() = merged.view;
        self.recompute();

        tracing::info!(
            transactions = self.view.borrow().transactions.len(),
            "snapshot refreshed"
        );
        self.events.notice(Notice::Refreshed);
        Ok(RefreshOutcome::Refreshed)
    }

    /// Final persist of both documents.
    pub fn shutdown(self) -> Result<()> {
        self.queue.borrow().persist()?;
        save_json(&self.store, SNAPSHOT_KEY, &*self.base.borrow())?;
        tracing::info!(pending = self.queue.borrow().len(), "ledger persisted");
        Ok(())
    }
}
