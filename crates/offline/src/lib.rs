//! Offline-first persistence and synchronization for the trip ledger.
//!
//! User commands are queued durably, applied to the local copy at once and
//! pushed to the remote authority in order whenever connectivity allows.
//! Fetched snapshots replace the local records while queued commands are
//! re-applied on top; balances are always recomputed locally with
//! [`engine::compute`].
//!
//! Everything here runs on one thread: [`LedgerStore`] is `!Send` and is
//! meant for a current-thread runtime.

pub use convert::{snapshot_from_remote, transaction_from_data};
pub use coordinator::{DrainOutcome, SyncCoordinator, SyncState};
pub use error::{Error, RemoteError, Result, StoreError};
pub use events::{EventBus, LedgerEvent, Notice};
pub use ledger_store::{LedgerStore, RefreshOutcome};
pub use queue::MutationQueue;
pub use reconcile::{Reconciled, reconcile, replay};
pub use remote::{HttpRemote, RemoteAuthority};
pub use snapshot::{BudgetSummary, LedgerSnapshot, Progress};
pub use store::{FileStore, LocalStore, MemoryStore, QUEUE_KEY, SNAPSHOT_KEY};

mod convert;
mod coordinator;
mod error;
mod events;
mod ledger_store;
mod queue;
mod reconcile;
mod remote;
mod snapshot;
mod store;
