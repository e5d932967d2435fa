//! Merging a fetched snapshot with commands that are still queued.
//!
//! The remote is authoritative for the underlying records, the local engine
//! for everything derived from them. A fetched snapshot replaces the base
//! wholesale, then every queued command is re-applied on top so that local
//! work the remote has not seen yet stays visible until it is delivered.

use api_types::{command::Command, snapshot::RemoteSnapshot};

use crate::{convert::snapshot_from_remote, error::RemoteError, snapshot::LedgerSnapshot};

#[derive(Clone, Debug, PartialEq)]
pub struct Reconciled {
    /// The remote's records, persisted as the new base.
    pub base: LedgerSnapshot,
    /// `base` with the queued commands applied; what consumers see.
    pub view: LedgerSnapshot,
    /// Queued commands that no longer had a target in the new base.
    pub skipped: usize,
}

/// `base` with `pending` applied in queue order.
pub fn replay<'a>(
    base: &LedgerSnapshot,
    pending: impl IntoIterator<Item = &'a Command>,
) -> (LedgerSnapshot, usize) {
    let mut view = base.clone();
    let skipped = pending
        .into_iter()
        .filter(|command| !view.apply(command))
        .count();
    (view, skipped)
}

/// Merges `incoming` with the queued commands. Rejects documents whose
/// status is not a success, leaving the caller's state untouched.
pub fn reconcile<'a>(
    incoming: RemoteSnapshot,
    pending: impl IntoIterator<Item = &'a Command>,
) -> Result<Reconciled, RemoteError> {
    if !incoming.is_success() {
        return Err(RemoteError::Rejected(incoming.status));
    }
    let base = snapshot_from_remote(incoming);
    let (view, skipped) = replay(&base, pending);
    if skipped > 0 {
        tracing::warn!(skipped, "queued commands without a target in the fetched snapshot");
    }
    Ok(Reconciled {
        base,
        view,
        skipped,
    })
}
