//! Ingestion of wire documents into ledger types.
//!
//! This is the only place where loosely typed split markers are read. Past
//! this point a transaction carries an [`engine::Split`].

use api_types::{
    command::TransactionData,
    snapshot::{RemoteSnapshot, RemoteTransaction},
};
use engine::{Beneficiary, Participant, Split, Transaction};
use serde_json::Value;

use crate::snapshot::LedgerSnapshot;

/// `type: true` and `type: "Equal"` mark an equal split; anything else is
/// individual, attributed to `bene`.
pub(crate) fn split_from_remote(kind: &Value, bene: &str) -> Split {
    let equal = match kind {
        Value::Bool(flag) => *flag,
        Value::String(label) => label.trim().eq_ignore_ascii_case("equal"),
        _ => false,
    };
    if equal {
        Split::Equal
    } else {
        Split::Individual {
            beneficiary: Beneficiary::from_label(bene),
        }
    }
}

pub(crate) fn transaction_from_remote(row: &RemoteTransaction) -> Transaction {
    let mut tx = Transaction::new(
        row.date.clone(),
        row.desc.clone(),
        row.amount,
        row.payer.trim(),
        split_from_remote(&row.kind, &row.bene),
    );
    if !row.cat.is_empty() {
        tx.category = Some(row.cat.clone());
    }
    tx
}

pub fn transaction_from_data(data: &TransactionData) -> Transaction {
    let split = if data.is_individual {
        Split::Individual {
            beneficiary: Beneficiary::from_label(&data.beneficiary),
        }
    } else {
        Split::Equal
    };
    let mut tx = Transaction::new(
        data.date.clone(),
        data.desc.clone(),
        data.amount,
        data.payer.trim(),
        split,
    );
    if !data.cat.is_empty() {
        tx.category = Some(data.cat.clone());
    }
    tx
}

/// Builds the local snapshot from a remote document. Any precomputed
/// balances the remote might carry are not part of the result.
pub fn snapshot_from_remote(remote: RemoteSnapshot) -> LedgerSnapshot {
    let participants = remote
        .meta
        .map(|meta| meta.friends)
        .unwrap_or_default()
        .into_iter()
        .filter(|friend| !friend.name.trim().is_empty())
        .map(|friend| Participant::new(friend.name.trim(), friend.group.trim()))
        .collect();

    LedgerSnapshot {
        transactions: remote.transactions.iter().map(transaction_from_remote).collect(),
        itinerary: remote.itinerary,
        budget: remote.budget,
        checklist: remote.packing,
        participants,
    }
}
