//! Plain-text views printed by the CLI.

use engine::{Counterparty, GroupBalance, Ledger, format_rounded};
use offline::{DrainOutcome, LedgerSnapshot, SyncState};

pub fn balances(ledger: &Ledger, symbol: &str) -> String {
    if ledger.balances.is_empty() {
        return "No participants yet.".to_string();
    }
    let mut out = String::new();
    for b in &ledger.balances {
        out.push_str(&format!(
            "{:<14} {:<12} paid {:>8}  share {:>8}  {}\n",
            b.name,
            b.group,
            format_rounded(b.total_paid, symbol),
            format_rounded(b.share_of_expenses, symbol),
            b.action.label(symbol),
        ));
    }
    for diagnostic in &ledger.diagnostics {
        out.push_str(&format!("note: {diagnostic}\n"));
    }
    out
}

pub fn groups(groups: &[GroupBalance], symbol: &str) -> String {
    if groups.is_empty() {
        return "No participants yet.".to_string();
    }
    groups
        .iter()
        .map(|g| {
            format!(
                "{:<14} {:<28} {}\n",
                g.group,
                g.members.join(", "),
                g.action.label(symbol)
            )
        })
        .collect()
}

pub fn settle_up(me: &str, counterparties: &[Counterparty], symbol: &str) -> String {
    if counterparties.is_empty() {
        return format!("{me} is settled with everyone.");
    }
    counterparties
        .iter()
        .map(|c| {
            let amount = format_rounded(c.net.abs(), symbol);
            if c.net > 0.0 {
                format!("{} owes {me} {amount}\n", c.name)
            } else {
                format!("{me} owes {} {amount}\n", c.name)
            }
        })
        .collect()
}

pub fn status(
    snapshot: &LedgerSnapshot,
    pending: usize,
    state: &SyncState,
    symbol: &str,
) -> String {
    let sync = match state {
        SyncState::Idle => "idle".to_string(),
        SyncState::Draining => "draining".to_string(),
        SyncState::Paused(reason) => format!("paused ({reason})"),
    };
    let budget = snapshot.budget_summary();
    let packing = snapshot.packing_progress();
    let visits = snapshot.visit_progress();

    let mut out = format!("sync: {sync}, {pending} pending\n");
    out.push_str(&format!(
        "budget: {} of {} ({:.0}%), {} left\n",
        format_rounded(budget.actual, symbol),
        format_rounded(budget.planned, symbol),
        budget.percent_used,
        format_rounded(budget.remaining, symbol),
    ));
    out.push_str(&format!(
        "packed: {}/{} ({}%)\n",
        packing.done,
        packing.total,
        packing.percent()
    ));
    out.push_str(&format!(
        "visited: {}/{} ({}%)\n",
        visits.done,
        visits.total,
        visits.percent()
    ));
    if let Some(stop) = snapshot.next_stop() {
        out.push_str(&format!("next: {} {}\n", stop.depart_place, stop.depart_time));
    }
    out
}

pub fn outcome(outcome: &DrainOutcome) -> String {
    match outcome {
        DrainOutcome::Offline => "Saved offline, will sync when connected.".to_string(),
        DrainOutcome::AlreadyDraining => "A sync is already running.".to_string(),
        DrainOutcome::Empty => "Nothing to sync.".to_string(),
        DrainOutcome::Drained { delivered } => format!("Synced {delivered} change(s)."),
        DrainOutcome::Interrupted { delivered } => {
            format!("Connection lost after {delivered} change(s); the rest stays queued.")
        }
        DrainOutcome::Paused { delivered, reason } => {
            format!("Sync paused after {delivered} change(s): {reason}")
        }
    }
}
