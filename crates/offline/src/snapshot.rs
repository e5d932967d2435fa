//! Local copy of the trip data and the optimistic application of commands.

use api_types::{
    command::Command,
    trip::{BudgetLine, ChecklistItem, ItineraryEntry},
};
use engine::{Ledger, Participant, Transaction, compute, resolve_participants};
use serde::{Deserialize, Serialize};

use crate::convert::transaction_from_data;

/// Itinerary stops whose place mentions one of these are meals, not sights.
const MEAL_KEYWORDS: [&str; 4] = ["breakfast", "lunch", "dinner", "snacks"];

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    #[serde(default)]
    pub itinerary: Vec<ItineraryEntry>,
    #[serde(default)]
    pub budget: Vec<BudgetLine>,
    #[serde(default)]
    pub checklist: Vec<ChecklistItem>,
    /// Newest first.
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    /// Configured participants; empty means "infer from payers".
    #[serde(default)]
    pub participants: Vec<Participant>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BudgetSummary {
    pub planned: f64,
    pub actual: f64,
    pub remaining: f64,
    /// `actual` as a percentage of `planned`, 0 without a plan.
    pub percent_used: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    pub done: usize,
    pub total: usize,
}

impl Progress {
    /// Rounded completion percentage, 0 when there is nothing to do.
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        (self.done as f64 / self.total as f64 * 100.0).round() as u32
    }
}

impl LedgerSnapshot {
    /// Applies the local effect of `command`. Returns `false` when the
    /// command targets something this snapshot does not have.
    pub fn apply(&mut self, command: &Command) -> bool {
        match command {
            Command::ToggleVisit { index, status } => match self.itinerary.get_mut(*index) {
                Some(stop) => {
                    stop.status = *status;
                    true
                }
                None => {
                    tracing::warn!(index, "toggleVisit: no itinerary entry at index");
                    false
                }
            },
            Command::TogglePack { item, status } => {
                match self.checklist.iter_mut().find(|c| c.item == *item) {
                    Some(entry) => {
                        entry.packed = *status;
                        true
                    }
                    None => {
                        tracing::warn!(%item, "togglePack: item not on the checklist");
                        false
                    }
                }
            }
            Command::AddTransaction { data } => {
                if let Some(line) = self.budget.iter_mut().find(|b| b.category == data.cat) {
                    line.actual += data.amount;
                }
                self.transactions.insert(0, transaction_from_data(data));
                true
            }
        }
    }

    /// Participants the ledger is computed for.
    pub fn resolved_participants(&self) -> Vec<Participant> {
        resolve_participants(&self.participants, &self.transactions)
    }

    pub fn ledger(&self) -> Ledger {
        compute(&self.resolved_participants(), &self.transactions)
    }

    pub fn budget_summary(&self) -> BudgetSummary {
        let planned: f64 = self.budget.iter().map(|b| b.planned).sum();
        let actual: f64 = self.budget.iter().map(|b| b.actual).sum();
        let percent_used = if planned > 0.0 {
            actual / planned * 100.0
        } else {
            0.0
        };
        BudgetSummary {
            planned,
            actual,
            remaining: planned - actual,
            percent_used,
        }
    }

    pub fn packing_progress(&self) -> Progress {
        Progress {
            done: self.checklist.iter().filter(|c| c.packed).count(),
            total: self.checklist.len(),
        }
    }

    /// Visited places, meal stops excluded.
    pub fn visit_progress(&self) -> Progress {
        let places: Vec<&ItineraryEntry> = self
            .itinerary
            .iter()
            .filter(|stop| {
                let place = stop.depart_place.to_lowercase();
                !place.is_empty() && !MEAL_KEYWORDS.iter().any(|meal| place.contains(meal))
            })
            .collect();
        Progress {
            done: places.iter().filter(|stop| stop.status).count(),
            total: places.len(),
        }
    }

    /// The stop after the last visited one; the final stop once everything
    /// is visited.
    pub fn next_stop(&self) -> Option<&ItineraryEntry> {
        let next = self
            .itinerary
            .iter()
            .rposition(|stop| stop.status)
            .map_or(0, |last| last + 1);
        self.itinerary.get(next).or_else(|| self.itinerary.last())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_types::command::TransactionData;

    fn stop(place: &str, visited: bool) -> ItineraryEntry {
        ItineraryEntry {
            depart_place: place.to_string(),
            status: visited,
            ..Default::default()
        }
    }

    fn trip() -> LedgerSnapshot {
        LedgerSnapshot {
            itinerary: vec![
                stop("Fort", true),
                stop("Lunch at dhaba", true),
                stop("Lake", false),
                stop("Temple", false),
            ],
            budget: vec![
                BudgetLine {
                    category: "Food".to_string(),
                    planned: 1000.0,
                    actual: 250.0,
                },
                BudgetLine {
                    category: "Fuel".to_string(),
                    planned: 3000.0,
                    actual: 0.0,
                },
            ],
            checklist: vec![
                ChecklistItem {
                    item: "tent".to_string(),
                    packed: true,
                },
                ChecklistItem {
                    item: "stove".to_string(),
                    packed: false,
                },
                ChecklistItem {
                    item: "map".to_string(),
                    packed: false,
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn add_transaction_prepends_and_books_budget() {
        let mut snapshot = trip();
        snapshot.transactions.push(Transaction::new("d", "old", 1.0, "Alice", engine::Split::Equal));
        let applied = snapshot.apply(&Command::AddTransaction {
            data: TransactionData {
                date: "2024-05-02".to_string(),
                cat: "Food".to_string(),
                desc: "dinner".to_string(),
                amount: 90.0,
                payer: "Bob".to_string(),
                is_individual: true,
                beneficiary: "Carol".to_string(),
            },
        });
        assert!(applied);
        assert_eq!(snapshot.transactions[0].description, "dinner");
        assert_eq!(snapshot.budget[0].actual, 340.0);
        assert_eq!(snapshot.budget[1].actual, 0.0);
    }

    #[test]
    fn toggles_skip_missing_targets() {
        let mut snapshot = trip();
        assert!(snapshot.apply(&Command::ToggleVisit {
            index: 2,
            status: true
        }));
        assert!(snapshot.itinerary[2].status);
        assert!(!snapshot.apply(&Command::ToggleVisit {
            index: 9,
            status: true
        }));
        assert!(snapshot.apply(&Command::TogglePack {
            item: "map".to_string(),
            status: true
        }));
        assert!(!snapshot.apply(&Command::TogglePack {
            item: "kayak".to_string(),
            status: true
        }));
        assert_eq!(snapshot.packing_progress(), Progress { done: 2, total: 3 });
        assert_eq!(snapshot.packing_progress().percent(), 67);
    }

    #[test]
    fn trip_summaries() {
        let snapshot = trip();
        let budget = snapshot.budget_summary();
        assert_eq!(budget.planned, 4000.0);
        assert_eq!(budget.remaining, 3750.0);
        assert_eq!(budget.percent_used, 6.25);

        assert_eq!(snapshot.visit_progress(), Progress { done: 1, total: 3 });
        assert_eq!(snapshot.next_stop().unwrap().depart_place, "Lake");

        let mut done = snapshot.clone();
        done.itinerary.iter_mut().for_each(|s| s.status = true);
        assert_eq!(done.next_stop().unwrap().depart_place, "Temple");
        assert!(LedgerSnapshot::default().next_stop().is_none());
    }
}
