//! Settlement computation.
//!
//! [`compute`] turns a participant set and a list of transactions into
//! per-participant [`Balance`]s and a pairwise [`DebtMatrix`]. It is a pure
//! function: the same input always yields the same [`Ledger`].
//!
//! Invariants of the output:
//! - the nets of all balances sum to zero (up to floating-point noise);
//! - the matrix diagonal is zero;
//! - transactions referencing unknown participants contribute nothing and
//!   are listed in [`Ledger::diagnostics`].

use std::{collections::HashMap, fmt};

use serde::{Deserialize, Serialize};

use crate::{Beneficiary, DEFAULT_SYMBOL, Participant, Split, Transaction};

/// Nets within this distance of zero are reported as settled. Absorbs the
/// rounding noise left by equal splits.
pub const SETTLED_THRESHOLD: f64 = 1.0;

/// What a participant has to do to settle up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "amount", rename_all = "snake_case")]
pub enum Action {
    /// Receives the rounded amount.
    Get(u64),
    /// Pays the rounded amount.
    Pay(u64),
    Settled,
}

impl Action {
    pub fn from_net(net: f64) -> Self {
        if net > SETTLED_THRESHOLD {
            Self::Get(net.round() as u64)
        } else if net < -SETTLED_THRESHOLD {
            Self::Pay(net.abs().round() as u64)
        } else {
            Self::Settled
        }
    }

    /// Human label such as `Get ₹200`, `Pay €15` or `Settled`.
    pub fn label(&self, symbol: &str) -> String {
        match self {
            Self::Get(amount) => format!("Get {symbol}{amount}"),
            Self::Pay(amount) => format!("Pay {symbol}{amount}"),
            Self::Settled => "Settled".to_string(),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label(DEFAULT_SYMBOL))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    pub name: String,
    pub group: String,
    pub total_paid: f64,
    pub share_of_expenses: f64,
    pub net: f64,
    pub action: Action,
}

/// One directional flow of the debt matrix.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PairwiseDebt {
    pub payer: String,
    pub consumer: String,
    pub amount: f64,
}

/// Participant x participant grid: `cells[payer][consumer]` is what `payer`
/// contributed towards `consumer`'s share.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DebtMatrix {
    participants: Vec<String>,
    cells: Vec<Vec<f64>>,
}

impl DebtMatrix {
    fn zeroed(participants: Vec<String>) -> Self {
        let n = participants.len();
        Self {
            participants,
            cells: vec![vec![0.0; n]; n],
        }
    }

    /// Row/column headers, in participant order.
    pub fn participants(&self) -> &[String] {
        &self.participants
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.participants.iter().position(|p| p == name)
    }

    /// Amount `payer` contributed towards `consumer`, `None` if either is
    /// unknown.
    pub fn get(&self, payer: &str, consumer: &str) -> Option<f64> {
        let row = self.index_of(payer)?;
        let col = self.index_of(consumer)?;
        Some(self.cells[row][col])
    }

    /// The full grid, rows in participant order.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.participants
            .iter()
            .map(String::as_str)
            .zip(self.cells.iter().map(Vec::as_slice))
    }

    /// Every off-diagonal cell as a flat list, row-major.
    pub fn entries(&self) -> Vec<PairwiseDebt> {
        let mut entries = Vec::new();
        for (row, payer) in self.participants.iter().enumerate() {
            for (col, consumer) in self.participants.iter().enumerate() {
                if row == col {
                    continue;
                }
                entries.push(PairwiseDebt {
                    payer: payer.clone(),
                    consumer: consumer.clone(),
                    amount: self.cells[row][col],
                });
            }
        }
        entries
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}

/// A transaction (or part of one) the engine could not attribute.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// The payer is not a participant; the whole transaction was skipped.
    UnknownPayer { index: usize, payer: String },
    /// The beneficiary is not a participant; the whole transaction was
    /// skipped.
    UnknownBeneficiary { index: usize, beneficiary: String },
    /// The beneficiary is the "everyone" sentinel on an individual split;
    /// the whole transaction was skipped.
    UnresolvedBeneficiary { index: usize },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPayer { index, payer } => {
                write!(f, "transaction #{index}: unknown payer \"{payer}\"")
            }
            Self::UnknownBeneficiary { index, beneficiary } => {
                write!(f, "transaction #{index}: unknown beneficiary \"{beneficiary}\"")
            }
            Self::UnresolvedBeneficiary { index } => write!(
                f,
                "transaction #{index}: individual split without a specific beneficiary"
            ),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    pub balances: Vec<Balance>,
    pub matrix: DebtMatrix,
    pub diagnostics: Vec<Diagnostic>,
}

impl Ledger {
    pub fn balance(&self, name: &str) -> Option<&Balance> {
        self.balances.iter().find(|b| b.name == name)
    }

    /// Sum of every net, zero up to floating-point noise.
    pub fn total_net(&self) -> f64 {
        self.balances.iter().map(|b| b.net).sum()
    }
}

/// Computes balances and the debt matrix for `participants`.
///
/// An empty participant set yields an empty ledger.
pub fn compute(participants: &[Participant], transactions: &[Transaction]) -> Ledger {
    if participants.is_empty() {
        return Ledger::default();
    }

    let index: HashMap<&str, usize> = participants
        .iter()
        .enumerate()
        .map(|(idx, p)| (p.name.as_str(), idx))
        .collect();
    let count = participants.len();

    let mut paid = vec![0.0_f64; count];
    let mut share = vec![0.0_f64; count];
    let mut matrix =
        DebtMatrix::zeroed(participants.iter().map(|p| p.name.clone()).collect());
    let mut diagnostics = Vec::new();

    for (tx_idx, tx) in transactions.iter().enumerate() {
        let Some(&payer) = index.get(tx.payer.as_str()) else {
            diagnostics.push(Diagnostic::UnknownPayer {
                index: tx_idx,
                payer: tx.payer.clone(),
            });
            continue;
        };

        match &tx.split {
            Split::Equal => {
                paid[payer] += tx.amount;
                let portion = tx.amount / count as f64;
                for consumer in 0..count {
                    share[consumer] += portion;
                    if consumer != payer {
                        matrix.cells[payer][consumer] += portion;
                    }
                }
            }
            Split::Individual { beneficiary } => {
                let consumer = match beneficiary {
                    Beneficiary::All => {
                        diagnostics.push(Diagnostic::UnresolvedBeneficiary { index: tx_idx });
                        continue;
                    }
                    Beneficiary::Participant(name) => match index.get(name.as_str()) {
                        Some(&consumer) => consumer,
                        None => {
                            diagnostics.push(Diagnostic::UnknownBeneficiary {
                                index: tx_idx,
                                beneficiary: name.clone(),
                            });
                            continue;
                        }
                    },
                };
                paid[payer] += tx.amount;
                share[consumer] += tx.amount;
                if consumer != payer {
                    matrix.cells[payer][consumer] += tx.amount;
                }
            }
        }
    }

    let balances = participants
        .iter()
        .enumerate()
        .map(|(idx, p)| {
            let net = paid[idx] - share[idx];
            Balance {
                name: p.name.clone(),
                group: p.group.clone(),
                total_paid: paid[idx],
                share_of_expenses: share[idx],
                net,
                action: Action::from_net(net),
            }
        })
        .collect();

    Ledger {
        balances,
        matrix,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_thresholds() {
        assert_eq!(Action::from_net(0.99), Action::Settled);
        assert_eq!(Action::from_net(-0.99), Action::Settled);
        assert_eq!(Action::from_net(1.0), Action::Settled);
        assert_eq!(Action::from_net(1.5), Action::Get(2));
        assert_eq!(Action::from_net(-1.4), Action::Pay(1));
        assert_eq!(Action::from_net(199.6).to_string(), "Get ₹200");
        assert_eq!(Action::from_net(-100.0).label("€"), "Pay €100");
        assert_eq!(Action::Settled.to_string(), "Settled");
    }

    #[test]
    fn empty_participants_short_circuit() {
        let txs = vec![Transaction::new("d", "x", 10.0, "Alice", Split::Equal)];
        let ledger = compute(&[], &txs);
        assert!(ledger.balances.is_empty());
        assert!(ledger.matrix.is_empty());
        assert!(ledger.diagnostics.is_empty());
    }

    #[test]
    fn matrix_entries_skip_diagonal() {
        let people = vec![Participant::individual("A"), Participant::individual("B")];
        let txs = vec![Transaction::new("d", "x", 10.0, "A", Split::Equal)];
        let ledger = compute(&people, &txs);
        let entries = ledger.matrix.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].payer, "A");
        assert_eq!(entries[0].consumer, "B");
        assert_eq!(entries[0].amount, 5.0);
        assert_eq!(entries[1].amount, 0.0);
    }
}
