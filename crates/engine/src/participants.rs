//! Trip participants.

use serde::{Deserialize, Serialize};

use crate::Transaction;

/// Group label assigned when none is configured.
pub const DEFAULT_GROUP: &str = "Individual";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    pub group: String,
}

impl Participant {
    pub fn new(name: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
        }
    }

    /// A participant in the default group.
    pub fn individual(name: impl Into<String>) -> Self {
        Self::new(name, DEFAULT_GROUP)
    }
}

/// Resolves the participant set used by [`compute`](crate::compute).
///
/// Configured metadata wins when it is non-empty. Otherwise every distinct
/// payer is a participant, in first-seen order, in the default group.
/// Duplicate names in the metadata keep their first occurrence.
pub fn resolve_participants(meta: &[Participant], transactions: &[Transaction]) -> Vec<Participant> {
    let mut people: Vec<Participant> = Vec::new();

    if !meta.is_empty() {
        for participant in meta {
            if participant.name.is_empty() || people.iter().any(|p| p.name == participant.name) {
                continue;
            }
            let group = if participant.group.is_empty() {
                DEFAULT_GROUP.to_string()
            } else {
                participant.group.clone()
            };
            people.push(Participant::new(participant.name.clone(), group));
        }
        if !people.is_empty() {
            return people;
        }
    }

    for tx in transactions {
        if tx.payer.is_empty() || people.iter().any(|p| p.name == tx.payer) {
            continue;
        }
        people.push(Participant::individual(tx.payer.clone()));
    }
    people
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Split;

    fn tx(payer: &str) -> Transaction {
        Transaction::new("2024-05-01", "fuel", 10.0, payer, Split::Equal)
    }

    #[test]
    fn metadata_wins_when_present() {
        let meta = vec![
            Participant::new("Alice", "Smiths"),
            Participant::new("Bob", ""),
            Participant::new("Alice", "Other"),
        ];
        let people = resolve_participants(&meta, &[tx("Zed")]);
        assert_eq!(
            people,
            vec![
                Participant::new("Alice", "Smiths"),
                Participant::individual("Bob"),
            ]
        );
    }

    #[test]
    fn payers_are_inferred_in_first_seen_order() {
        let people = resolve_participants(&[], &[tx("Carol"), tx("Alice"), tx("Carol")]);
        assert_eq!(
            people,
            vec![Participant::individual("Carol"), Participant::individual("Alice")]
        );
    }
}
