//! Derived settlement views: group roll-ups and per-person settle-up lists.

use serde::{Deserialize, Serialize};

use crate::{Action, Balance, DebtMatrix, SETTLED_THRESHOLD};

/// Net position of a whole group (e.g. a family travelling together).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupBalance {
    pub group: String,
    pub net: f64,
    pub action: Action,
    pub members: Vec<String>,
}

/// Rolls balances up by group, groups in first-seen order.
pub fn group_balances(balances: &[Balance]) -> Vec<GroupBalance> {
    let mut groups: Vec<GroupBalance> = Vec::new();
    for balance in balances {
        match groups.iter_mut().find(|g| g.group == balance.group) {
            Some(group) => {
                group.net += balance.net;
                group.members.push(balance.name.clone());
            }
            None => groups.push(GroupBalance {
                group: balance.group.clone(),
                net: balance.net,
                action: Action::Settled,
                members: vec![balance.name.clone()],
            }),
        }
    }
    for group in &mut groups {
        group.action = Action::from_net(group.net);
    }
    groups
}

/// How one participant stands with another.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Counterparty {
    pub name: String,
    /// What `me` contributed towards this counterparty's share.
    pub paid_for_them: f64,
    /// What this counterparty contributed towards `me`.
    pub paid_for_me: f64,
    /// Positive: `me` should receive; negative: `me` should pay.
    pub net: f64,
}

impl DebtMatrix {
    /// Settle-up list for `me`: every other participant whose mutual net is
    /// beyond the settled threshold. Empty when `me` is unknown.
    pub fn counterparties(&self, me: &str) -> Vec<Counterparty> {
        if self.get(me, me).is_none() {
            return Vec::new();
        }
        self.participants()
            .iter()
            .filter(|other| other.as_str() != me)
            .filter_map(|other| {
                let paid_for_them = self.get(me, other).unwrap_or_default();
                let paid_for_me = self.get(other, me).unwrap_or_default();
                let net = paid_for_them - paid_for_me;
                (net.abs() > SETTLED_THRESHOLD).then(|| Counterparty {
                    name: other.clone(),
                    paid_for_them,
                    paid_for_me,
                    net,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Participant, Split, Transaction, compute};

    #[test]
    fn groups_sum_member_nets() {
        let people = vec![
            Participant::new("Alice", "Smiths"),
            Participant::new("Bob", "Smiths"),
            Participant::individual("Carol"),
        ];
        let txs = vec![Transaction::new("d", "villa", 300.0, "Carol", Split::Equal)];
        let ledger = compute(&people, &txs);

        let groups = group_balances(&ledger.balances);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].group, "Smiths");
        assert_eq!(groups[0].members, vec!["Alice", "Bob"]);
        assert!((groups[0].net + 200.0).abs() < 1e-9);
        assert_eq!(groups[0].action, Action::Pay(200));
        assert_eq!(groups[1].action, Action::Get(200));
    }

    #[test]
    fn counterparties_net_both_directions() {
        let people = vec![
            Participant::individual("Alice"),
            Participant::individual("Bob"),
            Participant::individual("Carol"),
        ];
        let txs = vec![
            Transaction::new("d", "fuel", 300.0, "Alice", Split::Equal),
            Transaction::new("d", "snacks", 40.0, "Bob", Split::individual("Alice")),
            Transaction::new("d", "gift", 0.5, "Carol", Split::individual("Alice")),
        ];
        let ledger = compute(&people, &txs);

        let list = ledger.matrix.counterparties("Alice");
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].name, "Bob");
        assert_eq!(list[0].paid_for_them, 100.0);
        assert_eq!(list[0].paid_for_me, 40.0);
        assert_eq!(list[0].net, 60.0);
        assert_eq!(list[1].name, "Carol");
        assert_eq!(list[1].net, 99.5);

        assert!(ledger.matrix.counterparties("Nobody").is_empty());
    }
}
