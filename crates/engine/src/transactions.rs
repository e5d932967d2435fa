//! Transaction primitives.
//!
//! A [`Transaction`] records one shared expense. How its amount is consumed
//! is described by a [`Split`], decided once when the record enters the
//! engine; nothing downstream re-interprets loosely typed values.

use serde::{Deserialize, Serialize};

/// Who consumed an individually attributed expense.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum Beneficiary {
    /// The "everyone" sentinel. It never resolves to a participant, so an
    /// individual split towards it is left out of the ledger entirely.
    All,
    Participant(String),
}

impl Beneficiary {
    /// Interprets a raw beneficiary label (`"ALL"`/`"All"` are the sentinel).
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        if label.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Participant(label.to_string())
        }
    }

    /// Label in the wire vocabulary.
    pub fn label(&self) -> &str {
        match self {
            Self::All => "ALL",
            Self::Participant(name) => name,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Split {
    /// Divided evenly across every participant, payer included.
    Equal,
    /// Attributed entirely to one beneficiary.
    Individual { beneficiary: Beneficiary },
}

impl Split {
    pub fn individual(name: impl Into<String>) -> Self {
        Self::Individual {
            beneficiary: Beneficiary::Participant(name.into()),
        }
    }

    pub fn is_individual(&self) -> bool {
        matches!(self, Self::Individual { .. })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub amount: f64,
    pub payer: String,
    pub split: Split,
}

impl Transaction {
    pub fn new(
        date: impl Into<String>,
        description: impl Into<String>,
        amount: f64,
        payer: impl Into<String>,
        split: Split,
    ) -> Self {
        Self {
            date: date.into(),
            description: description.into(),
            category: None,
            amount,
            payer: payer.into(),
            split,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_accepts_both_spellings() {
        assert_eq!(Beneficiary::from_label("ALL"), Beneficiary::All);
        assert_eq!(Beneficiary::from_label("All"), Beneficiary::All);
        assert_eq!(
            Beneficiary::from_label(" Carol "),
            Beneficiary::Participant("Carol".to_string())
        );
    }

    #[test]
    fn split_serializes_as_tagged_union() {
        let tx = Transaction::new("2024-05-01", "dinner", 90.0, "Bob", Split::individual("Carol"));
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["split"]["kind"], "individual");
        assert_eq!(json["split"]["beneficiary"]["kind"], "participant");
        assert_eq!(json["split"]["beneficiary"]["name"], "Carol");

        let back: Transaction = serde_json::from_value(json).unwrap();
        assert_eq!(back, tx);
    }
}
