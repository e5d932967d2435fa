//! JSON documents exchanged with the remote authority.
//!
//! The remote is a spreadsheet-backed script, so its documents are loosely
//! typed: numbers may arrive as strings, flags as strings or numbers, and
//! whole sections may be missing or `null`. Every field here is read
//! leniently and falls back to its default instead of failing the document.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

mod lenient;

/// `status` value of a successful snapshot response.
pub const STATUS_SUCCESS: &str = "success";

pub mod trip {
    use super::*;

    /// One stop of the itinerary.
    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ItineraryEntry {
        #[serde(default, deserialize_with = "lenient::string")]
        pub date: String,
        #[serde(default, deserialize_with = "lenient::string")]
        pub depart_time: String,
        #[serde(default, deserialize_with = "lenient::string")]
        pub depart_place: String,
        /// Visited flag.
        #[serde(default, deserialize_with = "lenient::flag")]
        pub status: bool,
        #[serde(default, deserialize_with = "lenient::number")]
        pub parking: f64,
        #[serde(default, deserialize_with = "lenient::number")]
        pub toll: f64,
        /// Columns this client does not interpret, kept for round trips.
        #[serde(flatten)]
        pub extra: Map<String, Value>,
    }

    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    pub struct BudgetLine {
        #[serde(default, deserialize_with = "lenient::string")]
        pub category: String,
        #[serde(default, deserialize_with = "lenient::number")]
        pub planned: f64,
        #[serde(default, deserialize_with = "lenient::number")]
        pub actual: f64,
    }

    /// Packing checklist entry.
    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    pub struct ChecklistItem {
        #[serde(default, deserialize_with = "lenient::string")]
        pub item: String,
        #[serde(default, deserialize_with = "lenient::flag")]
        pub packed: bool,
    }

    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    pub struct Friend {
        #[serde(default, deserialize_with = "lenient::string")]
        pub name: String,
        #[serde(default, deserialize_with = "lenient::string")]
        pub group: String,
    }
}

pub mod snapshot {
    use super::*;
    use trip::{BudgetLine, ChecklistItem, Friend, ItineraryEntry};

    /// A transaction row as the remote stores it.
    ///
    /// `type` is `"Equal"`, `"Individual"` or a boolean (`true` meaning an
    /// equal split); `bene` is a participant name or the `"All"` sentinel.
    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    pub struct RemoteTransaction {
        #[serde(default, deserialize_with = "lenient::string")]
        pub date: String,
        #[serde(default, deserialize_with = "lenient::string")]
        pub desc: String,
        #[serde(default, deserialize_with = "lenient::string")]
        pub cat: String,
        #[serde(default, deserialize_with = "lenient::number")]
        pub amount: f64,
        #[serde(default, deserialize_with = "lenient::string")]
        pub payer: String,
        #[serde(rename = "type", default)]
        pub kind: Value,
        #[serde(default, deserialize_with = "lenient::string")]
        pub bene: String,
    }

    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    pub struct Meta {
        #[serde(default, deserialize_with = "lenient::list")]
        pub friends: Vec<Friend>,
    }

    /// Response of the snapshot fetch.
    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    pub struct RemoteSnapshot {
        #[serde(default, deserialize_with = "lenient::string")]
        pub status: String,
        #[serde(default, deserialize_with = "lenient::list")]
        pub itinerary: Vec<ItineraryEntry>,
        #[serde(default, deserialize_with = "lenient::list")]
        pub budget: Vec<BudgetLine>,
        #[serde(default, deserialize_with = "lenient::list")]
        pub packing: Vec<ChecklistItem>,
        #[serde(default, deserialize_with = "lenient::list")]
        pub transactions: Vec<RemoteTransaction>,
        #[serde(default, deserialize_with = "lenient::optional")]
        pub meta: Option<Meta>,
    }

    impl RemoteSnapshot {
        pub fn is_success(&self) -> bool {
            self.status == STATUS_SUCCESS
        }
    }
}

pub mod command {
    use super::*;

    /// Payload of an `addTransaction` command.
    ///
    /// Equal splits carry the `"ALL"` beneficiary.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionData {
        pub date: String,
        #[serde(default)]
        pub cat: String,
        pub desc: String,
        pub amount: f64,
        pub payer: String,
        pub is_individual: bool,
        pub beneficiary: String,
    }

    /// A user intent, queued locally and pushed to the remote in order.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(tag = "action", rename_all = "camelCase")]
    pub enum Command {
        ToggleVisit { index: usize, status: bool },
        TogglePack { item: String, status: bool },
        AddTransaction { data: TransactionData },
    }

    impl Command {
        /// The wire `action` name.
        pub fn action(&self) -> &'static str {
            match self {
                Self::ToggleVisit { .. } => "toggleVisit",
                Self::TogglePack { .. } => "togglePack",
                Self::AddTransaction { .. } => "addTransaction",
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{command::*, snapshot::*};
    use serde_json::json;

    #[test]
    fn partial_snapshot_defaults_missing_sections() {
        let doc = json!({
            "status": "success",
            "itinerary": null,
            "transactions": [{ "amount": "12.5", "payer": "Alice", "type": true }],
        });
        let snapshot: RemoteSnapshot = serde_json::from_value(doc).unwrap();
        assert!(snapshot.is_success());
        assert!(snapshot.itinerary.is_empty());
        assert!(snapshot.budget.is_empty());
        assert!(snapshot.meta.is_none());
        assert_eq!(snapshot.transactions[0].amount, 12.5);
        assert_eq!(snapshot.transactions[0].kind, json!(true));
        assert_eq!(snapshot.transactions[0].bene, "");
    }

    #[test]
    fn itinerary_keeps_unknown_columns() {
        let doc = json!({
            "itinerary": [{
                "date": "2024-05-01",
                "departTime": "1899-12-30T07:30:00.000Z",
                "departPlace": "Pune",
                "status": "TRUE",
                "parking": "",
                "toll": 120,
                "notes": "early start"
            }],
            "meta": { "friends": [{ "name": "Alice", "group": "Smiths" }] }
        });
        let snapshot: RemoteSnapshot = serde_json::from_value(doc).unwrap();
        let stop = &snapshot.itinerary[0];
        assert!(stop.status);
        assert_eq!(stop.parking, 0.0);
        assert_eq!(stop.toll, 120.0);
        assert_eq!(stop.extra["notes"], "early start");
        assert_eq!(snapshot.meta.unwrap().friends[0].group, "Smiths");
    }

    #[test]
    fn commands_use_action_tag() {
        let cmd = Command::ToggleVisit {
            index: 3,
            status: true,
        };
        assert_eq!(
            serde_json::to_value(&cmd).unwrap(),
            json!({ "action": "toggleVisit", "index": 3, "status": true })
        );

        let add: Command = serde_json::from_value(json!({
            "action": "addTransaction",
            "data": {
                "date": "2024-05-01", "cat": "Food", "desc": "dinner", "amount": 90.0,
                "payer": "Bob", "isIndividual": true, "beneficiary": "Carol"
            }
        }))
        .unwrap();
        assert_eq!(add.action(), "addTransaction");
    }
}
