//! Settlement engine for shared trip expenses.
//!
//! The crate is pure computation: no I/O, no clock, no global state. Callers
//! hand it a participant set and a transaction list and get back a
//! [`Ledger`] with per-participant balances, the pairwise debt matrix and
//! diagnostics for the transactions it could not attribute.
//!
//! ```rust
//! use engine::{Participant, Split, Transaction, compute};
//!
//! let people = vec![
//!     Participant::individual("Alice"),
//!     Participant::individual("Bob"),
//! ];
//! let txs = vec![Transaction::new("2024-05-01", "fuel", 100.0, "Alice", Split::Equal)];
//!
//! let ledger = compute(&people, &txs);
//! assert_eq!(ledger.balance("Alice").unwrap().net, 50.0);
//! assert_eq!(ledger.matrix.get("Alice", "Bob"), Some(50.0));
//! ```

pub use error::EngineError;
pub use ledger::{
    Action, Balance, DebtMatrix, Diagnostic, Ledger, PairwiseDebt, SETTLED_THRESHOLD, compute,
};
pub use money::{DEFAULT_SYMBOL, format_rounded, parse_amount};
pub use participants::{DEFAULT_GROUP, Participant, resolve_participants};
pub use summary::{Counterparty, GroupBalance, group_balances};
pub use transactions::{Beneficiary, Split, Transaction};

mod error;
mod ledger;
mod money;
mod participants;
mod summary;
mod transactions;

pub type ResultEngine<T> = Result<T, EngineError>;
