//! The module contains the errors the engine can return.
//!
//! The ledger computation itself never fails: unresolved references are
//! reported as [`Diagnostic`]s instead. Errors are only produced while
//! validating user input before it becomes a transaction.
//!
//! [`Diagnostic`]: crate::Diagnostic
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("\"{0}\" is not a known participant")]
    UnknownParticipant(String),
    #[error("Missing field: {0}")]
    MissingField(String),
}
