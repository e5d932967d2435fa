use engine::EngineError;
use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure of the durable local store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure talking to the remote authority. Never fatal: callers keep
/// working on local state.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected status: {0}")]
    Status(StatusCode),
    #[error("remote reported status \"{0}\"")]
    Rejected(String),
    #[error("invalid remote url: {0}")]
    InvalidUrl(String),
}

#[derive(Debug, Error)]
pub enum Error {
    /// The operation was not committed; it is safe to retry.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error(transparent)]
    Invalid(#[from] EngineError),
}
