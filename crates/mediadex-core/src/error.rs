//! Error types for mediadex.

use thiserror::Error;

/// Result type alias using mediadex's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for mediadex operations.
///
/// Data-layer errors bubble to the immediate caller for user-facing
/// reporting; scheduler-internal errors are contained and logged. A cancel
/// on an absent task key is success, not an error, and therefore has no
/// variant here.
#[derive(Error, Debug)]
pub enum Error {
    /// Shard store I/O or connection failure (wraps sqlx::Error).
    /// The federated operation that hit it is aborted, no partial merge.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] sqlx::Error),

    /// Malformed search pattern, rejected before any store I/O.
    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Chat-protocol call failed (send, delete, member lookup).
    #[error("Chat error: {0}")]
    Chat(String),

    /// Message deletion failed; the task is marked FAILED, no retry.
    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller is not on the admin allowlist.
    #[error("Unauthorized: {0}")]
    Unauthorized(i64),

    /// Invalid input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Chat(e.to_string())
    }
}
