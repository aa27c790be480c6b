//! Error types for the session lifecycle library

use thiserror::Error;

/// Result type alias for library operations
pub type Result<T> = std::result::Result<T, PrepperError>;

/// Errors that can occur in the session lifecycle library
#[derive(Debug, Error)]
pub enum PrepperError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Key-value store error
    #[error("Store error: {0}")]
    Store(String),

    /// Identity provider rejected or failed a request
    #[error("Identity provider error: {0}")]
    Provider(String),

    /// The session driver task has stopped
    #[error("Session driver is no longer running")]
    DriverClosed,

    /// Challenge type string not recognised
    #[error("Unknown challenge type: {0}")]
    UnknownChallengeKind(String),
}
