//! Crate-wide error type and result alias.

use thiserror::Error;

/// All errors surfaced by the domainchat crate.
#[derive(Debug, Error)]
pub enum DomainChatError {
    /// The external chat provider failed (network error, non-success status,
    /// unparseable body). The retry wrapper counts these against its budget
    /// and propagates the last one verbatim — it never reclassifies them.
    #[error("provider error: {0}")]
    Provider(String),

    /// Invalid or missing configuration at startup.
    #[error("configuration error: {0}")]
    Config(String),

    /// A request payload failed validation.
    #[error("validation error: {0}")]
    Validation(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DomainChatError>;
