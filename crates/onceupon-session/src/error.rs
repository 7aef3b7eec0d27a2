//! Error types for the session runtime.

use thiserror::Error;

/// Errors that can occur while setting up or running a session.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration.
    #[error("Config error: {0}")]
    Config(String),

    /// RON parse error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Storage error.
    #[error(transparent)]
    Storage(#[from] onceupon_db::Error),

    /// Domain error.
    #[error(transparent)]
    Core(#[from] onceupon_core::Error),

    /// Payment provider error.
    #[error(transparent)]
    Payment(#[from] onceupon_payments::PaymentError),

    /// The background writer has stopped.
    #[error("Profile writer stopped")]
    WriterClosed,
}

/// Result type for session operations.
pub type Result<T> = std::result::Result<T, Error>;
