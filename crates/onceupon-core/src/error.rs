//! Error types for onceupon-core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid option index: {0} (expected 0..=3)")]
    InvalidOption(u8),

    #[error("Question index out of range: {0}")]
    InvalidQuestion(usize),

    #[error("Invalid month token: {0:?} (expected YYYY-MM)")]
    InvalidMonthToken(String),

    #[error("Unknown literary type: {0}")]
    UnknownLiteraryType(String),

    #[error("Unknown check-in code: {0}")]
    UnknownCheckInCode(String),

    #[error("Quiz is incomplete: {answered} of {total} questions answered")]
    IncompleteQuiz { answered: usize, total: usize },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
