//! Commands (side effects) produced by the reducer

use crate::LiteraryType;
use serde::{Deserialize, Serialize};

/// A side effect for the session runtime to carry out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cmd {
    /// No operation
    None,

    /// Batch multiple commands
    Batch(Vec<Cmd>),

    /// Write the current record to durable storage
    Persist,

    /// Remove the stored record
    ClearStorage,

    /// Tell the entitlement provider to forget cached subscription state
    ResetEntitlements,

    /// The quiz finished with this result
    QuizCompleted(LiteraryType),

    /// Log a message
    Log { level: LogLevel, message: String },
}

/// Log level for log commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
}

impl Cmd {
    /// Create an empty command
    pub fn none() -> Self {
        Cmd::None
    }

    /// Create a batch of commands
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        // Flatten nested batches and filter out None
        let mut flattened: Vec<Cmd> = cmds
            .into_iter()
            .flat_map(|cmd| match cmd {
                Cmd::None => vec![],
                Cmd::Batch(inner) => inner,
                other => vec![other],
            })
            .collect();

        match flattened.len() {
            0 => Cmd::None,
            1 => flattened.pop().unwrap_or(Cmd::None),
            _ => Cmd::Batch(flattened),
        }
    }

    /// Create a log command
    pub fn log(level: LogLevel, message: impl Into<String>) -> Self {
        Cmd::Log {
            level,
            message: message.into(),
        }
    }

    /// Create a debug log command
    pub fn debug(message: impl Into<String>) -> Self {
        Self::log(LogLevel::Debug, message)
    }

    /// Create an info log command
    pub fn info(message: impl Into<String>) -> Self {
        Self::log(LogLevel::Info, message)
    }

    /// Check if this is a None command
    pub fn is_none(&self) -> bool {
        matches!(self, Cmd::None)
    }

    /// Flatten into a list of non-batch commands, in order
    pub fn into_vec(self) -> Vec<Cmd> {
        match self {
            Cmd::None => vec![],
            Cmd::Batch(inner) => inner.into_iter().flat_map(Cmd::into_vec).collect(),
            other => vec![other],
        }
    }

    /// Whether this command (or any in a batch) matches `pred`
    pub fn contains(&self, pred: impl Fn(&Cmd) -> bool + Copy) -> bool {
        match self {
            Cmd::Batch(inner) => inner.iter().any(|c| c.contains(pred)),
            other => pred(other),
        }
    }
}
