//! Error type shared by the rules engine, searches, and training loop.

use thiserror::Error;

use crate::core::Action;
use crate::training::SnapshotRole;

/// Errors raised by zero-ttt.
///
/// Numerical edge cases inside a search (zero-visit children, a zero-sum
/// policy) are handled locally and never surface here. Everything else
/// propagates and aborts the enclosing training round.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid move: cell {action} is not a legal action")]
    InvalidMove { action: Action },

    #[error("cell index {index} is out of bounds (must be 0-8)")]
    InvalidAction { index: usize },

    #[error("invalid position '{cells}': {reason}")]
    InvalidPosition { cells: String, reason: String },

    #[error("cannot select an action: the game is already over")]
    TerminalState,

    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("predictor failed: {message}")]
    Predictor { message: String },

    #[error("trainer failed: {message}")]
    Trainer { message: String },

    #[error("no {role} snapshot is available")]
    MissingSnapshot { role: SnapshotRole },

    #[error("serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("worker pool error: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

/// Convenience alias for results using the crate's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
