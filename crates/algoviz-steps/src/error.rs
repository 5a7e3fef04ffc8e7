//! Error types for algoviz-steps.

use thiserror::Error;

use crate::kind::AlgorithmKind;

/// Result type for algoviz-steps operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Configuration errors raised while selecting or building a process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The requested algorithm name does not match any built-in kind.
    #[error("unknown algorithm kind: {0:?}")]
    UnknownAlgorithm(String),

    /// The input shape does not fit the selected algorithm.
    #[error("{kind} expects {expected} input")]
    InputMismatch {
        kind: AlgorithmKind,
        expected: &'static str,
    },
}
