//! Error types for algoviz-vis.

use thiserror::Error;

/// Result type for algoviz-vis operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or driving playback.
#[derive(Debug, Error)]
pub enum Error {
    /// Unknown algorithm or input that does not fit the algorithm
    #[error(transparent)]
    Algorithm(#[from] algoviz_steps::Error),

    /// Speed outside the configured range while clamping is disabled
    #[error("speed {requested} outside allowed range {min}..={max}")]
    SpeedOutOfRange { requested: i64, min: u32, max: u32 },

    /// Malformed or inconsistent configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The playback task has shut down
    #[error("playback controller has stopped")]
    ControllerStopped,

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
