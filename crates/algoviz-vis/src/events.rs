//! Playback events streamed to frontends.

use algoviz_steps::{AlgorithmKind, AlgorithmStep};
use serde::{Deserialize, Serialize};

/// Outcome of one run, passed to completion and cancellation listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub algorithm: AlgorithmKind,
    pub steps: u64,
}

/// Events published while a run plays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlaybackEvent {
    /// A step was published
    Step { step: AlgorithmStep },

    /// The process ran out of steps
    Completed(RunSummary),

    /// The run was aborted before finishing
    Cancelled(RunSummary),
}

impl PlaybackEvent {
    /// Whether this event ends a run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, PlaybackEvent::Completed(_) | PlaybackEvent::Cancelled(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_serialization() {
        let event = PlaybackEvent::Step {
            step: AlgorithmStep::swap(1, &[3, 5, 9]),
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"step\""));
        assert!(json.contains("\"kind\":\"swap\""));

        let parsed: PlaybackEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
        assert!(!parsed.is_terminal());
    }

    #[test]
    fn completion_serialization() {
        let event = PlaybackEvent::Completed(RunSummary {
            algorithm: AlgorithmKind::BinarySearch,
            steps: 5,
        });
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"completed\""));
        assert!(json.contains("binary-search"));
        assert!(event.is_terminal());
    }
}
