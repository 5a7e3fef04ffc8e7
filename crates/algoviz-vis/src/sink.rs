//! Frame sinks: consumers of published steps.
//!
//! A sink receives every step in production order. Drawing is the sink's
//! business; it must not block, since it runs on the playback task.

use algoviz_steps::AlgorithmStep;
use tokio::sync::broadcast;
use tracing::{info, trace};

use crate::events::PlaybackEvent;

/// Receives each published step.
pub trait FrameSink: Send {
    fn draw(&mut self, step: &AlgorithmStep);
}

impl<F> FrameSink for F
where
    F: FnMut(&AlgorithmStep) + Send,
{
    fn draw(&mut self, step: &AlgorithmStep) {
        self(step)
    }
}

/// Logs each frame through `tracing`.
#[derive(Debug, Default)]
pub struct TracingSink {
    frames: u64,
}

impl TracingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames drawn so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl FrameSink for TracingSink {
    fn draw(&mut self, step: &AlgorithmStep) {
        self.frames += 1;
        info!(
            frame = self.frames,
            kind = ?step.kind(),
            involved = ?step.involved(),
            "{}",
            step.snapshot()
        );
    }
}

/// Forwards frames to every subscriber of a broadcast channel.
///
/// Sending never waits. With no subscribers the frame is dropped, and slow
/// subscribers see `RecvError::Lagged` instead of holding up playback.
#[derive(Debug, Clone)]
pub struct BroadcastSink {
    events: broadcast::Sender<PlaybackEvent>,
}

impl BroadcastSink {
    pub fn new(events: broadcast::Sender<PlaybackEvent>) -> Self {
        Self { events }
    }
}

impl FrameSink for BroadcastSink {
    fn draw(&mut self, step: &AlgorithmStep) {
        let event = PlaybackEvent::Step { step: step.clone() };
        if self.events.send(event).is_err() {
            trace!("no subscribers for frame");
        }
    }
}
