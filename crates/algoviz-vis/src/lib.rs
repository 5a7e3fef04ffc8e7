//! Algorithm Playback
//!
//! Paced, controllable playback of algorithm step sequences.
//!
//! # Architecture
//!
//! - **Controller**: Pulls steps from a process at a speed-scaled delay
//! - **Driver**: Owns the controller on a tokio task and serves commands
//! - **Sinks**: Receive every published step (logs, broadcast channel)
//! - **WebSocket**: Streams steps and run outcomes to frontends
//! - **REST API**: Control playback, list algorithms
//!
//! # Usage
//!
//! ```ignore
//! let server = VisServer::new(ServerConfig::from_env()?)?;
//! server.playback().play(kind, AlgorithmInput::preset(kind)).await?;
//! server.serve().await?;
//! ```

mod config;
mod driver;
mod error;
mod events;
mod playback;
mod server;
mod sink;

pub use config::{PlaybackConfig, ServerConfig, StepDelays};
pub use driver::{spawn_playback, PlaybackHandle};
pub use error::{Error, Result};
pub use events::{PlaybackEvent, RunSummary};
pub use playback::{PlaybackController, PlaybackReport, PlaybackStatus};
pub use server::VisServer;
pub use sink::{BroadcastSink, FrameSink, TracingSink};
