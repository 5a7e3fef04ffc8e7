//! Async playback driver.
//!
//! One task owns the [`PlaybackController`] and waits on two things: the next
//! command from a [`PlaybackHandle`], and the controller's pull deadline.
//! Commands win ties, so a pause that arrives together with a due pull stops
//! that pull from happening. Step logic never yields mid-step; the only
//! suspension point is the wait between steps.

use std::future;

use algoviz_steps::{AlgorithmInput, AlgorithmKind};
use tokio::sync::{mpsc, oneshot};
use tokio::time::{sleep_until, Instant};
use tracing::debug;

use crate::error::{Error, Result};
use crate::playback::{PlaybackController, PlaybackReport};

/// Commands queued per handle before senders wait.
const COMMAND_CAPACITY: usize = 32;

#[derive(Debug)]
enum Command {
    Play(AlgorithmKind, AlgorithmInput),
    Resume,
    Pause,
    Reset,
    Cancel,
    Step,
    SetSpeed(i64),
    Report,
}

struct Request {
    command: Command,
    reply: oneshot::Sender<Result<PlaybackReport>>,
}

/// Cloneable control surface for a running playback task.
///
/// Every command answers with the controller's report after the command
/// took effect. Once all handles are dropped the task exits.
#[derive(Debug, Clone)]
pub struct PlaybackHandle {
    requests: mpsc::Sender<Request>,
}

/// Move `controller` onto its own task and return a handle to it.
///
/// Must be called from within a tokio runtime.
pub fn spawn_playback(controller: PlaybackController) -> PlaybackHandle {
    let (requests, rx) = mpsc::channel(COMMAND_CAPACITY);
    tokio::spawn(run(controller, rx));
    PlaybackHandle { requests }
}

impl PlaybackHandle {
    /// Load `input` for `kind` and start playing it.
    pub async fn play(&self, kind: AlgorithmKind, input: AlgorithmInput) -> Result<PlaybackReport> {
        self.send(Command::Play(kind, input)).await
    }

    /// Continue a paused run or replay the loaded input.
    pub async fn resume(&self) -> Result<PlaybackReport> {
        self.send(Command::Resume).await
    }

    /// Hold the current run.
    pub async fn pause(&self) -> Result<PlaybackReport> {
        self.send(Command::Pause).await
    }

    /// Drop the current run and return to idle.
    pub async fn reset(&self) -> Result<PlaybackReport> {
        self.send(Command::Reset).await
    }

    /// Abort the current run, notifying cancel listeners.
    pub async fn cancel(&self) -> Result<PlaybackReport> {
        self.send(Command::Cancel).await
    }

    /// Publish a single step while paused.
    pub async fn step(&self) -> Result<PlaybackReport> {
        self.send(Command::Step).await
    }

    /// Change the speed multiplier for the next wait.
    pub async fn set_speed(&self, speed: i64) -> Result<PlaybackReport> {
        self.send(Command::SetSpeed(speed)).await
    }

    /// Get the current playback report.
    pub async fn report(&self) -> Result<PlaybackReport> {
        self.send(Command::Report).await
    }

    /// Whether the playback task has exited.
    pub fn is_closed(&self) -> bool {
        self.requests.is_closed()
    }

    async fn send(&self, command: Command) -> Result<PlaybackReport> {
        let (reply, response) = oneshot::channel();
        self.requests
            .send(Request { command, reply })
            .await
            .map_err(|_| Error::ControllerStopped)?;
        response.await.map_err(|_| Error::ControllerStopped)?
    }
}

async fn run(mut controller: PlaybackController, mut requests: mpsc::Receiver<Request>) {
    loop {
        let due = controller.next_pull_at();
        tokio::select! {
            biased;

            request = requests.recv() => match request {
                Some(Request { command, reply }) => {
                    let result = apply(&mut controller, command);
                    let _ = reply.send(result);
                }
                None => {
                    debug!("all playback handles dropped");
                    break;
                }
            },
            _ = wait_for(due) => {
                controller.advance();
            }
        }
    }
}

fn apply(controller: &mut PlaybackController, command: Command) -> Result<PlaybackReport> {
    debug!(?command, "playback command");
    match command {
        Command::Play(kind, input) => controller.play(kind, input)?,
        Command::Resume => controller.resume()?,
        Command::Pause => controller.pause(),
        Command::Reset => controller.reset(),
        Command::Cancel => controller.cancel(),
        Command::Step => {
            controller.step_once()?;
        }
        Command::SetSpeed(speed) => {
            controller.set_speed(speed)?;
        }
        Command::Report => {}
    }
    Ok(controller.report())
}

async fn wait_for(due: Option<Instant>) {
    match due {
        Some(at) => sleep_until(at).await,
        None => future::pending().await,
    }
}
