//! Playback controller: paces an algorithm process against a clock.
//!
//! The controller is a synchronous state machine. It never sleeps; it only
//! records when the next pull is due ([`PlaybackController::next_pull_at`])
//! and performs the pull when asked ([`PlaybackController::advance`]). The
//! async driver in [`crate::driver`] owns the waiting.

use std::time::Duration;

use algoviz_steps::{create_process, AlgorithmInput, AlgorithmKind, AlgorithmProcess, AlgorithmStep};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::PlaybackConfig;
use crate::error::Result;
use crate::events::RunSummary;
use crate::sink::FrameSink;

/// Externally visible playback status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackStatus {
    /// Nothing is playing
    Idle,
    /// Steps are being pulled on a timer
    Running,
    /// A run is held without a pending pull
    Paused,
    /// The last run published every step
    Completed,
    /// The last run was aborted
    Cancelled,
}

/// The active process lives inside the variants that need one, so a
/// running controller always has a process.
enum Session {
    Idle,
    Running {
        process: AlgorithmProcess,
        due: Instant,
    },
    Paused {
        process: AlgorithmProcess,
    },
    Completed,
    Cancelled,
}

impl Session {
    fn status(&self) -> PlaybackStatus {
        match self {
            Session::Idle => PlaybackStatus::Idle,
            Session::Running { .. } => PlaybackStatus::Running,
            Session::Paused { .. } => PlaybackStatus::Paused,
            Session::Completed => PlaybackStatus::Completed,
            Session::Cancelled => PlaybackStatus::Cancelled,
        }
    }
}

type RunListener = Box<dyn FnMut(&RunSummary) + Send>;

/// Single-owner state machine over one playback session.
pub struct PlaybackController {
    config: PlaybackConfig,
    speed: u32,
    session: Session,
    source: Option<(AlgorithmKind, AlgorithmInput)>,
    last_step: Option<AlgorithmStep>,
    published: u64,
    step_sinks: Vec<Box<dyn FrameSink>>,
    complete_listeners: Vec<RunListener>,
    cancel_listeners: Vec<RunListener>,
}

impl PlaybackController {
    /// Create an idle controller, rejecting an inconsistent speed range.
    pub fn new(config: PlaybackConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            speed: config.default_speed,
            config,
            session: Session::Idle,
            source: None,
            last_step: None,
            published: 0,
            step_sinks: Vec::new(),
            complete_listeners: Vec::new(),
            cancel_listeners: Vec::new(),
        })
    }

    /// Get the current playback status.
    pub fn status(&self) -> PlaybackStatus {
        self.session.status()
    }

    /// Current speed multiplier, always within the configured range.
    pub fn speed(&self) -> u32 {
        self.speed
    }

    /// Configuration the controller was built with.
    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// Most recently published step.
    pub fn last_step(&self) -> Option<&AlgorithmStep> {
        self.last_step.as_ref()
    }

    /// Steps published in the current run.
    pub fn steps_published(&self) -> u64 {
        self.published
    }

    /// Algorithm of the loaded input, if any.
    pub fn algorithm(&self) -> Option<AlgorithmKind> {
        self.source.as_ref().map(|(kind, _)| *kind)
    }

    /// When the pending pull is due; `None` unless running.
    pub fn next_pull_at(&self) -> Option<Instant> {
        match &self.session {
            Session::Running { due, .. } => Some(*due),
            _ => None,
        }
    }

    /// Wait that the next scheduled pull would use at the current speed.
    pub fn current_delay(&self) -> Option<Duration> {
        self.algorithm().map(|kind| self.delay_for(kind))
    }

    fn delay_for(&self, kind: AlgorithmKind) -> Duration {
        self.config.delays.for_kind(kind) / self.speed.max(1)
    }

    /// Register a sink for every published step.
    pub fn on_step<S>(&mut self, sink: S)
    where
        S: FrameSink + 'static,
    {
        self.step_sinks.push(Box::new(sink));
    }

    /// Register a listener called once when a run completes.
    pub fn on_complete<F>(&mut self, listener: F)
    where
        F: FnMut(&RunSummary) + Send + 'static,
    {
        self.complete_listeners.push(Box::new(listener));
    }

    /// Register a listener called when a run is cancelled.
    pub fn on_cancel<F>(&mut self, listener: F)
    where
        F: FnMut(&RunSummary) + Send + 'static,
    {
        self.cancel_listeners.push(Box::new(listener));
    }

    /// Load `input` and start a fresh run.
    ///
    /// Any run in progress is discarded without a cancel notification.
    pub fn play(&mut self, kind: AlgorithmKind, input: AlgorithmInput) -> Result<()> {
        let process = create_process(kind, input.clone())?;
        if matches!(self.session, Session::Running { .. } | Session::Paused { .. }) {
            debug!(%kind, "replacing active run");
        }
        self.source = Some((kind, input));
        self.start(process, true);
        Ok(())
    }

    /// Continue a paused run, or replay the loaded input from the start.
    pub fn resume(&mut self) -> Result<()> {
        match std::mem::replace(&mut self.session, Session::Idle) {
            Session::Paused { process } => {
                let due = Instant::now() + self.delay_for(process.kind());
                info!(algorithm = %process.kind(), speed = self.speed, "playback resumed");
                self.session = Session::Running { process, due };
            }
            running @ Session::Running { .. } => self.session = running,
            previous => match self.fresh_process()? {
                Some(process) => self.start(process, true),
                None => {
                    debug!("resume with nothing loaded");
                    self.session = previous;
                }
            },
        }
        Ok(())
    }

    /// Hold the current run. The pending pull is dropped; nothing is lost.
    pub fn pause(&mut self) {
        match std::mem::replace(&mut self.session, Session::Idle) {
            Session::Running { process, .. } => {
                info!(algorithm = %process.kind(), published = self.published, "playback paused");
                self.session = Session::Paused { process };
            }
            other => {
                debug!(status = ?other.status(), "pause ignored");
                self.session = other;
            }
        }
    }

    /// Drop the current run and return to idle. The loaded input is kept so
    /// a later [`resume`](Self::resume) replays it from scratch.
    pub fn reset(&mut self) {
        if matches!(self.session, Session::Idle) {
            debug!("reset ignored while idle");
            return;
        }
        info!(status = ?self.status(), "playback reset");
        self.session = Session::Idle;
        self.last_step = None;
        self.published = 0;
    }

    /// Abort the current run, reporting it to cancel listeners.
    pub fn cancel(&mut self) {
        let kind = match &self.session {
            Session::Running { process, .. } | Session::Paused { process } => process.kind(),
            _ => {
                debug!(status = ?self.status(), "cancel ignored");
                return;
            }
        };

        let summary = RunSummary {
            algorithm: kind,
            steps: self.published,
        };
        warn!(algorithm = %kind, published = self.published, "playback cancelled");
        self.session = Session::Cancelled;
        self.last_step = None;
        self.published = 0;
        for listener in &mut self.cancel_listeners {
            listener(&summary);
        }
    }

    /// Change the speed multiplier. A pull that is already scheduled keeps
    /// its deadline; the new speed applies from the next one.
    pub fn set_speed(&mut self, requested: i64) -> Result<u32> {
        let speed = self.config.resolve_speed(requested)?;
        if speed != self.speed {
            info!(from = self.speed, to = speed, "speed changed");
        }
        self.speed = speed;
        Ok(speed)
    }

    /// Perform the scheduled pull: publish one step, then reschedule or
    /// complete. Does nothing unless running.
    pub fn advance(&mut self) -> Option<AlgorithmStep> {
        match std::mem::replace(&mut self.session, Session::Idle) {
            Session::Running { process, .. } => self.pull(process, true),
            other => {
                self.session = other;
                None
            }
        }
    }

    /// Publish exactly one step without running the clock.
    ///
    /// From paused this stays paused. From idle, completed or cancelled the
    /// loaded input is replayed from a fresh process, left paused after the
    /// step. Ignored while running.
    pub fn step_once(&mut self) -> Result<Option<AlgorithmStep>> {
        match std::mem::replace(&mut self.session, Session::Idle) {
            Session::Paused { process } => Ok(self.pull(process, false)),
            running @ Session::Running { .. } => {
                debug!("step ignored while running");
                self.session = running;
                Ok(None)
            }
            previous => match self.fresh_process()? {
                Some(process) => {
                    self.start(process, false);
                    self.advance_paused()
                }
                None => {
                    self.session = previous;
                    Ok(None)
                }
            },
        }
    }

    fn advance_paused(&mut self) -> Result<Option<AlgorithmStep>> {
        match std::mem::replace(&mut self.session, Session::Idle) {
            Session::Paused { process } => Ok(self.pull(process, false)),
            other => {
                self.session = other;
                Ok(None)
            }
        }
    }

    fn fresh_process(&self) -> Result<Option<AlgorithmProcess>> {
        match &self.source {
            Some((kind, input)) => Ok(Some(create_process(*kind, input.clone())?)),
            None => Ok(None),
        }
    }

    fn start(&mut self, process: AlgorithmProcess, running: bool) {
        self.last_step = None;
        self.published = 0;
        let kind = process.kind();
        if running {
            let due = Instant::now() + self.delay_for(kind);
            info!(algorithm = %kind, speed = self.speed, "playback started");
            self.session = Session::Running { process, due };
        } else {
            self.session = Session::Paused { process };
        }
    }

    fn pull(&mut self, mut process: AlgorithmProcess, keep_running: bool) -> Option<AlgorithmStep> {
        let kind = process.kind();
        let step = process.next();

        if let Some(step) = &step {
            self.published += 1;
            debug!(algorithm = %kind, seq = self.published, kind = ?step.kind(), "step published");
            for sink in &mut self.step_sinks {
                sink.draw(step);
            }
            self.last_step = Some(step.clone());
        }

        if process.is_finished() {
            self.complete(kind);
        } else if keep_running {
            let due = Instant::now() + self.delay_for(kind);
            self.session = Session::Running { process, due };
        } else {
            self.session = Session::Paused { process };
        }
        step
    }

    fn complete(&mut self, kind: AlgorithmKind) {
        let summary = RunSummary {
            algorithm: kind,
            steps: self.published,
        };
        info!(algorithm = %kind, steps = self.published, "playback completed");
        self.session = Session::Completed;
        for listener in &mut self.complete_listeners {
            listener(&summary);
        }
    }

    /// Serializable view of the controller.
    pub fn report(&self) -> PlaybackReport {
        PlaybackReport::from(self)
    }
}

/// Playback status for sending to frontends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackReport {
    pub status: PlaybackStatus,
    pub speed: u32,
    pub algorithm: Option<AlgorithmKind>,
    pub steps_published: u64,
    pub last_step: Option<AlgorithmStep>,
    pub delay_ms: Option<u64>,
}

impl From<&PlaybackController> for PlaybackReport {
    fn from(controller: &PlaybackController) -> Self {
        Self {
            status: controller.status(),
            speed: controller.speed,
            algorithm: controller.algorithm(),
            steps_published: controller.published,
            last_step: controller.last_step.clone(),
            delay_ms: controller.current_delay().map(|d| d.as_millis() as u64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use algoviz_steps::StepKind;

    fn controller() -> PlaybackController {
        PlaybackController::new(PlaybackConfig::default()).unwrap()
    }

    fn recorded(controller: &mut PlaybackController) -> Arc<Mutex<Vec<AlgorithmStep>>> {
        let steps = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&steps);
        controller.on_step(move |step: &AlgorithmStep| sink.lock().unwrap().push(step.clone()));
        steps
    }

    fn preset(kind: AlgorithmKind) -> AlgorithmInput {
        AlgorithmInput::preset(kind)
    }

    fn drain(controller: &mut PlaybackController) {
        while controller.status() == PlaybackStatus::Running {
            controller.advance();
        }
    }

    fn uninterrupted(kind: AlgorithmKind) -> Vec<AlgorithmStep> {
        create_process(kind, preset(kind)).unwrap().collect()
    }

    #[test]
    fn starts_idle_at_default_speed() {
        let c = controller();
        assert_eq!(c.status(), PlaybackStatus::Idle);
        assert_eq!(c.speed(), 2);
        assert!(c.next_pull_at().is_none());
        assert!(c.last_step().is_none());
    }

    #[test]
    fn play_schedules_first_pull() {
        let mut c = controller();
        c.play(AlgorithmKind::BubbleSort, preset(AlgorithmKind::BubbleSort)).unwrap();
        assert_eq!(c.status(), PlaybackStatus::Running);
        assert!(c.next_pull_at().is_some());
        assert_eq!(c.current_delay(), Some(Duration::from_millis(500)));
        assert_eq!(c.steps_published(), 0);
    }

    #[test]
    fn play_rejects_mismatched_input() {
        let mut c = controller();
        let err = c.play(AlgorithmKind::BinarySearch, AlgorithmInput::Array(vec![1]));
        assert!(err.is_err());
        assert_eq!(c.status(), PlaybackStatus::Idle);
    }

    #[test]
    fn runs_to_completion_and_notifies_once() {
        let mut c = controller();
        let steps = recorded(&mut c);
        let completions = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&completions);
        c.on_complete(move |summary| seen.lock().unwrap().push(*summary));

        c.play(AlgorithmKind::BinarySearch, preset(AlgorithmKind::BinarySearch)).unwrap();
        drain(&mut c);

        assert_eq!(c.status(), PlaybackStatus::Completed);
        assert!(c.next_pull_at().is_none());
        assert_eq!(*steps.lock().unwrap(), uninterrupted(AlgorithmKind::BinarySearch));
        assert_eq!(c.last_step().map(|s| s.kind()), Some(StepKind::Found));

        // Further pulls do nothing and never re-notify.
        assert!(c.advance().is_none());
        let completions = completions.lock().unwrap();
        assert_eq!(completions.len(), 1);
        assert_eq!(completions[0].steps, 5);
    }

    #[test]
    fn pause_holds_process_and_last_step() {
        let mut c = controller();
        c.play(AlgorithmKind::BubbleSort, preset(AlgorithmKind::BubbleSort)).unwrap();
        let first = c.advance().unwrap();
        c.pause();

        assert_eq!(c.status(), PlaybackStatus::Paused);
        assert!(c.next_pull_at().is_none());
        assert_eq!(c.last_step(), Some(&first));
        assert!(c.advance().is_none(), "no pulls while paused");
        assert_eq!(c.steps_published(), 1);
    }

    #[test]
    fn pause_and_resume_preserves_sequence() {
        let kind = AlgorithmKind::BubbleSort;
        let mut c = controller();
        let steps = recorded(&mut c);
        c.play(kind, preset(kind)).unwrap();

        for _ in 0..4 {
            c.advance();
        }
        c.pause();
        c.set_speed(5).unwrap();
        c.resume().unwrap();
        assert_eq!(c.status(), PlaybackStatus::Running);
        drain(&mut c);

        assert_eq!(*steps.lock().unwrap(), uninterrupted(kind));
    }

    #[test]
    fn reset_then_resume_replays_from_scratch() {
        let kind = AlgorithmKind::BreadthFirstTraversal;
        let mut c = controller();
        let steps = recorded(&mut c);
        c.play(kind, preset(kind)).unwrap();
        c.advance();
        c.advance();

        c.reset();
        assert_eq!(c.status(), PlaybackStatus::Idle);
        assert!(c.last_step().is_none());
        assert_eq!(c.steps_published(), 0);

        steps.lock().unwrap().clear();
        c.resume().unwrap();
        drain(&mut c);
        assert_eq!(*steps.lock().unwrap(), uninterrupted(kind));
    }

    #[test]
    fn cancel_is_reported_distinctly() {
        let mut c = controller();
        let cancelled = Arc::new(Mutex::new(None));
        let completed = Arc::new(Mutex::new(false));
        {
            let cancelled = Arc::clone(&cancelled);
            c.on_cancel(move |summary| *cancelled.lock().unwrap() = Some(*summary));
            let completed = Arc::clone(&completed);
            c.on_complete(move |_| *completed.lock().unwrap() = true);
        }

        c.play(AlgorithmKind::BubbleSort, preset(AlgorithmKind::BubbleSort)).unwrap();
        c.advance();
        c.pause();
        c.cancel();

        assert_eq!(c.status(), PlaybackStatus::Cancelled);
        assert!(c.last_step().is_none());
        assert_eq!(
            *cancelled.lock().unwrap(),
            Some(RunSummary {
                algorithm: AlgorithmKind::BubbleSort,
                steps: 1
            })
        );
        assert!(!*completed.lock().unwrap());
    }

    #[test]
    fn misuse_is_a_no_op() {
        let mut c = controller();
        c.pause();
        c.reset();
        c.cancel();
        c.resume().unwrap();
        assert!(c.advance().is_none());
        assert!(c.step_once().unwrap().is_none());
        assert_eq!(c.status(), PlaybackStatus::Idle);
    }

    #[test]
    fn speed_change_does_not_move_pending_deadline() {
        let mut c = controller();
        c.play(AlgorithmKind::BubbleSort, preset(AlgorithmKind::BubbleSort)).unwrap();
        let due = c.next_pull_at();

        assert_eq!(c.set_speed(5).unwrap(), 5);
        assert_eq!(c.next_pull_at(), due);
        assert_eq!(c.current_delay(), Some(Duration::from_millis(200)));
    }

    #[test]
    fn speed_is_clamped_in_any_state() {
        let mut c = controller();
        assert_eq!(c.set_speed(0).unwrap(), 1);
        assert_eq!(c.set_speed(40).unwrap(), 5);
        assert_eq!(c.speed(), 5);
    }

    #[test]
    fn speed_rejected_without_clamping() {
        let mut c = PlaybackController::new(PlaybackConfig::default().without_clamping()).unwrap();
        assert!(c.set_speed(9).is_err());
        assert_eq!(c.speed(), 2);
    }

    #[test]
    fn step_once_walks_a_paused_run() {
        let kind = AlgorithmKind::BinarySearch;
        let mut c = controller();
        c.play(kind, preset(kind)).unwrap();
        c.pause();

        let mut stepped = Vec::new();
        while let Some(step) = c.step_once().unwrap() {
            stepped.push(step);
            if c.status() == PlaybackStatus::Completed {
                break;
            }
            assert_eq!(c.status(), PlaybackStatus::Paused);
        }
        assert_eq!(stepped, uninterrupted(kind));
        assert_eq!(c.status(), PlaybackStatus::Completed);
    }

    #[test]
    fn step_once_after_completion_replays() {
        let kind = AlgorithmKind::BinarySearch;
        let mut c = controller();
        c.play(kind, preset(kind)).unwrap();
        drain(&mut c);

        let first = c.step_once().unwrap();
        assert_eq!(first, uninterrupted(kind).into_iter().next());
        assert_eq!(c.status(), PlaybackStatus::Paused);
        assert_eq!(c.steps_published(), 1);
    }

    #[test]
    fn empty_input_completes_on_first_pull() {
        let mut c = controller();
        let done = Arc::new(Mutex::new(0));
        let seen = Arc::clone(&done);
        c.on_complete(move |_| *seen.lock().unwrap() += 1);

        c.play(AlgorithmKind::BreadthFirstTraversal, AlgorithmInput::Tree(None)).unwrap();
        assert_eq!(c.status(), PlaybackStatus::Running);
        assert!(c.advance().is_none());
        assert_eq!(c.status(), PlaybackStatus::Completed);
        assert_eq!(*done.lock().unwrap(), 1);
    }

    #[test]
    fn play_while_running_restarts() {
        let mut c = controller();
        let cancels = Arc::new(Mutex::new(0));
        let seen = Arc::clone(&cancels);
        c.on_cancel(move |_| *seen.lock().unwrap() += 1);

        c.play(AlgorithmKind::BubbleSort, preset(AlgorithmKind::BubbleSort)).unwrap();
        c.advance();
        c.play(AlgorithmKind::BinarySearch, preset(AlgorithmKind::BinarySearch)).unwrap();

        assert_eq!(c.algorithm(), Some(AlgorithmKind::BinarySearch));
        assert_eq!(c.steps_published(), 0);
        assert_eq!(*cancels.lock().unwrap(), 0);
    }

    #[test]
    fn report_conversion() {
        let mut c = controller();
        c.play(AlgorithmKind::BubbleSort, preset(AlgorithmKind::BubbleSort)).unwrap();
        c.advance();
        c.set_speed(4).unwrap();

        let report: PlaybackReport = (&c).into();
        assert_eq!(report.status, PlaybackStatus::Running);
        assert_eq!(report.speed, 4);
        assert_eq!(report.algorithm, Some(AlgorithmKind::BubbleSort));
        assert_eq!(report.steps_published, 1);
        assert_eq!(report.delay_ms, Some(250));
        assert!(report.last_step.is_some());
    }

    #[test]
    fn rejects_inverted_speed_range() {
        let err = PlaybackController::new(PlaybackConfig::default().with_speed_range(4, 3))
            .err()
            .unwrap();
        assert!(matches!(err, crate::error::Error::InvalidConfig(_)));
    }

    #[test]
    fn rejects_default_speed_outside_range() {
        let config = PlaybackConfig::default().with_default_speed(50);
        assert!(PlaybackController::new(config).is_err());
    }

    #[test]
    fn starting_speed_is_within_range() {
        for (min, max, default) in [(1, 5, 1), (1, 5, 5), (2, 8, 3), (3, 3, 3)] {
            let config = PlaybackConfig::default()
                .with_speed_range(min, max)
                .with_default_speed(default);
            let c = PlaybackController::new(config).unwrap();
            assert!((min..=max).contains(&c.speed()));
            assert_eq!(c.speed(), default);
        }
    }
}
