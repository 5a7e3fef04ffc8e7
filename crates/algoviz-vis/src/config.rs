//! Playback and server configuration.

use std::fmt::Display;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use algoviz_steps::AlgorithmKind;

use crate::error::{Error, Result};

/// Base delay between steps, per algorithm, at speed 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepDelays {
    pub bubble_sort: Duration,
    pub binary_search: Duration,
    pub breadth_first: Duration,
}

impl Default for StepDelays {
    fn default() -> Self {
        Self {
            bubble_sort: Duration::from_millis(1000),
            binary_search: Duration::from_millis(1500),
            breadth_first: Duration::from_millis(1500),
        }
    }
}

impl StepDelays {
    /// Same delay for every algorithm.
    pub fn uniform(delay: Duration) -> Self {
        Self {
            bubble_sort: delay,
            binary_search: delay,
            breadth_first: delay,
        }
    }

    pub fn for_kind(&self, kind: AlgorithmKind) -> Duration {
        match kind {
            AlgorithmKind::BubbleSort => self.bubble_sort,
            AlgorithmKind::BinarySearch => self.binary_search,
            AlgorithmKind::BreadthFirstTraversal => self.breadth_first,
        }
    }
}

/// Configuration for a playback controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackConfig {
    /// Speed multiplier a new controller starts with.
    pub default_speed: u32,

    /// Lowest accepted multiplier (at least 1).
    pub min_speed: u32,

    /// Highest accepted multiplier.
    pub max_speed: u32,

    /// Clamp out-of-range speeds instead of rejecting them.
    pub clamp_speed: bool,

    /// Per-algorithm base delays.
    pub delays: StepDelays,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            default_speed: 2,
            min_speed: 1,
            max_speed: 5,
            clamp_speed: true,
            delays: StepDelays::default(),
        }
    }
}

impl PlaybackConfig {
    /// Read overrides from `ALGOVIZ_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let ms = |key: &str, default: Duration| -> Result<Duration> {
            env_or(key, default.as_millis() as u64).map(Duration::from_millis)
        };

        let config = Self {
            default_speed: env_or("ALGOVIZ_DEFAULT_SPEED", defaults.default_speed)?,
            min_speed: env_or("ALGOVIZ_MIN_SPEED", defaults.min_speed)?,
            max_speed: env_or("ALGOVIZ_MAX_SPEED", defaults.max_speed)?,
            clamp_speed: env_or("ALGOVIZ_CLAMP_SPEED", defaults.clamp_speed)?,
            delays: StepDelays {
                bubble_sort: ms("ALGOVIZ_SORT_DELAY_MS", defaults.delays.bubble_sort)?,
                binary_search: ms("ALGOVIZ_SEARCH_DELAY_MS", defaults.delays.binary_search)?,
                breadth_first: ms("ALGOVIZ_TRAVERSAL_DELAY_MS", defaults.delays.breadth_first)?,
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Set the accepted speed range.
    #[must_use]
    pub fn with_speed_range(mut self, min: u32, max: u32) -> Self {
        self.min_speed = min;
        self.max_speed = max;
        self
    }

    /// Set the starting speed.
    #[must_use]
    pub fn with_default_speed(mut self, speed: u32) -> Self {
        self.default_speed = speed;
        self
    }

    /// Reject out-of-range speeds instead of clamping them.
    #[must_use]
    pub fn without_clamping(mut self) -> Self {
        self.clamp_speed = false;
        self
    }

    /// Replace the per-algorithm delays.
    #[must_use]
    pub fn with_delays(mut self, delays: StepDelays) -> Self {
        self.delays = delays;
        self
    }

    /// Check that the speed range is non-empty, starts at 1 or more and
    /// contains the default speed.
    pub fn validate(&self) -> Result<()> {
        if self.min_speed == 0 {
            return Err(Error::InvalidConfig("min_speed must be at least 1".into()));
        }
        if self.min_speed > self.max_speed {
            return Err(Error::InvalidConfig(format!(
                "min_speed {} exceeds max_speed {}",
                self.min_speed, self.max_speed
            )));
        }
        if !(self.min_speed..=self.max_speed).contains(&self.default_speed) {
            return Err(Error::InvalidConfig(format!(
                "default_speed {} outside {}..={}",
                self.default_speed, self.min_speed, self.max_speed
            )));
        }
        Ok(())
    }

    /// Map a requested multiplier onto the allowed range.
    pub fn resolve_speed(&self, requested: i64) -> Result<u32> {
        if self.min_speed > self.max_speed {
            return Err(Error::InvalidConfig(format!(
                "min_speed {} exceeds max_speed {}",
                self.min_speed, self.max_speed
            )));
        }
        let (min, max) = (i64::from(self.min_speed), i64::from(self.max_speed));
        if (min..=max).contains(&requested) {
            return Ok(requested as u32);
        }
        if self.clamp_speed {
            Ok(requested.clamp(min, max) as u32)
        } else {
            Err(Error::SpeedOutOfRange {
                requested,
                min: self.min_speed,
                max: self.max_speed,
            })
        }
    }
}

/// Configuration for the visualization server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen address
    pub addr: SocketAddr,

    /// Buffered events per WebSocket subscriber before it starts lagging
    pub event_capacity: usize,

    /// Playback settings
    pub playback: PlaybackConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            event_capacity: 256,
            playback: PlaybackConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Read overrides from `ALGOVIZ_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let event_capacity = env_or("ALGOVIZ_EVENT_CAPACITY", defaults.event_capacity)?;
        if event_capacity == 0 {
            return Err(Error::InvalidConfig("ALGOVIZ_EVENT_CAPACITY must be positive".into()));
        }
        Ok(Self {
            addr: env_or("ALGOVIZ_ADDR", defaults.addr)?,
            event_capacity,
            playback: PlaybackConfig::from_env()?,
        })
    }

    /// Listen on `port` on all interfaces.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.addr = SocketAddr::from(([0, 0, 0, 0], port));
        self
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::InvalidConfig(format!("{}={:?}: {}", key, raw, e))),
        Err(_) => Ok(default),
    }
}
