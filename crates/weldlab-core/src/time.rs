use std::fmt;
use std::time::Duration;

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

const NANOS_PER_SEC: f64 = 1_000_000_000.0;

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn secs_to_nanos(secs: f64) -> u64 {
    (secs * NANOS_PER_SEC).round() as u64
}

// ---------------------------------------------------------------------------
// SimTime
// ---------------------------------------------------------------------------

/// Elapsed simulated time, counted in whole nanoseconds so repeated ticks
/// never drift.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Resource,
)]
pub struct SimTime {
    nanos: u64,
    ticks: u64,
}

impl SimTime {
    #[must_use]
    pub const fn new() -> Self {
        Self { nanos: 0, ticks: 0 }
    }

    #[must_use]
    pub const fn nanos(&self) -> u64 {
        self.nanos
    }

    /// Number of ticks recorded since the last reset.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn secs_f64(&self) -> f64 {
        self.nanos as f64 / NANOS_PER_SEC
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn secs_f32(&self) -> f32 {
        self.secs_f64() as f32
    }

    /// Record one tick of `dt_secs` seconds.
    pub fn tick(&mut self, dt_secs: f64) {
        self.nanos = self.nanos.saturating_add(secs_to_nanos(dt_secs));
        self.ticks = self.ticks.saturating_add(1);
    }

    pub const fn reset(&mut self) {
        *self = Self::new();
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s ({} ticks)", self.secs_f64(), self.ticks)
    }
}

// ---------------------------------------------------------------------------
// FrameLoop
// ---------------------------------------------------------------------------

/// Lifecycle of a [`FrameLoop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Not ticking; may be started.
    Idle,
    /// Consuming frame time into fixed ticks.
    Running,
    /// Torn down; never ticks again.
    Cancelled,
}

/// Fixed-step frame scheduler.
///
/// Real frame deltas are fed to [`FrameLoop::frame`], which answers how many
/// fixed ticks to run.  At most `max_steps` ticks are handed out per frame;
/// any backlog past the cap is dropped so a slow frame cannot snowball.
#[derive(Debug, Clone)]
pub struct FrameLoop {
    state: LoopState,
    accumulated: u64,
    step_nanos: u64,
    step_secs: f64,
    max_steps: u32,
}

impl FrameLoop {
    /// Idle loop with a fixed step of `step_secs` seconds and a cap of 10
    /// ticks per frame.
    pub fn new(step_secs: f64) -> Self {
        Self {
            state: LoopState::Idle,
            accumulated: 0,
            step_nanos: secs_to_nanos(step_secs).max(1),
            step_secs,
            max_steps: 10,
        }
    }

    #[must_use]
    pub const fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps;
        self
    }

    #[must_use]
    pub const fn state(&self) -> LoopState {
        self.state
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self.state, LoopState::Running)
    }

    #[must_use]
    pub const fn step_secs(&self) -> f64 {
        self.step_secs
    }

    /// Begin ticking. Returns `false` if the loop was cancelled.
    pub const fn start(&mut self) -> bool {
        match self.state {
            LoopState::Cancelled => false,
            LoopState::Idle | LoopState::Running => {
                self.state = LoopState::Running;
                true
            }
        }
    }

    /// Stop ticking and drop any partial step. The loop can be restarted.
    pub const fn stop(&mut self) {
        if !matches!(self.state, LoopState::Cancelled) {
            self.state = LoopState::Idle;
        }
        self.accumulated = 0;
    }

    /// Tear the loop down for good.
    pub const fn cancel(&mut self) {
        self.state = LoopState::Cancelled;
        self.accumulated = 0;
    }

    /// Feed one frame of real time and get the number of fixed ticks to run.
    #[allow(clippy::cast_possible_truncation)]
    pub fn frame(&mut self, delta: Duration) -> u32 {
        if !self.is_running() {
            return 0;
        }
        let delta_nanos = u64::try_from(delta.as_nanos()).unwrap_or(u64::MAX);
        self.accumulated = self.accumulated.saturating_add(delta_nanos);

        let due = self.accumulated / self.step_nanos;
        let steps = due.min(u64::from(self.max_steps)) as u32;
        if due > u64::from(self.max_steps) {
            self.accumulated %= self.step_nanos;
        } else {
            self.accumulated -= u64::from(steps) * self.step_nanos;
        }
        steps
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
