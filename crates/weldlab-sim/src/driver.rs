//! Per-tick composition of the joint integrator and the spatter pool.

use bevy::prelude::Resource;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;
use weldlab_core::config::LabConfig;
use weldlab_core::loadout::Loadout;
use weldlab_core::seed::LabSeeds;
use weldlab_core::time::SimTime;
use weldlab_core::types::{ActiveView, LabControls, RunState};
use weldlab_dynamics::{JointState, gated_step};
use weldlab_spatter::{SpatterPool, SpatterStepReport, SpatterUniforms};

// ---------------------------------------------------------------------------
// RenderSnapshot
// ---------------------------------------------------------------------------

/// What the renderer needs to draw one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Resource)]
pub struct RenderSnapshot {
    pub theta1: f64,
    pub theta2: f64,
    /// A tool is mounted.
    pub tool_visible: bool,
    pub active_particles: usize,
}

impl Default for RenderSnapshot {
    fn default() -> Self {
        let joints = JointState::initial();
        Self {
            theta1: joints.theta1,
            theta2: joints.theta2,
            tool_visible: false,
            active_particles: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// TickContext / TickReport
// ---------------------------------------------------------------------------

/// Inputs read by one tick.
#[derive(Debug, Clone, Copy)]
pub struct TickContext<'a> {
    pub controls: &'a LabControls,
    pub loadout: &'a Loadout,
    pub run: RunState,
    pub view: ActiveView,
}

impl TickContext<'_> {
    /// Joints move only in the lab view while running without a stop.
    pub const fn joints_advance(&self) -> bool {
        self.view.is_simulation() && self.run.is_advancing()
    }

    /// The emitter runs whenever the lab runs with a spatter tool, in any view.
    pub fn spatter_active(&self) -> bool {
        self.run.is_advancing() && self.loadout.emits_spatter()
    }
}

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub joints_advanced: bool,
    pub spatter: SpatterStepReport,
    pub snapshot: RenderSnapshot,
}

// ---------------------------------------------------------------------------
// TickDriver
// ---------------------------------------------------------------------------

/// Owns the simulated state and advances it one fixed tick at a time.
#[derive(Debug, Clone)]
pub struct TickDriver {
    joints: JointState,
    pool: SpatterPool,
    uniforms: SpatterUniforms,
    rng: ChaCha8Rng,
    time: SimTime,
    dt: f64,
    diverged: bool,
    last_report: Option<TickReport>,
}

impl TickDriver {
    pub fn new(dt: f64, pool_capacity: usize, rng: ChaCha8Rng) -> Self {
        Self {
            joints: JointState::initial(),
            pool: SpatterPool::new(pool_capacity),
            uniforms: SpatterUniforms::default(),
            rng,
            time: SimTime::new(),
            dt,
            diverged: false,
            last_report: None,
        }
    }

    /// Driver with the config's tick length, pool size and seed.
    pub fn from_config(config: &LabConfig) -> Self {
        Self::new(
            config.tick_dt,
            config.pool_capacity,
            LabSeeds::new(config.seed).spatter_rng(),
        )
    }

    pub const fn joints(&self) -> JointState {
        self.joints
    }

    pub const fn pool(&self) -> &SpatterPool {
        &self.pool
    }

    pub const fn uniforms(&self) -> &SpatterUniforms {
        &self.uniforms
    }

    pub const fn time(&self) -> SimTime {
        self.time
    }

    pub const fn dt(&self) -> f64 {
        self.dt
    }

    pub const fn last_report(&self) -> Option<&TickReport> {
        self.last_report.as_ref()
    }

    /// Run one tick.
    pub fn tick(&mut self, ctx: &TickContext<'_>) -> TickReport {
        let params = ctx.controls.parameters(ctx.loadout);
        let joints_advanced = ctx.joints_advance();
        self.joints = gated_step(self.joints, &params, self.dt, joints_advanced);

        if self.joints.is_finite() {
            self.diverged = false;
        } else if !self.diverged {
            self.diverged = true;
            warn!(joints = ?self.joints, "joint state diverged");
        }

        let settings = ctx.controls.spatter.clamped();
        let spatter = self
            .pool
            .step(&settings, ctx.spatter_active(), &mut self.rng);

        self.time.tick(self.dt);
        self.uniforms.refresh(&settings, self.time.secs_f32());

        let report = TickReport {
            joints_advanced,
            spatter,
            snapshot: self.snapshot(ctx.loadout),
        };
        self.last_report = Some(report);
        report
    }

    /// Snapshot of the current state for `loadout`.
    pub fn snapshot(&self, loadout: &Loadout) -> RenderSnapshot {
        RenderSnapshot {
            theta1: self.joints.theta1,
            theta2: self.joints.theta2,
            tool_visible: loadout.tool_visible(),
            active_particles: self.pool.active_count(),
        }
    }

    /// Restore the initial pose and empty the pool. Returns how many live
    /// particles were dropped.
    pub fn reset(&mut self) -> usize {
        self.joints.reset();
        self.diverged = false;
        self.pool.clear()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
