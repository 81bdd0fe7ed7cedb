//! Fixed-capacity spatter pool and its per-tick lifecycle.
//!
//! Per tick, for every slot:
//! - free slot, emitter active: while spawn attempts remain, spend one and
//!   spawn with probability [`SPAWN_PROBABILITY`];
//! - live slot: `position += velocity`, gravity bias on `velocity.y`, life
//!   decays, and the slot retires once life runs out or it drops below
//!   [`FLOOR_Y`];
//! - emitter inactive: every slot is hard-cleared.
//!
//! The budget counts attempts, not spawns, so a tick realises at most
//! `floor(density * 20)` spawns and usually fewer.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use crate::particle::Particle;
use crate::settings::SpatterSettings;

/// Pool size used by the lab.
pub const DEFAULT_CAPACITY: usize = 800;

/// Chance that a spawn attempt produces a particle.
pub const SPAWN_PROBABILITY: f64 = 0.3;

/// Spawn point in tool-tip local space.
pub const EMITTER_ORIGIN: Vec3 = Vec3::new(0.0, 0.0, 0.5);

/// Particles below this height are retired.
pub const FLOOR_Y: f32 = -1.5;

/// Downward velocity bias applied every tick.
const GRAVITY_BIAS: f32 = 0.01;

/// Smallest life multiplier honoured by the decay.
const MIN_LIFE_MULTIPLIER: f32 = 0.1;

// ---------------------------------------------------------------------------
// SpatterStepReport
// ---------------------------------------------------------------------------

/// What one [`SpatterPool::step`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpatterStepReport {
    /// Spawn attempts spent against the budget.
    pub attempts: usize,
    /// Particles spawned.
    pub spawned: usize,
    /// Particles retired (decay, floor, or hard clear).
    pub retired: usize,
    /// Live particles after the step.
    pub active: usize,
}

// ---------------------------------------------------------------------------
// SpatterPool
// ---------------------------------------------------------------------------

/// Fixed-capacity particle buffer.
#[derive(Clone, Debug)]
pub struct SpatterPool {
    particles: Vec<Particle>,
}

impl Default for SpatterPool {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl SpatterPool {
    /// Create a pool with `capacity` free slots.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            particles: vec![Particle::default(); capacity],
        }
    }

    /// Number of slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.particles.len()
    }

    /// Number of live particles.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.particles.iter().filter(|p| p.is_active()).count()
    }

    /// Live buffer view over every slot, free ones included.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Positions of the live particles, in slot order.
    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.particles
            .iter()
            .filter(|p| p.is_active())
            .map(|p| p.position)
    }

    /// Free every slot.  Returns how many live particles were dropped.
    pub fn clear(&mut self) -> usize {
        let mut retired = 0;
        for p in &mut self.particles {
            if p.is_active() {
                retired += 1;
            }
            p.retire();
        }
        retired
    }

    /// Advance every slot by one tick.
    ///
    /// `active` is the emitter predicate: running, not emergency-stopped,
    /// and a spatter-producing tool installed.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        settings: &SpatterSettings,
        active: bool,
        rng: &mut R,
    ) -> SpatterStepReport {
        if !active {
            let retired = self.clear();
            return SpatterStepReport {
                retired,
                ..SpatterStepReport::default()
            };
        }

        let budget = settings.spawn_budget();
        let life_scale = settings.life.max(MIN_LIFE_MULTIPLIER);
        let mut report = SpatterStepReport::default();

        for p in &mut self.particles {
            if p.is_active() {
                p.position += p.velocity;
                p.velocity.y -= GRAVITY_BIAS;
                p.life -= rng.gen_range(0.015..0.025) / life_scale;
                if p.life <= 0.0 || p.position.y < FLOOR_Y {
                    p.retire();
                    report.retired += 1;
                }
            } else if report.attempts < budget {
                report.attempts += 1;
                if rng.gen_bool(SPAWN_PROBABILITY) {
                    *p = spawn(rng);
                    report.spawned += 1;
                }
            }
        }

        report.active = self.active_count();
        report
    }
}

fn spawn<R: Rng + ?Sized>(rng: &mut R) -> Particle {
    let angle = rng.gen_range(0.0..TAU);
    let lift: f32 = rng.r#gen();
    let speed = rng.gen_range(0.05..0.25);
    Particle {
        position: EMITTER_ORIGIN,
        velocity: Vec3::new(angle.cos() * speed, angle.sin() * speed, lift.mul_add(0.3, 0.1)),
        life: 1.0,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
