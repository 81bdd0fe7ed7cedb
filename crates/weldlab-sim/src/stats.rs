//! Lab statistics.
//!
//! [`LabStats`] accumulates counters over the lifetime of the app: ticks,
//! joint ticks, spatter traffic, resets and emergency stops.

use bevy::prelude::*;
use serde::Serialize;

use crate::plugin::LabDriver;

// ---------------------------------------------------------------------------
// LabStats
// ---------------------------------------------------------------------------

/// Bevy resource with cumulative lab counters.
#[derive(Resource, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LabStats {
    /// Driver ticks run.
    pub ticks: u64,
    /// Ticks in which the joints advanced.
    pub joint_ticks: u64,
    pub spawn_attempts: u64,
    pub particles_spawned: u64,
    pub particles_retired: u64,
    /// Most particles alive at the end of any tick.
    pub peak_active: usize,
    pub resets: u32,
    pub emergency_stops: u32,
    /// Last tick counted, so a frame without a new tick is not recorded
    /// twice.
    #[serde(skip)]
    last_seen_tick: u64,
}

impl LabStats {
    pub const fn new() -> Self {
        Self {
            ticks: 0,
            joint_ticks: 0,
            spawn_attempts: 0,
            particles_spawned: 0,
            particles_retired: 0,
            peak_active: 0,
            resets: 0,
            emergency_stops: 0,
            last_seen_tick: 0,
        }
    }

    /// Particles spawned per spawn attempt.
    pub fn spawn_rate(&self) -> Option<f64> {
        if self.spawn_attempts == 0 {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        Some(self.particles_spawned as f64 / self.spawn_attempts as f64)
    }
}

// ---------------------------------------------------------------------------
// System
// ---------------------------------------------------------------------------

/// Folds the driver's latest tick report into [`LabStats`].
#[allow(clippy::needless_pass_by_value)]
pub fn lab_stats_system(driver: Res<LabDriver>, mut stats: ResMut<LabStats>) {
    let tick = driver.time().ticks();
    if tick == stats.last_seen_tick {
        return;
    }
    let Some(report) = driver.last_report() else {
        return;
    };
    stats.last_seen_tick = tick;
    stats.ticks += 1;
    if report.joints_advanced {
        stats.joint_ticks += 1;
    }
    stats.spawn_attempts += report.spatter.attempts as u64;
    stats.particles_spawned += report.spatter.spawned as u64;
    stats.particles_retired += report.spatter.retired as u64;
    stats.peak_active = stats.peak_active.max(report.spatter.active);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
