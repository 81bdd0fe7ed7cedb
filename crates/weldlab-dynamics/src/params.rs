//! Per-tick parameters read by the integrator.

use serde::{Deserialize, Serialize};

/// Torque capacity (Nm) assumed when no actuator rating can be resolved.
pub const DEFAULT_TORQUE_CAPACITY: f64 = 100.0;

/// Damping multiplier applied when a chassis is installed.
pub const CHASSIS_DAMPING_FACTOR: f64 = 0.8;

/// Inputs to one integrator tick.
///
/// Built fresh every frame from the user controls and the installed
/// loadout; the integrator never mutates it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    /// Gravitational acceleration (m/s^2), slider range `[0, 20]`.
    pub gravity: f64,
    /// Joint friction coefficient, slider range `[0, 1]`.
    pub friction: f64,
    /// Hip torque command in percent of capacity, slider range `[-200, 200]`.
    pub torque_command: f64,
    /// Rated torque (Nm) of the installed actuator.
    pub max_torque_capacity: f64,
    /// `0.8` with a chassis installed, `1.0` otherwise.
    pub chassis_factor: f64,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            gravity: 9.8,
            friction: 0.1,
            torque_command: 0.0,
            max_torque_capacity: DEFAULT_TORQUE_CAPACITY,
            chassis_factor: 1.0,
        }
    }
}

impl SimulationParameters {
    /// Builder: set gravity.
    #[must_use]
    pub const fn with_gravity(mut self, gravity: f64) -> Self {
        self.gravity = gravity;
        self
    }

    /// Builder: set friction.
    #[must_use]
    pub const fn with_friction(mut self, friction: f64) -> Self {
        self.friction = friction;
        self
    }

    /// Builder: set the torque command (percent).
    #[must_use]
    pub const fn with_torque_command(mut self, torque_command: f64) -> Self {
        self.torque_command = torque_command;
        self
    }

    /// Builder: set the actuator capacity.  Non-finite values fall back to
    /// [`DEFAULT_TORQUE_CAPACITY`].
    #[must_use]
    pub const fn with_torque_capacity(mut self, capacity: f64) -> Self {
        self.max_torque_capacity = if capacity.is_finite() {
            capacity
        } else {
            DEFAULT_TORQUE_CAPACITY
        };
        self
    }

    /// Builder: mark whether a chassis is installed.
    #[must_use]
    pub const fn with_chassis(mut self, installed: bool) -> Self {
        self.chassis_factor = if installed {
            CHASSIS_DAMPING_FACTOR
        } else {
            1.0
        };
        self
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_lab_sliders() {
        let p = SimulationParameters::default();
        assert!((p.gravity - 9.8).abs() < f64::EPSILON);
        assert!((p.friction - 0.1).abs() < f64::EPSILON);
        assert!(p.torque_command.abs() < f64::EPSILON);
        assert!((p.max_torque_capacity - 100.0).abs() < f64::EPSILON);
        assert!((p.chassis_factor - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn chassis_builder_sets_factor() {
        let p = SimulationParameters::default().with_chassis(true);
        assert!((p.chassis_factor - 0.8).abs() < f64::EPSILON);
        let p = p.with_chassis(false);
        assert!((p.chassis_factor - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn nan_capacity_falls_back() {
        let p = SimulationParameters::default().with_torque_capacity(f64::NAN);
        assert!((p.max_torque_capacity - DEFAULT_TORQUE_CAPACITY).abs() < f64::EPSILON);
        let p = p.with_torque_capacity(f64::INFINITY);
        assert!((p.max_torque_capacity - DEFAULT_TORQUE_CAPACITY).abs() < f64::EPSILON);
    }

    #[test]
    fn finite_capacity_is_kept() {
        let p = SimulationParameters::default().with_torque_capacity(360.0);
        assert!((p.max_torque_capacity - 360.0).abs() < f64::EPSILON);
    }
}
