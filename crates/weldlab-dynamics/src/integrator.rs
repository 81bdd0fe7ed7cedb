//! Explicit Euler damped-pendulum integrator.
//!
//! Each joint is integrated independently:
//!
//! ```text
//! τ      = (torque_command / 100) · capacity · 0.5        (hip only)
//! c      = friction · 5 · chassis_factor
//! ω1'    = ω1 + dt · (τ − g·sin θ1 − c·ω1)
//! θ1'    = θ1 + dt · ω1'
//! ω2'    = ω2 + dt · (−g·sin θ2 − c·ω2)
//! θ2'    = θ2 + dt · ω2'
//! ```
//!
//! Velocities are updated first and the new velocity moves the angle
//! (semi-implicit Euler).  Everything here is a pure function of its
//! arguments.

use crate::params::SimulationParameters;
use crate::state::JointState;

/// Nominal tick length (s), one display refresh at ~60 Hz.
pub const DEFAULT_DT: f64 = 0.016;

/// Fraction of the actuator capacity delivered at a 100 % command.
const TORQUE_GAIN: f64 = 0.5;

/// Friction to damping conversion.
const FRICTION_GAIN: f64 = 5.0;

/// Torque (Nm) applied at the hip for the given parameters.
#[must_use]
pub fn applied_torque(params: &SimulationParameters) -> f64 {
    (params.torque_command / 100.0) * params.max_torque_capacity * TORQUE_GAIN
}

/// Viscous damping coefficient shared by both joints.
#[must_use]
pub fn damping(params: &SimulationParameters) -> f64 {
    params.friction * FRICTION_GAIN * params.chassis_factor
}

/// Advance the limb by one tick of `dt` seconds.
#[must_use]
pub fn step(state: JointState, params: &SimulationParameters, dt: f64) -> JointState {
    let torque = applied_torque(params);
    let c = damping(params);
    let g = params.gravity;

    let omega1 = dt.mul_add(torque - g * state.theta1.sin() - state.omega1 * c, state.omega1);
    let theta1 = dt.mul_add(omega1, state.theta1);
    let omega2 = dt.mul_add(-g * state.theta2.sin() - state.omega2 * c, state.omega2);
    let theta2 = dt.mul_add(omega2, state.theta2);

    JointState {
        theta1,
        omega1,
        theta2,
        omega2,
    }
}

/// Like [`step`], but returns `state` untouched when `advancing` is false.
///
/// Used for pause and emergency stop: the pose freezes in place, it is not
/// reset.
#[must_use]
pub fn gated_step(
    state: JointState,
    params: &SimulationParameters,
    dt: f64,
    advancing: bool,
) -> JointState {
    if advancing { step(state, params, dt) } else { state }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
