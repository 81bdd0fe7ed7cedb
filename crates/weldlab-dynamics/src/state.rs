//! Joint state for the two-segment linkage.

use std::f64::consts::{FRAC_PI_4, FRAC_PI_6};

use serde::{Deserialize, Serialize};

/// Angle and angular velocity for both joints of the limb.
///
/// Joint 1 is the actuated hip, joint 2 the passive knee.  Angles are in
/// radians measured from the hanging rest pose, velocities in rad/s.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct JointState {
    /// Hip angle (rad).
    pub theta1: f64,
    /// Hip angular velocity (rad/s).
    pub omega1: f64,
    /// Knee angle (rad).
    pub theta2: f64,
    /// Knee angular velocity (rad/s).
    pub omega2: f64,
}

impl JointState {
    /// Hip angle of the initial pose.
    pub const INITIAL_THETA1: f64 = FRAC_PI_4;
    /// Knee angle of the initial pose.
    pub const INITIAL_THETA2: f64 = FRAC_PI_6;

    /// The fixed initial pose `{π/4, 0, π/6, 0}`.
    #[must_use]
    pub const fn initial() -> Self {
        Self {
            theta1: Self::INITIAL_THETA1,
            omega1: 0.0,
            theta2: Self::INITIAL_THETA2,
            omega2: 0.0,
        }
    }

    /// Create a state from explicit angles with both joints at rest.
    #[must_use]
    pub const fn at_rest(theta1: f64, theta2: f64) -> Self {
        Self {
            theta1,
            omega1: 0.0,
            theta2,
            omega2: 0.0,
        }
    }

    /// Put the limb back at the initial pose with zero velocities.
    pub const fn reset(&mut self) {
        *self = Self::initial();
    }

    /// `false` once any component has gone NaN or infinite.
    #[must_use]
    pub const fn is_finite(&self) -> bool {
        self.theta1.is_finite()
            && self.omega1.is_finite()
            && self.theta2.is_finite()
            && self.omega2.is_finite()
    }
}

impl Default for JointState {
    fn default() -> Self {
        Self::initial()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
