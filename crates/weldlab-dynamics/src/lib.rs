//! Framework-agnostic joint dynamics for the weldlab simulation lab.
//!
//! Pure Rust library with no game engine dependencies.  Advances a
//! two-segment linkage (hip + knee analogue) with an explicit Euler
//! damped-pendulum model: only the first joint is driven by the motor, the
//! second swings passively under gravity and the shared damping.
//!
//! # Tick Pipeline
//!
//! ```text
//! Controls + Loadout → SimulationParameters → step(state, params, dt) → JointState
//!                      (torque capacity,       (hip: torque + gravity,
//!                       chassis factor)         knee: gravity only)
//! ```
//!
//! # Quick Start
//!
//! ```
//! use weldlab_dynamics::prelude::*;
//!
//! let params = SimulationParameters::default().with_torque_command(50.0);
//! let mut state = JointState::initial();
//! for _ in 0..60 {
//!     state = step(state, &params, DEFAULT_DT);
//! }
//! assert!(state.is_finite());
//! ```

pub mod integrator;
pub mod params;
pub mod state;

pub use integrator::{DEFAULT_DT, applied_torque, damping, gated_step, step};
pub use params::SimulationParameters;
pub use state::JointState;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::integrator::{DEFAULT_DT, applied_torque, damping, gated_step, step};
    pub use crate::params::{
        CHASSIS_DAMPING_FACTOR, DEFAULT_TORQUE_CAPACITY, SimulationParameters,
    };
    pub use crate::state::JointState;
}
