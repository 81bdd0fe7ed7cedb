//! Tick driver and Bevy plugin for the weldlab simulation lab.
//!
//! [`TickDriver`] is the engine-free composition of the joint integrator and
//! the spatter pool; [`WeldLabSimPlugin`] runs it once per `App::update`
//! and feeds it [`LabCommand`]s.
//!
//! # Example
//!
//! ```no_run
//! use bevy::prelude::*;
//! use weldlab_sim::WeldLabSimPlugin;
//!
//! App::new()
//!     .add_plugins(WeldLabSimPlugin)
//!     .run();
//! ```

pub mod driver;
pub mod plugin;
pub mod stats;

#[cfg(test)]
mod headless;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use driver::{RenderSnapshot, TickContext, TickDriver, TickReport};
pub use plugin::{LabCommand, LabDriver, WeldLabSimPlugin};
pub use stats::LabStats;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod prelude {
    pub use crate::{
        LabCommand, LabDriver, LabStats, RenderSnapshot, TickContext, TickDriver, TickReport,
        WeldLabSimPlugin,
    };
    pub use weldlab_core::prelude::*;
}
