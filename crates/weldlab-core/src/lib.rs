//! Shared types, configuration, time and errors for the weldlab simulation
//! lab.
//!
//! [`WeldLabCorePlugin`] installs the lab-wide resources and orders the
//! per-frame work into [`LabSet`]s:
//!
//! ```text
//! Command → Tick → Publish
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod loadout;
pub mod seed;
pub mod time;
pub mod types;

use bevy::prelude::*;

use config::LabConfig;
use loadout::Loadout;
use seed::LabSeeds;
use time::SimTime;
use types::{ActiveView, LabControls, RunState};

// ---------------------------------------------------------------------------
// LabSet
// ---------------------------------------------------------------------------

/// Per-frame ordering of lab systems in `Update`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabSet {
    /// Apply operator commands (start, stop, loadout edits).
    Command,
    /// Advance the simulation one tick.
    Tick,
    /// Publish snapshots and bookkeeping.
    Publish,
}

// ---------------------------------------------------------------------------
// WeldLabCorePlugin
// ---------------------------------------------------------------------------

/// Installs [`LabConfig`] (unless already present) and the resources seeded
/// from it, and chains the [`LabSet`]s.
pub struct WeldLabCorePlugin;

impl Plugin for WeldLabCorePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LabConfig>();
        let config = app.world().resource::<LabConfig>().clone();

        if !app.world().contains_resource::<LabControls>() {
            app.insert_resource(config.controls.clone());
        }

        app.insert_resource(LabSeeds::new(config.seed))
            .init_resource::<RunState>()
            .init_resource::<ActiveView>()
            .init_resource::<Loadout>()
            .init_resource::<SimTime>()
            .configure_sets(
                Update,
                (LabSet::Command, LabSet::Tick, LabSet::Publish).chain(),
            );
    }
}

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        LabSet, WeldLabCorePlugin,
        config::{LabConfig, StaleBatchPolicy},
        error::ConfigError,
        loadout::{ComponentDescriptor, Loadout, Slot, parse_leading_int},
        seed::LabSeeds,
        time::{FrameLoop, SimTime},
        types::{ActiveView, LabControls, RunState},
    };
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
