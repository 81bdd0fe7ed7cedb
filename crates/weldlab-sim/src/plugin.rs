//! Bevy wiring for the tick driver.

use bevy::prelude::*;
use tracing::{debug, info, warn};
use weldlab_core::config::LabConfig;
use weldlab_core::loadout::{ComponentDescriptor, Loadout, Slot};
use weldlab_core::time::SimTime;
use weldlab_core::types::{ActiveView, LabControls, RunState};
use weldlab_core::{LabSet, WeldLabCorePlugin};

use crate::driver::{RenderSnapshot, TickContext, TickDriver};
use crate::stats::{LabStats, lab_stats_system};

// ---------------------------------------------------------------------------
// Resources and events
// ---------------------------------------------------------------------------

/// The lab's [`TickDriver`] as a Bevy resource.
#[derive(Resource, Debug, Clone, Deref, DerefMut)]
pub struct LabDriver(pub TickDriver);

/// Operator input.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub enum LabCommand {
    Start,
    Pause,
    EmergencyStop,
    Release,
    /// Restore the initial pose and empty the spatter pool.
    Reset,
    Install(Slot, ComponentDescriptor),
    Remove(Slot),
    SetView(ActiveView),
}

// ---------------------------------------------------------------------------
// WeldLabSimPlugin
// ---------------------------------------------------------------------------

/// Meta-plugin for the full lab.
///
/// Includes:
/// - [`WeldLabCorePlugin`]: config, shared state and [`LabSet`] ordering
/// - [`LabDriver`] built from [`LabConfig`]
/// - [`LabCommand`] handling in [`LabSet::Command`]
/// - one driver tick per update in [`LabSet::Tick`]
/// - [`RenderSnapshot`], [`SimTime`] and [`LabStats`] in [`LabSet::Publish`]
pub struct WeldLabSimPlugin;

impl Plugin for WeldLabSimPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(WeldLabCorePlugin);
        let config = app.world().resource::<LabConfig>().clone();

        app.insert_resource(LabDriver(TickDriver::from_config(&config)))
            .init_resource::<RenderSnapshot>()
            .init_resource::<LabStats>()
            .add_event::<LabCommand>()
            .add_systems(Update, apply_lab_commands.in_set(LabSet::Command))
            .add_systems(Update, lab_tick_system.in_set(LabSet::Tick))
            .add_systems(
                Update,
                (publish_snapshot_system, lab_stats_system).in_set(LabSet::Publish),
            );
    }
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

/// Applies queued [`LabCommand`]s in arrival order.
#[allow(clippy::needless_pass_by_value)]
pub fn apply_lab_commands(
    mut events: EventReader<LabCommand>,
    mut run: ResMut<RunState>,
    mut loadout: ResMut<Loadout>,
    mut view: ResMut<ActiveView>,
    mut driver: ResMut<LabDriver>,
    mut stats: ResMut<LabStats>,
) {
    for command in events.read() {
        match command {
            LabCommand::Start => run.start(),
            LabCommand::Pause => run.pause(),
            LabCommand::EmergencyStop => {
                if !run.emergency_stopped {
                    warn!("emergency stop latched");
                    stats.emergency_stops += 1;
                }
                run.emergency_stop();
            }
            LabCommand::Release => {
                if run.emergency_stopped {
                    info!("emergency stop released");
                }
                run.release();
            }
            LabCommand::Reset => {
                let dropped = driver.reset();
                stats.resets += 1;
                debug!(dropped, "lab reset");
            }
            LabCommand::Install(slot, component) => {
                info!(%slot, component = %component.name, "installed");
                loadout.install(*slot, component.clone());
            }
            LabCommand::Remove(slot) => {
                if let Some(component) = loadout.remove(*slot) {
                    info!(%slot, component = %component.name, "removed");
                }
            }
            LabCommand::SetView(next) => *view = *next,
        }
    }
}

/// Runs one driver tick.
#[allow(clippy::needless_pass_by_value)]
pub fn lab_tick_system(
    controls: Res<LabControls>,
    loadout: Res<Loadout>,
    run: Res<RunState>,
    view: Res<ActiveView>,
    mut driver: ResMut<LabDriver>,
) {
    let ctx = TickContext {
        controls: &controls,
        loadout: &loadout,
        run: *run,
        view: *view,
    };
    driver.tick(&ctx);
}

/// Copies the driver's state into the renderer-facing resources.
#[allow(clippy::needless_pass_by_value)]
pub fn publish_snapshot_system(
    driver: Res<LabDriver>,
    loadout: Res<Loadout>,
    mut snapshot: ResMut<RenderSnapshot>,
    mut time: ResMut<SimTime>,
) {
    *snapshot = driver.snapshot(&loadout);
    *time = driver.time();
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn lab_app() -> App {
        let mut app = App::new();
        app.add_plugins(WeldLabSimPlugin);
        app.finish();
        app.cleanup();
        app
    }

    #[test]
    fn plugin_builds_without_panic() {
        let mut app = lab_app();
        app.update();

        let world = app.world();
        assert!(world.contains_resource::<LabDriver>());
        assert!(world.contains_resource::<RenderSnapshot>());
        assert!(world.contains_resource::<LabStats>());
        assert!(world.contains_resource::<RunState>());
        assert_eq!(world.resource::<SimTime>().ticks(), 1);
    }

    #[test]
    fn driver_follows_config() {
        let mut app = App::new();
        app.insert_resource(LabConfig {
            pool_capacity: 32,
            tick_dt: 0.01,
            ..LabConfig::default()
        });
        app.add_plugins(WeldLabSimPlugin);
        let driver = app.world().resource::<LabDriver>();
        assert_eq!(driver.pool().capacity(), 32);
        assert!((driver.dt() - 0.01).abs() < f64::EPSILON);
    }

    #[test]
    fn commands_drive_run_state() {
        let mut app = lab_app();
        app.world_mut().send_event(LabCommand::Start);
        app.update();
        assert!(app.world().resource::<RunState>().is_advancing());

        app.world_mut().send_event(LabCommand::EmergencyStop);
        app.world_mut().send_event(LabCommand::EmergencyStop);
        app.update();
        assert!(!app.world().resource::<RunState>().is_advancing());
        assert_eq!(app.world().resource::<LabStats>().emergency_stops, 1);

        app.world_mut().send_event(LabCommand::Release);
        app.update();
        assert!(app.world().resource::<RunState>().is_advancing());

        app.world_mut().send_event(LabCommand::Pause);
        app.update();
        assert!(!app.world().resource::<RunState>().running);
    }

    #[test]
    fn install_and_remove_commands_edit_loadout() {
        let mut app = lab_app();
        app.world_mut().send_event(LabCommand::Install(
            Slot::Tool,
            weldlab_core::catalog::tools::arc_welder(),
        ));
        app.update();
        assert!(app.world().resource::<Loadout>().emits_spatter());
        assert!(app.world().resource::<RenderSnapshot>().tool_visible);

        app.world_mut().send_event(LabCommand::Remove(Slot::Tool));
        app.update();
        assert!(app.world().resource::<Loadout>().is_empty());
        assert!(!app.world().resource::<RenderSnapshot>().tool_visible);
    }

    #[test]
    fn set_view_command() {
        let mut app = lab_app();
        app.world_mut()
            .send_event(LabCommand::SetView(ActiveView::Textbook));
        app.update();
        assert_eq!(*app.world().resource::<ActiveView>(), ActiveView::Textbook);
    }
}
