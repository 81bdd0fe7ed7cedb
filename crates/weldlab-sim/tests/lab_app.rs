//! Lab app behavior through the shared test fixtures.

use weldlab_core::config::LabConfig;
use weldlab_core::loadout::Slot;
use weldlab_core::types::LabControls;
use weldlab_dynamics::JointState;
use weldlab_sim::{LabCommand, LabDriver, LabStats, RenderSnapshot};
use weldlab_test_utils::{lab_test_app, send, step_n, welding_loadout};

fn install_all(app: &mut bevy::prelude::App) {
    for (slot, component) in welding_loadout().installed() {
        send(app, LabCommand::Install(slot, component.clone()));
    }
}

#[test]
fn removing_the_welder_stops_spatter_within_one_tick() {
    let mut app = lab_test_app(LabConfig::default());
    install_all(&mut app);
    send(&mut app, LabCommand::Start);
    step_n(&mut app, 15);
    assert!(app.world().resource::<RenderSnapshot>().active_particles > 0);

    send(&mut app, LabCommand::Remove(Slot::Tool));
    app.update();
    let snapshot = app.world().resource::<RenderSnapshot>();
    assert_eq!(snapshot.active_particles, 0);
    assert!(!snapshot.tool_visible);
}

#[test]
fn small_pool_saturates_at_capacity() {
    let mut app = lab_test_app(LabConfig {
        pool_capacity: 16,
        ..LabConfig::default()
    });
    {
        let mut controls = app.world_mut().resource_mut::<LabControls>();
        controls.spatter.density = 1.0;
        controls.spatter.life = 5.0;
    }
    install_all(&mut app);
    send(&mut app, LabCommand::Start);
    for _ in 0..200 {
        app.update();
        assert!(app.world().resource::<RenderSnapshot>().active_particles <= 16);
    }
    assert!(app.world().resource::<LabStats>().peak_active <= 16);
}

#[test]
fn gripper_never_spatters() {
    let mut app = lab_test_app(LabConfig::default());
    send(
        &mut app,
        LabCommand::Install(Slot::Tool, weldlab_core::catalog::tools::soft_gripper()),
    );
    send(&mut app, LabCommand::Start);
    step_n(&mut app, 50);
    let stats = app.world().resource::<LabStats>();
    assert_eq!(stats.particles_spawned, 0);
    assert!(app.world().resource::<RenderSnapshot>().tool_visible);
}

#[test]
fn constant_torque_lifts_the_hip() {
    let mut app = lab_test_app(LabConfig::default());
    install_all(&mut app);
    app.world_mut()
        .resource_mut::<LabControls>()
        .torque_command = 100.0;
    send(&mut app, LabCommand::Start);
    step_n(&mut app, 30);
    let j = app.world().resource::<LabDriver>().joints();
    assert!(j.theta1 > JointState::initial().theta1);
}
