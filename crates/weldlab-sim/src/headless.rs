//! Whole-lab scenarios driven through `App::update`.

use std::f64::consts::{FRAC_PI_4, FRAC_PI_6};

use approx::assert_relative_eq;
use bevy::prelude::*;
use weldlab_core::catalog;
use weldlab_core::config::LabConfig;
use weldlab_core::loadout::{ComponentDescriptor, Slot};
use weldlab_core::types::LabControls;
use weldlab_dynamics::JointState;

use crate::{LabCommand, LabDriver, LabStats, RenderSnapshot, WeldLabSimPlugin};

fn lab(seed: u64) -> App {
    let mut app = App::new();
    app.insert_resource(LabConfig {
        seed,
        ..LabConfig::default()
    });
    app.add_plugins(WeldLabSimPlugin);
    app.finish();
    app.cleanup();
    app
}

fn send(app: &mut App, command: LabCommand) {
    app.world_mut().send_event(command);
}

fn run(app: &mut App, updates: usize) {
    for _ in 0..updates {
        app.update();
    }
}

fn joints(app: &App) -> JointState {
    app.world().resource::<LabDriver>().joints()
}

fn welding_lab(seed: u64) -> App {
    let mut app = lab(seed);
    for (slot, component) in catalog::welding_cell().installed() {
        send(&mut app, LabCommand::Install(slot, component.clone()));
    }
    app.world_mut()
        .resource_mut::<LabControls>()
        .spatter
        .density = 1.0;
    app
}

#[test]
fn titan_drive_first_tick_falls_under_gravity() {
    let mut app = lab(0);
    send(
        &mut app,
        LabCommand::Install(Slot::Actuator, ComponentDescriptor::new("Titan", "360 Nm Peak")),
    );
    send(&mut app, LabCommand::Start);
    app.update();

    let dt = 0.016;
    let omega1 = dt * (-9.8 * FRAC_PI_4.sin());
    let j = joints(&app);
    assert_relative_eq!(j.omega1, omega1, epsilon = 1e-12);
    assert_relative_eq!(j.theta1, FRAC_PI_4 + dt * omega1, epsilon = 1e-12);
    assert!(j.theta1 < FRAC_PI_4);
    assert!(j.omega1 < 0.0);

    let snapshot = app.world().resource::<RenderSnapshot>();
    assert_relative_eq!(snapshot.theta1, j.theta1);
    assert!(!snapshot.tool_visible);
}

#[test]
fn paused_lab_never_moves() {
    let mut app = welding_lab(1);
    run(&mut app, 50);
    assert_eq!(joints(&app), JointState::initial());
    assert_eq!(app.world().resource::<RenderSnapshot>().active_particles, 0);
}

#[test]
fn emergency_stop_freezes_joints_and_clears_spatter() {
    let mut app = welding_lab(3);
    send(&mut app, LabCommand::Start);
    run(&mut app, 20);
    assert!(app.world().resource::<RenderSnapshot>().active_particles > 0);

    send(&mut app, LabCommand::EmergencyStop);
    app.update();
    let frozen = joints(&app);
    assert_eq!(app.world().resource::<RenderSnapshot>().active_particles, 0);

    run(&mut app, 25);
    assert_eq!(joints(&app), frozen);
    let driver = app.world().resource::<LabDriver>();
    assert!(driver.pool().particles().iter().all(|p| p.life == 0.0));
}

#[test]
fn reset_restores_initial_pose_exactly() {
    let mut app = welding_lab(4);
    send(&mut app, LabCommand::Start);
    run(&mut app, 40);
    assert_ne!(joints(&app), JointState::initial());

    send(&mut app, LabCommand::Pause);
    send(&mut app, LabCommand::Reset);
    app.update();

    let j = joints(&app);
    assert_eq!(j.theta1.to_bits(), FRAC_PI_4.to_bits());
    assert_eq!(j.theta2.to_bits(), FRAC_PI_6.to_bits());
    assert_eq!(j.omega1.to_bits(), 0.0f64.to_bits());
    assert_eq!(j.omega2.to_bits(), 0.0f64.to_bits());
    assert_eq!(app.world().resource::<RenderSnapshot>().active_particles, 0);
    assert_eq!(app.world().resource::<LabStats>().resets, 1);
}

#[test]
fn particle_count_stays_within_capacity() {
    let mut app = welding_lab(5);
    app.world_mut()
        .resource_mut::<LabControls>()
        .spatter
        .life = 5.0;
    send(&mut app, LabCommand::Start);
    for _ in 0..400 {
        app.update();
        assert!(app.world().resource::<RenderSnapshot>().active_particles <= 800);
    }
    assert!(app.world().resource::<LabStats>().peak_active <= 800);
}

#[test]
fn spatter_runs_outside_lab_view() {
    let mut app = welding_lab(6);
    send(&mut app, LabCommand::SetView(weldlab_core::types::ActiveView::Visualizer));
    send(&mut app, LabCommand::Start);
    run(&mut app, 10);
    assert_eq!(joints(&app), JointState::initial());
    assert!(app.world().resource::<LabStats>().particles_spawned > 0);
}

#[test]
fn stats_track_ticks() {
    let mut app = lab(7);
    run(&mut app, 3);
    send(&mut app, LabCommand::Start);
    run(&mut app, 5);

    let stats = app.world().resource::<LabStats>();
    assert_eq!(stats.ticks, 8);
    assert_eq!(stats.joint_ticks, 5);
    assert_eq!(stats.particles_spawned, 0);
}

#[test]
fn same_seed_same_run() {
    let mut a = welding_lab(42);
    let mut b = welding_lab(42);
    for app in [&mut a, &mut b] {
        send(app, LabCommand::Start);
        run(app, 120);
    }
    assert_eq!(
        a.world().resource::<RenderSnapshot>(),
        b.world().resource::<RenderSnapshot>()
    );
    assert_eq!(
        a.world().resource::<LabStats>(),
        b.world().resource::<LabStats>()
    );
}
