use serde::{Deserialize, Serialize};
use weldlab_core::loadout::{ComponentDescriptor, Slot};
use weldlab_core::types::LabControls;
use weldlab_sim::TickDriver;

/// Live readings folded into every analysis request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LabTelemetry {
    pub theta1: f64,
    pub omega1: f64,
    pub theta2: f64,
    pub omega2: f64,
    /// Hip command, percent.
    pub torque_command: f64,
    pub gravity: f64,
    pub friction: f64,
    pub active_particles: usize,
}

impl LabTelemetry {
    /// Current readings from `driver` under the clamped `controls`.
    pub fn sample(driver: &TickDriver, controls: &LabControls) -> Self {
        let joints = driver.joints();
        let controls = controls.clamped();
        Self {
            theta1: joints.theta1,
            omega1: joints.omega1,
            theta2: joints.theta2,
            omega2: joints.omega2,
            torque_command: controls.torque_command,
            gravity: controls.gravity,
            friction: controls.friction,
            active_particles: driver.pool().active_count(),
        }
    }
}

/// Text sent to the analyzer for one installed component.
pub fn telemetry_description(
    slot: Slot,
    component: &ComponentDescriptor,
    telemetry: &LabTelemetry,
) -> String {
    let mut text = format!(
        "{slot} component \"{}\" rated {}. \
         Hip angle {:.3} rad at {:.3} rad/s, knee angle {:.3} rad at {:.3} rad/s. \
         Torque command {:.1}%, gravity {:.2} m/s^2, friction {:.2}.",
        component.name,
        component.spec,
        telemetry.theta1,
        telemetry.omega1,
        telemetry.theta2,
        telemetry.omega2,
        telemetry.torque_command,
        telemetry.gravity,
        telemetry.friction,
    );
    if component.emits_spatter {
        text.push_str(&format!(
            " Weld spatter particles in flight: {}.",
            telemetry.active_particles
        ));
    }
    text
}
