use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use weldlab_dynamics::SimulationParameters;
use weldlab_spatter::SpatterSettings;

use crate::loadout::Loadout;

// ---------------------------------------------------------------------------
// RunState
// ---------------------------------------------------------------------------

/// Run / emergency-stop flags for the lab.
///
/// The two flags are independent: releasing an emergency stop does not
/// resume a paused lab, and starting a lab does not release a stop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Resource)]
pub struct RunState {
    /// The operator pressed start.
    pub running: bool,
    /// The emergency stop is latched.
    pub emergency_stopped: bool,
}

impl RunState {
    /// A running lab with no stop latched.
    #[must_use]
    pub const fn running() -> Self {
        Self {
            running: true,
            emergency_stopped: false,
        }
    }

    /// `true` when simulated motion may advance.
    #[must_use]
    pub const fn is_advancing(&self) -> bool {
        self.running && !self.emergency_stopped
    }

    pub const fn start(&mut self) {
        self.running = true;
    }

    pub const fn pause(&mut self) {
        self.running = false;
    }

    /// Latch the emergency stop.
    pub const fn emergency_stop(&mut self) {
        self.emergency_stopped = true;
    }

    /// Release a latched emergency stop.
    pub const fn release(&mut self) {
        self.emergency_stopped = false;
    }

    /// Human-readable label for status lines.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match (self.running, self.emergency_stopped) {
            (_, true) => "E-STOP",
            (true, false) => "Running",
            (false, false) => "Paused",
        }
    }
}

// ---------------------------------------------------------------------------
// ActiveView
// ---------------------------------------------------------------------------

/// Which page of the demo is on screen.
///
/// Only [`ActiveView::SimulationLab`] drives the joint integrator.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Resource,
)]
#[serde(rename_all = "snake_case")]
pub enum ActiveView {
    Textbook,
    Visualizer,
    #[default]
    SimulationLab,
    Diagnostics,
}

impl ActiveView {
    #[must_use]
    pub const fn is_simulation(self) -> bool {
        matches!(self, Self::SimulationLab)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Textbook => "Textbook",
            Self::Visualizer => "Visualizer",
            Self::SimulationLab => "Simulation Lab",
            Self::Diagnostics => "Diagnostics",
        }
    }
}

// ---------------------------------------------------------------------------
// LabControls
// ---------------------------------------------------------------------------

const fn default_gravity() -> f64 {
    9.8
}
const fn default_friction() -> f64 {
    0.1
}

/// User slider inputs.
///
/// Values are clamped into their slider ranges when turned into
/// [`SimulationParameters`]; nothing here is ever rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Resource)]
pub struct LabControls {
    /// Gravity (m/s^2), range `[0, 20]`.
    #[serde(default = "default_gravity")]
    pub gravity: f64,
    /// Joint friction, range `[0, 1]`.
    #[serde(default = "default_friction")]
    pub friction: f64,
    /// Hip torque command (%), range `[-200, 200]`.
    #[serde(default)]
    pub torque_command: f64,
    /// Spatter sliders.
    #[serde(default)]
    pub spatter: SpatterSettings,
}

impl Default for LabControls {
    fn default() -> Self {
        Self {
            gravity: default_gravity(),
            friction: default_friction(),
            torque_command: 0.0,
            spatter: SpatterSettings::default(),
        }
    }
}

impl LabControls {
    pub const GRAVITY_RANGE: (f64, f64) = (0.0, 20.0);
    pub const FRICTION_RANGE: (f64, f64) = (0.0, 1.0);
    pub const TORQUE_RANGE: (f64, f64) = (-200.0, 200.0);

    /// Copy with every slider clamped into range; NaN resets to the default.
    #[must_use]
    pub fn clamped(&self) -> Self {
        Self {
            gravity: clamp_or(self.gravity, Self::GRAVITY_RANGE, default_gravity()),
            friction: clamp_or(self.friction, Self::FRICTION_RANGE, default_friction()),
            torque_command: clamp_or(self.torque_command, Self::TORQUE_RANGE, 0.0),
            spatter: self.spatter.clamped(),
        }
    }

    /// Resolve integrator parameters against the installed loadout.
    #[must_use]
    pub fn parameters(&self, loadout: &Loadout) -> SimulationParameters {
        let c = self.clamped();
        SimulationParameters::default()
            .with_gravity(c.gravity)
            .with_friction(c.friction)
            .with_torque_command(c.torque_command)
            .with_torque_capacity(loadout.max_torque_capacity())
            .with_chassis(loadout.has_chassis())
    }
}

fn clamp_or(value: f64, (low, high): (f64, f64), fallback: f64) -> f64 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(low, high)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loadout::{ComponentDescriptor, Slot};

    #[test]
    fn run_state_default_is_idle() {
        let s = RunState::default();
        assert!(!s.running);
        assert!(!s.emergency_stopped);
        assert!(!s.is_advancing());
        assert_eq!(s.label(), "Paused");
    }

    #[test]
    fn emergency_stop_blocks_advancing() {
        let mut s = RunState::running();
        assert!(s.is_advancing());
        s.emergency_stop();
        assert!(!s.is_advancing());
        assert_eq!(s.label(), "E-STOP");
        s.release();
        assert!(s.is_advancing());
    }

    #[test]
    fn release_does_not_resume_paused_lab() {
        let mut s = RunState::default();
        s.emergency_stop();
        s.release();
        assert!(!s.is_advancing());
        s.start();
        assert_eq!(s.label(), "Running");
    }

    #[test]
    fn only_lab_view_is_simulation() {
        assert!(ActiveView::SimulationLab.is_simulation());
        assert!(!ActiveView::Textbook.is_simulation());
        assert!(!ActiveView::Visualizer.is_simulation());
        assert!(!ActiveView::Diagnostics.is_simulation());
        assert_eq!(ActiveView::default(), ActiveView::SimulationLab);
    }

    #[test]
    fn view_serde_snake_case() {
        let json = serde_json::to_string(&ActiveView::SimulationLab).unwrap();
        assert_eq!(json, "\"simulation_lab\"");
    }

    #[test]
    fn controls_clamp_out_of_range_sliders() {
        let c = LabControls {
            gravity: 50.0,
            friction: -1.0,
            torque_command: -999.0,
            ..LabControls::default()
        }
        .clamped();
        assert!((c.gravity - 20.0).abs() < f64::EPSILON);
        assert!(c.friction.abs() < f64::EPSILON);
        assert!((c.torque_command + 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn controls_nan_resets_to_default() {
        let c = LabControls {
            gravity: f64::NAN,
            ..LabControls::default()
        }
        .clamped();
        assert!((c.gravity - 9.8).abs() < f64::EPSILON);
    }

    #[test]
    fn parameters_pick_up_loadout() {
        let mut loadout = Loadout::default();
        loadout.install(Slot::Actuator, ComponentDescriptor::new("Titan Hip Drive", "360 Nm Peak"));
        loadout.install(Slot::Chassis, ComponentDescriptor::new("Carbon Frame", "12 kg"));

        let p = LabControls::default().parameters(&loadout);
        assert!((p.max_torque_capacity - 360.0).abs() < f64::EPSILON);
        assert!((p.chassis_factor - 0.8).abs() < f64::EPSILON);
        assert!((p.gravity - 9.8).abs() < f64::EPSILON);
    }

    #[test]
    fn parameters_default_without_actuator() {
        let p = LabControls::default().parameters(&Loadout::default());
        assert!((p.max_torque_capacity - 100.0).abs() < f64::EPSILON);
        assert!((p.chassis_factor - 1.0).abs() < f64::EPSILON);
    }
}
