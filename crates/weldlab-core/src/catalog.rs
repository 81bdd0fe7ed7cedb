//! Stock equipment the lab ships with.

use crate::loadout::{ComponentDescriptor, Loadout, Slot};

/// Actuators.
pub mod actuators {
    use super::ComponentDescriptor;

    /// Heavy hip drive for welding cells.
    pub fn titan_hip_drive() -> ComponentDescriptor {
        ComponentDescriptor::new("Titan Hip Drive", "360 Nm Peak")
    }

    /// Compact servo for light arms.
    pub fn servo_s90() -> ComponentDescriptor {
        ComponentDescriptor::new("Servo S-90", "90 Nm Continuous")
    }

    /// Prototype with an unrated spec; capacity falls back to the default.
    pub fn prototype_drive() -> ComponentDescriptor {
        ComponentDescriptor::new("Prototype Drive", "Heavy")
    }
}

/// Chassis frames.
pub mod chassis {
    use super::ComponentDescriptor;

    pub fn carbon_frame() -> ComponentDescriptor {
        ComponentDescriptor::new("Carbon Frame", "12 kg")
    }

    pub fn steel_gantry() -> ComponentDescriptor {
        ComponentDescriptor::new("Steel Gantry", "85 kg")
    }
}

/// End-of-arm tools.
pub mod tools {
    use super::ComponentDescriptor;

    /// MIG welder; throws spatter while running.
    pub fn arc_welder() -> ComponentDescriptor {
        ComponentDescriptor::new("Arc Welder MIG-300", "300 A").with_spatter()
    }

    pub fn plasma_cutter() -> ComponentDescriptor {
        ComponentDescriptor::new("Plasma Cutter", "45 A")
    }

    pub fn soft_gripper() -> ComponentDescriptor {
        ComponentDescriptor::new("Soft Gripper", "5 kg Payload")
    }
}

/// Sensors.
pub mod sensors {
    use super::ComponentDescriptor;

    pub fn lidar_array() -> ComponentDescriptor {
        ComponentDescriptor::new("Lidar Array", "40 m Range")
    }

    pub fn thermal_camera() -> ComponentDescriptor {
        ComponentDescriptor::new("Thermal Camera", "640 px")
    }
}

/// Every stock component with the slot it fits.
pub fn all() -> Vec<(Slot, ComponentDescriptor)> {
    vec![
        (Slot::Actuator, actuators::titan_hip_drive()),
        (Slot::Actuator, actuators::servo_s90()),
        (Slot::Actuator, actuators::prototype_drive()),
        (Slot::Chassis, chassis::carbon_frame()),
        (Slot::Chassis, chassis::steel_gantry()),
        (Slot::Tool, tools::arc_welder()),
        (Slot::Tool, tools::plasma_cutter()),
        (Slot::Tool, tools::soft_gripper()),
        (Slot::Sensor, sensors::lidar_array()),
        (Slot::Sensor, sensors::thermal_camera()),
    ]
}

/// Look up a stock component by name, ignoring ASCII case.
pub fn find(name: &str) -> Option<(Slot, ComponentDescriptor)> {
    all()
        .into_iter()
        .find(|(_, c)| c.name.eq_ignore_ascii_case(name))
}

/// The welding-cell demo rig: Titan drive, carbon frame, arc welder, lidar.
pub fn welding_cell() -> Loadout {
    let mut loadout = Loadout::default();
    loadout.install(Slot::Actuator, actuators::titan_hip_drive());
    loadout.install(Slot::Chassis, chassis::carbon_frame());
    loadout.install(Slot::Tool, tools::arc_welder());
    loadout.install(Slot::Sensor, sensors::lidar_array());
    loadout
}
