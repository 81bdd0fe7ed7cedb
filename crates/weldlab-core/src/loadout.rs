//! Installed equipment, one optional component per fixed slot.
//!
//! The lab's equipment bay has four slots.  Each slot either holds a
//! [`ComponentDescriptor`] or is empty; nothing is ever removed except by
//! an explicit [`Loadout::remove`].

use std::fmt;

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use weldlab_dynamics::params::DEFAULT_TORQUE_CAPACITY;

// ---------------------------------------------------------------------------
// Slot
// ---------------------------------------------------------------------------

/// Equipment slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Actuator,
    Chassis,
    Tool,
    Sensor,
}

impl Slot {
    /// Every slot, in iteration order.
    pub const ALL: [Self; 4] = [Self::Actuator, Self::Chassis, Self::Tool, Self::Sensor];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Actuator => "Actuator",
            Self::Chassis => "Chassis",
            Self::Tool => "Tool",
            Self::Sensor => "Sensor",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

// ---------------------------------------------------------------------------
// ComponentDescriptor
// ---------------------------------------------------------------------------

/// A piece of equipment that can be dropped into a slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentDescriptor {
    /// Display name.
    pub name: String,
    /// Free-text rating, e.g. `"360 Nm Peak"`.
    pub spec: String,
    /// Tool produces weld spatter while running.
    #[serde(default)]
    pub emits_spatter: bool,
}

impl ComponentDescriptor {
    pub fn new(name: impl Into<String>, spec: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            spec: spec.into(),
            emits_spatter: false,
        }
    }

    /// Builder: mark as a spatter-producing tool.
    #[must_use]
    pub fn with_spatter(mut self) -> Self {
        self.emits_spatter = true;
        self
    }

    /// Leading integer of the spec string, if any.
    #[must_use]
    pub fn rating(&self) -> Option<i64> {
        parse_leading_int(&self.spec)
    }
}

// ---------------------------------------------------------------------------
// Loadout
// ---------------------------------------------------------------------------

/// Installed equipment, one optional component per [`Slot`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Resource)]
pub struct Loadout {
    #[serde(default)]
    pub actuator: Option<ComponentDescriptor>,
    #[serde(default)]
    pub chassis: Option<ComponentDescriptor>,
    #[serde(default)]
    pub tool: Option<ComponentDescriptor>,
    #[serde(default)]
    pub sensor: Option<ComponentDescriptor>,
}

impl Loadout {
    #[must_use]
    pub const fn get(&self, slot: Slot) -> Option<&ComponentDescriptor> {
        match slot {
            Slot::Actuator => self.actuator.as_ref(),
            Slot::Chassis => self.chassis.as_ref(),
            Slot::Tool => self.tool.as_ref(),
            Slot::Sensor => self.sensor.as_ref(),
        }
    }

    const fn slot_mut(&mut self, slot: Slot) -> &mut Option<ComponentDescriptor> {
        match slot {
            Slot::Actuator => &mut self.actuator,
            Slot::Chassis => &mut self.chassis,
            Slot::Tool => &mut self.tool,
            Slot::Sensor => &mut self.sensor,
        }
    }

    /// Put `component` into `slot`, returning whatever was there.
    pub fn install(
        &mut self,
        slot: Slot,
        component: ComponentDescriptor,
    ) -> Option<ComponentDescriptor> {
        self.slot_mut(slot).replace(component)
    }

    /// Empty `slot`, returning its component.
    pub fn remove(&mut self, slot: Slot) -> Option<ComponentDescriptor> {
        self.slot_mut(slot).take()
    }

    /// Installed components in slot order.
    pub fn installed(&self) -> impl Iterator<Item = (Slot, &ComponentDescriptor)> {
        Slot::ALL
            .into_iter()
            .filter_map(|slot| self.get(slot).map(|c| (slot, c)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.installed().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub const fn has_chassis(&self) -> bool {
        self.chassis.is_some()
    }

    /// A tool is mounted, so the renderer shows the tool head.
    #[must_use]
    pub const fn tool_visible(&self) -> bool {
        self.tool.is_some()
    }

    /// The mounted tool produces spatter.
    #[must_use]
    pub fn emits_spatter(&self) -> bool {
        self.tool.as_ref().is_some_and(|t| t.emits_spatter)
    }

    /// Rated torque (Nm) of the installed actuator.
    ///
    /// Falls back to [`DEFAULT_TORQUE_CAPACITY`] when no actuator is
    /// installed or its spec has no leading integer.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn max_torque_capacity(&self) -> f64 {
        self.actuator
            .as_ref()
            .and_then(ComponentDescriptor::rating)
            .map(|v| v as f64)
            .filter(|v| v.is_finite())
            .unwrap_or(DEFAULT_TORQUE_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Spec string parsing
// ---------------------------------------------------------------------------

/// Parse the integer at the start of a spec string.
///
/// Skips leading whitespace, accepts one optional sign, then reads decimal
/// digits up to the first non-digit: `"360 Nm Peak"` gives `360`,
/// `"  -12kg"` gives `-12`, `"Peak 360"` gives `None`.
#[must_use]
pub fn parse_leading_int(spec: &str) -> Option<i64> {
    let s = spec.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let value: i64 = rest[..digits].parse().ok()?;
    Some(if negative { -value } else { value })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
