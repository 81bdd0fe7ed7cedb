//! Hot-swappable spatter rendering parameters.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

const fn default_density() -> f32 {
    0.5
}
const fn default_size() -> f32 {
    0.05
}
const fn default_life() -> f32 {
    1.0
}
fn default_color() -> String {
    "#ffaa33".into()
}

// ---------------------------------------------------------------------------
// SpatterSettings
// ---------------------------------------------------------------------------

/// Spatter parameters driven by the lab sliders.
///
/// Values may change between any two ticks; the pool reads them fresh each
/// step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpatterSettings {
    /// Emission density in `[0, 1]`; the per-tick spawn budget is
    /// `floor(density * 20)`.
    #[serde(default = "default_density")]
    pub density: f32,
    /// Point-sprite size scale in `[0.01, 0.15]`.
    #[serde(default = "default_size")]
    pub size: f32,
    /// Life multiplier in `[0.1, 5.0]`; larger values decay slower.
    #[serde(default = "default_life")]
    pub life: f32,
    /// Base color as a `#rrggbb` hex string.
    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for SpatterSettings {
    fn default() -> Self {
        Self {
            density: default_density(),
            size: default_size(),
            life: default_life(),
            color: default_color(),
        }
    }
}

impl SpatterSettings {
    /// Slider range for [`density`](Self::density).
    pub const DENSITY_RANGE: (f32, f32) = (0.0, 1.0);
    /// Slider range for [`size`](Self::size).
    pub const SIZE_RANGE: (f32, f32) = (0.01, 0.15);
    /// Slider range for [`life`](Self::life).
    pub const LIFE_RANGE: (f32, f32) = (0.1, 5.0);

    /// Spawn attempts allowed per tick.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn spawn_budget(&self) -> usize {
        let budget = (self.density * 20.0).floor();
        if budget.is_finite() && budget > 0.0 {
            budget as usize
        } else {
            0
        }
    }

    /// Copy with every numeric field clamped into its slider range.  NaN
    /// fields reset to their defaults.
    #[must_use]
    pub fn clamped(&self) -> Self {
        Self {
            density: clamp_or(self.density, Self::DENSITY_RANGE, default_density()),
            size: clamp_or(self.size, Self::SIZE_RANGE, default_size()),
            life: clamp_or(self.life, Self::LIFE_RANGE, default_life()),
            color: self.color.clone(),
        }
    }
}

fn clamp_or(value: f32, (low, high): (f32, f32), fallback: f32) -> f32 {
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

    #[test]
    fn defaults() {
        let s = SpatterSettings::default();
        assert!((s.density - 0.5).abs() < f32::EPSILON);
        assert!((s.size - 0.05).abs() < f32::EPSILON);
        assert!((s.life - 1.0).abs() < f32::EPSILON);
        assert_eq!(s.color, "#ffaa33");
    }

    #[test]
    fn spawn_budget_floors_density() {
        let mut s = SpatterSettings::default();
        s.density = 1.0;
        assert_eq!(s.spawn_budget(), 20);
        s.density = 0.57;
        assert_eq!(s.spawn_budget(), 11);
        s.density = 0.04;
        assert_eq!(s.spawn_budget(), 0);
        s.density = f32::NAN;
        assert_eq!(s.spawn_budget(), 0);
    }

    #[test]
    fn clamped_pins_sliders_to_range() {
        let s = SpatterSettings {
            density: 3.0,
            size: 0.0,
            life: 99.0,
            color: "#000000".into(),
        }
        .clamped();
        assert!((s.density - 1.0).abs() < f32::EPSILON);
        assert!((s.size - 0.01).abs() < f32::EPSILON);
        assert!((s.life - 5.0).abs() < f32::EPSILON);
        assert_eq!(s.color, "#000000");
    }

    #[test]
    fn clamped_replaces_nan() {
        let s = SpatterSettings {
            density: f32::NAN,
            ..SpatterSettings::default()
        }
        .clamped();
        assert!((s.density - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn toml_defaults_fill_missing_fields() {
        let s: SpatterSettings = toml::from_str("density = 0.9").unwrap();
        assert!((s.density - 0.9).abs() < f32::EPSILON);
        assert!((s.size - 0.05).abs() < f32::EPSILON);
        assert_eq!(s.color, "#ffaa33");
    }
}
