//! Renderer-facing values derived from [`SpatterSettings`] every tick.

use serde::{Deserialize, Serialize};

use crate::settings::SpatterSettings;

/// Color used when the configured hex string cannot be parsed (`#ffaa33`).
pub const FALLBACK_COLOR: [f32; 3] = [1.0, 170.0 / 255.0, 51.0 / 255.0];

/// Shader inputs for the spatter point sprites.
///
/// Refreshed on every tick so a renderer never sees settings from a
/// previous frame mid-burst.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpatterUniforms {
    /// Point-sprite size scale.
    pub point_size: f32,
    /// Seconds of simulated time, for flicker animation.
    pub time: f32,
    /// Linear RGB base color in `[0, 1]`.
    pub color: [f32; 3],
}

impl Default for SpatterUniforms {
    fn default() -> Self {
        Self::from_settings(&SpatterSettings::default(), 0.0)
    }
}

impl SpatterUniforms {
    /// Build uniforms from settings at simulated time `time`.
    #[must_use]
    pub fn from_settings(settings: &SpatterSettings, time: f32) -> Self {
        let settings = settings.clamped();
        Self {
            point_size: settings.size,
            time,
            color: parse_hex_color(&settings.color).unwrap_or(FALLBACK_COLOR),
        }
    }

    /// Overwrite every field from the current settings.
    pub fn refresh(&mut self, settings: &SpatterSettings, time: f32) {
        *self = Self::from_settings(settings, time);
    }
}

/// Parse `#rgb` or `#rrggbb` (leading `#` optional) into RGB in `[0, 1]`.
#[must_use]
pub fn parse_hex_color(hex: &str) -> Option<[f32; 3]> {
    let digits = hex.trim().trim_start_matches('#');
    if !digits.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(|v| f32::from(v) / 255.0);
    match digits.len() {
        6 => Some([
            channel(&digits[0..2])?,
            channel(&digits[2..4])?,
            channel(&digits[4..6])?,
        ]),
        3 => {
            let mut rgb = [0.0; 3];
            for (i, c) in digits.chars().enumerate() {
                rgb[i] = channel(&format!("{c}{c}"))?;
            }
            Some(rgb)
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
