use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::LabControls;

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

const fn default_tick_dt() -> f64 {
    0.016
}
const fn default_max_steps_per_frame() -> u32 {
    10
}
const fn default_pool_capacity() -> usize {
    800
}

// ---------------------------------------------------------------------------
// StaleBatchPolicy
// ---------------------------------------------------------------------------

/// What happens to health results from a batch that a newer batch replaced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaleBatchPolicy {
    /// Every result is written as it arrives, whichever batch it came from.
    #[default]
    LastWriteWins,
    /// Results from a superseded batch are dropped.
    DiscardStale,
}

// ---------------------------------------------------------------------------
// HealthConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthConfig {
    #[serde(default)]
    pub stale_policy: StaleBatchPolicy,
}

// ---------------------------------------------------------------------------
// LabConfig
// ---------------------------------------------------------------------------

/// Top-level lab configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Resource)]
pub struct LabConfig {
    /// Fixed tick length in seconds (default: 0.016).
    #[serde(default = "default_tick_dt")]
    pub tick_dt: f64,

    /// Most ticks a single frame may run before the backlog is dropped.
    #[serde(default = "default_max_steps_per_frame")]
    pub max_steps_per_frame: u32,

    /// Spatter pool slots (default: 800).
    #[serde(default = "default_pool_capacity")]
    pub pool_capacity: usize,

    /// Master random seed.
    #[serde(default)]
    pub seed: u64,

    /// Initial slider values.
    #[serde(default)]
    pub controls: LabControls,

    #[serde(default)]
    pub health: HealthConfig,
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            tick_dt: default_tick_dt(),
            max_steps_per_frame: default_max_steps_per_frame(),
            pool_capacity: default_pool_capacity(),
            seed: 0,
            controls: LabControls::default(),
            health: HealthConfig::default(),
        }
    }
}

impl LabConfig {
    /// Validate configuration. Returns Err on invalid values.
    ///
    /// Slider values are not checked here; they are clamped when used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.tick_dt.is_finite() || self.tick_dt <= 0.0 {
            return Err(ConfigError::InvalidTickDt(self.tick_dt));
        }
        if self.pool_capacity == 0 {
            return Err(ConfigError::InvalidPoolCapacity(self.pool_capacity));
        }
        if self.max_steps_per_frame == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_steps_per_frame".into(),
                message: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Tick rate in Hz.
    pub fn tick_hz(&self) -> f64 {
        1.0 / self.tick_dt
    }

    /// Parse from a TOML string and validate.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from TOML file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
