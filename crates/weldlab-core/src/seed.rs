//! Deterministic seeds for the lab's random streams.
//!
//! Every subsystem that draws random numbers gets its own stream derived
//! from the single config seed, so adding draws in one subsystem never
//! shifts another.

use std::hash::{DefaultHasher, Hash, Hasher};

use bevy::prelude::Resource;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Derive a child seed from a parent seed and a string key.
///
/// # Example
///
/// ```
/// use weldlab_core::seed::derive_seed;
///
/// let child = derive_seed(42, "spatter");
/// assert_eq!(child, derive_seed(42, "spatter"));
/// assert_ne!(child, derive_seed(42, "health"));
/// ```
#[must_use]
pub fn derive_seed(parent: u64, key: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    parent.hash(&mut hasher);
    key.hash(&mut hasher);
    hasher.finish()
}

/// Root seed plus named subsystem streams.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Resource)]
pub struct LabSeeds {
    root: u64,
}

impl LabSeeds {
    pub const SPATTER: &'static str = "spatter";

    #[must_use]
    pub const fn new(root: u64) -> Self {
        Self { root }
    }

    #[must_use]
    pub const fn root(&self) -> u64 {
        self.root
    }

    #[must_use]
    pub fn subsystem_seed(&self, subsystem: &str) -> u64 {
        derive_seed(self.root, subsystem)
    }

    /// Fresh generator for `subsystem`.
    #[must_use]
    pub fn rng(&self, subsystem: &str) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.subsystem_seed(subsystem))
    }

    /// Generator for the spatter spawner.
    #[must_use]
    pub fn spatter_rng(&self) -> ChaCha8Rng {
        self.rng(Self::SPATTER)
    }
}
