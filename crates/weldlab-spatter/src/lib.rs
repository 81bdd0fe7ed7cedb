//! Weld spatter particle lifecycle for the weldlab simulation lab.
//!
//! A [`SpatterPool`] is a fixed-capacity buffer of short-lived point
//! sprites emitted at the tool tip.  Each tick every slot is either
//! spawned, advanced, or retired; nothing is ever allocated after
//! construction.
//!
//! ```
//! use rand::SeedableRng;
//! use weldlab_spatter::prelude::*;
//!
//! let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(7);
//! let mut pool = SpatterPool::new(DEFAULT_CAPACITY);
//! let settings = SpatterSettings::default();
//!
//! let report = pool.step(&settings, true, &mut rng);
//! assert!(report.spawned <= report.attempts);
//! assert_eq!(pool.active_count(), report.active);
//! ```

pub mod particle;
pub mod pool;
pub mod settings;
pub mod uniforms;

pub use particle::Particle;
pub use pool::{DEFAULT_CAPACITY, SpatterPool, SpatterStepReport};
pub use settings::SpatterSettings;
pub use uniforms::{SpatterUniforms, parse_hex_color};

/// Re-exported so downstream crates agree on the vector type.
pub use glam::Vec3;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::particle::Particle;
    pub use crate::pool::{DEFAULT_CAPACITY, SpatterPool, SpatterStepReport};
    pub use crate::settings::SpatterSettings;
    pub use crate::uniforms::{SpatterUniforms, parse_hex_color};
    pub use glam::Vec3;
}
