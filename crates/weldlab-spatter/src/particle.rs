//! A single spatter particle slot.

use glam::Vec3;

/// One slot of the spatter pool.
///
/// `life` runs from `1.0` at spawn down to `0.0`; a slot with
/// `life <= 0` is free.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Particle {
    /// Position in tool-tip local space.
    pub position: Vec3,
    /// Displacement per tick.
    pub velocity: Vec3,
    /// Remaining life in `[0, 1]`.
    pub life: f32,
}

impl Particle {
    /// `true` while the slot holds a live particle.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.life > 0.0
    }

    /// Free the slot.
    pub const fn retire(&mut self) {
        self.life = 0.0;
    }
}
