//! Shared test fixtures and utilities for weldlab crates.
//!
//! Provides Bevy test app builders, stock loadouts, a scripted analysis
//! service and deterministic RNG setup.

pub mod app;
pub mod loadouts;
pub mod mocks;
pub mod rng;

// ---------------------------------------------------------------------------
// Re-exports for convenience
// ---------------------------------------------------------------------------

pub use app::{lab_test_app, send, step_n};
pub use loadouts::{welding_loadout, without};
pub use mocks::ScriptedAnalyzer;
pub use rng::seeded_rng;
