//! Asynchronous health overlay for installed lab equipment.
//!
//! The overlay never touches the simulation: it reads the [`Loadout`] and a
//! telemetry sample, asks a [`HealthAnalyzer`] about each installed
//! component on a tokio runtime, and publishes results to a shared
//! [`HealthBoard`].  Any analysis failure shows up as the fallback record.
//!
//! [`HealthOverlayPlugin`] runs the overlay inside a Bevy lab, rescanning
//! whenever the loadout or run state changes.
//!
//! [`Loadout`]: weldlab_core::loadout::Loadout

pub mod analyzer;
pub mod board;
pub mod error;
pub mod overlay;
pub mod plugin;
pub mod report;
pub mod telemetry;

pub use analyzer::{
    DIAGNOSE_APOLOGY, FixedAnalyzer, HealthAnalyzer, OfflineAnalyzer, analyze_or_fallback,
    diagnose_or_apology,
};
pub use board::{HealthBoard, HealthDisplay};
pub use error::AnalysisError;
pub use overlay::{BatchSummary, HealthOverlay};
pub use plugin::{HealthOverlayPlugin, LabHealth, health_sync_system};
pub use report::{HealthReport, HealthState};
pub use telemetry::{LabTelemetry, telemetry_description};
pub use weldlab_core::config::StaleBatchPolicy;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
