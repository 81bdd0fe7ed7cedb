//! Bevy wiring for the health overlay.

use std::sync::Arc;

use bevy::prelude::*;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use weldlab_core::LabSet;
use weldlab_core::config::LabConfig;
use weldlab_core::loadout::Loadout;
use weldlab_core::types::{LabControls, RunState};
use weldlab_sim::LabDriver;

use crate::analyzer::HealthAnalyzer;
use crate::board::HealthBoard;
use crate::overlay::{BatchSummary, HealthOverlay};
use crate::telemetry::LabTelemetry;

// ---------------------------------------------------------------------------
// LabHealth
// ---------------------------------------------------------------------------

/// The lab's [`HealthOverlay`] plus the batches it has started.
#[derive(Resource)]
pub struct LabHealth {
    overlay: HealthOverlay,
    pending: Vec<JoinHandle<BatchSummary>>,
}

impl LabHealth {
    pub const fn new(overlay: HealthOverlay) -> Self {
        Self {
            overlay,
            pending: Vec::new(),
        }
    }

    pub const fn overlay(&self) -> &HealthOverlay {
        &self.overlay
    }

    pub fn board(&self) -> HealthBoard {
        self.overlay.board()
    }

    /// Start a batch if the installed set changed while running.
    ///
    /// Returns whether a batch was started.
    pub fn sync(&mut self, loadout: &Loadout, telemetry: &LabTelemetry, running: bool) -> bool {
        self.pending.retain(|batch| !batch.is_finished());
        match self.overlay.sync(loadout, telemetry, running) {
            Some(batch) => {
                self.pending.push(batch);
                true
            }
            None => false,
        }
    }

    /// Start a batch for the current set even if it was already scanned.
    pub fn rescan(&mut self, loadout: &Loadout, telemetry: &LabTelemetry, running: bool) -> bool {
        self.overlay.invalidate();
        self.sync(loadout, telemetry, running)
    }

    /// Batches started and not yet collected, oldest first.
    pub fn take_pending(&mut self) -> Vec<JoinHandle<BatchSummary>> {
        std::mem::take(&mut self.pending)
    }
}

// ---------------------------------------------------------------------------
// HealthOverlayPlugin
// ---------------------------------------------------------------------------

/// Rescans installed equipment whenever the loadout or run state changes.
///
/// Add after [`weldlab_sim::WeldLabSimPlugin`]. The stale-batch policy is
/// read from [`LabConfig`]; batches run on `runtime`, never on the frame.
pub struct HealthOverlayPlugin {
    analyzer: Arc<dyn HealthAnalyzer>,
    runtime: Handle,
}

impl HealthOverlayPlugin {
    pub fn new(analyzer: Arc<dyn HealthAnalyzer>, runtime: Handle) -> Self {
        Self { analyzer, runtime }
    }
}

impl Plugin for HealthOverlayPlugin {
    fn build(&self, app: &mut App) {
        let policy = app
            .world()
            .get_resource::<LabConfig>()
            .map(|config| config.health.stale_policy)
            .unwrap_or_default();
        let overlay = HealthOverlay::new(Arc::clone(&self.analyzer), self.runtime.clone())
            .with_policy(policy);

        app.insert_resource(LabHealth::new(overlay))
            .add_systems(Update, health_sync_system.in_set(LabSet::Publish));
    }
}

/// Hands the current loadout and telemetry to the overlay when either the
/// loadout or the run state changed this frame.
#[allow(clippy::needless_pass_by_value)]
pub fn health_sync_system(
    loadout: Res<Loadout>,
    run: Res<RunState>,
    controls: Res<LabControls>,
    driver: Res<LabDriver>,
    mut health: ResMut<LabHealth>,
) {
    if !(loadout.is_changed() || run.is_changed()) {
        return;
    }
    let telemetry = LabTelemetry::sample(&driver, &controls);
    health.sync(&loadout, &telemetry, run.is_advancing());
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
