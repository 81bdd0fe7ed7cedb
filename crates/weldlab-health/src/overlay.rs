//! Triggers and runs analysis batches.
//!
//! Each batch covers every installed slot.  Slots are marked
//! [`HealthDisplay::Scanning`](crate::board::HealthDisplay) up front, then a
//! single task asks the analyzer about them one at a time in slot order and
//! writes each answer to the board as it arrives.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info};
use weldlab_core::config::StaleBatchPolicy;
use weldlab_core::loadout::{ComponentDescriptor, Loadout, Slot};

use crate::analyzer::{HealthAnalyzer, analyze_or_fallback};
use crate::board::HealthBoard;
use crate::telemetry::{LabTelemetry, telemetry_description};

/// Outcome of one finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub generation: u64,
    /// Results written to the board.
    pub applied: usize,
    /// Slots whose result was dropped or never requested because a newer
    /// batch replaced this one.
    pub dropped: usize,
}

/// Runs health batches against one analyzer.
pub struct HealthOverlay {
    analyzer: Arc<dyn HealthAnalyzer>,
    board: HealthBoard,
    policy: StaleBatchPolicy,
    generation: Arc<AtomicU64>,
    last_scanned: Option<Vec<(Slot, ComponentDescriptor)>>,
    runtime: Handle,
}

impl HealthOverlay {
    /// Overlay that spawns its batches on `runtime`.
    pub fn new(analyzer: Arc<dyn HealthAnalyzer>, runtime: Handle) -> Self {
        Self {
            analyzer,
            board: HealthBoard::new(),
            policy: StaleBatchPolicy::default(),
            generation: Arc::new(AtomicU64::new(0)),
            last_scanned: None,
            runtime,
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: StaleBatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Shared handle to the board this overlay writes.
    pub fn board(&self) -> HealthBoard {
        self.board.clone()
    }

    pub const fn policy(&self) -> StaleBatchPolicy {
        self.policy
    }

    /// Number of batches started so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Forget the last scanned set so the next running `sync` rescans.
    pub fn invalidate(&mut self) {
        self.last_scanned = None;
    }

    /// Start a batch if the lab is running and the installed set differs
    /// from the one last scanned.
    ///
    /// Returns the batch task, or `None` when nothing was started.
    pub fn sync(
        &mut self,
        loadout: &Loadout,
        telemetry: &LabTelemetry,
        running: bool,
    ) -> Option<JoinHandle<BatchSummary>> {
        if !running {
            return None;
        }
        let installed: Vec<(Slot, ComponentDescriptor)> = loadout
            .installed()
            .map(|(slot, c)| (slot, c.clone()))
            .collect();
        if self.last_scanned.as_ref() == Some(&installed) {
            return None;
        }
        self.last_scanned = Some(installed.clone());

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if installed.is_empty() {
            debug!(generation, "installed set empty, nothing to scan");
            return None;
        }

        let requests: Vec<(Slot, String)> = installed
            .iter()
            .map(|(slot, c)| (*slot, telemetry_description(*slot, c, telemetry)))
            .collect();
        for (slot, _) in &requests {
            self.board.mark_scanning(*slot);
        }
        info!(
            generation,
            slots = requests.len(),
            analyzer = self.analyzer.name(),
            "starting health batch"
        );

        let batch = Batch {
            generation,
            requests,
            analyzer: Arc::clone(&self.analyzer),
            board: self.board.clone(),
            latest: Arc::clone(&self.generation),
            policy: self.policy,
        };
        Some(self.runtime.spawn(batch.run()))
    }
}

struct Batch {
    generation: u64,
    requests: Vec<(Slot, String)>,
    analyzer: Arc<dyn HealthAnalyzer>,
    board: HealthBoard,
    latest: Arc<AtomicU64>,
    policy: StaleBatchPolicy,
}

impl Batch {
    fn superseded(&self) -> bool {
        self.policy == StaleBatchPolicy::DiscardStale
            && self.latest.load(Ordering::SeqCst) != self.generation
    }

    async fn run(self) -> BatchSummary {
        let mut summary = BatchSummary {
            generation: self.generation,
            ..BatchSummary::default()
        };
        let total = self.requests.len();

        for (slot, telemetry) in &self.requests {
            if self.superseded() {
                break;
            }
            let report = analyze_or_fallback(self.analyzer.as_ref(), telemetry).await;
            let score = report.health_score;
            // A newer batch marks its slots Scanning after bumping the
            // generation, so the check must share the board's write lock.
            if !self.board.set_ready_if(*slot, report, || !self.superseded()) {
                debug!(generation = self.generation, %slot, "dropping stale health result");
                break;
            }
            debug!(generation = self.generation, %slot, score, "health result");
            summary.applied += 1;
        }

        summary.dropped = total - summary.applied;
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::OfflineAnalyzer;

    fn offline_overlay() -> HealthOverlay {
        HealthOverlay::new(Arc::new(OfflineAnalyzer), Handle::current())
    }

    #[tokio::test]
    async fn paused_lab_starts_nothing() {
        let mut overlay = offline_overlay();
        let loadout = weldlab_core::catalog::welding_cell();
        assert!(overlay.sync(&loadout, &LabTelemetry::default(), false).is_none());
        assert_eq!(overlay.generation(), 0);
    }

    #[tokio::test]
    async fn unchanged_set_is_not_rescanned() {
        let mut overlay = offline_overlay();
        let loadout = weldlab_core::catalog::welding_cell();
        let telemetry = LabTelemetry::default();
        let handle = overlay.sync(&loadout, &telemetry, true).unwrap();
        handle.await.unwrap();
        assert!(overlay.sync(&loadout, &telemetry, true).is_none());

        overlay.invalidate();
        assert!(overlay.sync(&loadout, &telemetry, true).is_some());
        assert_eq!(overlay.generation(), 2);
    }

    #[tokio::test]
    async fn empty_loadout_starts_no_task() {
        let mut overlay = offline_overlay();
        assert!(
            overlay
                .sync(&Loadout::default(), &LabTelemetry::default(), true)
                .is_none()
        );
        assert!(overlay.board().snapshot().is_empty());
    }

    #[tokio::test]
    async fn offline_batch_fills_board_with_fallback() {
        let mut overlay = offline_overlay();
        let loadout = weldlab_core::catalog::welding_cell();
        let summary = overlay
            .sync(&loadout, &LabTelemetry::default(), true)
            .unwrap()
            .await
            .unwrap();
        assert_eq!(summary.applied, 4);
        assert_eq!(summary.dropped, 0);
        for (_, display) in overlay.board().snapshot() {
            assert!(display.report().unwrap().is_fallback());
        }
    }
}
