use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use weldlab_core::loadout::{Loadout, Slot};

use crate::report::HealthReport;

/// What the overlay shows for one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "report", rename_all = "snake_case")]
pub enum HealthDisplay {
    Scanning,
    Ready(HealthReport),
}

impl HealthDisplay {
    pub const fn is_scanning(&self) -> bool {
        matches!(self, Self::Scanning)
    }

    pub const fn report(&self) -> Option<&HealthReport> {
        match self {
            Self::Scanning => None,
            Self::Ready(report) => Some(report),
        }
    }
}

/// Shared slot → display map written by analysis tasks and read by the
/// renderer. Cloning shares the same map.
#[derive(Debug, Clone, Default)]
pub struct HealthBoard {
    entries: Arc<RwLock<BTreeMap<Slot, HealthDisplay>>>,
}

impl HealthBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: Slot) -> Option<HealthDisplay> {
        self.entries.read().get(&slot).cloned()
    }

    pub fn mark_scanning(&self, slot: Slot) {
        self.entries.write().insert(slot, HealthDisplay::Scanning);
    }

    pub fn set_ready(&self, slot: Slot, report: HealthReport) {
        self.entries.write().insert(slot, HealthDisplay::Ready(report));
    }

    /// Store `report` only if `keep` holds, checked under the write lock.
    ///
    /// Returns whether the report was stored.
    pub fn set_ready_if(
        &self,
        slot: Slot,
        report: HealthReport,
        keep: impl FnOnce() -> bool,
    ) -> bool {
        let mut entries = self.entries.write();
        if !keep() {
            return false;
        }
        entries.insert(slot, HealthDisplay::Ready(report));
        true
    }

    /// Every entry, in slot order.
    pub fn snapshot(&self) -> Vec<(Slot, HealthDisplay)> {
        self.entries
            .read()
            .iter()
            .map(|(slot, display)| (*slot, display.clone()))
            .collect()
    }

    /// Entries for the slots `loadout` currently fills.
    ///
    /// Entries for emptied slots are kept on the board but not shown.
    pub fn visible(&self, loadout: &Loadout) -> Vec<(Slot, HealthDisplay)> {
        let entries = self.entries.read();
        loadout
            .installed()
            .filter_map(|(slot, _)| entries.get(&slot).map(|d| (slot, d.clone())))
            .collect()
    }

    pub fn scanning_count(&self) -> usize {
        self.entries
            .read()
            .values()
            .filter(|d| d.is_scanning())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weldlab_core::loadout::ComponentDescriptor;

    #[test]
    fn clones_share_entries() {
        let a = HealthBoard::new();
        let b = a.clone();
        a.mark_scanning(Slot::Tool);
        assert_eq!(b.get(Slot::Tool), Some(HealthDisplay::Scanning));
        b.set_ready(Slot::Tool, HealthReport::fallback());
        assert_eq!(
            a.get(Slot::Tool).and_then(|d| d.report().cloned()),
            Some(HealthReport::fallback())
        );
    }

    #[test]
    fn rejected_report_leaves_scanning() {
        let board = HealthBoard::new();
        board.mark_scanning(Slot::Actuator);
        assert!(!board.set_ready_if(Slot::Actuator, HealthReport::fallback(), || false));
        assert_eq!(board.get(Slot::Actuator), Some(HealthDisplay::Scanning));

        assert!(board.set_ready_if(Slot::Actuator, HealthReport::fallback(), || true));
        assert!(board.get(Slot::Actuator).unwrap().report().is_some());
    }

    #[test]
    fn snapshot_in_slot_order() {
        let board = HealthBoard::new();
        board.mark_scanning(Slot::Sensor);
        board.mark_scanning(Slot::Actuator);
        let slots: Vec<Slot> = board.snapshot().into_iter().map(|(s, _)| s).collect();
        assert_eq!(slots, vec![Slot::Actuator, Slot::Sensor]);
        assert_eq!(board.scanning_count(), 2);
    }

    #[test]
    fn visible_hides_emptied_slots() {
        let board = HealthBoard::new();
        board.mark_scanning(Slot::Actuator);
        board.mark_scanning(Slot::Tool);
        let mut loadout = Loadout::default();
        loadout.install(Slot::Tool, ComponentDescriptor::new("Welder", "300 A"));
        let visible = board.visible(&loadout);
        assert_eq!(visible, vec![(Slot::Tool, HealthDisplay::Scanning)]);
    }

    #[test]
    fn display_serializes_tagged() {
        let json = serde_json::to_string(&HealthDisplay::Scanning).unwrap();
        assert_eq!(json, r#"{"status":"scanning"}"#);
    }
}
