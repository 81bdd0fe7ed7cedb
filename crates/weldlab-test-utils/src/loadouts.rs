//! Stock loadouts for tests.

use weldlab_core::catalog;
use weldlab_core::loadout::{Loadout, Slot};

/// All four slots filled: Titan drive, carbon frame, arc welder, lidar.
pub fn welding_loadout() -> Loadout {
    catalog::welding_cell()
}

/// The welding loadout with `slot` left empty.
pub fn without(slot: Slot) -> Loadout {
    let mut loadout = welding_loadout();
    loadout.remove(slot);
    loadout
}
