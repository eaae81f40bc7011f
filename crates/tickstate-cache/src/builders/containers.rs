//! Inventory and equipment snapshots.

use tickstate_core::SimulationClient;
use tickstate_core::constants::containers;
use tickstate_state::{EquipmentState, InventoryState};

/// Build the inventory snapshot. Empty when logged out, unknown while the
/// container has not loaded.
pub fn build_inventory(client: &dyn SimulationClient) -> InventoryState {
    if client.local_actor().is_none() {
        return InventoryState::empty();
    }
    client
        .container(containers::INVENTORY)
        .map_or_else(InventoryState::unknown, |items| InventoryState::from_items(&items))
}

/// Build the equipment snapshot. Empty when logged out, unknown while the
/// container has not loaded.
pub fn build_equipment(client: &dyn SimulationClient) -> EquipmentState {
    if client.local_actor().is_none() {
        return EquipmentState::empty();
    }
    client
        .container(containers::EQUIPMENT)
        .map_or_else(EquipmentState::unknown, |items| EquipmentState::from_items(&items))
}
