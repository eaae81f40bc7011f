//! Carried inventory snapshot.

use serde::{Deserialize, Serialize};
use tickstate_core::Item;

/// Number of inventory slots.
pub const INVENTORY_SIZE: usize = 28;

/// The 28 inventory slots as of one rebuild.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryState {
    slots: Vec<Option<Item>>,
    observed: bool,
}

impl InventoryState {
    /// All slots empty. Returned before login.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            slots: vec![None; INVENTORY_SIZE],
            observed: true,
        }
    }

    /// The container has not loaded yet. Reads as empty but is always stale.
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            slots: vec![None; INVENTORY_SIZE],
            observed: false,
        }
    }

    /// Build from raw container slots. Extra slots are dropped, missing
    /// slots are empty, and placeholder ids become `None`.
    #[must_use]
    pub fn from_items(items: &[Item]) -> Self {
        let mut slots = vec![None; INVENTORY_SIZE];
        for (slot, item) in slots.iter_mut().zip(items) {
            if !item.is_empty() {
                *slot = Some(*item);
            }
        }
        Self {
            slots,
            observed: true,
        }
    }

    /// Whether this is the never-observed sentinel.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        !self.observed
    }

    /// Total quantity of an item across all slots.
    #[must_use]
    pub fn count_item(&self, item_id: i32) -> i32 {
        self.items()
            .filter(|item| item.id == item_id)
            .map(|item| item.quantity)
            .sum()
    }

    /// Whether at least one of the item is carried.
    #[must_use]
    pub fn has_item(&self, item_id: i32) -> bool {
        self.count_item(item_id) > 0
    }

    /// Whether at least `quantity` of the item is carried.
    #[must_use]
    pub fn has_item_quantity(&self, item_id: i32, quantity: i32) -> bool {
        self.count_item(item_id) >= quantity
    }

    /// Whether any of the items is carried.
    #[must_use]
    pub fn has_any_item(&self, item_ids: &[i32]) -> bool {
        item_ids.iter().any(|id| self.has_item(*id))
    }

    /// Whether all of the items are carried.
    #[must_use]
    pub fn has_all_items(&self, item_ids: &[i32]) -> bool {
        item_ids.iter().all(|id| self.has_item(*id))
    }

    /// Item in a slot, `None` for empty or out-of-range slots.
    #[must_use]
    pub fn item_in_slot(&self, slot: usize) -> Option<Item> {
        self.slots.get(slot).copied().flatten()
    }

    /// First slot holding the item.
    #[must_use]
    pub fn slot_of(&self, item_id: i32) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.is_some_and(|item| item.id == item_id))
    }

    /// Every slot holding the item.
    #[must_use]
    pub fn slots_of(&self, item_id: i32) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_some_and(|item| item.id == item_id))
            .map(|(i, _)| i)
            .collect()
    }

    /// Occupied slots in slot order.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.slots.iter().flatten()
    }

    /// Occupied slots in slot order, collected.
    #[must_use]
    pub fn non_empty_items(&self) -> Vec<Item> {
        self.items().copied().collect()
    }

    /// All slots, including empty ones.
    #[must_use]
    pub fn slots(&self) -> &[Option<Item>] {
        &self.slots
    }

    /// Number of empty slots.
    #[must_use]
    pub fn free_slots(&self) -> usize {
        self.slots.iter().filter(|s| s.is_none()).count()
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn used_slots(&self) -> usize {
        INVENTORY_SIZE - self.free_slots()
    }

    /// No free slots.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.free_slots() == 0
    }

    /// No occupied slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.free_slots() == INVENTORY_SIZE
    }

    /// Lowest empty slot.
    #[must_use]
    pub fn first_empty_slot(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }
}

impl Default for InventoryState {
    fn default() -> Self {
        Self::empty()
    }
}
