//! Worn equipment snapshot.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tickstate_core::Item;

/// Number of equipment slots.
pub const EQUIPMENT_SIZE: usize = 14;

/// Slot indices.
#[allow(missing_docs)]
pub mod slots {
    pub const HEAD: usize = 0;
    pub const CAPE: usize = 1;
    pub const AMULET: usize = 2;
    pub const WEAPON: usize = 3;
    pub const BODY: usize = 4;
    pub const SHIELD: usize = 5;
    pub const LEGS: usize = 7;
    pub const GLOVES: usize = 9;
    pub const BOOTS: usize = 10;
    pub const RING: usize = 12;
    pub const AMMO: usize = 13;
}

/// Worn items keyed by slot index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentState {
    equipped: BTreeMap<usize, Item>,
    observed: bool,
}

impl EquipmentState {
    /// Nothing worn. Returned before login.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            equipped: BTreeMap::new(),
            observed: true,
        }
    }

    /// The container has not loaded yet. Always stale.
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            equipped: BTreeMap::new(),
            observed: false,
        }
    }

    /// Build from raw container slots, skipping placeholders.
    #[must_use]
    pub fn from_items(items: &[Item]) -> Self {
        let equipped = items
            .iter()
            .take(EQUIPMENT_SIZE)
            .enumerate()
            .filter(|(_, item)| !item.is_empty())
            .map(|(slot, item)| (slot, *item))
            .collect();
        Self {
            equipped,
            observed: true,
        }
    }

    /// Whether this is the never-observed sentinel.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        !self.observed
    }

    /// Item in a slot.
    #[must_use]
    pub fn equipped(&self, slot: usize) -> Option<Item> {
        self.equipped.get(&slot).copied()
    }

    /// Whether a slot is occupied.
    #[must_use]
    pub fn has_equipped_slot(&self, slot: usize) -> bool {
        self.equipped.contains_key(&slot)
    }

    /// Whether the item is worn in any slot.
    #[must_use]
    pub fn has_equipped(&self, item_id: i32) -> bool {
        self.equipped.values().any(|item| item.id == item_id)
    }

    /// Whether any of the items is worn.
    #[must_use]
    pub fn has_any_equipped(&self, item_ids: &[i32]) -> bool {
        item_ids.iter().any(|id| self.has_equipped(*id))
    }

    /// Whether all of the items are worn.
    #[must_use]
    pub fn has_all_equipped(&self, item_ids: &[i32]) -> bool {
        item_ids.iter().all(|id| self.has_equipped(*id))
    }

    /// Slot the item is worn in.
    #[must_use]
    pub fn slot_of(&self, item_id: i32) -> Option<usize> {
        self.equipped
            .iter()
            .find(|(_, item)| item.id == item_id)
            .map(|(slot, _)| *slot)
    }

    /// Ids of everything worn.
    #[must_use]
    pub fn equipped_ids(&self) -> BTreeSet<i32> {
        self.equipped.values().map(|item| item.id).collect()
    }

    /// Wielded weapon id.
    #[must_use]
    pub fn weapon_id(&self) -> Option<i32> {
        self.equipped(slots::WEAPON).map(|item| item.id)
    }

    /// Ammunition id.
    #[must_use]
    pub fn ammo_id(&self) -> Option<i32> {
        self.equipped(slots::AMMO).map(|item| item.id)
    }

    /// Ammunition stack size, 0 without ammo.
    #[must_use]
    pub fn ammo_count(&self) -> i32 {
        self.equipped(slots::AMMO).map_or(0, |item| item.quantity)
    }

    /// Whether every expected id is worn (extras allowed).
    #[must_use]
    pub fn matches_gear_set(&self, expected: &BTreeSet<i32>) -> bool {
        expected.is_subset(&self.equipped_ids())
    }

    /// Whether exactly the expected ids are worn.
    #[must_use]
    pub fn exactly_matches_gear_set(&self, expected: &BTreeSet<i32>) -> bool {
        &self.equipped_ids() == expected
    }

    /// Expected ids that are not worn.
    #[must_use]
    pub fn missing_from_gear_set(&self, expected: &BTreeSet<i32>) -> BTreeSet<i32> {
        expected.difference(&self.equipped_ids()).copied().collect()
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.equipped.len()
    }

    /// Nothing worn.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.equipped.is_empty()
    }
}

impl Default for EquipmentState {
    fn default() -> Self {
        Self::empty()
    }
}
