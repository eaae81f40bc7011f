//! Invalidation families and the dirty-flag router.
//!
//! Notifications only set flags here; rebuilds happen when a consumer next
//! pulls the family. A rebuild clears its own family's flag and nothing else.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A group of state that is cached and invalidated together.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    /// Local actor.
    Actor,
    /// Carried inventory.
    Inventory,
    /// Worn equipment.
    Equipment,
    /// Nearby entities and panels.
    World,
    /// Combat picture.
    Combat,
    /// Assignment progress.
    Task,
}

impl Family {
    /// Every family, in diagnostic order.
    pub const ALL: [Family; 6] = [
        Family::Actor,
        Family::Inventory,
        Family::Equipment,
        Family::World,
        Family::Combat,
        Family::Task,
    ];

    /// Stable lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Actor => "actor",
            Self::Inventory => "inventory",
            Self::Equipment => "equipment",
            Self::World => "world",
            Self::Combat => "combat",
            Self::Task => "task",
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One flag per family.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirtyFlags {
    flags: [bool; Family::ALL.len()],
}

impl DirtyFlags {
    /// Every family dirty, as at session start.
    #[must_use]
    pub fn all_dirty() -> Self {
        Self {
            flags: [true; Family::ALL.len()],
        }
    }

    /// Every family clean.
    #[must_use]
    pub fn clean() -> Self {
        Self {
            flags: [false; Family::ALL.len()],
        }
    }

    /// Mark a family dirty. Equipment also dirties combat, since weapon
    /// speed and style come from the worn weapon.
    pub fn mark(&mut self, family: Family) {
        self.flags[family.slot()] = true;
        if family == Family::Equipment {
            self.flags[Family::Combat.slot()] = true;
        }
    }

    /// Mark every family dirty.
    pub fn mark_all(&mut self) {
        self.flags = [true; Family::ALL.len()];
    }

    /// Clear one family after a successful rebuild.
    pub fn clear(&mut self, family: Family) {
        self.flags[family.slot()] = false;
    }

    /// Whether a family is dirty.
    #[must_use]
    pub fn is_dirty(&self, family: Family) -> bool {
        self.flags[family.slot()]
    }

    /// Families currently dirty.
    #[must_use]
    pub fn dirty_families(&self) -> Vec<Family> {
        Family::ALL
            .into_iter()
            .filter(|f| self.is_dirty(*f))
            .collect()
    }
}

impl Default for DirtyFlags {
    fn default() -> Self {
        Self::all_dirty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_all_dirty() {
        let flags = DirtyFlags::default();
        assert_eq!(flags.dirty_families().len(), Family::ALL.len());
    }

    #[test]
    fn clear_only_touches_own_family() {
        let mut flags = DirtyFlags::all_dirty();
        flags.clear(Family::Inventory);
        assert!(!flags.is_dirty(Family::Inventory));
        assert!(flags.is_dirty(Family::Equipment));
        assert!(flags.is_dirty(Family::World));
    }

    #[test]
    fn equipment_cascades_to_combat() {
        let mut flags = DirtyFlags::clean();
        flags.mark(Family::Equipment);
        assert!(flags.is_dirty(Family::Equipment));
        assert!(flags.is_dirty(Family::Combat));
        assert!(!flags.is_dirty(Family::Inventory));
    }

    #[test]
    fn inventory_does_not_cascade() {
        let mut flags = DirtyFlags::clean();
        flags.mark(Family::Inventory);
        assert_eq!(flags.dirty_families(), vec![Family::Inventory]);
    }

    #[test]
    fn family_names() {
        assert_eq!(Family::World.to_string(), "world");
        assert_eq!(
            serde_json::to_string(&Family::Equipment).unwrap_or_default(),
            "\"equipment\""
        );
    }
}
