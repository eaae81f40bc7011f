//! Container item stacks.

use serde::{Deserialize, Serialize};

/// Item id the simulation uses for an empty container slot.
pub const EMPTY_ITEM_ID: i32 = -1;

/// One stack in a container slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    /// Item definition id.
    pub id: i32,
    /// Stack size.
    pub quantity: i32,
}

impl Item {
    /// Create a stack.
    #[must_use]
    pub const fn new(id: i32, quantity: i32) -> Self {
        Self { id, quantity }
    }

    /// The placeholder the simulation returns for an empty slot.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            id: EMPTY_ITEM_ID,
            quantity: 0,
        }
    }

    /// Whether this slot holds nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.id == EMPTY_ITEM_ID
    }
}
