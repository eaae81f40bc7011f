//! Per-entity snapshots inside a [`WorldState`](super::WorldState).

use serde::{Deserialize, Serialize};
use tickstate_core::{ActorRef, WorldPoint};

/// A nearby non-player character.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpcSnapshot {
    /// Scene index.
    pub index: i32,
    /// Definition id.
    pub id: i32,
    /// Display name.
    pub name: Option<String>,
    /// Combat level.
    pub combat_level: i32,
    /// Current tile.
    pub position: WorldPoint,
    /// Health bar fill, -1 without a bar.
    pub health_ratio: i32,
    /// Health bar scale, -1 without a bar.
    pub health_scale: i32,
    /// Current animation, -1 when idle.
    pub animation: i32,
    /// Who the NPC is interacting with.
    pub interacting: Option<ActorRef>,
    /// Whether it is interacting with the local actor.
    pub is_targeting_actor: bool,
    /// Whether the death animation is playing.
    pub is_dead: bool,
    /// Footprint in tiles.
    pub size: i32,
}

impl NpcSnapshot {
    /// Whether a health bar is shown.
    #[must_use]
    pub fn is_health_bar_visible(&self) -> bool {
        self.health_ratio >= 0 && self.health_scale > 0
    }

    /// Health fraction. Without a visible bar the NPC is assumed healthy.
    #[must_use]
    pub fn health_percent(&self) -> f64 {
        if self.is_health_bar_visible() {
            f64::from(self.health_ratio) / f64::from(self.health_scale)
        } else {
            1.0
        }
    }

    /// Whether health is strictly below `fraction`.
    #[must_use]
    pub fn is_health_below(&self, fraction: f64) -> bool {
        self.health_percent() < fraction
    }

    /// Whether any animation is playing.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animation != -1
    }

    /// Chebyshev distance to a tile.
    #[must_use]
    pub fn distance_to(&self, target: &WorldPoint) -> i32 {
        self.position.distance_to(target)
    }

    /// Whether within `distance` tiles.
    #[must_use]
    pub fn is_within_distance(&self, target: &WorldPoint, distance: i32) -> bool {
        self.position.is_within(target, distance)
    }

    /// One-line description for logs.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Npc[{} id={} idx={} hp={:.0}% targeting={}]",
            self.name.as_deref().unwrap_or("?"),
            self.id,
            self.index,
            self.health_percent() * 100.0,
            self.is_targeting_actor
        )
    }
}

/// A nearby scene object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectSnapshot {
    /// Definition id.
    pub id: i32,
    /// South-west tile.
    pub position: WorldPoint,
    /// Display name, empty when the definition lookup failed.
    pub name: String,
    /// Right-click actions.
    pub actions: Vec<String>,
    /// Width in tiles.
    pub size_x: i32,
    /// Length in tiles.
    pub size_y: i32,
    /// Rotation, 0..=3.
    pub orientation: i32,
    /// Whether it blocks movement.
    pub impassable: bool,
}

impl ObjectSnapshot {
    /// Whether the object offers the action (case-insensitive).
    #[must_use]
    pub fn has_action(&self, action: &str) -> bool {
        self.actions.iter().any(|a| a.eq_ignore_ascii_case(action))
    }

    /// Chebyshev distance to a tile.
    #[must_use]
    pub fn distance_to(&self, target: &WorldPoint) -> i32 {
        self.position.distance_to(target)
    }
}

/// Another nearby player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    /// Display name.
    pub name: Option<String>,
    /// Combat level.
    pub combat_level: i32,
    /// Current tile.
    pub position: WorldPoint,
    /// Skull icon, -1 when unskulled.
    pub skull_icon: i32,
    /// Current animation, -1 when idle.
    pub animation: i32,
    /// Whether interacting with anything.
    pub is_in_combat: bool,
    /// Who the player is interacting with.
    pub interacting: Option<ActorRef>,
    /// On the local friends list.
    pub is_friend: bool,
    /// In the local clan.
    pub is_clan_member: bool,
    /// Overhead prayer icon.
    pub overhead_icon: Option<i32>,
}

impl PlayerSnapshot {
    /// Whether a skull is shown.
    #[must_use]
    pub fn is_skulled(&self) -> bool {
        self.skull_icon >= 0
    }

    /// Whether within `distance` tiles.
    #[must_use]
    pub fn is_within_distance(&self, target: &WorldPoint, distance: i32) -> bool {
        self.position.is_within(target, distance)
    }
}

/// A nearby ground item stack.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundItemSnapshot {
    /// Item id.
    pub id: i32,
    /// Stack size.
    pub quantity: i32,
    /// Tile the stack lies on.
    pub position: WorldPoint,
    /// Display name, empty when the definition lookup failed.
    pub name: String,
    /// Market price per item. `None` while the price is being resolved.
    pub ge_price: Option<i32>,
    /// High-alchemy value per item.
    pub ha_price: i32,
    /// Tradeable on the market.
    pub tradeable: bool,
    /// Stacks in one slot.
    pub stackable: bool,
}

impl GroundItemSnapshot {
    /// Market value of the whole stack, `None` while the price is unknown.
    #[must_use]
    pub fn total_ge_value(&self) -> Option<i64> {
        self.ge_price
            .map(|p| i64::from(p) * i64::from(self.quantity))
    }

    /// High-alchemy value of the whole stack.
    #[must_use]
    pub fn total_ha_value(&self) -> i64 {
        i64::from(self.ha_price) * i64::from(self.quantity)
    }

    /// Whether the stack's known market value reaches `min_value`.
    #[must_use]
    pub fn is_worth_at_least(&self, min_value: i64) -> bool {
        self.total_ge_value().is_some_and(|v| v >= min_value)
    }

    /// Chebyshev distance to a tile.
    #[must_use]
    pub fn distance_to(&self, target: &WorldPoint) -> i32 {
        self.position.distance_to(target)
    }
}

/// A projectile in flight near the actor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectileSnapshot {
    /// Graphic id.
    pub id: i32,
    /// Launch tile.
    pub source: Option<WorldPoint>,
    /// Destination tile.
    pub destination: Option<WorldPoint>,
    /// Launch cycle.
    pub start_cycle: i32,
    /// Landing cycle.
    pub end_cycle: i32,
    /// Actor the projectile homes on.
    pub target: Option<ActorRef>,
    /// Whether it homes on the local actor.
    pub is_targeting_actor: bool,
    /// Launch height.
    pub start_height: i32,
    /// Landing height.
    pub end_height: i32,
    /// Arc slope.
    pub slope: i32,
}

/// A spot animation near the actor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphicsSnapshot {
    /// Graphic id.
    pub id: i32,
    /// Tile it is drawn on.
    pub position: WorldPoint,
    /// Start cycle.
    pub start_cycle: i32,
    /// Draw height.
    pub height: i32,
    /// Whether it has finished.
    pub finished: bool,
}
