//! Local actor snapshot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tickstate_core::{Skill, WorldPoint};

/// Everything about the local actor that changes tick to tick.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ActorState {
    /// Current tile. `None` means the actor was not loaded.
    pub position: Option<WorldPoint>,
    /// Current animation, -1 when idle.
    pub animation: i32,
    /// Whether the pose differs from the standing pose.
    pub is_moving: bool,
    /// Whether the actor is interacting with anything.
    pub is_interacting: bool,
    /// Current hitpoints.
    pub current_hitpoints: i32,
    /// Base hitpoints.
    pub max_hitpoints: i32,
    /// Current prayer points.
    pub current_prayer: i32,
    /// Base prayer level.
    pub max_prayer: i32,
    /// Run energy, 0..=100.
    pub run_energy: i32,
    /// Whether the interacting NPC is also targeting the actor.
    pub in_combat: bool,
    /// Scene index of the NPC being fought.
    pub target_npc_index: Option<i32>,
    /// Skull icon, -1 when unskulled.
    pub skull_icon: i32,
    /// Poisoned (positive poison counter).
    pub is_poisoned: bool,
    /// Venomed (negative poison counter).
    pub is_venomed: bool,
    /// Spellbook: 0 standard, 1 ancient, 2 lunar, 3 arceuus.
    pub spellbook: i32,
    /// Seconds until the home teleport is available.
    pub home_teleport_cooldown_secs: u32,
    /// Seconds until the minigame teleport is available.
    pub minigame_teleport_cooldown_secs: u32,
    /// Unboosted skill levels.
    pub base_levels: BTreeMap<Skill, i32>,
    /// Current skill levels.
    pub boosted_levels: BTreeMap<Skill, i32>,
}

impl ActorState {
    /// Snapshot returned before login or when the actor is not loaded.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            animation: -1,
            skull_icon: -1,
            ..Self::default()
        }
    }

    /// Whether the snapshot describes a loaded actor.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.position.is_some()
    }

    /// Not moving, not animating, not interacting.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        !self.is_moving && self.animation == -1 && !self.is_interacting
    }

    /// Whether any animation is playing.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animation != -1
    }

    /// Hitpoints as a fraction of the maximum (0.0 when unknown).
    #[must_use]
    pub fn health_percent(&self) -> f64 {
        ratio(self.current_hitpoints, self.max_hitpoints)
    }

    /// Prayer as a fraction of the maximum (0.0 when unknown).
    #[must_use]
    pub fn prayer_percent(&self) -> f64 {
        ratio(self.current_prayer, self.max_prayer)
    }

    /// Whether health is strictly below `fraction`.
    #[must_use]
    pub fn is_health_below(&self, fraction: f64) -> bool {
        self.health_percent() < fraction
    }

    /// Whether prayer is strictly below `fraction`.
    #[must_use]
    pub fn is_prayer_below(&self, fraction: f64) -> bool {
        self.prayer_percent() < fraction
    }

    /// Whether a skull is shown.
    #[must_use]
    pub fn is_skulled(&self) -> bool {
        self.skull_icon >= 0
    }

    /// Poisoned or venomed.
    #[must_use]
    pub fn has_poison_effect(&self) -> bool {
        self.is_poisoned || self.is_venomed
    }

    /// Spellbook display name.
    #[must_use]
    pub fn spellbook_name(&self) -> &'static str {
        match self.spellbook {
            0 => "Standard",
            1 => "Ancient",
            2 => "Lunar",
            3 => "Arceuus",
            _ => "Unknown",
        }
    }

    /// Whether the actor stands on exactly this tile.
    #[must_use]
    pub fn is_at(&self, point: &WorldPoint) -> bool {
        self.position.as_ref() == Some(point)
    }

    /// Whether the actor stands inside the inclusive rectangle.
    #[must_use]
    pub fn is_in_area(&self, min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> bool {
        self.position
            .is_some_and(|p| (min_x..=max_x).contains(&p.x) && (min_y..=max_y).contains(&p.y))
    }

    /// Distance to a tile, `None` when the actor is not loaded.
    #[must_use]
    pub fn distance_to(&self, target: &WorldPoint) -> Option<i32> {
        self.position.map(|p| p.distance_to(target))
    }

    /// Base level of a skill, 0 when unknown.
    #[must_use]
    pub fn base_level(&self, skill: Skill) -> i32 {
        self.base_levels.get(&skill).copied().unwrap_or(0)
    }

    /// Current level of a skill, 0 when unknown.
    #[must_use]
    pub fn boosted_level(&self, skill: Skill) -> i32 {
        self.boosted_levels.get(&skill).copied().unwrap_or(0)
    }
}

fn ratio(current: i32, max: i32) -> f64 {
    if max == 0 {
        0.0
    } else {
        f64::from(current) / f64::from(max)
    }
}
