//! Spatial snapshot of everything near the local actor.

mod entities;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tickstate_core::WorldPoint;

pub use entities::{
    GraphicsSnapshot, GroundItemSnapshot, NpcSnapshot, ObjectSnapshot, PlayerSnapshot,
    ProjectileSnapshot,
};

/// Nearby entities and visible UI panels as of one rebuild.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldState {
    /// NPCs within the entity radius.
    pub npcs: Vec<NpcSnapshot>,
    /// Scene objects within the entity radius.
    pub objects: Vec<ObjectSnapshot>,
    /// Other players within the entity radius.
    pub players: Vec<PlayerSnapshot>,
    /// Ground items within the ground-item radius.
    pub ground_items: Vec<GroundItemSnapshot>,
    /// Projectiles in flight.
    pub projectiles: Vec<ProjectileSnapshot>,
    /// Active spot animations.
    pub graphics: Vec<GraphicsSnapshot>,
    /// Ids of UI panels that were visible.
    pub visible_panel_ids: BTreeSet<i32>,
}

impl WorldState {
    /// Nothing nearby.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether nothing at all was observed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_entity_count() == 0 && self.visible_panel_ids.is_empty()
    }

    // ── NPCs ────────────────────────────────────────────────────────────

    /// NPCs with the given definition id.
    pub fn npcs_by_id(&self, id: i32) -> impl Iterator<Item = &NpcSnapshot> {
        self.npcs.iter().filter(move |n| n.id == id)
    }

    /// NPCs whose definition id is any of `ids`.
    #[must_use]
    pub fn npcs_by_ids(&self, ids: &[i32]) -> Vec<&NpcSnapshot> {
        self.npcs.iter().filter(|n| ids.contains(&n.id)).collect()
    }

    /// NPCs with the given name (case-insensitive).
    #[must_use]
    pub fn npcs_by_name(&self, name: &str) -> Vec<&NpcSnapshot> {
        self.npcs
            .iter()
            .filter(|n| n.name.as_deref().is_some_and(|s| s.eq_ignore_ascii_case(name)))
            .collect()
    }

    /// NPC at a scene index.
    #[must_use]
    pub fn npc_by_index(&self, index: i32) -> Option<&NpcSnapshot> {
        self.npcs.iter().find(|n| n.index == index)
    }

    /// Live NPCs interacting with the local actor.
    #[must_use]
    pub fn npcs_targeting_actor(&self) -> Vec<&NpcSnapshot> {
        self.npcs
            .iter()
            .filter(|n| n.is_targeting_actor && !n.is_dead)
            .collect()
    }

    /// Closest NPC with the given id.
    #[must_use]
    pub fn nearest_npc(&self, from: &WorldPoint, id: i32) -> Option<&NpcSnapshot> {
        self.npcs_by_id(id).min_by_key(|n| n.distance_to(from))
    }

    /// NPCs within `distance` tiles.
    #[must_use]
    pub fn npcs_within(&self, from: &WorldPoint, distance: i32) -> Vec<&NpcSnapshot> {
        self.npcs
            .iter()
            .filter(|n| n.is_within_distance(from, distance))
            .collect()
    }

    // ── Objects ─────────────────────────────────────────────────────────

    /// Objects with the given definition id.
    #[must_use]
    pub fn objects_by_id(&self, id: i32) -> Vec<&ObjectSnapshot> {
        self.objects.iter().filter(|o| o.id == id).collect()
    }

    /// Objects offering an action.
    #[must_use]
    pub fn objects_with_action(&self, action: &str) -> Vec<&ObjectSnapshot> {
        self.objects.iter().filter(|o| o.has_action(action)).collect()
    }

    /// Closest object with the given id.
    #[must_use]
    pub fn nearest_object(&self, from: &WorldPoint, id: i32) -> Option<&ObjectSnapshot> {
        self.objects
            .iter()
            .filter(|o| o.id == id)
            .min_by_key(|o| o.distance_to(from))
    }

    // ── Ground items ────────────────────────────────────────────────────

    /// Ground stacks of an item.
    #[must_use]
    pub fn ground_items_by_id(&self, id: i32) -> Vec<&GroundItemSnapshot> {
        self.ground_items.iter().filter(|g| g.id == id).collect()
    }

    /// Ground stacks whose known market value reaches `min_value`.
    #[must_use]
    pub fn valuable_ground_items(&self, min_value: i64) -> Vec<&GroundItemSnapshot> {
        self.ground_items
            .iter()
            .filter(|g| g.is_worth_at_least(min_value))
            .collect()
    }

    /// Ground stacks, most valuable first. Unknown prices sort last.
    #[must_use]
    pub fn ground_items_by_value(&self) -> Vec<&GroundItemSnapshot> {
        let mut items: Vec<_> = self.ground_items.iter().collect();
        items.sort_by_key(|g| std::cmp::Reverse(g.total_ge_value().unwrap_or(i64::MIN)));
        items
    }

    // ── Players ─────────────────────────────────────────────────────────

    /// Player with a display name (case-insensitive).
    #[must_use]
    pub fn player_by_name(&self, name: &str) -> Option<&PlayerSnapshot> {
        self.players
            .iter()
            .find(|p| p.name.as_deref().is_some_and(|s| s.eq_ignore_ascii_case(name)))
    }

    /// Players showing a skull.
    #[must_use]
    pub fn skulled_players(&self) -> Vec<&PlayerSnapshot> {
        self.players.iter().filter(|p| p.is_skulled()).collect()
    }

    // ── Effects ─────────────────────────────────────────────────────────

    /// Projectiles homing on the local actor.
    #[must_use]
    pub fn projectiles_targeting_actor(&self) -> Vec<&ProjectileSnapshot> {
        self.projectiles
            .iter()
            .filter(|p| p.is_targeting_actor)
            .collect()
    }

    /// Unfinished spot animations on a tile.
    #[must_use]
    pub fn graphics_at(&self, position: &WorldPoint) -> Vec<&GraphicsSnapshot> {
        self.graphics
            .iter()
            .filter(|g| !g.finished && g.position == *position)
            .collect()
    }

    // ── Panels ──────────────────────────────────────────────────────────

    /// Whether a UI panel was visible.
    #[must_use]
    pub fn is_panel_visible(&self, id: i32) -> bool {
        self.visible_panel_ids.contains(&id)
    }

    /// Whether any of the panels was visible.
    #[must_use]
    pub fn is_any_panel_visible(&self, ids: &[i32]) -> bool {
        ids.iter().any(|id| self.is_panel_visible(*id))
    }

    /// Entities of every kind.
    #[must_use]
    pub fn total_entity_count(&self) -> usize {
        self.npcs.len()
            + self.objects.len()
            + self.players.len()
            + self.ground_items.len()
            + self.projectiles.len()
            + self.graphics.len()
    }

    /// One-line description for logs.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "WorldState[npcs={}, objects={}, players={}, groundItems={}, projectiles={}, graphics={}, panels={}]",
            self.npcs.len(),
            self.objects.len(),
            self.players.len(),
            self.ground_items.len(),
            self.projectiles.len(),
            self.graphics.len(),
            self.visible_panel_ids.len()
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn npc(index: i32, id: i32, name: &str, at: WorldPoint, targeting: bool) -> NpcSnapshot {
        NpcSnapshot {
            index,
            id,
            name: Some(name.into()),
            combat_level: 2,
            position: at,
            health_ratio: -1,
            health_scale: -1,
            animation: -1,
            interacting: None,
            is_targeting_actor: targeting,
            is_dead: false,
            size: 1,
        }
    }

    fn ground(id: i32, quantity: i32, price: Option<i32>) -> GroundItemSnapshot {
        GroundItemSnapshot {
            id,
            quantity,
            position: WorldPoint::new(3200, 3200, 0),
            name: String::new(),
            ge_price: price,
            ha_price: 0,
            tradeable: true,
            stackable: true,
        }
    }

    fn sample() -> WorldState {
        WorldState {
            npcs: vec![
                npc(1, 100, "Goblin", WorldPoint::new(3205, 3200, 0), true),
                npc(2, 100, "Goblin", WorldPoint::new(3201, 3200, 0), false),
                npc(3, 200, "Guard", WorldPoint::new(3210, 3200, 0), false),
            ],
            ground_items: vec![
                ground(995, 1000, Some(1)),
                ground(4151, 1, Some(1_500_000)),
                ground(526, 1, None),
            ],
            visible_panel_ids: [548, 162].into_iter().collect(),
            ..WorldState::empty()
        }
    }

    #[test]
    fn npc_queries() {
        let world = sample();
        let origin = WorldPoint::new(3200, 3200, 0);
        assert_eq!(world.npcs_by_id(100).count(), 2);
        assert_eq!(world.npcs_by_name("goblin").len(), 2);
        assert_eq!(world.npcs_by_ids(&[100, 200]).len(), 3);
        assert_eq!(world.npc_by_index(3).map(|n| n.id), Some(200));
        assert_eq!(world.nearest_npc(&origin, 100).map(|n| n.index), Some(2));
        assert_eq!(world.npcs_targeting_actor().len(), 1);
        assert_eq!(world.npcs_within(&origin, 5).len(), 2);
    }

    #[test]
    fn valuable_items_skip_unknown_prices() {
        let world = sample();
        let valuable = world.valuable_ground_items(1000);
        assert_eq!(valuable.len(), 2);
        let ordered: Vec<i32> = world.ground_items_by_value().iter().map(|g| g.id).collect();
        assert_eq!(ordered, vec![4151, 995, 526]);
    }

    #[test]
    fn panel_visibility() {
        let world = sample();
        assert!(world.is_panel_visible(548));
        assert!(!world.is_panel_visible(161));
        assert!(world.is_any_panel_visible(&[161, 162]));
    }

    #[test]
    fn empty_world() {
        let world = WorldState::empty();
        assert!(world.is_empty());
        assert_eq!(world.total_entity_count(), 0);
        insta::assert_snapshot!(
            world.summary(),
            @"WorldState[npcs=0, objects=0, players=0, groundItems=0, projectiles=0, graphics=0, panels=0]"
        );
    }
}
