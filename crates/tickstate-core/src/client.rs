//! Read-only boundary to the simulation.
//!
//! The cache never mutates the simulation. Everything it knows comes through
//! [`SimulationClient`], whose methods return plain owned records. Missing
//! data is expressed as `None` or an empty `Vec`, never as a panic.

use serde::{Deserialize, Serialize};

use crate::geometry::{SceneBounds, WorldPoint};
use crate::items::Item;
use crate::skills::Skill;

/// The actor another actor is interacting with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "index")]
pub enum ActorRef {
    /// A non-player character by scene index.
    Npc(i32),
    /// A player by scene index.
    Player(i32),
}

/// The locally controlled actor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalActor {
    /// Scene index of the local player.
    pub index: i32,
    /// Display name. `None` until the simulation has loaded it after login.
    pub name: Option<String>,
    /// Current tile.
    pub position: WorldPoint,
    /// Current animation, -1 when idle.
    pub animation: i32,
    /// Current pose animation.
    pub pose_animation: i32,
    /// Pose animation used while standing still.
    pub idle_pose_animation: i32,
    /// Who the actor is interacting with.
    pub interacting: Option<ActorRef>,
    /// Skull icon, -1 when unskulled.
    pub skull_icon: i32,
    /// Combat level.
    pub combat_level: i32,
}

/// A non-player character visible in the scene.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpcRecord {
    /// Scene index.
    pub index: i32,
    /// Definition id.
    pub id: i32,
    /// Display name, if it has one.
    pub name: Option<String>,
    /// Combat level (0 for non-combat NPCs).
    pub combat_level: i32,
    /// Current tile.
    pub position: WorldPoint,
    /// Health bar fill, -1 when no bar is shown.
    pub health_ratio: i32,
    /// Health bar scale, -1 when no bar is shown.
    pub health_scale: i32,
    /// Current animation, -1 when idle.
    pub animation: i32,
    /// Who the NPC is interacting with.
    pub interacting: Option<ActorRef>,
    /// Whether the death animation is playing.
    pub is_dead: bool,
    /// Footprint in tiles.
    pub size: i32,
}

/// Another player visible in the scene.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// Scene index.
    pub index: i32,
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
    /// Who the player is interacting with.
    pub interacting: Option<ActorRef>,
    /// On the local friends list.
    pub is_friend: bool,
    /// In the local clan.
    pub is_clan_member: bool,
    /// Overhead prayer icon, if any.
    pub overhead_icon: Option<i32>,
}

/// A static scene object (wall, door, tree, rock...).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRecord {
    /// Definition id.
    pub id: i32,
    /// South-west tile.
    pub position: WorldPoint,
    /// Width in tiles.
    pub size_x: i32,
    /// Length in tiles.
    pub size_y: i32,
    /// Rotation, 0..=3.
    pub orientation: i32,
}

/// Display data for an object definition.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectDefinition {
    /// Display name.
    pub name: String,
    /// Right-click actions.
    pub actions: Vec<String>,
    /// Whether the object blocks movement.
    pub impassable: bool,
}

/// An item stack lying on a tile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundItemRecord {
    /// Item id.
    pub id: i32,
    /// Stack size.
    pub quantity: i32,
    /// Tile the stack lies on.
    pub position: WorldPoint,
}

/// Display and value data for an item definition.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDefinition {
    /// Display name.
    pub name: String,
    /// High-alchemy value.
    pub high_alch_price: i32,
    /// Tradeable on the market.
    pub tradeable: bool,
    /// Stacks in one slot.
    pub stackable: bool,
}

/// A projectile in flight.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectileRecord {
    /// Graphic id.
    pub id: i32,
    /// Launch tile, if known.
    pub source: Option<WorldPoint>,
    /// Destination tile, if known.
    pub destination: Option<WorldPoint>,
    /// Client cycle the projectile was launched on.
    pub start_cycle: i32,
    /// Client cycle the projectile lands on.
    pub end_cycle: i32,
    /// Actor the projectile is homing on.
    pub target: Option<ActorRef>,
    /// Launch height.
    pub start_height: i32,
    /// Landing height.
    pub end_height: i32,
    /// Arc slope.
    pub slope: i32,
}

/// A spot animation drawn on a tile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphicRecord {
    /// Graphic id.
    pub id: i32,
    /// Tile it is drawn on.
    pub position: WorldPoint,
    /// Client cycle it started on.
    pub start_cycle: i32,
    /// Draw height.
    pub height: i32,
    /// Whether the animation has completed.
    pub finished: bool,
}

/// Category of an observed chat line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatKind {
    /// Game-generated message.
    Game,
    /// Engine-generated message.
    Engine,
    /// Public chat from a player.
    Public,
    /// Private message.
    Private,
    /// Anything else.
    Other,
}

impl ChatKind {
    /// Whether the message came from the simulation rather than a player.
    #[must_use]
    pub fn is_system(self) -> bool {
        matches!(self, Self::Game | Self::Engine)
    }
}

/// Accessor-style reads against the live simulation.
///
/// Implementations must be cheap enough to call from the tick thread and must
/// never block on I/O. Reads that the simulation cannot serve return `None`,
/// an empty collection, or 0.
pub trait SimulationClient: Send + Sync {
    /// The locally controlled actor, `None` before it is loaded.
    fn local_actor(&self) -> Option<LocalActor>;

    /// Current client animation cycle.
    fn game_cycle(&self) -> i32;

    /// Contents of a container by id, `None` if the container does not exist.
    fn container(&self, container_id: i32) -> Option<Vec<Item>>;

    /// Every NPC in the loaded scene.
    fn npcs(&self) -> Vec<NpcRecord>;

    /// Every other player in the loaded scene.
    fn players(&self) -> Vec<PlayerRecord>;

    /// Scene objects inside the region.
    fn objects_in(&self, bounds: SceneBounds) -> Vec<ObjectRecord>;

    /// Ground item stacks inside the region.
    fn ground_items_in(&self, bounds: SceneBounds) -> Vec<GroundItemRecord>;

    /// Projectiles currently in flight.
    fn projectiles(&self) -> Vec<ProjectileRecord>;

    /// Spot animations currently drawn.
    fn graphics_objects(&self) -> Vec<GraphicRecord>;

    /// A player counter.
    fn varp(&self, id: i32) -> i32;

    /// A player flag.
    fn varbit(&self, id: i32) -> i32;

    /// Unboosted level of a skill.
    fn base_level(&self, skill: Skill) -> i32;

    /// Current (boosted or drained) level of a skill.
    fn boosted_level(&self, skill: Skill) -> i32;

    /// Run energy in hundredths of a percent (0..=10000).
    fn run_energy(&self) -> i32;

    /// Whether the client uses a resizable layout.
    fn is_resized(&self) -> bool;

    /// Whether a UI panel group is currently visible.
    fn is_panel_visible(&self, panel_id: i32) -> bool;

    /// Cached object definition lookup.
    fn object_definition(&self, object_id: i32) -> Option<ObjectDefinition>;

    /// Cached item definition lookup.
    fn item_definition(&self, item_id: i32) -> Option<ItemDefinition>;

    /// Resolve an assignment target id to its display name.
    fn task_target_name(&self, target_id: i32) -> Option<String>;

    /// Resolve an assignment area id to its display name.
    fn task_area_name(&self, area_id: i32) -> Option<String>;

    /// Unlocked assignment rewards as snake_case identifiers.
    fn task_unlocks(&self) -> Vec<String>;
}
