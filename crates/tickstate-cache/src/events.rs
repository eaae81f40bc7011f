//! Notifications delivered by the simulation.
//!
//! Handling an event never rebuilds anything. It marks a family dirty,
//! moves the tick counter, or records a timestamped fact; the next pull
//! does the work.

use serde::{Deserialize, Serialize};
use tickstate_core::constants::{CANT_REACH_MESSAGE, containers};
use tickstate_core::{ActorRef, ChatKind, Skill};

use crate::dirty::Family;

/// One notification from the simulation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEvent {
    /// Login or logout.
    SessionStateChanged {
        /// Whether the player is now logged in.
        logged_in: bool,
    },
    /// The simulation advanced one tick.
    Tick,
    /// A container's contents changed.
    ContainerChanged {
        /// Container id.
        container_id: i32,
    },
    /// An NPC entered the scene.
    NpcSpawned {
        /// Scene index.
        index: i32,
    },
    /// An NPC left the scene.
    NpcDespawned {
        /// Scene index.
        index: i32,
    },
    /// A scene object appeared.
    ObjectSpawned {
        /// Definition id.
        id: i32,
    },
    /// A scene object disappeared.
    ObjectDespawned {
        /// Definition id.
        id: i32,
    },
    /// A ground item stack appeared.
    GroundItemSpawned {
        /// Item id.
        id: i32,
    },
    /// A ground item stack disappeared.
    GroundItemDespawned {
        /// Item id.
        id: i32,
    },
    /// A skill's boosted or base level changed.
    StatChanged {
        /// Skill that changed.
        skill: Skill,
    },
    /// An actor started a new animation.
    AnimationChanged {
        /// Actor whose animation changed.
        actor: ActorRef,
        /// New animation id.
        animation: i32,
    },
    /// A chat line was observed.
    ChatMessage {
        /// Message category.
        kind: ChatKind,
        /// Message text.
        text: String,
    },
}

impl SimEvent {
    /// Short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SessionStateChanged { .. } => "session_state_changed",
            Self::Tick => "tick",
            Self::ContainerChanged { .. } => "container_changed",
            Self::NpcSpawned { .. } => "npc_spawned",
            Self::NpcDespawned { .. } => "npc_despawned",
            Self::ObjectSpawned { .. } => "object_spawned",
            Self::ObjectDespawned { .. } => "object_despawned",
            Self::GroundItemSpawned { .. } => "ground_item_spawned",
            Self::GroundItemDespawned { .. } => "ground_item_despawned",
            Self::StatChanged { .. } => "stat_changed",
            Self::AnimationChanged { .. } => "animation_changed",
            Self::ChatMessage { .. } => "chat_message",
        }
    }
}

/// Family an event dirties, if any.
///
/// Spawns and despawns dirty the world; projectile and graphics churn is
/// left to the world TTL.
pub fn dirty_family_for(event: &SimEvent) -> Option<Family> {
    match event {
        SimEvent::ContainerChanged { container_id } => match *container_id {
            containers::INVENTORY => Some(Family::Inventory),
            containers::EQUIPMENT => Some(Family::Equipment),
            _ => None,
        },
        SimEvent::NpcSpawned { .. }
        | SimEvent::NpcDespawned { .. }
        | SimEvent::ObjectSpawned { .. }
        | SimEvent::ObjectDespawned { .. }
        | SimEvent::GroundItemSpawned { .. }
        | SimEvent::GroundItemDespawned { .. } => Some(Family::World),
        SimEvent::StatChanged { .. } => Some(Family::Combat),
        SimEvent::SessionStateChanged { .. }
        | SimEvent::Tick
        | SimEvent::AnimationChanged { .. }
        | SimEvent::ChatMessage { .. } => None,
    }
}

/// Whether a chat line is the simulation saying the target is unreachable.
pub fn is_cant_reach(kind: ChatKind, text: &str) -> bool {
    kind.is_system() && text.contains(CANT_REACH_MESSAGE)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
