//! Snapshot builders, one per family.
//!
//! Builders read the simulation and assemble a fresh snapshot. They never
//! fail: unavailable data yields the family's empty snapshot and failed
//! lookups yield per-field sentinels. [`guarded`] is the last line: a panic
//! inside a builder is caught there and reported as an error the caller maps
//! to the empty snapshot.

pub mod actor;
pub mod combat;
pub mod containers;
pub mod panels;
pub mod task;
pub mod world;

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use tickstate_core::{ActorRef, LocalActor, NpcRecord, StateError};
use tickstate_state::NpcSnapshot;

use crate::dirty::Family;

/// Run a builder behind a panic boundary.
pub fn guarded<T>(family: Family, build: impl FnOnce() -> T) -> Result<T, StateError> {
    catch_unwind(AssertUnwindSafe(build)).map_err(|payload| StateError::BuilderPanic {
        family: family.to_string(),
        message: panic_message(payload.as_ref()),
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Whether an actor reference points at the local player.
pub(crate) fn targets_local(target: Option<ActorRef>, local: &LocalActor) -> bool {
    target == Some(ActorRef::Player(local.index))
}

/// Snapshot of one NPC relative to the local player.
pub(crate) fn npc_snapshot(npc: &NpcRecord, local: &LocalActor) -> NpcSnapshot {
    NpcSnapshot {
        index: npc.index,
        id: npc.id,
        name: npc.name.clone(),
        combat_level: npc.combat_level,
        position: npc.position,
        health_ratio: npc.health_ratio,
        health_scale: npc.health_scale,
        animation: npc.animation,
        interacting: npc.interacting,
        is_targeting_actor: targets_local(npc.interacting, local),
        is_dead: npc.is_dead,
        size: npc.size,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
