//! Local actor snapshot.

use std::collections::BTreeMap;

use tickstate_core::constants::{varbits, varps};
use tickstate_core::{ActorRef, SimulationClient, Skill};
use tickstate_state::ActorState;

use super::targets_local;

/// Home teleport cooldown in minutes.
pub const HOME_TELEPORT_COOLDOWN_MINUTES: i64 = 30;
/// Minigame teleport cooldown in minutes.
pub const MINIGAME_TELEPORT_COOLDOWN_MINUTES: i64 = 20;

/// Seconds left on a cooldown whose last use is stored as a minute since the
/// epoch. Zero when never used or already elapsed.
#[must_use]
pub fn teleport_cooldown_secs(last_used_minute: i32, cooldown_minutes: i64, now_secs: i64) -> u32 {
    if last_used_minute <= 0 {
        return 0;
    }
    let ready_at = (i64::from(last_used_minute) + cooldown_minutes) * 60;
    (ready_at - now_secs).clamp(0, i64::from(u32::MAX)) as u32
}

/// Build the actor snapshot. `now_secs` is wall-clock Unix time, used only
/// for the teleport cooldowns.
pub fn build_actor(client: &dyn SimulationClient, now_secs: i64) -> ActorState {
    let Some(local) = client.local_actor() else {
        return ActorState::empty();
    };

    let target_npc_index = match local.interacting {
        Some(ActorRef::Npc(index)) => client
            .npcs()
            .into_iter()
            .find(|n| n.index == index && targets_local(n.interacting, &local))
            .map(|n| n.index),
        _ => None,
    };

    let poison = client.varp(varps::POISON);
    let base_levels: BTreeMap<Skill, i32> = Skill::ALL
        .into_iter()
        .map(|s| (s, client.base_level(s)))
        .collect();
    let boosted_levels: BTreeMap<Skill, i32> = Skill::ALL
        .into_iter()
        .map(|s| (s, client.boosted_level(s)))
        .collect();

    ActorState {
        position: Some(local.position),
        animation: local.animation,
        is_moving: local.pose_animation != local.idle_pose_animation,
        is_interacting: local.interacting.is_some(),
        current_hitpoints: boosted_levels.get(&Skill::Hitpoints).copied().unwrap_or(0),
        max_hitpoints: base_levels.get(&Skill::Hitpoints).copied().unwrap_or(0),
        current_prayer: boosted_levels.get(&Skill::Prayer).copied().unwrap_or(0),
        max_prayer: base_levels.get(&Skill::Prayer).copied().unwrap_or(0),
        run_energy: client.run_energy() / 100,
        in_combat: target_npc_index.is_some(),
        target_npc_index,
        skull_icon: local.skull_icon,
        is_poisoned: poison > 0,
        is_venomed: poison < 0,
        spellbook: client.varbit(varbits::SPELLBOOK),
        home_teleport_cooldown_secs: teleport_cooldown_secs(
            client.varp(varps::LAST_HOME_TELEPORT),
            HOME_TELEPORT_COOLDOWN_MINUTES,
            now_secs,
        ),
        minigame_teleport_cooldown_secs: teleport_cooldown_secs(
            client.varp(varps::LAST_MINIGAME_TELEPORT),
            MINIGAME_TELEPORT_COOLDOWN_MINUTES,
            now_secs,
        ),
        base_levels,
        boosted_levels,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
