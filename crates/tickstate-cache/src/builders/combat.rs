//! Combat snapshot: target, aggressors, incoming projectiles, attack timing.
//!
//! An NPC only counts as an aggressor once it has been seen attacking.
//! Interacting with the local player is not enough, since dialogue and
//! shopkeepers interact too. With no species data, any positive animation
//! while targeting the player is taken as an attack. That heuristic
//! misclassifies emotes and is kept as an approximation.

use std::collections::HashMap;

use tickstate_core::constants::{varbits, varps};
use tickstate_core::{
    CYCLES_PER_TICK, LocalActor, NpcRecord, ProjectileRecord, SimulationClient, Skill, Tick,
};
use tickstate_state::{AggressorInfo, AttackStyle, CombatState, EquipmentState, PoisonState};

use super::{npc_snapshot, targets_local};
use crate::reference::{CombatReference, DEFAULT_NPC_ATTACK_SPEED};

/// A repeat attack is only recorded this many ticks after the last one.
pub const ATTACK_REFRESH_TICKS: u64 = 2;

/// Ticks until a projectile lands, rounding partial ticks up. Zero once landed.
#[must_use]
pub fn ticks_until_impact(end_cycle: i32, current_cycle: i32) -> u64 {
    let remaining = end_cycle.saturating_sub(current_cycle);
    if remaining <= 0 {
        return 0;
    }
    u64::from(remaining.unsigned_abs().div_ceil(CYCLES_PER_TICK.unsigned_abs()))
}

/// Inputs the combat builder needs beyond the simulation itself.
pub struct CombatInputs<'a> {
    /// Current tick.
    pub tick: Tick,
    /// Tick of the local player's last attack.
    pub local_attack_tick: Option<Tick>,
    /// Last observed attack per NPC index. Updated in place.
    pub npc_attacks: &'a mut HashMap<i32, Tick>,
    /// Worn equipment, for weapon speed and style.
    pub equipment: &'a EquipmentState,
    /// NPCs further than this are ignored.
    pub entity_radius: i32,
}

/// Build the combat snapshot.
pub fn build_combat(
    client: &dyn SimulationClient,
    reference: &dyn CombatReference,
    inputs: CombatInputs<'_>,
) -> CombatState {
    let Some(local) = client.local_actor() else {
        return CombatState::empty();
    };
    let tick = inputs.tick;
    let npcs = client.npcs();

    let target_npc = match local.interacting {
        Some(tickstate_core::ActorRef::Npc(index)) => npcs
            .iter()
            .find(|n| n.index == index)
            .map(|n| npc_snapshot(n, &local)),
        _ => None,
    };

    let weapon_id = inputs.equipment.weapon_id();
    let weapon_attack_speed = reference.weapon_speed(weapon_id);

    let aggressive_npcs = npcs
        .iter()
        .filter(|n| !n.is_dead && targets_local(n.interacting, &local))
        .filter(|n| n.position.is_within(&local.position, inputs.entity_radius))
        .filter_map(|n| aggressor(n, reference, tick, inputs.npc_attacks))
        .collect();

    let (incoming_attack_style, ticks_until_attack_lands) =
        incoming_projectile(&client.projectiles(), &local, client.game_cycle())
            .map_or((AttackStyle::Unknown, None), |(p, ticks)| {
                (reference.projectile_style(p.id), Some(ticks))
            });

    let ticks_since_last_attack = inputs.local_attack_tick.map(|t| tick.saturating_sub(t));

    CombatState {
        target_npc,
        special_attack_energy: client.varp(varps::SPECIAL_ATTACK) / 10,
        current_attack_style: reference.weapon_style(weapon_id),
        weapon_attack_speed,
        boosted_stats: Skill::COMBAT
            .into_iter()
            .map(|s| (s, client.boosted_level(s)))
            .collect(),
        poison: PoisonState::from_counter(client.varp(varps::POISON), tick),
        aggressive_npcs,
        in_multi_combat: client.varbit(varbits::MULTI_COMBAT) == 1,
        incoming_attack_style,
        ticks_until_attack_lands,
        last_attack_tick: inputs.local_attack_tick,
        ticks_since_last_attack,
        can_attack: ticks_since_last_attack.is_none_or(|since| since >= weapon_attack_speed),
    }
}

fn aggressor(
    npc: &NpcRecord,
    reference: &dyn CombatReference,
    tick: Tick,
    npc_attacks: &mut HashMap<i32, Tick>,
) -> Option<AggressorInfo> {
    let data = reference.npc_combat_data(npc.id);
    let is_attacking = match data.as_ref() {
        Some(d) if !d.attack_animations.is_empty() => d.attack_animations.contains(&npc.animation),
        _ => npc.animation > 0,
    };

    let previous = npc_attacks.get(&npc.index).copied();
    if is_attacking && previous.is_none_or(|last| tick.saturating_sub(last) > ATTACK_REFRESH_TICKS) {
        let _ = npc_attacks.insert(npc.index, tick);
    }
    let last_attack_tick = npc_attacks.get(&npc.index).copied()?;

    let attack_speed = data
        .as_ref()
        .map(|d| d.attack_speed)
        .filter(|s| *s > 0)
        .unwrap_or(DEFAULT_NPC_ATTACK_SPEED);
    let expected_max_hit = data
        .as_ref()
        .map(|d| d.max_hit)
        .filter(|m| *m > 0)
        .unwrap_or_else(|| AggressorInfo::estimate_max_hit(npc.combat_level));

    Some(AggressorInfo {
        npc_index: npc.index,
        npc_id: npc.id,
        npc_name: npc.name.clone(),
        combat_level: npc.combat_level,
        last_attack_tick,
        attack_speed,
        ticks_until_next_attack: attack_speed.saturating_sub(tick.saturating_sub(last_attack_tick)),
        expected_max_hit,
        attack_style: data.map(|d| d.attack_style).unwrap_or_default(),
        is_attacking,
    })
}

/// Soonest-landing projectile homing on the local player.
fn incoming_projectile<'a>(
    projectiles: &'a [ProjectileRecord],
    local: &LocalActor,
    cycle: i32,
) -> Option<(&'a ProjectileRecord, u64)> {
    projectiles
        .iter()
        .filter(|p| targets_local(p.target, local) && p.end_cycle > cycle)
        .map(|p| (p, ticks_until_impact(p.end_cycle, cycle)))
        .min_by_key(|(_, ticks)| *ticks)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
