//! Combat snapshot: target, aggressors, incoming attacks and attack timing.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tickstate_core::{Skill, Tick};

use crate::poison::PoisonState;
use crate::world::NpcSnapshot;

/// Weapon speed assumed when nothing better is known.
pub const DEFAULT_WEAPON_SPEED: u64 = 4;
/// Aggressors attacking within this many ticks count toward next-tick damage.
pub const IMMINENT_AGGRESSOR_TICKS: u64 = 1;
/// Incoming projectiles landing within this many ticks are imminent.
pub const IMMINENT_IMPACT_TICKS: u64 = 2;

/// Combat style of an attack or weapon.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackStyle {
    /// Close combat.
    Melee,
    /// Projectile weapons.
    Ranged,
    /// Spells.
    Magic,
    /// Not determined.
    #[default]
    Unknown,
}

impl fmt::Display for AttackStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Melee => "MELEE",
            Self::Ranged => "RANGED",
            Self::Magic => "MAGIC",
            Self::Unknown => "UNKNOWN",
        })
    }
}

/// An NPC confirmed to be attacking the local actor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggressorInfo {
    /// Scene index.
    pub npc_index: i32,
    /// Definition id.
    pub npc_id: i32,
    /// Display name.
    pub npc_name: Option<String>,
    /// Combat level.
    pub combat_level: i32,
    /// Tick of the most recent observed attack.
    pub last_attack_tick: Tick,
    /// Ticks between attacks.
    pub attack_speed: u64,
    /// Ticks until the next attack is expected.
    pub ticks_until_next_attack: u64,
    /// Estimated maximum hit.
    pub expected_max_hit: i32,
    /// Style the NPC attacks with.
    pub attack_style: AttackStyle,
    /// Whether an attack animation was playing at build time.
    pub is_attacking: bool,
}

impl AggressorInfo {
    /// Level-based max hit estimate: `max(1, level / 3 + 1)`.
    #[must_use]
    pub fn estimate_max_hit(combat_level: i32) -> i32 {
        (combat_level / 3 + 1).max(1)
    }

    /// Whether the next attack is due within [`IMMINENT_AGGRESSOR_TICKS`].
    #[must_use]
    pub fn is_attack_imminent(&self) -> bool {
        self.ticks_until_next_attack <= IMMINENT_AGGRESSOR_TICKS
    }
}

/// Combat picture of the local actor for one tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CombatState {
    /// NPC the actor is fighting.
    pub target_npc: Option<NpcSnapshot>,
    /// Special attack energy, 0..=100.
    pub special_attack_energy: i32,
    /// Style of the equipped weapon.
    pub current_attack_style: AttackStyle,
    /// Ticks between the actor's attacks.
    pub weapon_attack_speed: u64,
    /// Boosted combat skill levels.
    pub boosted_stats: BTreeMap<Skill, i32>,
    /// Poison/venom state.
    pub poison: PoisonState,
    /// NPCs confirmed to be attacking.
    pub aggressive_npcs: Vec<AggressorInfo>,
    /// In a multi-combat area.
    pub in_multi_combat: bool,
    /// Style of the next incoming projectile.
    pub incoming_attack_style: AttackStyle,
    /// Ticks until the incoming projectile lands.
    pub ticks_until_attack_lands: Option<u64>,
    /// Tick of the actor's last attack.
    pub last_attack_tick: Option<Tick>,
    /// Ticks since the actor's last attack.
    pub ticks_since_last_attack: Option<u64>,
    /// Whether the weapon is off cooldown.
    pub can_attack: bool,
}

impl CombatState {
    /// Not in combat.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            target_npc: None,
            special_attack_energy: 0,
            current_attack_style: AttackStyle::Unknown,
            weapon_attack_speed: DEFAULT_WEAPON_SPEED,
            boosted_stats: BTreeMap::new(),
            poison: PoisonState::none(),
            aggressive_npcs: Vec::new(),
            in_multi_combat: false,
            incoming_attack_style: AttackStyle::Unknown,
            ticks_until_attack_lands: None,
            last_attack_tick: None,
            ticks_since_last_attack: None,
            can_attack: false,
        }
    }

    /// Whether the actor is fighting an NPC.
    #[must_use]
    pub fn has_target(&self) -> bool {
        self.target_npc.is_some()
    }

    /// Number of confirmed aggressors.
    #[must_use]
    pub fn aggressor_count(&self) -> usize {
        self.aggressive_npcs.len()
    }

    /// Two or more aggressors.
    #[must_use]
    pub fn is_piled_up(&self) -> bool {
        self.aggressive_npcs.len() >= 2
    }

    /// At least one aggressor.
    #[must_use]
    pub fn is_being_attacked(&self) -> bool {
        !self.aggressive_npcs.is_empty()
    }

    /// Aggressor with the highest estimated max hit.
    #[must_use]
    pub fn most_dangerous_aggressor(&self) -> Option<&AggressorInfo> {
        self.aggressive_npcs
            .iter()
            .max_by_key(|a| a.expected_max_hit)
    }

    /// Aggressor attacking soonest.
    #[must_use]
    pub fn next_attacker(&self) -> Option<&AggressorInfo> {
        self.aggressive_npcs
            .iter()
            .min_by_key(|a| a.ticks_until_next_attack)
    }

    /// Sum of max hits of aggressors about to attack.
    #[must_use]
    pub fn expected_damage_next_tick(&self) -> i32 {
        self.aggressive_npcs
            .iter()
            .filter(|a| a.is_attack_imminent())
            .map(|a| a.expected_max_hit)
            .sum()
    }

    /// Whether poisoned (not venomed).
    #[must_use]
    pub fn is_poisoned(&self) -> bool {
        self.poison.is_poisoned()
    }

    /// Whether venomed.
    #[must_use]
    pub fn is_venomed(&self) -> bool {
        self.poison.is_venomed()
    }

    /// Boosted level of a combat skill.
    #[must_use]
    pub fn boosted_level(&self, skill: Skill) -> Option<i32> {
        self.boosted_stats.get(&skill).copied()
    }

    /// Whether a tracked skill is below `base_level`.
    #[must_use]
    pub fn is_stat_drained(&self, skill: Skill, base_level: i32) -> bool {
        self.boosted_level(skill).is_some_and(|b| b < base_level)
    }

    /// Whether special energy is at least `percent`.
    #[must_use]
    pub fn has_spec_energy(&self, percent: i32) -> bool {
        self.special_attack_energy >= percent
    }

    /// Ticks until the weapon is off cooldown, 0 when ready.
    #[must_use]
    pub fn ticks_until_can_attack(&self) -> u64 {
        if self.can_attack {
            return 0;
        }
        match self.ticks_since_last_attack {
            Some(since) => self.weapon_attack_speed.saturating_sub(since),
            None => 0,
        }
    }

    /// Whether a projectile with a known style is heading for the actor.
    #[must_use]
    pub fn has_incoming_attack(&self) -> bool {
        self.incoming_attack_style != AttackStyle::Unknown && self.ticks_until_attack_lands.is_some()
    }

    /// Whether the incoming projectile lands within [`IMMINENT_IMPACT_TICKS`].
    #[must_use]
    pub fn is_attack_imminent(&self) -> bool {
        self.has_incoming_attack()
            && self
                .ticks_until_attack_lands
                .is_some_and(|t| t <= IMMINENT_IMPACT_TICKS)
    }

    /// One-line description for logs.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut out = String::from("CombatState[");
        match self.target_npc.as_ref() {
            Some(npc) => {
                out.push_str("target=");
                out.push_str(npc.name.as_deref().unwrap_or("?"));
            }
            None => out.push_str("no target"),
        }
        out.push_str(&format!(
            ", spec={}%, aggressors={}",
            self.special_attack_energy,
            self.aggressive_npcs.len()
        ));
        if self.in_multi_combat {
            out.push_str(" (MULTI)");
        }
        if self.poison.has_effect() {
            out.push_str(&format!(", {}", self.poison.kind));
        }
        if self.has_incoming_attack() {
            out.push_str(&format!(", incoming={}", self.incoming_attack_style));
        }
        out.push(']');
        out
    }
}

impl Default for CombatState {
    fn default() -> Self {
        Self::empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
