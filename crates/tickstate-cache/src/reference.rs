//! Static reference data and optional services the builders consult.

use std::collections::HashMap;

use tickstate_state::AttackStyle;
use tickstate_state::combat::DEFAULT_WEAPON_SPEED;

/// Attack speed assumed for NPCs without reference data.
pub const DEFAULT_NPC_ATTACK_SPEED: u64 = 4;

/// Combat reference data for one NPC species.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NpcCombatData {
    /// Animations that mark an attack.
    pub attack_animations: Vec<i32>,
    /// Ticks between attacks.
    pub attack_speed: u64,
    /// Known maximum hit, 0 when unknown.
    pub max_hit: i32,
    /// Attack style.
    pub attack_style: AttackStyle,
}

/// Weapon reference data.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WeaponData {
    /// Ticks between attacks.
    pub attack_speed: u64,
    /// Attack style.
    pub attack_style: AttackStyle,
    /// Animations played when attacking with it.
    pub attack_animations: Vec<i32>,
}

/// Lookup tables for NPC, weapon and projectile combat data.
pub trait CombatReference: Send + Sync {
    /// Data for an NPC species.
    fn npc_combat_data(&self, npc_id: i32) -> Option<NpcCombatData>;

    /// Data for a weapon. `None` for unarmed.
    fn weapon_data(&self, weapon_id: Option<i32>) -> Option<WeaponData>;

    /// Style of a projectile graphic.
    fn projectile_style(&self, projectile_id: i32) -> AttackStyle;

    /// Attack speed of the wielded weapon.
    fn weapon_speed(&self, weapon_id: Option<i32>) -> u64 {
        self.weapon_data(weapon_id)
            .map_or(DEFAULT_WEAPON_SPEED, |w| w.attack_speed)
    }

    /// Attack style of the wielded weapon. Unarmed is melee.
    fn weapon_style(&self, weapon_id: Option<i32>) -> AttackStyle {
        match self.weapon_data(weapon_id) {
            Some(w) => w.attack_style,
            None if weapon_id.is_none() => AttackStyle::Melee,
            None => AttackStyle::Unknown,
        }
    }

    /// Whether `animation` is an attack with the wielded weapon.
    fn is_weapon_attack_animation(&self, weapon_id: Option<i32>, animation: i32) -> bool {
        self.weapon_data(weapon_id)
            .is_some_and(|w| w.attack_animations.contains(&animation))
    }
}

/// Table-backed [`CombatReference`]. Empty by default.
#[derive(Clone, Debug, Default)]
pub struct StaticCombatReference {
    npcs: HashMap<i32, NpcCombatData>,
    weapons: HashMap<i32, WeaponData>,
    unarmed: Option<WeaponData>,
    projectiles: HashMap<i32, AttackStyle>,
}

impl StaticCombatReference {
    /// No data at all.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add NPC species data.
    #[must_use]
    pub fn with_npc(mut self, npc_id: i32, data: NpcCombatData) -> Self {
        let _ = self.npcs.insert(npc_id, data);
        self
    }

    /// Add weapon data.
    #[must_use]
    pub fn with_weapon(mut self, weapon_id: i32, data: WeaponData) -> Self {
        let _ = self.weapons.insert(weapon_id, data);
        self
    }

    /// Data used when nothing is wielded.
    #[must_use]
    pub fn with_unarmed(mut self, data: WeaponData) -> Self {
        self.unarmed = Some(data);
        self
    }

    /// Add a projectile style.
    #[must_use]
    pub fn with_projectile(mut self, projectile_id: i32, style: AttackStyle) -> Self {
        let _ = self.projectiles.insert(projectile_id, style);
        self
    }
}

impl CombatReference for StaticCombatReference {
    fn npc_combat_data(&self, npc_id: i32) -> Option<NpcCombatData> {
        self.npcs.get(&npc_id).cloned()
    }

    fn weapon_data(&self, weapon_id: Option<i32>) -> Option<WeaponData> {
        match weapon_id {
            Some(id) => self.weapons.get(&id).cloned(),
            None => self.unarmed.clone(),
        }
    }

    fn projectile_style(&self, projectile_id: i32) -> AttackStyle {
        self.projectiles
            .get(&projectile_id)
            .copied()
            .unwrap_or_default()
    }
}

/// Current assignment as reported by a richer tracking service.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskInfo {
    /// Target creature name. `None` when the service has no assignment.
    pub name: Option<String>,
    /// Area restriction.
    pub location: Option<String>,
    /// Kills assigned.
    pub initial: i32,
    /// Kills left.
    pub remaining: i32,
    /// Scene indexes of assignment creatures the service is tracking.
    pub targets: Vec<i32>,
}

/// Optional assignment-tracking service. When absent, or when it reports no
/// assignment, the task builder reads the raw counters instead.
pub trait TaskInfoProvider: Send + Sync {
    /// The current assignment.
    fn current_task(&self) -> Option<TaskInfo>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
