//! Poison and venom trajectories.
//!
//! The simulation stores poison in a single signed counter: positive values
//! are poison, negative values venom, zero clean. Damage is applied every
//! [`POISON_TICK_INTERVAL`] ticks. Poison damage decays by one per application
//! down to [`MIN_POISON_DAMAGE`]; venom grows by [`VENOM_DAMAGE_INCREMENT`]
//! up to [`MAX_VENOM_DAMAGE`].

use serde::{Deserialize, Serialize};
use std::fmt;
use tickstate_core::Tick;

/// Ticks between two poison/venom hits.
pub const POISON_TICK_INTERVAL: u64 = 30;
/// Poison never hits for less than this.
pub const MIN_POISON_DAMAGE: i32 = 1;
/// First venom hit.
pub const INITIAL_VENOM_DAMAGE: i32 = 6;
/// Venom never hits for more than this.
pub const MAX_VENOM_DAMAGE: i32 = 20;
/// Venom growth per hit.
pub const VENOM_DAMAGE_INCREMENT: i32 = 2;
/// Venom at or above this is treated as critical.
pub const CRITICAL_VENOM_DAMAGE: i32 = 16;

/// Kind of damage-over-time effect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoisonKind {
    /// No effect.
    #[default]
    None,
    /// Decaying poison.
    Poison,
    /// Escalating venom.
    Venom,
}

impl fmt::Display for PoisonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "NONE",
            Self::Poison => "POISON",
            Self::Venom => "VENOM",
        })
    }
}

/// Poison/venom state of the local actor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoisonState {
    /// Effect kind.
    pub kind: PoisonKind,
    /// Damage of the next hit.
    pub current_damage: i32,
    /// Tick the next hit is expected on.
    pub next_damage_tick: Option<Tick>,
    /// Counter value this state was decoded from.
    pub raw_counter: i32,
}

impl PoisonState {
    /// No effect.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            kind: PoisonKind::None,
            current_damage: 0,
            next_damage_tick: None,
            raw_counter: 0,
        }
    }

    /// Decode the poison counter read at `tick`.
    #[must_use]
    pub fn from_counter(raw: i32, tick: Tick) -> Self {
        match raw {
            0 => Self::none(),
            r if r > 0 => Self {
                kind: PoisonKind::Poison,
                current_damage: (r.saturating_add(4) / 5).max(MIN_POISON_DAMAGE),
                next_damage_tick: Some(tick + POISON_TICK_INTERVAL),
                raw_counter: r,
            },
            r => {
                let magnitude = r.saturating_abs();
                let damage = ((magnitude - 1) / 5)
                    .saturating_mul(VENOM_DAMAGE_INCREMENT)
                    .saturating_add(INITIAL_VENOM_DAMAGE);
                Self {
                    kind: PoisonKind::Venom,
                    current_damage: damage.min(MAX_VENOM_DAMAGE),
                    next_damage_tick: Some(tick + POISON_TICK_INTERVAL),
                    raw_counter: r,
                }
            }
        }
    }

    /// Whether any effect is active.
    #[must_use]
    pub fn has_effect(&self) -> bool {
        self.kind != PoisonKind::None
    }

    /// Whether the effect is poison.
    #[must_use]
    pub fn is_poisoned(&self) -> bool {
        self.kind == PoisonKind::Poison
    }

    /// Whether the effect is venom.
    #[must_use]
    pub fn is_venomed(&self) -> bool {
        self.kind == PoisonKind::Venom
    }

    /// Damage of the venom hit after the next one. Unchanged for non-venom.
    #[must_use]
    pub fn predict_next_venom_damage(&self) -> i32 {
        if self.is_venomed() {
            (self.current_damage + VENOM_DAMAGE_INCREMENT).min(MAX_VENOM_DAMAGE)
        } else {
            self.current_damage
        }
    }

    /// Damage of the poison hit after the next one. Unchanged for non-poison.
    #[must_use]
    pub fn predict_next_poison_damage(&self) -> i32 {
        if self.is_poisoned() {
            (self.current_damage - 1).max(MIN_POISON_DAMAGE)
        } else {
            self.current_damage
        }
    }

    /// Ticks until the next hit, `None` without an effect or a known schedule.
    #[must_use]
    pub fn ticks_until_next_damage(&self, current_tick: Tick) -> Option<u64> {
        if !self.has_effect() {
            return None;
        }
        self.next_damage_tick
            .map(|next| next.saturating_sub(current_tick))
    }

    /// Total damage expected over the next `ticks` ticks.
    #[must_use]
    pub fn expected_damage_over(&self, ticks: u64) -> i32 {
        if !self.has_effect() || self.current_damage <= 0 {
            return 0;
        }
        let hits = ticks / POISON_TICK_INTERVAL;
        let mut damage = self.current_damage;
        let mut total = 0;
        for _ in 0..hits {
            total += damage;
            damage = match self.kind {
                PoisonKind::Venom => (damage + VENOM_DAMAGE_INCREMENT).min(MAX_VENOM_DAMAGE),
                _ => (damage - 1).max(MIN_POISON_DAMAGE),
            };
        }
        total
    }

    /// Expected damage over the next 30 seconds (50 ticks).
    #[must_use]
    pub fn expected_damage_30s(&self) -> i32 {
        self.expected_damage_over(50)
    }

    /// Whether venom has escalated far enough to warrant leaving.
    #[must_use]
    pub fn is_venom_critical(&self) -> bool {
        self.is_venomed() && self.current_damage >= CRITICAL_VENOM_DAMAGE
    }

    /// One-line description for logs.
    #[must_use]
    pub fn summary(&self) -> String {
        if !self.has_effect() {
            return "PoisonState[NONE]".to_string();
        }
        match self.next_damage_tick {
            Some(next) => format!(
                "PoisonState[{}, dmg={}, nextTick={next}]",
                self.kind, self.current_damage
            ),
            None => format!("PoisonState[{}, dmg={}]", self.kind, self.current_damage),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
