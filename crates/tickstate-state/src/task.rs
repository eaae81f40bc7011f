//! Long-running assignment progress.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::world::NpcSnapshot;

/// Points needed to skip an assignment.
pub const SKIP_COST: i32 = 30;
/// Points needed to block an assignment.
pub const BLOCK_COST: i32 = 100;
/// Completion percentage considered nearly done.
pub const NEAR_COMPLETION_PERCENT: i32 = 80;
/// Master id of the wilderness assigner.
pub const WILDERNESS_MASTER_ID: i32 = 7;

/// Display name of an assigner by its counter id.
#[must_use]
pub fn master_name(master_id: i32) -> Option<&'static str> {
    Some(match master_id {
        1 => "Turael",
        2 => "Mazchna",
        3 => "Vannaka",
        4 => "Chaeldar",
        5 => "Nieve",
        6 => "Konar quo Maten",
        7 => "Krystilia",
        8 => "Duradel",
        _ => return None,
    })
}

/// Assignment progress as of one rebuild.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskProgressState {
    /// Target creature name.
    pub name: Option<String>,
    /// Location restriction.
    pub location: Option<String>,
    /// Kills left.
    pub remaining: i32,
    /// Kills assigned.
    pub initial: i32,
    /// Reward points.
    pub points: i32,
    /// Consecutive completions.
    pub streak: i32,
    /// Consecutive wilderness completions.
    pub wilderness_streak: i32,
    /// Counter id of the assigner.
    pub master_id: Option<i32>,
    /// Purchased unlock keys.
    pub unlocks: BTreeSet<String>,
    /// Blocked creature names.
    pub blocked: Vec<String>,
    /// Creature names with an extension unlock.
    pub extended: BTreeSet<String>,
    /// Skill level governing assignments.
    pub task_level: i32,
    /// Assignment creatures in the scene, as reported by the tracking
    /// service. Empty when the counters were the source.
    pub targets: Vec<NpcSnapshot>,
}

impl TaskProgressState {
    /// No assignment.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    fn named(&self) -> bool {
        self.name.as_deref().is_some_and(|n| !n.is_empty())
    }

    /// An assignment with kills left.
    #[must_use]
    pub fn has_task(&self) -> bool {
        self.named() && self.remaining > 0
    }

    /// An assignment that was started and has no kills left.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.named() && self.remaining == 0 && self.initial > 0
    }

    /// Whether any assignment creature is in the scene.
    #[must_use]
    pub fn has_targets_nearby(&self) -> bool {
        !self.targets.is_empty()
    }

    /// Whether the NPC at scene `index` is an assignment creature.
    #[must_use]
    pub fn is_target(&self, index: i32) -> bool {
        self.targets.iter().any(|npc| npc.index == index)
    }

    /// Whether the assignment is restricted to an area.
    #[must_use]
    pub fn is_location_restricted(&self) -> bool {
        self.location.as_deref().is_some_and(|l| !l.is_empty())
    }

    /// Whether the wilderness assigner gave this task.
    #[must_use]
    pub fn is_wilderness_task(&self) -> bool {
        self.master_id == Some(WILDERNESS_MASTER_ID)
    }

    /// Assigner display name.
    #[must_use]
    pub fn master_name(&self) -> Option<&'static str> {
        self.master_id.and_then(master_name)
    }

    /// Kills done so far.
    #[must_use]
    pub fn kills_completed(&self) -> i32 {
        if self.initial <= 0 {
            return 0;
        }
        (self.initial - self.remaining).max(0)
    }

    /// Completion in whole percent, 0..=100.
    #[must_use]
    pub fn completion_percent(&self) -> i32 {
        if self.initial <= 0 {
            return 0;
        }
        (self.kills_completed() * 100 / self.initial).min(100)
    }

    /// At least [`NEAR_COMPLETION_PERCENT`] done.
    #[must_use]
    pub fn is_near_completion(&self) -> bool {
        self.completion_percent() >= NEAR_COMPLETION_PERCENT
    }

    /// Whether `cost` points are available.
    #[must_use]
    pub fn can_afford(&self, cost: i32) -> bool {
        self.points >= cost
    }

    /// Enough points to skip.
    #[must_use]
    pub fn can_skip(&self) -> bool {
        self.can_afford(SKIP_COST)
    }

    /// Enough points to block.
    #[must_use]
    pub fn can_block(&self) -> bool {
        self.can_afford(BLOCK_COST)
    }

    /// Streak that applies to the current assigner.
    #[must_use]
    pub fn relevant_streak(&self) -> i32 {
        if self.is_wilderness_task() {
            self.wilderness_streak
        } else {
            self.streak
        }
    }

    /// Whether an unlock was purchased.
    #[must_use]
    pub fn has_unlock(&self, key: &str) -> bool {
        self.unlocks.contains(key)
    }

    /// Whether a creature is blocked (case-insensitive).
    #[must_use]
    pub fn is_task_blocked(&self, creature: &str) -> bool {
        self.blocked.iter().any(|b| b.eq_ignore_ascii_case(creature))
    }

    /// Whether the current creature has an extension unlock.
    #[must_use]
    pub fn is_current_task_extended(&self) -> bool {
        let Some(name) = self.name.as_deref() else {
            return false;
        };
        self.extended.iter().any(|e| e.eq_ignore_ascii_case(name))
    }

    /// Whether fewer than `max_slots` blocks are used.
    #[must_use]
    pub fn can_block_more(&self, max_slots: usize) -> bool {
        self.blocked.len() < max_slots
    }

    /// One-line description for logs.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut out = String::from("TaskProgress[");
        let name = self.name.as_deref().unwrap_or_default();
        if self.has_task() {
            out.push_str("task=");
            out.push_str(name);
            if let Some(location) = self.location.as_deref() {
                out.push_str(&format!(" ({location})"));
            }
            out.push_str(&format!(
                ", kills={}/{} ({}%)",
                self.remaining,
                self.initial,
                self.completion_percent()
            ));
        } else if self.is_complete() {
            out.push_str(&format!("task={name} COMPLETE"));
        } else {
            out.push_str("no task");
        }
        out.push_str(&format!(", points={}, streak={}", self.points, self.streak));
        if let Some(master) = self.master_name() {
            out.push_str(&format!(", master={master}"));
        }
        out.push(']');
        out
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
