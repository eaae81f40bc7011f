//! Assignment progress snapshot.
//!
//! A tracking service, when present and reporting an assignment, is the
//! preferred source. Otherwise the raw counters are read and target/area
//! ids resolved to names. Those lookups are slow and the ids recur every
//! tick, so resolved names are memoized for the session.

use std::collections::{BTreeSet, HashMap};

use tickstate_core::constants::{varbits, varps};
use tickstate_core::{SimulationClient, Skill};
use tickstate_state::{NpcSnapshot, TaskProgressState};
use tracing::trace;

use super::npc_snapshot;
use crate::reference::{TaskInfo, TaskInfoProvider};

/// Prefix of unlock keys that extend an assignment.
pub const EXTENSION_PREFIX: &str = "longer_";

/// Creature name an extension unlock applies to: `longer_abyssal_demons`
/// becomes `Abyssal demons`. `None` for other unlocks.
#[must_use]
pub fn extension_creature(unlock: &str) -> Option<String> {
    let rest = unlock.strip_prefix(EXTENSION_PREFIX)?;
    let spaced = rest.replace('_', " ");
    let mut chars = spaced.chars();
    let first = chars.next()?;
    Some(first.to_uppercase().chain(chars).collect())
}

#[derive(Debug, Clone)]
struct BlockSlot {
    value: i32,
    name: Option<String>,
}

/// Builds [`TaskProgressState`], carrying the per-session name memos.
#[derive(Debug, Default)]
pub struct TaskProgressBuilder {
    target_names: HashMap<i32, String>,
    area_names: HashMap<i32, String>,
    block_slots: HashMap<i32, BlockSlot>,
}

impl TaskProgressBuilder {
    /// Empty memos.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget memoized names. Called on session reset.
    pub fn clear(&mut self) {
        self.target_names.clear();
        self.area_names.clear();
        self.block_slots.clear();
    }

    /// Number of memoized target and area names.
    pub fn memoized_names(&self) -> usize {
        self.target_names.len() + self.area_names.len()
    }

    /// Build the snapshot.
    pub fn build(
        &mut self,
        client: &dyn SimulationClient,
        provider: Option<&dyn TaskInfoProvider>,
    ) -> TaskProgressState {
        if client.local_actor().is_none() {
            return TaskProgressState::empty();
        }

        let reported = provider.and_then(|p| p.current_task()).unwrap_or_default();
        let TaskInfo {
            name,
            location,
            initial,
            remaining,
            targets,
        } = if reported.name.as_deref().is_some_and(|n| !n.is_empty()) {
            reported
        } else {
            self.read_counters(client, reported)
        };

        let unlocks: BTreeSet<String> = client.task_unlocks().into_iter().collect();
        let extended = unlocks.iter().filter_map(|u| extension_creature(u)).collect();
        let master = client.varbit(varbits::TASK_MASTER);

        TaskProgressState {
            name,
            location,
            remaining,
            initial,
            points: client.varbit(varbits::TASK_POINTS),
            streak: client.varbit(varbits::TASK_STREAK),
            wilderness_streak: client.varbit(varbits::TASK_WILDERNESS_STREAK),
            master_id: (master > 0).then_some(master),
            blocked: self.read_blocked(client),
            unlocks,
            extended,
            task_level: client.base_level(Skill::Slayer),
            targets: resolve_targets(client, &targets),
        }
    }

    /// Counter fallback. A non-zero assigned count and the target list from
    /// the service survive; everything else comes from the counters.
    fn read_counters(&mut self, client: &dyn SimulationClient, reported: TaskInfo) -> TaskInfo {
        let initial = if reported.initial == 0 {
            client.varp(varps::TASK_ORIGINAL_COUNT)
        } else {
            reported.initial
        };
        TaskInfo {
            name: self.target_name(client, client.varp(varps::TASK_TARGET)),
            location: self.area_name(client, client.varp(varps::TASK_AREA)),
            initial,
            remaining: client.varp(varps::TASK_REMAINING),
            targets: reported.targets,
        }
    }

    fn read_blocked(&mut self, client: &dyn SimulationClient) -> Vec<String> {
        let mut blocked = Vec::new();
        for slot in varps::TASK_BLOCK_SLOTS {
            let value = client.varp(slot);
            let cached = self
                .block_slots
                .get(&slot)
                .filter(|s| s.value == value && s.name.is_some())
                .and_then(|s| s.name.clone());
            let name = match cached {
                Some(name) => Some(name),
                None if value <= 0 => None,
                None => self.target_name(client, value),
            };
            if let Some(name) = &name {
                trace!(slot, value, name = %name, "blocked task");
                blocked.push(name.clone());
            }
            let _ = self.block_slots.insert(slot, BlockSlot { value, name });
        }
        blocked
    }

    fn target_name(&mut self, client: &dyn SimulationClient, id: i32) -> Option<String> {
        memoized(&mut self.target_names, id, |id| client.task_target_name(id))
    }

    fn area_name(&mut self, client: &dyn SimulationClient, id: i32) -> Option<String> {
        memoized(&mut self.area_names, id, |id| client.task_area_name(id))
    }
}

/// Snapshots of the tracked NPCs still in the scene. Skips the scene scan
/// when nothing is tracked.
fn resolve_targets(client: &dyn SimulationClient, indexes: &[i32]) -> Vec<NpcSnapshot> {
    if indexes.is_empty() {
        return Vec::new();
    }
    let Some(local) = client.local_actor() else {
        return Vec::new();
    };
    client
        .npcs()
        .iter()
        .filter(|npc| indexes.contains(&npc.index))
        .map(|npc| npc_snapshot(npc, &local))
        .collect()
}

/// Resolve an id through a memo. Ids <= 0 mean "none". Failed lookups are
/// not memoized, so they are retried on the next build.
fn memoized(
    memo: &mut HashMap<i32, String>,
    id: i32,
    resolve: impl FnOnce(i32) -> Option<String>,
) -> Option<String> {
    if id <= 0 {
        return None;
    }
    if let Some(name) = memo.get(&id) {
        return Some(name.clone());
    }
    let name = resolve(id).filter(|n| !n.is_empty())?;
    let _ = memo.insert(id, name.clone());
    Some(name)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
