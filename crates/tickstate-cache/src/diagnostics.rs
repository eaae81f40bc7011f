//! Cache statistics and metric names.

use std::fmt;

use serde::Serialize;
use tickstate_core::Tick;

use crate::entry::{CacheEntry, Policy};

/// Metric names recorded by the state service.
pub mod metric {
    /// Counter, labelled by `family`.
    pub const REBUILDS: &str = "tickstate.rebuilds";
    /// Counter of builder panics, labelled by `family`.
    pub const BUILDER_FAILURES: &str = "tickstate.builder.failures";
    /// Counter of tick passes over budget.
    pub const TICK_OVER_BUDGET: &str = "tickstate.tick.over_budget";
    /// Counter of world rebuilds over their soft deadline.
    pub const WORLD_OVER_BUDGET: &str = "tickstate.world.over_budget";
    /// Histogram of rebuild durations in ms, labelled by `family`.
    pub const REBUILD_MS: &str = "tickstate.rebuild_ms";
    /// Histogram of tick pass durations in ms.
    pub const TICK_MS: &str = "tickstate.tick_ms";
}

/// Counters of one cache entry.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EntryStats {
    /// Entry name.
    pub name: &'static str,
    /// Validity policy.
    #[serde(serialize_with = "serialize_policy")]
    pub policy: Policy,
    /// Reads served from the cache.
    pub hits: u64,
    /// Reads that rebuilt.
    pub misses: u64,
    /// Values stored.
    pub rebuilds: u64,
    /// `hits / (hits + misses)`, 0.0 before any read.
    pub hit_rate: f64,
    /// Whether the cached value is currently valid.
    pub valid: bool,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn serialize_policy<S: serde::Serializer>(policy: &Policy, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(policy)
}

impl EntryStats {
    /// Snapshot an entry's counters.
    pub fn of<T>(entry: &CacheEntry<T>, tick: Tick, dirty: bool) -> Self {
        Self {
            name: entry.name(),
            policy: entry.policy(),
            hits: entry.hits(),
            misses: entry.misses(),
            rebuilds: entry.rebuilds(),
            hit_rate: entry.hit_rate(),
            valid: entry.is_valid(tick, dirty),
        }
    }

    /// Reads of any kind.
    pub fn accesses(&self) -> u64 {
        self.hits + self.misses
    }
}

/// Counters of every cache entry at one tick.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CacheStats {
    /// Tick the stats were taken at.
    pub tick: Tick,
    /// One row per entry.
    pub entries: Vec<EntryStats>,
}

impl CacheStats {
    /// Row for an entry by name.
    pub fn entry(&self, name: &str) -> Option<&EntryStats> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Whether every entry that has been read reaches `target`. Always true
    /// while the first entry (the actor) has fewer than `warmup` accesses.
    pub fn targets_met(&self, target: f64, warmup: u64) -> bool {
        let warmed = self.entries.first().is_some_and(|e| e.accesses() >= warmup);
        !warmed
            || self
                .entries
                .iter()
                .filter(|e| e.accesses() > 0)
                .all(|e| e.hit_rate >= target)
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CacheStats[tick={}]", self.tick)?;
        for e in &self.entries {
            write!(
                f,
                " {}={:.1}% ({} rebuilds)",
                e.name,
                e.hit_rate * 100.0,
                e.rebuilds
            )?;
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
