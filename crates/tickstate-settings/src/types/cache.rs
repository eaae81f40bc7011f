use serde::{Deserialize, Serialize};

/// Cache policy and diagnostics thresholds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CacheSettings {
    /// Ticks a world snapshot stays fresh without a dirtying event.
    pub world_ttl_ticks: u64,
    /// Minimum hit rate every family must reach once warmed up.
    pub hit_rate_target: f64,
    /// Accesses on the actor family before hit-rate targets are enforced.
    pub warmup_accesses: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            world_ttl_ticks: 5,
            hit_rate_target: 0.90,
            warmup_accesses: 100,
        }
    }
}

/// Soft deadlines. Breaches are logged, never enforced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BudgetSettings {
    /// Whole tick pass.
    pub tick_budget_ms: u64,
    /// World snapshot build.
    pub world_build_warn_ms: u64,
    /// Any single entry rebuild.
    pub entry_rebuild_debug_ms: u64,
}

impl Default for BudgetSettings {
    fn default() -> Self {
        Self {
            tick_budget_ms: 5,
            world_build_warn_ms: 2,
            entry_rebuild_debug_ms: 1,
        }
    }
}
