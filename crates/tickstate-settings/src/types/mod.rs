//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase", default)]` so a settings
//! file may specify any subset of fields; missing ones keep their default.

mod cache;
mod runtime;
mod world;

pub use cache::*;
pub use runtime::*;
pub use world::*;

use serde::{Deserialize, Serialize};

use crate::errors::SettingsError;

/// Root settings type.
///
/// ```json
/// {
///   "cache": { "worldTtlTicks": 8 },
///   "logging": { "level": "debug" }
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StateSettings {
    /// Policy and diagnostics thresholds.
    pub cache: CacheSettings,
    /// Soft deadlines.
    pub budget: BudgetSettings,
    /// World scan radii and panel discovery.
    pub world: WorldScanSettings,
    /// Background price enrichment.
    pub enrichment: EnrichmentSettings,
    /// Session hook fail-open behavior.
    pub hooks: HookSettings,
    /// Log output.
    pub logging: LoggingSettings,
}

impl StateSettings {
    /// Reject values the cache cannot operate with.
    pub fn validate(&self) -> crate::Result<()> {
        if self.cache.world_ttl_ticks == 0 {
            return Err(SettingsError::OutOfRange {
                key: "cache.worldTtlTicks",
                reason: "must be at least 1".into(),
            });
        }
        if !(0.0..=1.0).contains(&self.cache.hit_rate_target) {
            return Err(SettingsError::OutOfRange {
                key: "cache.hitRateTarget",
                reason: format!("must be within 0..=1, got {}", self.cache.hit_rate_target),
            });
        }
        if self.world.ground_item_radius > self.world.entity_radius {
            return Err(SettingsError::OutOfRange {
                key: "world.groundItemRadius",
                reason: format!("must not exceed world.entityRadius ({})", self.world.entity_radius),
            });
        }
        Ok(())
    }
}
