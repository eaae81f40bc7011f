use serde::{Deserialize, Serialize};
use tickstate_core::constants::panels;

/// World scan radii and UI panel discovery.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorldScanSettings {
    /// Chebyshev radius for NPCs, objects, players, projectiles, graphics.
    pub entity_radius: i32,
    /// Chebyshev radius for ground items.
    pub ground_item_radius: i32,
    /// Upper bound (exclusive) of the one-off panel id scan.
    pub panel_scan_limit: i32,
    /// Panels always checked even if the full scan missed them.
    pub known_panel_ids: Vec<i32>,
}

impl Default for WorldScanSettings {
    fn default() -> Self {
        Self {
            entity_radius: 20,
            ground_item_radius: 15,
            panel_scan_limit: 1000,
            known_panel_ids: panels::KNOWN.to_vec(),
        }
    }
}
