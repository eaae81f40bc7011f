//! Visible UI panel scan.
//!
//! The first scan of a session walks the whole id range once and remembers
//! which panels were visible. Later scans only check that discovered set
//! plus the allowlist of panels that can open mid-session. A panel that
//! turns up outside the allowlist is logged once per session.

use std::collections::{BTreeSet, HashSet};

use tickstate_core::SimulationClient;
use tickstate_settings::WorldScanSettings;
use tracing::debug;

/// Per-session panel discovery state.
#[derive(Debug, Default)]
pub struct PanelScanCache {
    discovered: Option<BTreeSet<i32>>,
    reported: HashSet<i32>,
}

impl PanelScanCache {
    /// Fresh cache; the next scan is a full one.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the full discovery scan has run this session.
    pub fn is_discovered(&self) -> bool {
        self.discovered.is_some()
    }

    /// Panel ids seen so far this session.
    pub fn discovered(&self) -> Option<&BTreeSet<i32>> {
        self.discovered.as_ref()
    }

    /// Forget everything. Called on session reset.
    pub fn clear(&mut self) {
        self.discovered = None;
        self.reported.clear();
    }

    /// Ids of the panels visible right now.
    pub fn scan(
        &mut self,
        client: &dyn SimulationClient,
        settings: &WorldScanSettings,
    ) -> BTreeSet<i32> {
        let known = &settings.known_panel_ids;

        let Some(discovered) = self.discovered.as_mut() else {
            let visible: BTreeSet<i32> = (0..settings.panel_scan_limit)
                .filter(|id| client.is_panel_visible(*id))
                .collect();
            for id in visible.iter().filter(|id| !known.contains(id)) {
                if self.reported.insert(*id) {
                    debug!(panel_id = *id, "discovered panel outside known set");
                }
            }
            self.discovered = Some(visible.clone());
            return visible;
        };

        let candidates: BTreeSet<i32> = discovered.iter().chain(known.iter()).copied().collect();
        let visible: BTreeSet<i32> = candidates
            .into_iter()
            .filter(|id| client.is_panel_visible(*id))
            .collect();
        discovered.extend(visible.iter().copied());
        visible
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
