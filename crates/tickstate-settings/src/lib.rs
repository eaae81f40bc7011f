//! # tickstate-settings
//!
//! Configuration for the state cache, loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`StateSettings::default()`]
//! 2. **User file**: `~/.tickstate/settings.json` (deep-merged over defaults)
//! 3. **Environment variables**: `TICKSTATE_*` overrides (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use tickstate_settings::get_settings;
//!
//! let settings = get_settings();
//! println!("world TTL: {} ticks", settings.cache.world_ttl_ticks);
//! ```

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::*;

use std::sync::OnceLock;

/// Global settings singleton, initialized on first access.
static SETTINGS: OnceLock<StateSettings> = OnceLock::new();

/// Get the global settings instance.
///
/// On first call, loads settings from `~/.tickstate/settings.json` with env
/// var overrides. If loading fails, returns compiled defaults.
pub fn get_settings() -> &'static StateSettings {
    SETTINGS.get_or_init(|| {
        load_settings().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to load settings, using defaults");
            StateSettings::default()
        })
    })
}

/// Initialize the global settings with a specific value.
///
/// Returns the provided settings back if the global was already initialized.
#[allow(clippy::result_large_err)]
pub fn init_settings(settings: StateSettings) -> std::result::Result<(), StateSettings> {
    SETTINGS.set(settings)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
