//! # tickstate-telemetry
//!
//! Structured logging via `tracing` plus in-memory rebuild metrics.
//!
//! - [`init_telemetry`] installs the global subscriber (compact text or JSON)
//! - [`MetricsRecorder`] keeps per-family rebuild counters and timing histograms
//! - [`capture_logs`] captures events in tests

#![deny(unsafe_code)]

mod capture;
mod metrics;

pub use capture::{CapturedEvent, CapturedLogs, capture_logs};
pub use metrics::{HistogramSummary, MetricsRecorder};

use std::str::FromStr;
use std::sync::Arc;

use parking_lot::RwLock;
use tickstate_settings::LoggingSettings;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Configuration for the telemetry subsystem.
#[derive(Clone, Debug)]
pub struct TelemetryConfig {
    /// Default log level. Overridden by `RUST_LOG` when set.
    pub log_level: Level,
    /// Per-module level overrides (e.g. `tickstate_cache::world` => DEBUG).
    pub module_levels: Vec<(String, Level)>,
    /// Emit JSON lines instead of compact text.
    pub json: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: Level::INFO,
            module_levels: Vec::new(),
            json: false,
        }
    }
}

impl TelemetryConfig {
    /// Build from the logging section of the settings file.
    ///
    /// An unparseable level falls back to `INFO`.
    #[must_use]
    pub fn from_settings(settings: &LoggingSettings) -> Self {
        Self {
            log_level: Level::from_str(&settings.level).unwrap_or(Level::INFO),
            module_levels: Vec::new(),
            json: settings.json,
        }
    }

    /// The `EnvFilter` directive string this config describes.
    #[must_use]
    pub fn filter_directive(&self) -> String {
        let mut filter = self.log_level.to_string().to_lowercase();
        for (module, level) in &self.module_levels {
            filter.push(',');
            filter.push_str(module);
            filter.push('=');
            filter.push_str(&level.to_string().to_lowercase());
        }
        filter
    }
}

/// Handle returned by [`init_telemetry`].
pub struct TelemetryGuard {
    installed: bool,
    level_filter: Arc<RwLock<Vec<(String, Level)>>>,
}

impl TelemetryGuard {
    /// Whether this call installed the global subscriber (false if one existed).
    pub fn installed(&self) -> bool {
        self.installed
    }

    /// Record a per-module level override.
    ///
    /// Takes effect for subscribers built from [`Self::module_levels`].
    pub fn set_module_level(&self, module: &str, level: Level) {
        let mut levels = self.level_filter.write();
        if let Some(entry) = levels.iter_mut().find(|(m, _)| m == module) {
            entry.1 = level;
        } else {
            levels.push((module.to_string(), level));
        }
    }

    /// Current per-module log level overrides.
    pub fn module_levels(&self) -> Vec<(String, Level)> {
        self.level_filter.read().clone()
    }
}

/// Install the global tracing subscriber. Subsequent calls are no-ops.
pub fn init_telemetry(config: &TelemetryConfig) -> TelemetryGuard {
    let level_filter = Arc::new(RwLock::new(config.module_levels.clone()));
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.filter_directive()));

    let installed = if config.json {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_writer(std::io::stderr);
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .is_ok()
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .compact()
            .with_target(true)
            .with_writer(std::io::stderr);
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .is_ok()
    };

    TelemetryGuard {
        installed,
        level_filter,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_directive_includes_modules() {
        let config = TelemetryConfig {
            log_level: Level::WARN,
            module_levels: vec![("tickstate_cache::world".into(), Level::DEBUG)],
            json: false,
        };
        assert_eq!(config.filter_directive(), "warn,tickstate_cache::world=debug");
    }

    #[test]
    fn from_settings_parses_level() {
        let settings = LoggingSettings {
            level: "debug".into(),
            json: true,
        };
        let config = TelemetryConfig::from_settings(&settings);
        assert_eq!(config.log_level, Level::DEBUG);
        assert!(config.json);
    }

    #[test]
    fn from_settings_bad_level_falls_back() {
        let settings = LoggingSettings {
            level: "chatty".into(),
            json: false,
        };
        assert_eq!(TelemetryConfig::from_settings(&settings).log_level, Level::INFO);
    }

    #[test]
    fn second_init_is_noop() {
        let _first = init_telemetry(&TelemetryConfig::default());
        let second = init_telemetry(&TelemetryConfig::default());
        assert!(!second.installed());
    }

    #[test]
    fn guard_module_levels() {
        let guard = init_telemetry(&TelemetryConfig::default());
        guard.set_module_level("tickstate_cache", Level::TRACE);
        guard.set_module_level("tickstate_cache", Level::DEBUG);
        assert_eq!(
            guard.module_levels(),
            vec![("tickstate_cache".to_string(), Level::DEBUG)]
        );
    }
}
