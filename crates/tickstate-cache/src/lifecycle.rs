//! Session lifecycle hooks for external collaborators.
//!
//! Subsystems that track the session (fatigue, attention, profiles) register
//! a [`SessionHook`] and are told when a session starts and ends. The cache
//! knows nothing about them. Hooks are fail-open: an error or panic is logged,
//! counted against the hook's circuit breaker, and never stops the other
//! hooks or the cache itself.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tickstate_core::{AccountId, SessionId, StateError, Tick};
use tickstate_settings::HookSettings;
use tracing::warn;

/// What a hook is told about the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionContext {
    /// Id of the session.
    pub session_id: SessionId,
    /// Account identity, when the simulation has loaded it.
    pub account: Option<AccountId>,
    /// Tick at the time of the call.
    pub tick: Tick,
}

/// A collaborator notified of session boundaries.
pub trait SessionHook: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// A session began.
    fn on_session_start(&self, ctx: &SessionContext) -> Result<(), StateError>;

    /// The session ended.
    fn on_session_end(&self, ctx: &SessionContext) -> Result<(), StateError>;
}

/// Outcome of firing one lifecycle event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HookReport {
    /// Hooks that ran and succeeded.
    pub ran: usize,
    /// Hooks that returned an error or panicked.
    pub failed: usize,
    /// Hooks skipped because their breaker is open.
    pub skipped: usize,
}

impl HookReport {
    /// Whether every hook ran successfully.
    pub fn is_clean(&self) -> bool {
        self.failed == 0 && self.skipped == 0
    }
}

/// Consecutive failures of one hook. The hook is skipped until
/// `open_until` once `failures` reaches the registry threshold.
#[derive(Debug, Default)]
struct Breaker {
    failures: u32,
    open_until: Option<Instant>,
}

impl Breaker {
    fn is_open(&self, now: Instant) -> bool {
        self.open_until.is_some_and(|until| now < until)
    }

    /// Count a failure. Returns true when this failure trips the breaker.
    fn record_failure(&mut self, threshold: u32, cooldown: Duration, now: Instant) -> bool {
        self.failures = self.failures.saturating_add(1);
        if self.failures < threshold {
            return false;
        }
        let first_trip = self.open_until.is_none();
        self.open_until = Some(now.checked_add(cooldown).unwrap_or(now));
        first_trip
    }

    fn record_success(&mut self) {
        *self = Self::default();
    }
}

struct HookEntry {
    hook: Arc<dyn SessionHook>,
    breaker: Breaker,
}

#[derive(Clone, Copy)]
enum Phase {
    Start,
    End,
}

/// Registered session hooks, run in registration order.
pub struct HookRegistry {
    hooks: Vec<HookEntry>,
    threshold: u32,
    cooldown: Duration,
}

impl HookRegistry {
    /// Empty registry with breaker limits from settings.
    pub fn new(settings: &HookSettings) -> Self {
        Self {
            hooks: Vec::new(),
            threshold: settings.failure_threshold,
            cooldown: Duration::from_secs(settings.cooldown_secs),
        }
    }

    /// Add a hook.
    pub fn register(&mut self, hook: Arc<dyn SessionHook>) {
        self.hooks.push(HookEntry {
            hook,
            breaker: Breaker::default(),
        });
    }

    /// Number of registered hooks.
    pub fn hook_count(&self) -> usize {
        self.hooks.len()
    }

    /// Whether any hook is registered.
    pub fn has_hooks(&self) -> bool {
        !self.hooks.is_empty()
    }

    /// Tell every hook a session started.
    pub fn fire_start(&mut self, ctx: &SessionContext) -> HookReport {
        self.fire(Phase::Start, ctx)
    }

    /// Tell every hook the session ended.
    pub fn fire_end(&mut self, ctx: &SessionContext) -> HookReport {
        self.fire(Phase::End, ctx)
    }

    fn fire(&mut self, phase: Phase, ctx: &SessionContext) -> HookReport {
        let mut report = HookReport::default();
        for entry in &mut self.hooks {
            let now = Instant::now();
            if entry.breaker.is_open(now) {
                report.skipped += 1;
                continue;
            }
            let hook = entry.hook.as_ref();
            let outcome = catch_unwind(AssertUnwindSafe(|| match phase {
                Phase::Start => hook.on_session_start(ctx),
                Phase::End => hook.on_session_end(ctx),
            }));
            match outcome {
                Ok(Ok(())) => {
                    entry.breaker.record_success();
                    report.ran += 1;
                    continue;
                }
                Ok(Err(error)) => warn!(hook = hook.name(), %error, "session hook failed"),
                Err(_) => warn!(hook = hook.name(), "session hook panicked"),
            }
            report.failed += 1;
            if entry.breaker.record_failure(self.threshold, self.cooldown, now) {
                warn!(
                    hook = hook.name(),
                    failures = entry.breaker.failures,
                    cooldown_secs = self.cooldown.as_secs(),
                    "hook circuit breaker tripped"
                );
            }
        }
        report
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new(&HookSettings::default())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
