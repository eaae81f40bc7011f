//! Cache entries and staleness policies.
//!
//! A [`CacheEntry`] holds the last built snapshot of one family together with
//! the tick it was built on and access counters. Its [`Policy`] decides, given
//! the current tick and the family's dirty flag, whether that snapshot may be
//! served as-is.

use std::fmt;
use std::sync::Arc;

use tickstate_core::Tick;

use crate::dirty::Family;

/// When a cached value may be served without a rebuild.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Policy {
    /// Valid only on the tick it was built.
    PerTick,
    /// Valid until the family is marked dirty.
    EventInvalidated(Family),
    /// Valid for `ttl` ticks while the family is clean. At most one rebuild
    /// per tick: a second miss on the rebuild tick is served the stale value.
    BoundedTtl {
        /// Lifetime in ticks.
        ttl: u64,
        /// Family whose dirty flag also invalidates.
        family: Family,
    },
}

impl Policy {
    /// Family whose dirty flag gates this policy.
    #[must_use]
    pub fn family(self) -> Option<Family> {
        match self {
            Self::PerTick => None,
            Self::EventInvalidated(family) | Self::BoundedTtl { family, .. } => Some(family),
        }
    }

    /// Whether a value built at `built_at` is still valid at `current`.
    #[must_use]
    pub fn is_valid(self, built_at: Tick, current: Tick, dirty: bool) -> bool {
        match self {
            Self::PerTick => built_at == current,
            Self::EventInvalidated(_) => !dirty,
            Self::BoundedTtl { ttl, .. } => current.saturating_sub(built_at) < ttl && !dirty,
        }
    }

    /// Whether a second rebuild within one tick is suppressed.
    #[must_use]
    pub fn coalesces(self) -> bool {
        matches!(self, Self::BoundedTtl { .. })
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PerTick => f.write_str("PER_TICK"),
            Self::EventInvalidated(family) => write!(f, "EVENT_INVALIDATED({family})"),
            Self::BoundedTtl { ttl, family } => write!(f, "BOUNDED_TTL({ttl}, {family})"),
        }
    }
}

/// One cached snapshot with its freshness metadata.
///
/// Values are stored behind `Arc` so a consumer holding an older snapshot is
/// never affected by a rebuild.
#[derive(Debug)]
pub struct CacheEntry<T> {
    name: &'static str,
    policy: Policy,
    value: Option<Arc<T>>,
    built_at: Option<Tick>,
    last_rebuild_tick: Option<Tick>,
    hits: u64,
    misses: u64,
    rebuilds: u64,
}

impl<T> CacheEntry<T> {
    /// An empty entry.
    #[must_use]
    pub fn new(name: &'static str, policy: Policy) -> Self {
        Self {
            name,
            policy,
            value: None,
            built_at: None,
            last_rebuild_tick: None,
            hits: 0,
            misses: 0,
            rebuilds: 0,
        }
    }

    /// Entry name used in logs and stats.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Staleness policy.
    #[must_use]
    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// Whether the cached value may be served at `tick`.
    #[must_use]
    pub fn is_valid(&self, tick: Tick, dirty: bool) -> bool {
        match (self.value.as_ref(), self.built_at) {
            (Some(_), Some(built_at)) => self.policy.is_valid(built_at, tick, dirty),
            _ => false,
        }
    }

    /// The cached value if it may be served, counting a hit or a miss.
    pub fn get_if_valid(&mut self, tick: Tick, dirty: bool) -> Option<Arc<T>> {
        if self.is_valid(tick, dirty) {
            self.hits += 1;
            return self.value.clone();
        }
        if self.policy.coalesces() && self.last_rebuild_tick == Some(tick) {
            if let Some(stale) = self.value.clone() {
                self.hits += 1;
                return Some(stale);
            }
        }
        self.misses += 1;
        None
    }

    /// Store a freshly built value.
    pub fn set(&mut self, tick: Tick, value: T) -> Arc<T> {
        let value = Arc::new(value);
        self.value = Some(Arc::clone(&value));
        self.built_at = Some(tick);
        self.last_rebuild_tick = Some(tick);
        self.rebuilds += 1;
        value
    }

    /// Force the next access to rebuild. The last value stays readable
    /// through [`get_stale`](Self::get_stale).
    pub fn invalidate(&mut self) {
        self.built_at = None;
        self.last_rebuild_tick = None;
    }

    /// Drop the value and every counter.
    pub fn reset(&mut self) {
        self.value = None;
        self.built_at = None;
        self.last_rebuild_tick = None;
        self.hits = 0;
        self.misses = 0;
        self.rebuilds = 0;
    }

    /// Last stored value regardless of validity.
    #[must_use]
    pub fn get_stale(&self) -> Option<Arc<T>> {
        self.value.clone()
    }

    /// Tick the current value was built on.
    #[must_use]
    pub fn built_at(&self) -> Option<Tick> {
        self.built_at
    }

    /// Accesses served from cache.
    #[must_use]
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Accesses that required a rebuild.
    #[must_use]
    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Total accesses.
    #[must_use]
    pub fn accesses(&self) -> u64 {
        self.hits + self.misses
    }

    /// Number of stored values since the last reset.
    #[must_use]
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    /// Share of accesses served from cache, 0.0 with no accesses.
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        match self.accesses() {
            0 => 0.0,
            total => self.hits as f64 / total as f64,
        }
    }

    /// Human-readable status at `tick`.
    #[must_use]
    pub fn describe(&self, tick: Tick, dirty: bool) -> String {
        format!(
            "CacheEntry[{}, policy={}, valid={}, hitRate={:.1}%]",
            self.name,
            self.policy,
            self.is_valid(tick, dirty),
            self.hit_rate() * 100.0
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn world_ttl(ttl: u64) -> Policy {
        Policy::BoundedTtl {
            ttl,
            family: Family::World,
        }
    }

    #[test]
    fn empty_entry_misses() {
        let mut entry: CacheEntry<i32> = CacheEntry::new("actor", Policy::PerTick);
        assert!(entry.get_if_valid(0, false).is_none());
        assert_eq!(entry.misses(), 1);
        assert!((entry.hit_rate() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn per_tick_valid_only_on_build_tick() {
        let mut entry = CacheEntry::new("actor", Policy::PerTick);
        let _ = entry.set(3, 42);
        assert_eq!(entry.get_if_valid(3, false).as_deref(), Some(&42));
        assert_eq!(entry.get_if_valid(3, true).as_deref(), Some(&42));
        assert!(entry.get_if_valid(4, false).is_none());
        assert_eq!(entry.hits(), 2);
        assert_eq!(entry.misses(), 1);
    }

    #[test]
    fn event_invalidated_ignores_age() {
        let mut entry = CacheEntry::new("inventory", Policy::EventInvalidated(Family::Inventory));
        let stored = entry.set(1, "bag".to_string());
        let served = entry.get_if_valid(1_000, false);
        assert!(served.is_some_and(|v| Arc::ptr_eq(&v, &stored)));
        assert!(entry.get_if_valid(1_000, true).is_none());
    }

    #[test]
    fn bounded_ttl_expires() {
        let mut entry = CacheEntry::new("world", world_ttl(5));
        let _ = entry.set(10, 1);
        assert!(entry.get_if_valid(14, false).is_some());
        assert!(entry.get_if_valid(15, false).is_none());
    }

    #[test]
    fn bounded_ttl_coalesces_within_rebuild_tick() {
        let mut entry = CacheEntry::new("world", world_ttl(5));
        let _ = entry.set(7, 1);
        // Dirty again on the same tick: stale value, no rebuild.
        assert_eq!(entry.get_if_valid(7, true).as_deref(), Some(&1));
        // Next tick the dirty flag wins.
        assert!(entry.get_if_valid(8, true).is_none());
    }

    #[test]
    fn per_tick_does_not_coalesce() {
        let mut entry = CacheEntry::new("combat", Policy::PerTick);
        let _ = entry.set(7, 1);
        entry.invalidate();
        assert!(entry.get_if_valid(7, false).is_none());
    }

    #[test]
    fn invalidate_keeps_stale_value() {
        let mut entry = CacheEntry::new("world", world_ttl(5));
        let _ = entry.set(2, 9);
        entry.invalidate();
        assert!(!entry.is_valid(2, false));
        assert!(entry.get_if_valid(2, false).is_none());
        assert_eq!(entry.get_stale().as_deref(), Some(&9));
    }

    #[test]
    fn reset_clears_everything() {
        let mut entry = CacheEntry::new("world", world_ttl(5));
        let _ = entry.set(2, 9);
        let _ = entry.get_if_valid(2, false);
        entry.reset();
        assert!(entry.get_stale().is_none());
        assert_eq!(entry.accesses(), 0);
        assert_eq!(entry.rebuilds(), 0);
    }

    #[test]
    fn describe_format() {
        let mut entry = CacheEntry::new("inventory", Policy::EventInvalidated(Family::Inventory));
        let _ = entry.set(1, 0);
        let _ = entry.get_if_valid(1, false);
        let _ = entry.get_if_valid(1, true);
        insta::assert_snapshot!(
            entry.describe(1, false),
            @"CacheEntry[inventory, policy=EVENT_INVALIDATED(inventory), valid=true, hitRate=50.0%]"
        );
    }

    proptest! {
        #[test]
        fn ttl_validity_matches_age(built in 0u64..10_000, age in 0u64..50, ttl in 1u64..20) {
            let policy = world_ttl(ttl);
            prop_assert_eq!(policy.is_valid(built, built + age, false), age < ttl);
            prop_assert!(!policy.is_valid(built, built + age, true));
        }

        #[test]
        fn per_tick_validity(built in 0u64..10_000, current in 0u64..10_000) {
            prop_assert_eq!(Policy::PerTick.is_valid(built, current, true), built == current);
        }
    }
}
