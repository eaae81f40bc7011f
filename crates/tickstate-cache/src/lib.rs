//! # tickstate-cache
//!
//! Tick-scoped cache of simulation snapshots.
//!
//! [`StateService`] owns one [`CacheEntry`] per family, each with a
//! [`Policy`] deciding when the cached snapshot is still good:
//!
//! - **Per tick**: actor, combat and assignment progress, rebuilt on the
//!   first read of each tick
//! - **Event invalidated**: inventory and equipment, rebuilt only after a
//!   container change marks them dirty
//! - **Bounded TTL**: the world scan, rebuilt when its TTL expires or a
//!   spawn marks it dirty, at most once per tick
//!
//! Events ([`SimEvent`]) never rebuild anything; they mark families dirty
//! and record facts for the next pull. Ground-item prices are resolved on a
//! background worker ([`PriceEnricher`]) and session boundaries are
//! broadcast to registered [`SessionHook`]s.

#![deny(unsafe_code)]

pub mod builders;
pub mod context;
pub mod diagnostics;
pub mod dirty;
pub mod enrichment;
pub mod entry;
pub mod events;
pub mod lifecycle;
pub mod reference;
pub mod service;

#[cfg(test)]
mod fake;

pub use context::CacheContext;
pub use diagnostics::{CacheStats, EntryStats};
pub use dirty::{DirtyFlags, Family};
pub use enrichment::{EnrichError, PriceEnricher, PriceSource};
pub use entry::{CacheEntry, Policy};
pub use events::SimEvent;
pub use lifecycle::{HookRegistry, HookReport, SessionContext, SessionHook};
pub use reference::{
    CombatReference, NpcCombatData, StaticCombatReference, TaskInfo, TaskInfoProvider, WeaponData,
};
pub use service::{StateService, StateServiceBuilder};
