//! # tickstate-core
//!
//! Foundation types shared by every tickstate crate:
//!
//! - **Tick**: the discrete simulation step counter all freshness is measured in
//! - **Branded IDs**: [`SessionId`], [`AccountId`] as newtypes for type safety
//! - **Geometry**: [`WorldPoint`] and [`SceneBounds`] with Chebyshev distance
//! - **Simulation boundary**: the read-only [`SimulationClient`] trait and the raw
//!   records it returns
//! - **Errors**: [`StateError`] via `thiserror`

#![deny(unsafe_code)]

pub mod client;
pub mod constants;
pub mod errors;
pub mod geometry;
pub mod ids;
pub mod items;
pub mod skills;

pub use client::{
    ActorRef, ChatKind, GraphicRecord, GroundItemRecord, ItemDefinition, LocalActor, NpcRecord,
    ObjectDefinition, ObjectRecord, PlayerRecord, ProjectileRecord, SimulationClient,
};
pub use errors::{Result, StateError};
pub use geometry::{SceneBounds, WorldPoint};
pub use ids::{AccountId, SessionId};
pub use items::Item;
pub use skills::Skill;

/// One discrete simulation step. Starts at 0 for every session.
pub type Tick = u64;

/// Client animation cycles per tick.
pub const CYCLES_PER_TICK: i32 = 30;
