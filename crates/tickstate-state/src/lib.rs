//! # tickstate-state
//!
//! Immutable snapshot value types produced by the state cache.
//!
//! Every snapshot is built fresh on rebuild and never mutated afterwards, so
//! a value handed to a consumer stays valid however long it is held. Each
//! family has an `empty()` sentinel returned before login or when the
//! simulation cannot serve the read.

#![deny(unsafe_code)]

pub mod actor;
pub mod combat;
pub mod equipment;
pub mod interface;
pub mod inventory;
pub mod market;
pub mod poison;
pub mod task;
pub mod world;

pub use actor::ActorState;
pub use combat::{AggressorInfo, AttackStyle, CombatState};
pub use equipment::EquipmentState;
pub use interface::InterfaceMode;
pub use inventory::InventoryState;
pub use market::BuyLimitStatus;
pub use poison::{PoisonKind, PoisonState};
pub use task::TaskProgressState;
pub use world::{
    GraphicsSnapshot, GroundItemSnapshot, NpcSnapshot, ObjectSnapshot, PlayerSnapshot,
    ProjectileSnapshot, WorldState,
};
