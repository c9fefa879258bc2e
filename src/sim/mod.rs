//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - Frame-rate independent updates scaled to a 60 Hz reference frame
//! - Seeded RNG only
//! - Stable iteration order (by slot, then entity ID)
//! - No rendering or platform dependencies

pub mod behavior;
pub mod collision;
pub mod entity;
pub mod events;
pub mod kind;
pub mod shape;
pub mod shatter;
pub mod tunnel;
pub mod world;

pub use behavior::{SpawnRequest, TickInput};
pub use collision::{Dispatch, Interaction, broad_phase, dispatch, narrow_phase, test_collision};
pub use entity::{Entity, EntityState, Lifetime, Transition};
pub use events::GameEvent;
pub use kind::EntityKind;
pub use shape::Rect;
pub use shatter::Shatter;
pub use tunnel::Tunnel;
pub use world::{DrawItem, Handle, World};
