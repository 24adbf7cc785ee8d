//! A runtime for the Entity-Component-System pattern.
//!
//! [Components](components::Component) are plain data records attached to [entities](entities::Entity);
//! [systems](systems::System) declare the component types they require and process every entity carrying them.
//! A [World] ties them together and drives the per-tick update, either sequentially
//! or running systems with disjoint requirements in parallel.

extern crate self as weave_ecs;

pub mod components;
pub mod entities;
pub mod systems;
pub mod config;
pub mod error;
mod context;
mod world;

pub use lazy_static::lazy_static;

pub use context::ContextRegistry;
pub use error::{EcsError, Result};
pub use world::World;

pub mod prelude {
	pub use crate::systems::*;
	pub use crate::components::*;
	pub use crate::world::World;
	pub use crate::entities::{Entity, EntityRecord};
	pub use crate::config::{ExecutionMode, WorldConfig};
}

#[cfg(test)]
mod tests;
