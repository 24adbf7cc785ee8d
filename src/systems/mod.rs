//! [Systems](System) provide the logic for modifying the state of [Entities](crate::entities::Entity)
//! and their associated [Components](crate::components::Component).
//!
//! A [System] must be manually added to a [World](crate::World) together with its
//! [Signature](crate::components::Signature) for it to become active during the execution of the program.

mod system;
mod entity_system;
mod system_registry;

pub use system::*;
pub use entity_system::*;
pub use system_registry::*;
