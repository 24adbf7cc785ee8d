//! [Entities](Entity) represent the individual "things" in your game or application.
//!
//! An [Entity] doesn't store any data and has no associated behaviour;  
//! instead, it identifies which pieces of data ([Components](crate::components::Component)) belong together.
//! Entities are created and destroyed through a [World](crate::World) only.

mod entity;
mod entity_record;

pub use entity::*;
pub use entity_record::*;
