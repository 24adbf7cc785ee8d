//! [Components](Component) are the plain data records attached to [entities](crate::entities::Entity).
//!
//! Every component type gets a process-unique [ComponentId] from #\[derive([Component])],
//! which keys its map in the [ComponentStore].

mod component_id;
mod component_set;
mod component_type;
mod component_store;
mod component_bundle;

pub use component_id::*;
pub use component_set::*;
pub use component_type::*;
pub use component_store::*;
pub use component_bundle::*;
pub use weave_ecs_derive::{Bundle, Component};
