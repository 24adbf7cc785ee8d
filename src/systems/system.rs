use crate::entities::Entity;
use crate::world::World;
use std::time::Duration;
use std::fmt;

/// It provides the logic for modifying the state of [Entities](crate::entities::Entity)
/// and their associated [Components](crate::components::Component).
///
/// A system only processes the entities the [World] attached to it, i.e. the entities whose
/// component types are a superset of the [Signature](crate::components::Signature) it was registered with.
///
/// When the world runs in parallel mode, a system may run concurrently with any other system
/// whose signature shares no type with its own. It must therefore only access the component types it declared.
pub trait System: Send + Sync {
	/// Executes the system.
	fn run(&mut self, world: &World, delta: Duration);

	/// Starts tracking `entity`. Called by the [World], **not by user code**.
	fn attach_entity(&mut self, entity: Entity);

	/// Stops tracking `entity`. Called by the [World], **not by user code**.
	fn detach_entity(&mut self, entity: Entity);

	/// The entities currently tracked by the system.
	fn entities(&self) -> &[Entity];

	/// Systems with a higher priority run earlier.
	fn priority(&self) -> i32 {
		0
	}

	fn name(&self) -> &str {
		std::any::type_name::<Self>()
	}
}

/// A handle to a [System] registered in a [SystemRegistry](crate::systems::SystemRegistry).
#[derive(Hash, Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Debug)]
pub struct SystemId(pub(crate) u64);

impl nohash_hasher::IsEnabled for SystemId {}

impl fmt::Display for SystemId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "system#{}", self.0)
	}
}
