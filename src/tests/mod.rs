mod world_tests;

use crate::components::Component;
use crate::systems::{EntitySystem, System};
use crate::entities::Entity;
use parking_lot::Mutex;
use std::time::Duration;
use crate::World;
use std::sync::Arc;

#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Position {
	pub x: i32,
	pub y: i32,
}

#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Velocity {
	pub dx: i32,
	pub dy: i32,
}

#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Bounds {
	pub width: i32,
	pub height: i32,
}

#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Comm;

/// Adds each entity's velocity to its position.
#[derive(Default)]
pub struct MoveSystem {
	pub tracked: EntitySystem,
	pub visited: Arc<Mutex<Vec<Entity>>>,
}

impl System for MoveSystem {
	fn run(&mut self, world: &World, _: Duration) {
		let mut positions = world.components_mut::<Position>();
		let velocities = world.components::<Velocity>();

		for (entity, velocity) in velocities.query(self.tracked.entities()) {
			if let Some(position) = positions.get_mut(entity) {
				position.x += velocity.dx;
				position.y += velocity.dy;
			}
			self.visited.lock().push(entity);
		}
	}

	fn attach_entity(&mut self, entity: Entity) {
		self.tracked.attach(entity)
	}

	fn detach_entity(&mut self, entity: Entity) {
		self.tracked.detach(entity);
	}

	fn entities(&self) -> &[Entity] {
		self.tracked.entities()
	}

	fn priority(&self) -> i32 {
		1000
	}
}

/// Reads positions and bounds without changing them.
#[derive(Default)]
pub struct CollisionSystem {
	pub tracked: EntitySystem,
	pub visited: Arc<Mutex<Vec<Entity>>>,
}

impl System for CollisionSystem {
	fn run(&mut self, world: &World, _: Duration) {
		let positions = world.components::<Position>();
		let bounds = world.components::<Bounds>();

		for entity in self.tracked.entities() {
			assert!(positions.contains(*entity));
			assert!(bounds.contains(*entity));
			self.visited.lock().push(*entity);
		}
	}

	fn attach_entity(&mut self, entity: Entity) {
		self.tracked.attach(entity)
	}

	fn detach_entity(&mut self, entity: Entity) {
		self.tracked.detach(entity);
	}

	fn entities(&self) -> &[Entity] {
		self.tracked.entities()
	}

	fn priority(&self) -> i32 {
		999
	}
}

/// Does nothing but track entities, with a configurable priority.
#[derive(Default)]
pub struct IdleSystem {
	pub tracked: EntitySystem,
	pub priority: i32,
}

impl IdleSystem {
	pub fn with_priority(priority: i32) -> Self {
		Self {
			priority,
			..Self::default()
		}
	}
}

impl System for IdleSystem {
	fn run(&mut self, _: &World, _: Duration) {}

	fn attach_entity(&mut self, entity: Entity) {
		self.tracked.attach(entity)
	}

	fn detach_entity(&mut self, entity: Entity) {
		self.tracked.detach(entity);
	}

	fn entities(&self) -> &[Entity] {
		self.tracked.entities()
	}

	fn priority(&self) -> i32 {
		self.priority
	}
}
