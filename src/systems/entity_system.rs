use crate::entities::Entity;

/// The list of [entities](Entity) tracked by a [System](crate::systems::System).
///
/// Meant to be embedded in a system, which forwards
/// [attach_entity](crate::systems::System::attach_entity),
/// [detach_entity](crate::systems::System::detach_entity) and
/// [entities](crate::systems::System::entities) to it.
#[derive(Default, Clone, Debug)]
pub struct EntitySystem {
	entities: Vec<Entity>,
}

impl EntitySystem {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn attach(&mut self, entity: Entity) {
		if !self.contains(entity) {
			self.entities.push(entity);
		}
	}

	/// Removes `entity`, preserving the order of the remaining entities.
	pub fn detach(&mut self, entity: Entity) -> bool {
		match self.entities.iter().position(|e| *e == entity) {
			Some(index) => {
				self.entities.remove(index);
				true
			},
			None => false,
		}
	}

	pub fn contains(&self, entity: Entity) -> bool {
		self.entities.contains(&entity)
	}

	pub fn entities(&self) -> &[Entity] {
		&self.entities
	}

	pub fn len(&self) -> usize {
		self.entities.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entities.is_empty()
	}
}
