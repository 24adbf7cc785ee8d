use crate::components::{ComponentId, ComponentType};
use crate::entities::Entity;

/// The bookkeeping a [World](crate::World) keeps per live [Entity]:
/// the ordered list of [component types](ComponentType) it currently owns.
///
/// The list is only used to route the entity to systems and to resolve detachment;
/// component values live in the [ComponentStore](crate::components::ComponentStore).
#[derive(Clone, Debug)]
pub struct EntityRecord {
	entity: Entity,
	components: Vec<ComponentType>,
}

impl EntityRecord {
	pub(crate) fn new(entity: Entity) -> Self {
		Self {
			entity,
			components: Vec::new(),
		}
	}

	pub fn entity(&self) -> Entity {
		self.entity
	}

	pub fn components(&self) -> &[ComponentType] {
		&self.components
	}

	pub fn has_component(&self, id: ComponentId) -> bool {
		self.components.iter().any(|t| t.id() == id)
	}

	/// Appends `ty` to the list. A type already attached keeps its position.
	pub(crate) fn attach_component(&mut self, ty: ComponentType) {
		if !self.has_component(ty.id()) {
			self.components.push(ty);
		}
	}

	pub(crate) fn attach_components(&mut self, types: &[ComponentType]) {
		for ty in types {
			self.attach_component(*ty);
		}
	}

	pub(crate) fn detach_component(&mut self, id: ComponentId) -> bool {
		match self.components.iter().position(|t| t.id() == id) {
			Some(index) => {
				self.components.remove(index);
				true
			},
			None => false,
		}
	}
}
