use std::hash::{Hash, Hasher};
use crate::components::ComponentId;
use std::fmt;

/// A plain data record that can be attached to an [Entity](crate::entities::Entity).
///
/// Implemented by #\[derive([`Component`])], which also assigns the type its [ComponentId].
pub trait Component: 'static + Send + Sync {
	fn component_id() -> ComponentId;
}

/// This trait should only be implemented by #\[derive([`Component`])].
/// It provides a unified way to resolve a component's type through its base type and all derived ref types,
/// so `T`, `&T` and `&mut T` all name the same [ComponentType].
pub trait ComponentTypeInfo {
	type Component: Component;
}

impl<T: Component> ComponentTypeInfo for &T {
	type Component = T;
}

impl<T: Component> ComponentTypeInfo for &mut T {
	type Component = T;
}

/// A runtime representation of a type implementing the [`Component`] trait.
#[derive(Copy, Clone)]
pub struct ComponentType {
	id: ComponentId,
	name: &'static str,
}

impl ComponentType {
	/// Returns the [`ComponentType`] of T, resolving references to the referenced component.
	pub fn of<T: ComponentTypeInfo + ?Sized>() -> Self {
		Self::of_component::<T::Component>()
	}

	/// Returns the [`ComponentType`] of the component T.
	pub fn of_component<T: Component>() -> Self {
		Self {
			id: T::component_id(),
			name: std::any::type_name::<T>(),
		}
	}

	pub const fn id(&self) -> ComponentId {
		self.id
	}

	pub const fn name(&self) -> &'static str {
		self.name
	}
}

impl Eq for ComponentType {}

impl PartialEq<Self> for ComponentType {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id
	}
}

impl Hash for ComponentType {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.id.hash(state)
	}
}

impl nohash_hasher::IsEnabled for ComponentType {}

impl fmt::Debug for ComponentType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.name)
	}
}
