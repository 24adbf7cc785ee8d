use std::any::{Any, TypeId};
use std::collections::HashMap;

/// Shared services available to systems through the [World](crate::World),
/// e.g. a clock or an asset table. Holds at most one value per type.
#[derive(Default)]
pub struct ContextRegistry {
	values: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl ContextRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Stores `value`, returning the value of the same type it replaces.
	pub fn insert<T: 'static + Send + Sync>(&mut self, value: T) -> Option<T> {
		let previous = self.values.insert(TypeId::of::<T>(), Box::new(value))?;
		previous.downcast::<T>().ok().map(|boxed| *boxed)
	}

	pub fn get<T: 'static + Send + Sync>(&self) -> Option<&T> {
		self.values.get(&TypeId::of::<T>())?.downcast_ref::<T>()
	}

	pub fn get_mut<T: 'static + Send + Sync>(&mut self) -> Option<&mut T> {
		self.values.get_mut(&TypeId::of::<T>())?.downcast_mut::<T>()
	}

	pub fn remove<T: 'static + Send + Sync>(&mut self) -> Option<T> {
		let value = self.values.remove(&TypeId::of::<T>())?;
		value.downcast::<T>().ok().map(|boxed| *boxed)
	}

	pub fn contains<T: 'static + Send + Sync>(&self) -> bool {
		self.values.contains_key(&TypeId::of::<T>())
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	pub fn clear(&mut self) {
		self.values.clear();
	}
}
