use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use crate::components::{Component, ComponentId, ComponentType};
use crate::components::ComponentBundle;
use nohash_hasher::IntMap;
use crate::entities::Entity;
use std::any::Any;

/// Type-indexed, entity-indexed storage for [components](Component).
///
/// Components are stored in a two-level index: [component type](ComponentType) → [Entity] → value.
/// Every per-type map sits behind its own reader/writer lock, so a [World](crate::World)
/// can be shared across the members of a parallel group while each system borrows the types it declared.
#[derive(Default)]
pub struct ComponentStore {
	storages: IntMap<ComponentId, Box<dyn ErasedStorage>>,
}

trait ErasedStorage: Send + Sync {
	fn remove(&mut self, entity: Entity) -> bool;
	fn len(&self) -> usize;
	fn as_any(&self) -> &dyn Any;
	fn as_any_mut(&mut self) -> &mut dyn Any;
}

struct TypedStorage<T> {
	components: RwLock<IntMap<Entity, T>>,
}

impl<T: Component> ErasedStorage for TypedStorage<T> {
	fn remove(&mut self, entity: Entity) -> bool {
		self.components.get_mut().remove(&entity).is_some()
	}

	fn len(&self) -> usize {
		self.components.read().len()
	}

	fn as_any(&self) -> &dyn Any {
		self
	}

	fn as_any_mut(&mut self) -> &mut dyn Any {
		self
	}
}

impl ComponentStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Stores `component` under `entity`, replacing any previous component of the same type.
	pub fn insert<T: Component>(&mut self, entity: Entity, component: T) {
		let storage = self
			.storages
			.entry(T::component_id())
			.or_insert_with(|| Box::new(TypedStorage::<T> { components: RwLock::new(IntMap::default()) }));

		downcast_mut::<T>(storage.as_mut()).components.get_mut().insert(entity, component);
	}

	/// Stores every component of `bundle` under `entity`. Last write wins for repeated types.
	pub fn add_components<B: ComponentBundle>(&mut self, entity: Entity, bundle: B) {
		bundle.insert_into(self, entity);
	}

	/// Deletes the components of the given types from `entity`.
	/// Types that were never registered or are not attached to `entity` are ignored.
	pub fn remove_components(&mut self, entity: Entity, types: &[ComponentType]) {
		for ty in types {
			if let Some(storage) = self.storages.get_mut(&ty.id()) {
				storage.remove(entity);
			}
		}
	}

	/// Removes the component of type `T` from `entity`, returning it if it was present.
	pub fn remove<T: Component>(&mut self, entity: Entity) -> Option<T> {
		let storage = self.storages.get_mut(&T::component_id())?;
		downcast_mut::<T>(storage.as_mut()).components.get_mut().remove(&entity)
	}

	/// Deletes every component of `entity`, whatever its type.
	pub fn purge_entity(&mut self, entity: Entity) {
		for storage in self.storages.values_mut() {
			storage.remove(entity);
		}
	}

	/// A read view over every component of type `T`.
	///
	/// The view borrows the live map; it is empty if no component of type `T` was ever stored.
	/// A thread holding a [ComponentsMut] view of `T` must not request this view of `T` as well.
	pub fn components<T: Component>(&self) -> Components<'_, T> {
		Components {
			guard: self.storage::<T>().map(|s| s.components.read()),
		}
	}

	/// A write view over every component of type `T`.
	///
	/// The view borrows the live map; it is empty if no component of type `T` was ever stored.
	pub fn components_mut<T: Component>(&self) -> ComponentsMut<'_, T> {
		ComponentsMut {
			guard: self.storage::<T>().map(|s| s.components.write()),
		}
	}

	/// A copy of the component of type `T` attached to `entity`.
	pub fn get<T: Component + Clone>(&self, entity: Entity) -> Option<T> {
		self.components::<T>().get(entity).cloned()
	}

	pub fn contains<T: Component>(&self, entity: Entity) -> bool {
		self.components::<T>().contains(entity)
	}

	/// The [ids](ComponentId) of every component type stored so far.
	pub fn component_ids(&self) -> impl Iterator<Item = ComponentId> + '_ {
		self.storages.keys().copied()
	}

	/// The total number of stored components, across all types.
	pub fn len(&self) -> usize {
		self.storages.values().map(|s| s.len()).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Discards all stored data.
	pub fn clear(&mut self) {
		self.storages.clear();
	}

	fn storage<T: Component>(&self) -> Option<&TypedStorage<T>> {
		let storage = self.storages.get(&T::component_id())?;
		Some(downcast::<T>(storage.as_ref()))
	}
}

fn downcast<T: Component>(storage: &dyn ErasedStorage) -> &TypedStorage<T> {
	match storage.as_any().downcast_ref::<TypedStorage<T>>() {
		Some(storage) => storage,
		None => type_mismatch::<T>(),
	}
}

fn downcast_mut<T: Component>(storage: &mut dyn ErasedStorage) -> &mut TypedStorage<T> {
	match storage.as_any_mut().downcast_mut::<TypedStorage<T>>() {
		Some(storage) => storage,
		None => type_mismatch::<T>(),
	}
}

#[cold]
fn type_mismatch<T: Component>() -> ! {
	panic!(
		"Component id {} of {} is shared with another component type",
		T::component_id(),
		std::any::type_name::<T>()
	)
}

/// A read view over the live map of [components](Component) of type `T`.
pub struct Components<'l, T> {
	guard: Option<RwLockReadGuard<'l, IntMap<Entity, T>>>,
}

impl<'l, T> Components<'l, T> {
	pub fn get(&self, entity: Entity) -> Option<&T> {
		self.guard.as_ref()?.get(&entity)
	}

	pub fn contains(&self, entity: Entity) -> bool {
		self.get(entity).is_some()
	}

	pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> + '_ {
		entries(self.guard.as_deref())
	}

	/// The components of the given entities, skipping entities without a component of type `T`.
	pub fn query<'s, 'e>(&'s self, entities: &'e [Entity]) -> impl Iterator<Item = (Entity, &'s T)> + 'e
	where
		's: 'e,
		T: 'e,
	{
		query_entries(self.guard.as_deref(), entities)
	}

	pub fn len(&self) -> usize {
		self.guard.as_ref().map_or(0, |map| map.len())
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

/// A write view over the live map of [components](Component) of type `T`.
pub struct ComponentsMut<'l, T> {
	guard: Option<RwLockWriteGuard<'l, IntMap<Entity, T>>>,
}

impl<'l, T> ComponentsMut<'l, T> {
	pub fn get(&self, entity: Entity) -> Option<&T> {
		self.guard.as_ref()?.get(&entity)
	}

	pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
		self.guard.as_mut()?.get_mut(&entity)
	}

	pub fn contains(&self, entity: Entity) -> bool {
		self.get(entity).is_some()
	}

	pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> + '_ {
		entries(self.guard.as_deref())
	}

	pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> + '_ {
		entries_mut(self.guard.as_deref_mut())
	}

	/// Detaches the component of `entity` from the store.
	///
	/// The owning entity keeps listing the type, and no system is re-routed.
	pub fn remove(&mut self, entity: Entity) -> Option<T> {
		self.guard.as_mut()?.remove(&entity)
	}

	pub fn len(&self) -> usize {
		self.guard.as_ref().map_or(0, |map| map.len())
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

fn entries<T>(map: Option<&IntMap<Entity, T>>) -> impl Iterator<Item = (Entity, &T)> {
	map.into_iter().flat_map(|map| map.iter().map(|(e, c)| (*e, c)))
}

fn entries_mut<T>(map: Option<&mut IntMap<Entity, T>>) -> impl Iterator<Item = (Entity, &mut T)> {
	map.into_iter().flat_map(|map| map.iter_mut().map(|(e, c)| (*e, c)))
}

fn query_entries<'s, 'e, T>(
	map: Option<&'s IntMap<Entity, T>>, entities: &'e [Entity],
) -> impl Iterator<Item = (Entity, &'s T)> + 'e
where
	's: 'e,
	T: 'e,
{
	entities.iter().filter_map(move |e| Some((*e, map?.get(e)?)))
}
