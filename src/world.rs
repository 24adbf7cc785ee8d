use crate::components::{Component, ComponentBundle, ComponentSet, ComponentStore, Components, ComponentsMut, Signature};
use crate::entities::{Entity, EntityAllocator, EntityRecord};
use crate::systems::{intersect_systems, System, SystemId, SystemRegistry};
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, span, trace, Level};
use crate::context::ContextRegistry;
use crate::error::{EcsError, Result};
use crate::config::WorldConfig;
use nohash_hasher::IntMap;
use parking_lot::Mutex;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

/// A container for [entities](Entity), their [components](Component) and the [systems](System) processing them.
///
/// The world is the sole mutator of entity lifecycle. Creating an entity routes it to every system
/// whose [Signature] its component types satisfy; removing it detaches it from those systems and
/// purges its components.
///
/// ```
/// use weave_ecs::prelude::*;
/// use std::time::Duration;
///
/// #[derive(Component, Clone)]
/// struct Position { x: i32, y: i32 }
///
/// let mut world = World::new();
/// let entity = world.create_entity((Position { x: 1, y: 1 },));
/// world.update(Duration::from_millis(33));
/// assert_eq!(world.component::<Position>(entity).map(|p| p.x), Some(1));
/// ```
pub struct World {
	config: WorldConfig,
	entity_ids: EntityAllocator,
	entities: IntMap<Entity, EntityRecord>,
	components: ComponentStore,
	systems: SystemRegistry,
	context: ContextRegistry,
	pending_removals: Mutex<Vec<Entity>>,
	thread_pool: Option<ThreadPool>,
	tick: u64,
}

impl World {
	/// Creates a world running its systems sequentially.
	pub fn new() -> Self {
		Self::from_parts(WorldConfig::sequential(), None)
	}

	/// Creates a world running systems with disjoint signatures concurrently, on rayon's global pool.
	pub fn new_parallel() -> Self {
		Self::from_parts(WorldConfig::parallel(), None)
	}

	/// Creates a world from `config`, building a dedicated thread pool if it asks for one.
	pub fn with_config(config: WorldConfig) -> Result<Self> {
		let thread_pool = match config.worker_threads {
			Some(0) => return Err(EcsError::ZeroWorkerThreads),
			Some(threads) if config.is_parallel() => Some(
				ThreadPoolBuilder::new()
					.num_threads(threads)
					.thread_name(|i| format!("weave-ecs-worker-{}", i))
					.build()?,
			),
			_ => None,
		};

		Ok(Self::from_parts(config, thread_pool))
	}

	fn from_parts(config: WorldConfig, thread_pool: Option<ThreadPool>) -> Self {
		debug!(?config, "creating world");
		Self {
			systems: SystemRegistry::new(config.is_parallel()),
			config,
			entity_ids: EntityAllocator::new(),
			entities: IntMap::default(),
			components: ComponentStore::new(),
			context: ContextRegistry::new(),
			pending_removals: Mutex::new(Vec::new()),
			thread_pool,
			tick: 0,
		}
	}

	pub fn config(&self) -> &WorldConfig {
		&self.config
	}

	/// Creates an [entity](Entity) carrying the components of `bundle`
	/// and attaches it to every system whose signature those components satisfy.
	pub fn create_entity<B: ComponentBundle>(&mut self, bundle: B) -> Entity {
		let entity = self.entity_ids.allocate();
		let types = B::component_types();

		let mut record = EntityRecord::new(entity);
		record.attach_components(&types);
		self.entities.insert(entity, record);
		self.components.add_components(entity, bundle);

		let systems = self.systems.query_systems(&types);
		trace!(%entity, ?types, systems = systems.len(), "created entity");
		for id in systems {
			self.systems.attach(id, entity);
		}

		entity
	}

	/// Attaches further components to a live entity, overwriting components of the same type.
	///
	/// Systems are not re-routed: the entity keeps the systems it was attached to at creation.
	/// Returns false if the entity does not exist.
	pub fn add_components<B: ComponentBundle>(&mut self, entity: Entity, bundle: B) -> bool {
		let Some(record) = self.entities.get_mut(&entity) else {
			return false;
		};

		record.attach_components(&B::component_types());
		self.components.add_components(entity, bundle);
		true
	}

	/// Detaches the components of the types in `C` from a live entity.
	///
	/// Systems are not re-routed. Returns false if the entity does not exist.
	pub fn remove_components<C: ComponentSet>(&mut self, entity: Entity) -> bool {
		let Some(record) = self.entities.get_mut(&entity) else {
			return false;
		};

		let types = C::component_types();
		for ty in &types {
			record.detach_component(ty.id());
		}
		self.components.remove_components(entity, &types);
		true
	}

	/// Marks `entity` for removal at the start of the next [update](World::update).
	///
	/// Safe to call from a running system: systems keep observing the entity until the tick ends.
	pub fn remove_entity(&self, entity: Entity) {
		trace!(%entity, "entity marked for removal");
		self.pending_removals.lock().push(entity);
	}

	/// Removes `entity` immediately: detaches it from every system tracking it, purges its components
	/// and deletes its record. Returns false, doing nothing, if the entity does not exist.
	pub fn remove_entity_now(&mut self, entity: Entity) -> bool {
		if self.entities.remove(&entity).is_none() {
			return false;
		}

		for id in self.systems.tracking(entity) {
			self.systems.detach(id, entity);
		}
		self.components.purge_entity(entity);

		trace!(%entity, "removed entity");
		true
	}

	/// Detaches `entity` from those of `systems` it is currently routed to, returning how many it left.
	/// The entity and its components stay alive.
	pub fn detach_from_systems(&mut self, entity: Entity, systems: &[SystemId]) -> usize {
		if !self.entities.contains_key(&entity) {
			return 0;
		}

		let targets = intersect_systems(&self.systems.tracking(entity), systems);
		for id in &targets {
			self.systems.detach(*id, entity);
		}
		targets.len()
	}

	pub fn contains(&self, entity: Entity) -> bool {
		self.entities.contains_key(&entity)
	}

	pub fn entity(&self, entity: Entity) -> Option<&EntityRecord> {
		self.entities.get(&entity)
	}

	pub fn entity_count(&self) -> usize {
		self.entities.len()
	}

	/// The number of removals waiting for the next [update](World::update).
	pub fn pending_removals(&self) -> usize {
		self.pending_removals.lock().len()
	}

	/// A copy of the component of type `T` attached to `entity`.
	pub fn component<T: Component + Clone>(&self, entity: Entity) -> Option<T> {
		self.components.get::<T>(entity)
	}

	/// A read view over every component of type `T`. See [ComponentStore::components].
	pub fn components<T: Component>(&self) -> Components<'_, T> {
		self.components.components::<T>()
	}

	/// A write view over every component of type `T`. See [ComponentStore::components_mut].
	pub fn components_mut<T: Component>(&self) -> ComponentsMut<'_, T> {
		self.components.components_mut::<T>()
	}

	pub fn component_store(&self) -> &ComponentStore {
		&self.components
	}

	/// Registers `system` with the given `signature`.
	///
	/// With [retroactive attach](WorldConfig::retroactive_attach) enabled, the system is attached to every
	/// existing entity matching its signature; otherwise it only sees entities created from now on.
	pub fn add_system<S: System + 'static>(&mut self, system: S, signature: Signature) -> SystemId {
		let id = self.systems.add_system(Box::new(system), signature);

		if self.config.retroactive_attach {
			let Some(signature) = self.systems.signature(id).cloned() else {
				return id;
			};

			let mut matching: Vec<Entity> = self
				.entities
				.values()
				.filter(|record| crate::systems::types_subset(signature.types(), record.components()))
				.map(|record| record.entity())
				.collect();
			matching.sort_unstable();

			trace!(%id, entities = matching.len(), "attaching existing entities");
			for entity in matching {
				self.systems.attach(id, entity);
			}
		}

		id
	}

	/// Unregisters the system `id`, returning it.
	pub fn remove_system(&mut self, id: SystemId) -> Option<Box<dyn System>> {
		self.systems.remove_system(id)
	}

	pub fn systems(&self) -> &SystemRegistry {
		&self.systems
	}

	/// The entities currently tracked by the system `id`.
	pub fn system_entities(&self, id: SystemId) -> Option<&[Entity]> {
		self.systems.get(id).map(|s| s.entities())
	}

	/// Stores a shared service, replacing the previous value of the same type.
	pub fn add_context<T: 'static + Send + Sync>(&mut self, value: T) -> &mut Self {
		self.context.insert(value);
		self
	}

	pub fn context<T: 'static + Send + Sync>(&self) -> Option<&T> {
		self.context.get::<T>()
	}

	pub fn context_mut<T: 'static + Send + Sync>(&mut self) -> Option<&mut T> {
		self.context.get_mut::<T>()
	}

	/// The number of completed [updates](World::update).
	pub fn tick(&self) -> u64 {
		self.tick
	}

	/// Advances the world by one tick.
	///
	/// Applies the removals requested since the previous tick, then runs every system: one at a time
	/// in priority order, or in parallel mode group by group, where the members of a group run concurrently
	/// and the next group starts once the whole group returned.
	///
	/// Systems are detached from the world while they run, so [systems](World::systems) is empty from
	/// their point of view. A panicking system propagates the panic to the caller once the registry
	/// is back in place; the tick counter is not advanced.
	pub fn update(&mut self, delta: Duration) {
		let span = span!(Level::TRACE, "world update", tick = self.tick);
		let _guard = span.enter();

		self.flush_removals();

		let mut systems = std::mem::take(&mut self.systems);
		let result = panic::catch_unwind(AssertUnwindSafe(|| {
			systems.run(self, delta, self.thread_pool.as_ref())
		}));
		self.systems = systems;

		if let Err(payload) = result {
			panic::resume_unwind(payload);
		}

		self.tick += 1;
	}

	/// Discards every entity, component, system, context value and pending removal.
	/// Entity identifiers keep increasing.
	pub fn clear(&mut self) {
		debug!(entities = self.entities.len(), systems = self.systems.len(), "clearing world");
		self.pending_removals.get_mut().clear();
		self.entities.clear();
		self.components.clear();
		self.systems.clear();
		self.context.clear();
	}

	fn flush_removals(&mut self) {
		let pending = std::mem::take(self.pending_removals.get_mut());
		for entity in pending {
			self.remove_entity_now(entity);
		}
	}
}

impl Default for World {
	fn default() -> Self {
		Self::new()
	}
}
