use crate::components::{ComponentId, ComponentType, Signature};
use rayon::prelude::{IntoParallelRefMutIterator, ParallelIterator};
use crate::systems::{System, SystemId};
use tracing::{debug, span, trace, Level};
use crate::entities::Entity;
use nohash_hasher::IntMap;
use rayon::ThreadPool;
use crate::world::World;
use std::time::Duration;
use std::cmp::Reverse;

/// Holds the registered [systems](System) in priority order, together with their
/// [signatures](Signature) and, in parallel mode, the groups of systems that may run concurrently.
#[derive(Default)]
pub struct SystemRegistry {
	next_id: u64,
	parallel: bool,
	entries: Vec<SystemEntry>,
	// Indices into `entries`, rebuilt whenever `entries` changes.
	groups: Vec<Vec<usize>>,
}

struct SystemEntry {
	id: SystemId,
	priority: i32,
	signature: Signature,
	system: Box<dyn System>,
}

impl SystemRegistry {
	/// Creates an empty registry. Parallel groups are only tracked when `parallel` is set.
	pub fn new(parallel: bool) -> Self {
		Self {
			parallel,
			..Self::default()
		}
	}

	pub fn is_parallel(&self) -> bool {
		self.parallel
	}

	/// Registers `system`, re-sorts all systems by priority and recomputes the parallel groups.
	pub fn add_system(&mut self, system: Box<dyn System>, signature: Signature) -> SystemId {
		self.next_id += 1;
		let id = SystemId(self.next_id);
		let priority = system.priority();

		debug!(
			system = system.name(),
			%id,
			priority,
			?signature,
			"registering system"
		);

		self.entries.push(SystemEntry {
			id,
			priority,
			signature,
			system,
		});

		self.sort();
		self.parallelize();
		id
	}

	/// Unregisters the system `id`, returning it. The tracked entities of the system are left untouched.
	pub fn remove_system(&mut self, id: SystemId) -> Option<Box<dyn System>> {
		let index = self.position(id)?;
		let entry = self.entries.remove(index);
		debug!(system = entry.system.name(), %id, "removing system");

		self.sort();
		self.parallelize();
		Some(entry.system)
	}

	/// Returns all systems whose signature is contained in `types`, in priority order.
	pub fn query_systems(&self, types: &[ComponentType]) -> Vec<SystemId> {
		self.entries
			.iter()
			.filter(|e| types_subset(e.signature.types(), types))
			.map(|e| e.id)
			.collect()
	}

	/// Returns the systems currently tracking `entity`, in priority order.
	///
	/// Differs from [query_systems](SystemRegistry::query_systems) once the entity's components changed
	/// after routing, since ad hoc component changes never re-route.
	pub fn tracking(&self, entity: Entity) -> Vec<SystemId> {
		self.entries
			.iter()
			.filter(|e| e.system.entities().contains(&entity))
			.map(|e| e.id)
			.collect()
	}

	/// All systems, highest priority first. Systems of equal priority keep their registration order.
	pub fn all(&self) -> Vec<SystemId> {
		self.entries.iter().map(|e| e.id).collect()
	}

	/// All systems, partitioned into groups that can run concurrently.
	///
	/// Empty unless the registry was created in parallel mode.
	pub fn parallel_groups(&self) -> Vec<Vec<SystemId>> {
		self.groups
			.iter()
			.map(|group| group.iter().map(|i| self.entries[*i].id).collect())
			.collect()
	}

	pub fn signature(&self, id: SystemId) -> Option<&Signature> {
		self.entry(id).map(|e| &e.signature)
	}

	pub fn get(&self, id: SystemId) -> Option<&dyn System> {
		self.entry(id).map(|e| e.system.as_ref())
	}

	pub fn get_mut(&mut self, id: SystemId) -> Option<&mut dyn System> {
		let index = self.position(id)?;
		Some(self.entries[index].system.as_mut())
	}

	pub fn contains(&self, id: SystemId) -> bool {
		self.position(id).is_some()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Drops every registered system.
	pub fn clear(&mut self) {
		self.entries.clear();
		self.groups.clear();
	}

	pub(crate) fn attach(&mut self, id: SystemId, entity: Entity) {
		if let Some(system) = self.get_mut(id) {
			system.attach_entity(entity);
		}
	}

	pub(crate) fn detach(&mut self, id: SystemId, entity: Entity) {
		if let Some(system) = self.get_mut(id) {
			system.detach_entity(entity);
		}
	}

	/// Runs every system once, sequentially in priority order or group by group in parallel mode.
	pub(crate) fn run(&mut self, world: &World, delta: Duration, pool: Option<&ThreadPool>) {
		if !self.parallel {
			for entry in self.entries.iter_mut() {
				trace!(system = entry.system.name(), "running system");
				entry.system.run(world, delta);
			}
			return;
		}

		// Groups partition `entries`, so every slot is taken exactly once.
		let mut slots: Vec<Option<&mut SystemEntry>> = self.entries.iter_mut().map(Some).collect();
		for (index, group) in self.groups.iter().enumerate() {
			let span = span!(Level::TRACE, "system group", index, size = group.len());
			let _guard = span.enter();

			let mut members: Vec<&mut SystemEntry> = group.iter().filter_map(|i| slots[*i].take()).collect();
			match pool {
				Some(pool) => pool.install(|| run_group(&mut members, world, delta)),
				None => run_group(&mut members, world, delta),
			}
		}
	}

	fn entry(&self, id: SystemId) -> Option<&SystemEntry> {
		self.entries.iter().find(|e| e.id == id)
	}

	fn position(&self, id: SystemId) -> Option<usize> {
		self.entries.iter().position(|e| e.id == id)
	}

	fn sort(&mut self) {
		self.entries.sort_by_key(|e| Reverse(e.priority));
	}

	/// Greedily buckets systems in priority order: the highest priority system left opens a group,
	/// and every other remaining system sharing no type with any member of the group joins it.
	/// Comparing against the opening system alone could group two systems that share a type.
	/// The result is deterministic but not necessarily the smallest number of groups.
	fn parallelize(&mut self) {
		self.groups.clear();
		if !self.parallel {
			return;
		}

		let mut remaining: Vec<usize> = (0..self.entries.len()).collect();
		while !remaining.is_empty() {
			let mut group = vec![remaining[0]];
			let mut leftover = Vec::new();

			for &candidate in &remaining[1..] {
				let signature = self.entries[candidate].signature.types();
				let overlaps = group
					.iter()
					.any(|member| types_overlap(self.entries[*member].signature.types(), signature));

				match overlaps {
					true => leftover.push(candidate),
					false => group.push(candidate),
				}
			}

			self.groups.push(group);
			remaining = leftover;
		}

		trace!(groups = self.groups.len(), "recomputed parallel groups");
	}
}

fn run_group(members: &mut [&mut SystemEntry], world: &World, delta: Duration) {
	members.par_iter_mut().for_each(|entry| {
		trace!(system = entry.system.name(), "running system");
		entry.system.run(world, delta)
	});
}

/// Returns the systems of `a` that are also in `b`, in the order of `a`.
pub fn intersect_systems(a: &[SystemId], b: &[SystemId]) -> Vec<SystemId> {
	a.iter().filter(|s| b.contains(s)).copied().collect()
}

/// Checks whether `needle` is fully contained in `haystack`, counting repeated types.
pub fn types_subset(needle: &[ComponentType], haystack: &[ComponentType]) -> bool {
	let mut counts: IntMap<ComponentId, usize> = IntMap::default();
	for ty in haystack {
		*counts.entry(ty.id()).or_default() += 1;
	}

	for ty in needle {
		match counts.get_mut(&ty.id()) {
			Some(count) if *count > 0 => *count -= 1,
			_ => return false,
		}
	}

	true
}

/// Checks whether `a` and `b` share at least one type.
pub fn types_overlap(a: &[ComponentType], b: &[ComponentType]) -> bool {
	a.iter().any(|ty| b.contains(ty))
}
