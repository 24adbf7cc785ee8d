use crate::tests::{Bounds, CollisionSystem, Comm, IdleSystem, MoveSystem, Position, Velocity};
use crate::config::{ExecutionMode, WorldConfig};
use crate::components::{Bundle, Signature};
use crate::systems::{EntitySystem, System};
use crate::entities::Entity;
use crate::{EcsError, World};
use parking_lot::Mutex;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;
use std::sync::Arc;

const FRAME: Duration = Duration::from_millis(33);

#[derive(Bundle)]
struct Player {
	position: Position,
	velocity: Velocity,
	bounds: Bounds,
	comm: Comm,
	#[bundle(skip)]
	#[allow(dead_code)]
	name: String,
}

#[derive(Bundle)]
struct Label {
	#[bundle(skip)]
	#[allow(dead_code)]
	text: String,
}

#[derive(Bundle)]
struct Marker;

fn player(name: &str) -> Player {
	Player {
		position: Position { x: 1, y: 1 },
		velocity: Velocity { dx: 2, dy: 2 },
		bounds: Bounds { width: 10, height: 10 },
		comm: Comm,
		name: name.to_string(),
	}
}

fn register_move_and_collision(world: &mut World) -> (MoveSystem, CollisionSystem) {
	let movement = MoveSystem::default();
	let collision = CollisionSystem::default();
	let observers = (
		MoveSystem {
			visited: movement.visited.clone(),
			..MoveSystem::default()
		},
		CollisionSystem {
			visited: collision.visited.clone(),
			..CollisionSystem::default()
		},
	);

	world.add_system(movement, Signature::of::<(Position, Velocity)>());
	world.add_system(collision, Signature::of::<(Position, Bounds)>());
	observers
}

#[test]
pub fn move_and_collision_scenario() {
	let mut world = World::new();
	let (movement, collision) = register_move_and_collision(&mut world);

	let a = world.create_entity((Position { x: 1, y: 1 }, Velocity { dx: 2, dy: 2 }));
	let b = world.create_entity((Position { x: 1, y: 1 }, Bounds { width: 10, height: 10 }));

	world.update(FRAME);

	assert_eq!(world.component::<Position>(a), Some(Position { x: 3, y: 3 }));
	assert_eq!(world.component::<Position>(b), Some(Position { x: 1, y: 1 }));
	assert_eq!(*movement.visited.lock(), vec![a]);
	assert_eq!(*collision.visited.lock(), vec![b]);
	assert_eq!(world.tick(), 1);
}

fn run_thirty_frames(mut world: World) {
	register_move_and_collision(&mut world);

	// Not captured by any system
	world.create_entity((Position { x: 1, y: 1 },));
	world.create_entity((Velocity { dx: 2, dy: 2 },));
	world.create_entity((Bounds { width: 10, height: 10 },));

	// Captured by both systems
	let full: Vec<Entity> = (0..2).map(|i| world.create_entity(player(&format!("player{}", i)))).collect();
	// Captured by one system each
	let moving: Vec<Entity> = (0..2)
		.map(|_| world.create_entity((Position { x: 1, y: 1 }, Velocity { dx: 2, dy: 2 })))
		.collect();
	let colliding: Vec<Entity> = (0..2)
		.map(|_| world.create_entity((Position { x: 1, y: 1 }, Bounds { width: 10, height: 10 })))
		.collect();

	let frames = 30;
	for _ in 0..frames {
		world.update(FRAME);
	}

	for entity in full.iter().chain(moving.iter()) {
		assert_eq!(
			world.component::<Position>(*entity),
			Some(Position { x: 1 + 2 * frames, y: 1 + 2 * frames }),
			"{} should have moved",
			entity
		);
	}
	for entity in &colliding {
		assert_eq!(world.component::<Position>(*entity), Some(Position { x: 1, y: 1 }));
	}
}

#[test]
pub fn sequential_world_moves_matching_entities() {
	run_thirty_frames(World::new());
}

#[test]
pub fn parallel_world_moves_matching_entities() {
	run_thirty_frames(World::new_parallel());
}

#[test]
pub fn parallel_world_on_dedicated_pool() {
	let config = WorldConfig::parallel().with_worker_threads(2);
	run_thirty_frames(World::with_config(config).expect("valid configuration"));
}

#[test]
pub fn parallel_world_runs_disjoint_systems_together() {
	let mut world = World::new_parallel();
	let (movement, collision) = register_move_and_collision(&mut world);
	let comm = world.add_system(IdleSystem::with_priority(1), Signature::of::<(Comm,)>());

	let groups = world.systems().parallel_groups();
	assert_eq!(groups.len(), 2);
	assert!(groups[0].contains(&comm));

	let entity = world.create_entity(player("player"));
	world.update(FRAME);

	assert_eq!(*movement.visited.lock(), vec![entity]);
	assert_eq!(*collision.visited.lock(), vec![entity]);
	assert_eq!(world.system_entities(comm), Some(&[entity][..]));
}

#[test]
pub fn bundles_skip_marked_fields() {
	let mut world = World::new();
	let entity = world.create_entity(player("player"));

	let record = world.entity(entity).expect("entity exists");
	assert_eq!(record.components().len(), 4);
	assert_eq!(world.component::<Bounds>(entity), Some(Bounds { width: 10, height: 10 }));
	assert_eq!(world.component::<Comm>(entity), Some(Comm));
}

#[test]
pub fn bundles_without_components_create_bare_entities() {
	let mut world = World::new();
	let idle = world.add_system(IdleSystem::default(), Signature::empty());

	let labelled = world.create_entity(Label { text: "label".to_string() });
	let marked = world.create_entity(Marker);

	assert!(world.entity(labelled).map_or(false, |r| r.components().is_empty()));
	assert!(world.entity(marked).map_or(false, |r| r.components().is_empty()));
	assert!(world.component_store().is_empty());
	assert_eq!(world.system_entities(idle), Some(&[labelled, marked][..]), "An empty signature matches every entity");
}

/// Requests the removal of every tracked entity and records what it saw.
#[derive(Default)]
struct ReaperSystem {
	tracked: EntitySystem,
	seen: Arc<Mutex<Vec<Vec<Entity>>>>,
}

impl System for ReaperSystem {
	fn run(&mut self, world: &World, _: Duration) {
		self.seen.lock().push(self.tracked.entities().to_vec());
		for entity in self.tracked.entities() {
			world.remove_entity(*entity);
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
		2000
	}
}

#[test]
pub fn deferred_removal_applies_next_tick() {
	let mut world = World::new();
	let reaper = ReaperSystem::default();
	let seen = reaper.seen.clone();
	world.add_system(reaper, Signature::of::<(Comm,)>());
	let (movement, _) = register_move_and_collision(&mut world);

	let entity = world.create_entity(player("player"));

	world.update(FRAME);
	assert!(world.contains(entity), "Removal requested mid-tick waits for the next tick");
	assert_eq!(world.pending_removals(), 1);
	assert_eq!(*movement.visited.lock(), vec![entity], "Systems running after the request still observe the entity");

	world.update(FRAME);
	assert!(!world.contains(entity));
	assert_eq!(world.pending_removals(), 0);
	assert_eq!(*movement.visited.lock(), vec![entity]);
	assert_eq!(*seen.lock(), vec![vec![entity], vec![]]);
	assert_eq!(world.component::<Position>(entity), None);
	assert_eq!(world.component::<Comm>(entity), None);
}

#[test]
pub fn immediate_removal_is_idempotent() {
	let mut world = World::new();
	let (movement, _) = register_move_and_collision(&mut world);
	let ids = world.systems().all();

	let entity = world.create_entity(player("player"));
	let other = world.create_entity((Position { x: 7, y: 7 }, Velocity::default()));
	assert_eq!(world.system_entities(ids[0]), Some(&[entity, other][..]));

	assert!(world.remove_entity_now(entity));
	assert!(!world.remove_entity_now(entity));

	assert!(!world.contains(entity));
	assert_eq!(world.entity_count(), 1);
	for id in &ids {
		assert!(!world.system_entities(*id).unwrap_or_default().contains(&entity));
	}
	assert_eq!(world.component::<Position>(entity), None, "Components must not be resurrected");
	assert_eq!(world.component::<Comm>(entity), None);
	assert_eq!(world.component_store().len(), 2);

	world.update(FRAME);
	assert_eq!(*movement.visited.lock(), vec![other]);
}

#[test]
pub fn removal_detaches_entities_after_ad_hoc_changes() {
	let mut world = World::new();
	let (movement, _) = register_move_and_collision(&mut world);
	let move_id = world.systems().all()[0];

	let entity = world.create_entity((Position { x: 1, y: 1 }, Velocity { dx: 1, dy: 1 }));
	assert!(world.remove_components::<(Velocity,)>(entity));
	assert_eq!(world.system_entities(move_id), Some(&[entity][..]));

	assert!(world.remove_entity_now(entity));
	assert_eq!(world.system_entities(move_id), Some(&[][..]), "Removed entities leave every system tracking them");

	let deferred = world.create_entity((Position { x: 1, y: 1 }, Velocity { dx: 1, dy: 1 }));
	assert!(world.remove_components::<(Velocity,)>(deferred));
	world.remove_entity(deferred);
	world.update(FRAME);

	assert_eq!(world.system_entities(move_id), Some(&[][..]));
	assert!(movement.visited.lock().is_empty());
}

#[test]
pub fn deferred_removal_of_unknown_or_repeated_ids() {
	let mut world = World::new();
	let (movement, _) = register_move_and_collision(&mut world);
	let entity = world.create_entity((Position { x: 1, y: 1 }, Velocity { dx: 2, dy: 2 }));
	let gone = world.create_entity((Position::default(),));
	world.remove_entity_now(gone);

	world.remove_entity(Entity(999));
	world.remove_entity(gone);
	world.update(FRAME);
	assert_eq!(world.pending_removals(), 0);
	assert_eq!(world.entity_count(), 1);
	assert_eq!(world.component::<Position>(entity), Some(Position { x: 3, y: 3 }));

	world.remove_entity(entity);
	world.remove_entity(entity);
	assert_eq!(world.pending_removals(), 2);
	world.update(FRAME);

	assert!(!world.contains(entity));
	assert_eq!(world.entity_count(), 0);
	assert_eq!(world.pending_removals(), 0);
	assert_eq!(*movement.visited.lock(), vec![entity]);

	world.update(FRAME);
	assert_eq!(world.tick(), 3);
}

#[test]
pub fn removed_ids_are_never_reused() {
	let mut world = World::new();
	let first = world.create_entity((Position::default(),));
	world.remove_entity_now(first);
	let second = world.create_entity((Position::default(),));

	assert_ne!(first, second);
	assert!(second > first);
}

#[test]
pub fn systems_added_later_miss_existing_entities() {
	let mut world = World::new();
	let entity = world.create_entity(player("player"));
	let (movement, collision) = register_move_and_collision(&mut world);

	world.update(FRAME);

	assert_eq!(world.component::<Position>(entity), Some(Position { x: 1, y: 1 }));
	assert!(movement.visited.lock().is_empty());
	assert!(collision.visited.lock().is_empty());
}

#[test]
pub fn retroactive_attach_routes_existing_entities() {
	let config = WorldConfig::sequential().with_retroactive_attach(true);
	let mut world = World::with_config(config).expect("valid configuration");

	let entity = world.create_entity(player("player"));
	let bystander = world.create_entity((Position::default(),));
	let (movement, collision) = register_move_and_collision(&mut world);

	world.update(FRAME);

	assert_eq!(world.component::<Position>(entity), Some(Position { x: 3, y: 3 }));
	assert_eq!(*movement.visited.lock(), vec![entity]);
	assert_eq!(*collision.visited.lock(), vec![entity]);
	assert_eq!(world.component::<Position>(bystander), Some(Position::default()));
}

#[test]
pub fn ad_hoc_component_changes_do_not_reroute() {
	let mut world = World::new();
	let (movement, _) = register_move_and_collision(&mut world);
	let move_id = world.systems().all()[0];

	let entity = world.create_entity((Position { x: 1, y: 1 },));
	assert!(world.add_components(entity, (Velocity { dx: 1, dy: 1 },)));
	assert!(world.entity(entity).map_or(false, |r| r.components().len() == 2));

	world.update(FRAME);
	assert!(movement.visited.lock().is_empty());
	assert_eq!(world.component::<Position>(entity), Some(Position { x: 1, y: 1 }));

	let routed = world.create_entity((Position { x: 1, y: 1 }, Velocity { dx: 1, dy: 1 }));
	assert!(world.remove_components::<(Velocity,)>(routed));
	assert_eq!(world.component::<Velocity>(routed), None);
	assert_eq!(world.system_entities(move_id), Some(&[routed][..]));

	assert!(!world.add_components(Entity(999), (Comm,)));
	assert!(!world.remove_components::<(Comm,)>(Entity(999)));
}

#[test]
pub fn detach_from_chosen_systems() {
	let mut world = World::new();
	register_move_and_collision(&mut world);
	let ids = world.systems().all();
	let idle = world.add_system(IdleSystem::default(), Signature::of::<(Comm,)>());

	let entity = world.create_entity((Position::default(), Velocity::default()));

	assert_eq!(world.detach_from_systems(entity, &[ids[1], ids[0], idle]), 1);
	assert_eq!(world.system_entities(ids[0]), Some(&[][..]));
	assert_eq!(world.detach_from_systems(Entity(999), &ids), 0);
	assert!(world.contains(entity));
}

#[test]
pub fn detach_counts_only_tracking_systems() {
	let mut world = World::new();
	register_move_and_collision(&mut world);
	let ids = world.systems().all();

	let entity = world.create_entity((Position::default(),));
	assert!(world.add_components(entity, (Velocity::default(), Bounds::default())));

	assert_eq!(world.detach_from_systems(entity, &ids), 0, "The entity was never routed to either system");
	assert!(world.contains(entity));
}

/// Panics on every run.
#[derive(Default)]
struct FaultySystem {
	tracked: EntitySystem,
}

impl System for FaultySystem {
	fn run(&mut self, _: &World, _: Duration) {
		panic!("faulty system");
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
}

fn panicking_system_keeps_registry(mut world: World) {
	let (movement, _) = register_move_and_collision(&mut world);
	let faulty = world.add_system(FaultySystem::default(), Signature::of::<(Comm,)>());
	let entity = world.create_entity(player("player"));

	let result = panic::catch_unwind(AssertUnwindSafe(|| world.update(FRAME)));
	assert!(result.is_err());

	assert_eq!(world.systems().len(), 3, "Systems survive a panicking update");
	assert_eq!(world.system_entities(faulty), Some(&[entity][..]));
	assert_eq!(world.tick(), 0);

	world.remove_system(faulty);
	world.update(FRAME);
	assert_eq!(world.tick(), 1);
	assert!(movement.visited.lock().contains(&entity));
}

#[test]
pub fn sequential_panic_keeps_registry() {
	panicking_system_keeps_registry(World::new());
}

#[test]
pub fn parallel_panic_keeps_registry() {
	panicking_system_keeps_registry(World::new_parallel());
}

#[test]
pub fn context_holds_one_value_per_type() {
	struct Clock(u64);

	let mut world = World::new();
	assert!(world.context::<Clock>().is_none());

	world.add_context(Clock(1)).add_context(Clock(2));
	assert_eq!(world.context::<Clock>().map(|c| c.0), Some(2));

	if let Some(clock) = world.context_mut::<Clock>() {
		clock.0 += 1;
	}
	assert_eq!(world.context::<Clock>().map(|c| c.0), Some(3));
}

#[test]
pub fn clear_tears_everything_down() {
	let mut world = World::new();
	register_move_and_collision(&mut world);
	world.add_context(5u32);
	let entity = world.create_entity(player("player"));
	world.remove_entity(entity);

	world.clear();

	assert_eq!(world.entity_count(), 0);
	assert_eq!(world.pending_removals(), 0);
	assert!(world.systems().is_empty());
	assert!(world.component_store().is_empty());
	assert!(world.context::<u32>().is_none());
	assert!(world.create_entity((Comm,)) > entity);
}

#[test]
pub fn config_from_toml() {
	let config = WorldConfig::from_toml_str(
		r#"
			execution = "parallel"
			retroactive_attach = true
			worker_threads = 3
		"#,
	)
	.expect("valid configuration");

	assert_eq!(config.execution, ExecutionMode::Parallel);
	assert!(config.retroactive_attach);
	assert_eq!(config.worker_threads, Some(3));

	let defaults = WorldConfig::from_toml_str("").expect("empty configuration");
	assert_eq!(defaults, WorldConfig::sequential());

	assert!(matches!(WorldConfig::from_toml_str("execution = \"eager\""), Err(EcsError::Config(_))));
}

#[test]
pub fn zero_worker_threads_are_rejected() {
	let config = WorldConfig::parallel().with_worker_threads(0);
	assert!(matches!(World::with_config(config), Err(EcsError::ZeroWorkerThreads)));
}
