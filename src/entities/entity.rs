use std::sync::atomic::{AtomicU64, Ordering};
use std::fmt;

/// A unique handle to an entity.
///
/// Identifiers are handed out by an [EntityAllocator] and never reused by the world that created them.
#[derive(Hash, Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Debug)]
pub struct Entity(pub(crate) u64);

impl Entity {
	#[inline(always)]
	pub const fn id(&self) -> u64 {
		self.0
	}
}

impl nohash_hasher::IsEnabled for Entity {}

impl fmt::Display for Entity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "entity#{}", self.0)
	}
}

/// Generates monotonically increasing [Entity] identifiers, starting at 1.
///
/// Each [World](crate::World) owns its own allocator; the counter is never decremented.
#[derive(Default, Debug)]
pub struct EntityAllocator {
	last: AtomicU64,
}

impl EntityAllocator {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn allocate(&self) -> Entity {
		Entity(self.last.fetch_add(1, Ordering::Relaxed) + 1)
	}

	/// The most recently allocated identifier, or 0 if none was handed out yet.
	pub fn last(&self) -> u64 {
		self.last.load(Ordering::Relaxed)
	}
}
