//! A unique runtime identifier tied to a [Component] type.
//!
//! Developers shouldn't rely on [component ids](ComponentId), as they are not stable between program re-runs.
//! [Component ids](ComponentId) key the per-type maps of the [ComponentStore](crate::components::ComponentStore)
//! and the [signatures](crate::components::Signature) systems are registered with.

use std::sync::atomic::Ordering::Relaxed;
use std::sync::atomic::AtomicUsize;
use crate::components::Component;
use std::fmt;

static NEXT_ID: AtomicUsize = AtomicUsize::new(1);

/// A globally unique identifier for a type implementing the [`Component`] trait.
#[derive(Hash, Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Debug)]
pub struct ComponentId {
	value: usize,
}

impl ComponentId {
	/// Get the [ComponentId] of the type `T`.
	#[inline(always)]
	pub fn of<T: Component>() -> ComponentId {
		T::component_id()
	}

	/// Generates a new [ComponentId]. **Should not be called from user code.**
	///
	/// Called once per type from the code generated by #\[derive([Component])].
	#[doc(hidden)]
	pub fn next() -> ComponentId {
		let value = NEXT_ID.fetch_add(1, Relaxed);
		debug_assert!(
			value <= u32::MAX as usize,
			"This is an insane number of components. Please seek help."
		);
		ComponentId { value }
	}

	#[inline(always)]
	pub const fn value(&self) -> usize {
		self.value
	}
}

impl nohash_hasher::IsEnabled for ComponentId {}

impl fmt::Display for ComponentId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.value)
	}
}
