//! Construction-time settings of a [World](crate::World).

use serde::{Deserialize, Serialize};
use crate::error::Result;

/// How [World::update](crate::World::update) executes systems.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
	/// One system at a time on the caller's thread, in priority order.
	#[default]
	Sequential,
	/// Systems with disjoint signatures run concurrently, group by group.
	Parallel,
}

/// Settings of a [World](crate::World), fixed at construction.
///
/// Can be loaded from TOML:
/// ```toml
/// execution = "parallel"
/// retroactive_attach = true
/// worker_threads = 4
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
	pub execution: ExecutionMode,

	/// Whether a newly added system is attached to the matching entities that already exist.
	/// When disabled, a system only sees entities created after its registration.
	pub retroactive_attach: bool,

	/// Size of a dedicated thread pool for parallel execution.
	/// `None` runs parallel groups on rayon's global pool.
	pub worker_threads: Option<usize>,
}

impl WorldConfig {
	pub fn sequential() -> Self {
		Self::default()
	}

	pub fn parallel() -> Self {
		Self {
			execution: ExecutionMode::Parallel,
			..Self::default()
		}
	}

	pub fn with_retroactive_attach(mut self, enabled: bool) -> Self {
		self.retroactive_attach = enabled;
		self
	}

	pub fn with_worker_threads(mut self, threads: usize) -> Self {
		self.worker_threads = Some(threads);
		self
	}

	pub fn is_parallel(&self) -> bool {
		self.execution == ExecutionMode::Parallel
	}

	/// Parses a configuration from a TOML document. Missing keys take their default value.
	pub fn from_toml_str(source: &str) -> Result<Self> {
		Ok(toml::from_str(source)?)
	}
}
