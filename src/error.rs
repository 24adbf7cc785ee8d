use thiserror::Error;

/// Errors raised while setting up a [World](crate::World).
///
/// Running a world never fails: lookups of unknown entities or component types yield empty results.
#[derive(Debug, Error)]
pub enum EcsError {
	#[error("invalid world configuration: {0}")]
	Config(#[from] toml::de::Error),

	#[error("worker thread count must be at least 1")]
	ZeroWorkerThreads,

	#[error("failed to build the system thread pool: {0}")]
	ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T, E = EcsError> = std::result::Result<T, E>;
