use std::path::PathBuf;

use checkers_core::StateError;
use thiserror::Error;

/// Errors surfaced by the search engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid position: {0}")]
    InvalidPosition(#[from] StateError),

    #[error("failed to build search worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to spawn search thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not a valid cache snapshot: {source}", path.display())]
    CorruptCache {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode cache snapshot: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("{} has cache format version {found}, expected {expected}", path.display())]
    CacheVersion {
        path: PathBuf,
        found: u32,
        expected: u32,
    },

    #[error("invalid engine config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("min_depth {min_depth} must be below max_depth {max_depth}")]
    DepthRange { min_depth: u32, max_depth: u32 },
}

impl EngineError {
    /// True when the error only means a cache file has not been written yet.
    pub fn is_missing_file(&self) -> bool {
        matches!(self, EngineError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}
