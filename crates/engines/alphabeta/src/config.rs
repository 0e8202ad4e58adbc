//! Engine configuration, loadable from TOML.
//!
//! ```toml
//! time_budget_ms = 14700
//! min_depth = 6
//! max_depth = 3064
//! parallel_root = true
//! worker_threads = 0
//! difficulty = "hard"
//! cache_dir = "cache"
//! ```
//!
//! Every field is optional; missing fields take their defaults.

use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use checkers_core::{Difficulty, SearchLimits, Weights};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Wall-clock budget per move in milliseconds; 0 searches until the tree
    /// is exhausted or the job is cancelled
    pub time_budget_ms: u64,
    /// First cutoff depth tried when nothing is cached
    pub min_depth: u32,
    /// Exclusive upper bound on the cutoff depth
    pub max_depth: u32,
    /// Search the children of the root on the worker pool
    pub parallel_root: bool,
    /// Worker pool size (0 = one per core)
    pub worker_threads: usize,
    /// Weight preset used until weights are replaced at runtime
    pub difficulty: Difficulty,
    /// Directory holding the cache snapshots; no persistence when unset
    pub cache_dir: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let limits = SearchLimits::default();
        Self {
            time_budget_ms: 14_700,
            min_depth: limits.min_depth,
            max_depth: limits.max_depth,
            parallel_root: true,
            worker_threads: 0,
            difficulty: Difficulty::default(),
            cache_dir: None,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, EngineError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let text = std::fs::read_to_string(path).map_err(|source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// The deepening driver needs at least one cutoff depth to try.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.min_depth >= self.max_depth {
            return Err(EngineError::DepthRange {
                min_depth: self.min_depth,
                max_depth: self.max_depth,
            });
        }
        Ok(())
    }

    /// Depth range and per-move budget of one search.
    pub fn limits(&self) -> SearchLimits {
        SearchLimits {
            min_depth: self.min_depth,
            max_depth: self.max_depth,
            move_time: (self.time_budget_ms > 0).then(|| Duration::from_millis(self.time_budget_ms)),
        }
    }
}

/// Evaluation weights that can be swapped while searches run.
///
/// Every node reads the current value, so a change takes effect mid-search.
#[derive(Debug, Default)]
pub struct SharedWeights(RwLock<Weights>);

impl SharedWeights {
    pub fn new(weights: Weights) -> Self {
        Self(RwLock::new(weights))
    }

    #[inline]
    pub fn get(&self) -> Weights {
        *self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set(&self, weights: Weights) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = weights;
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
