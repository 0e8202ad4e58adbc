//! Alpha-beta engine for mini-checkers.
//!
//! Minimax with alpha-beta pruning, iterative deepening under a wall-clock
//! budget, memoization keyed by position and weights, and job bookkeeping so
//! a front end can cancel searches it no longer wants.

pub mod cache;
pub mod config;
pub mod deepening;
mod engine;
pub mod error;
pub mod jobs;
pub mod persist;
pub mod rules;
pub mod search;

pub use cache::{Cache, DeepeningKey, MemoryCache, NodeEntry, NodeKey};
pub use config::{EngineConfig, SharedWeights};
pub use deepening::{DepthResult, ResultSlot};
pub use engine::{CacheSizes, SearchEngine, SearchReport, SEARCH_STACK_SIZE};
pub use error::EngineError;
pub use jobs::{Delivery, JobCoordinator, JobId};
pub use search::{minimax, NodeResult, Outcome, SearchContext, Statistics};
