use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use checkers_core::{Color, Difficulty, Move, Player, State, TimeControl, Weights};
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, info, warn};

use crate::cache::{Cache, DeepeningKey, MemoryCache, NodeEntry, NodeKey};
use crate::config::{EngineConfig, SharedWeights};
use crate::deepening::{DepthResult, FinishOnDrop, ResultSlot};
use crate::error::EngineError;
use crate::jobs::{Delivery, JobCoordinator, JobId};
use crate::persist::{self, DEEPENING_CACHE_FILE, NODE_CACHE_FILE};
use crate::rules::CachedRules;
use crate::search::SearchContext;

/// Stack size of the deepening driver and the root workers.
pub const SEARCH_STACK_SIZE: usize = 16 * 1024 * 1024;

/// State shared by every job of one engine.
pub(crate) struct EngineShared {
    pub(crate) config: EngineConfig,
    pub(crate) weights: SharedWeights,
    pub(crate) rules: CachedRules,
    pub(crate) nodes: MemoryCache<NodeKey, NodeEntry>,
    pub(crate) deepening: MemoryCache<DeepeningKey, DepthResult>,
    pub(crate) jobs: JobCoordinator,
    pub(crate) pool: Option<ThreadPool>,
    pub(crate) expansions: AtomicU64,
}

impl EngineShared {
    pub(crate) fn context<'a>(
        &'a self,
        board_size: usize,
        cutoff_depth: u32,
        time_control: &'a TimeControl,
    ) -> SearchContext<'a> {
        SearchContext {
            board_size,
            cutoff_depth,
            time_control,
            rules: &self.rules,
            nodes: &self.nodes,
            weights: &self.weights,
            pool: self.pool.as_ref(),
            expansions: &self.expansions,
        }
    }
}

/// What one search job produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchReport {
    pub turn: Color,
    pub best_move: Option<Move>,
    /// Deepest completed iteration, if any finished in time
    pub result: Option<DepthResult>,
    pub elapsed: Duration,
    /// The job was stopped from outside before it produced a move
    pub cancelled: bool,
}

/// Sizes of the durable caches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheSizes {
    pub nodes: usize,
    pub deepening: usize,
}

/// Drive one job: deepen on a helper thread, wait out the budget, then collect
/// the latest result.
fn run_search(
    shared: &Arc<EngineShared>,
    board_size: usize,
    state: State,
    turn: Color,
    tc: &TimeControl,
) -> Result<SearchReport, EngineError> {
    let slot = Arc::new(ResultSlot::new());
    {
        let shared = Arc::clone(shared);
        let slot = Arc::clone(&slot);
        let tc = tc.clone();
        thread::Builder::new()
            .name("alphabeta-deepening".to_string())
            .stack_size(SEARCH_STACK_SIZE)
            .spawn(move || {
                let _finished = FinishOnDrop(&slot);
                shared.deepen(board_size, &state, turn, &tc, &slot);
            })
            .map_err(EngineError::Spawn)?;
    }

    slot.wait_finished(tc.remaining());
    if tc.is_stopped() {
        return Ok(SearchReport {
            turn,
            best_move: None,
            result: None,
            elapsed: tc.elapsed(),
            cancelled: true,
        });
    }

    // Let the depth in progress publish if nothing has been published yet,
    // then stop the driver.
    tc.stop_after_result();
    let result = slot.wait_for_result();
    tc.stop();

    let elapsed = tc.elapsed();
    match &result {
        Some(r) => info!(
            side = %turn,
            elapsed_ms = elapsed.as_millis() as u64,
            depth = r.stats.max_depth,
            cutoff = r.cutoff_depth,
            nodes = r.stats.nodes,
            prunes_in_max = r.stats.prunes_in_max,
            prunes_in_min = r.stats.prunes_in_min,
            value = r.value,
            "search finished"
        ),
        None => warn!(side = %turn, "search finished without a result"),
    }

    Ok(SearchReport {
        turn,
        best_move: result.as_ref().and_then(|r| r.best_move),
        result,
        elapsed,
        cancelled: false,
    })
}

/// Time-bounded alpha-beta engine with shared caches.
///
/// Cloning is cheap; clones share caches, weights and jobs.
#[derive(Clone)]
pub struct SearchEngine {
    pub(crate) shared: Arc<EngineShared>,
    name: String,
}

impl SearchEngine {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let pool = if config.parallel_root {
            Some(
                ThreadPoolBuilder::new()
                    .num_threads(config.worker_threads)
                    .stack_size(SEARCH_STACK_SIZE)
                    .thread_name(|i| format!("alphabeta-worker-{i}"))
                    .build()?,
            )
        } else {
            None
        };
        let name = format!("alpha-beta ({})", config.difficulty.name());
        let shared = EngineShared {
            weights: SharedWeights::new(config.difficulty.weights()),
            rules: CachedRules::new(),
            nodes: MemoryCache::new(),
            deepening: MemoryCache::new(),
            jobs: JobCoordinator::new(),
            pool,
            expansions: AtomicU64::new(0),
            config,
        };
        Ok(Self {
            shared: Arc::new(shared),
            name,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.shared.config
    }

    pub fn weights(&self) -> Weights {
        self.shared.weights.get()
    }

    /// Replace the evaluation weights; running searches pick them up at
    /// their next node.
    pub fn set_weights(&self, weights: Weights) {
        self.shared.weights.set(weights);
    }

    pub fn set_difficulty(&self, difficulty: Difficulty) {
        info!(difficulty = difficulty.name(), "difficulty changed");
        self.set_weights(difficulty.weights());
    }

    pub fn next_job_id(&self) -> JobId {
        self.shared.jobs.next_id()
    }

    /// Start a background search and return at once.
    ///
    /// `on_result` runs on the job's thread with the chosen move, or `None`
    /// when the side has no move or no depth finished. It never runs for a
    /// job cancelled by [`SearchEngine::cancel_all_running`].
    pub fn search<F>(
        &self,
        board_size: usize,
        state: State,
        turn: Color,
        job: JobId,
        on_result: F,
    ) -> Result<(), EngineError>
    where
        F: FnOnce(JobId, Option<Move>) + Send + 'static,
    {
        state.validate(board_size)?;

        let jobs = &self.shared.jobs;
        let tc = TimeControl::new(self.shared.config.limits().move_time);
        tc.start();
        let ticket = jobs.start(job, tc.clone());
        debug!(job = %job, side = %turn, "search job started");

        let shared = Arc::clone(&self.shared);
        let spawned = thread::Builder::new()
            .name(format!("alphabeta-job-{}", job.0))
            .spawn(move || {
                let report = run_search(&shared, board_size, state, turn, &tc);
                shared.jobs.unregister_stop(ticket);
                let best_move = match report {
                    Ok(report) => report.best_move,
                    Err(e) => {
                        warn!(job = %job, error = %e, "search failed");
                        None
                    }
                };
                match shared.jobs.finish(job) {
                    Delivery::Deliver => on_result(job, best_move),
                    Delivery::Discard => warn!(job = %job, "dropping result of cancelled job"),
                }
            });

        if let Err(e) = spawned {
            jobs.unregister_stop(ticket);
            jobs.finish(job);
            return Err(EngineError::Spawn(e));
        }
        Ok(())
    }

    /// Search on the calling thread and return the full report.
    ///
    /// Blocking searches are not jobs; they are still stopped by
    /// [`SearchEngine::cancel_all_running`].
    pub fn search_blocking(
        &self,
        board_size: usize,
        state: &State,
        turn: Color,
    ) -> Result<SearchReport, EngineError> {
        state.validate(board_size)?;

        let tc = TimeControl::new(self.shared.config.limits().move_time);
        tc.start();
        let ticket = self.shared.jobs.register_stop(tc.clone());
        let report = run_search(&self.shared, board_size, state.clone(), turn, &tc);
        self.shared.jobs.unregister_stop(ticket);
        report
    }

    /// Drop the results of every running job and stop every active search.
    pub fn cancel_all_running(&self) -> Vec<JobId> {
        let cancelled = self.shared.jobs.cancel_all_running();
        if !cancelled.is_empty() {
            info!(jobs = cancelled.len(), "cancelled running searches");
        }
        cancelled
    }

    pub fn running_jobs(&self) -> Vec<JobId> {
        self.shared.jobs.running()
    }

    /// Nodes whose moves were enumerated since the engine was created.
    pub fn expansions(&self) -> u64 {
        self.shared.expansions.load(Ordering::Relaxed)
    }

    pub fn cache_sizes(&self) -> CacheSizes {
        CacheSizes {
            nodes: self.shared.nodes.len(),
            deepening: self.shared.deepening.len(),
        }
    }

    /// Merge the snapshots under the configured cache directory into memory.
    ///
    /// Missing or unreadable files leave the matching cache as it was.
    pub fn load_caches(&self) -> CacheSizes {
        let Some(dir) = self.shared.config.cache_dir.as_deref() else {
            return CacheSizes::default();
        };
        let loaded = CacheSizes {
            nodes: load_into(&self.shared.nodes, &dir.join(NODE_CACHE_FILE)),
            deepening: load_into(&self.shared.deepening, &dir.join(DEEPENING_CACHE_FILE)),
        };
        info!(
            nodes = loaded.nodes,
            deepening = loaded.deepening,
            dir = %dir.display(),
            "loaded search caches"
        );
        loaded
    }

    /// Write the durable caches under the configured cache directory.
    pub fn save_caches(&self) -> Result<(), EngineError> {
        let Some(dir) = self.shared.config.cache_dir.as_deref() else {
            return Ok(());
        };
        persist::save(&dir.join(NODE_CACHE_FILE), self.shared.nodes.entries())?;
        persist::save(&dir.join(DEEPENING_CACHE_FILE), self.shared.deepening.entries())?;
        info!(dir = %dir.display(), "saved search caches");
        Ok(())
    }
}

fn load_into<K, V>(cache: &MemoryCache<K, V>, path: &Path) -> usize
where
    K: serde::de::DeserializeOwned + Eq + std::hash::Hash + Clone,
    V: serde::de::DeserializeOwned + Clone,
{
    match persist::load(path) {
        Ok(entries) => cache.extend(entries),
        Err(e) if e.is_missing_file() => {
            debug!(path = %path.display(), "no cache snapshot yet");
            0
        }
        Err(e) => {
            warn!(error = %e, "ignoring unreadable cache snapshot");
            0
        }
    }
}

impl Player for SearchEngine {
    fn choose_move(&mut self, board_size: usize, state: &State, turn: Color) -> Option<Move> {
        match self.search_blocking(board_size, state, turn) {
            Ok(report) => report.best_move,
            Err(e) => {
                warn!(error = %e, "search rejected position");
                None
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod engine_tests;
