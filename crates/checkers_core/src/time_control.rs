//! Search limits and cooperative cancellation.
//!
//! A [`TimeControl`] is cheap to clone and is shared between the thread that
//! owns a search job, the iterative deepening driver and every recursive
//! search call. Two stop levels exist: [`TimeControl::stop`] aborts the
//! search at the next node, [`TimeControl::stop_after_result`] lets the depth
//! in progress finish and publish before the driver quits.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

/// Limits for one iterative deepening run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    /// First cutoff depth tried when nothing is cached
    pub min_depth: u32,
    /// Exclusive upper bound on the cutoff depth
    pub max_depth: u32,
    /// Wall-clock budget for one move (None = until the tree is exhausted)
    pub move_time: Option<Duration>,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            min_depth: 6,
            max_depth: 3064,
            move_time: Some(Duration::from_millis(14_700)),
        }
    }
}

/// Thread-safe stop flags plus the clock of one search job.
#[derive(Debug, Clone)]
pub struct TimeControl {
    /// Abort immediately; results computed afterwards are invalid
    stopped: Arc<AtomicBool>,
    /// Finish the current depth, publish it, then quit
    stop_after_result: Arc<AtomicBool>,
    /// Start time of the search
    start_time: Arc<RwLock<Option<Instant>>>,
    /// Time limit for this search (None = infinite)
    time_limit: Option<Duration>,
}

impl TimeControl {
    pub fn new(time_limit: Option<Duration>) -> Self {
        Self {
            stopped: Arc::new(AtomicBool::new(false)),
            stop_after_result: Arc::new(AtomicBool::new(false)),
            start_time: Arc::new(RwLock::new(None)),
            time_limit,
        }
    }

    /// Start the clock. Should be called when search begins.
    pub fn start(&self) {
        *self.start_time.write().unwrap_or_else(PoisonError::into_inner) = Some(Instant::now());
    }

    /// Force stop the search immediately.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    /// This is a fast atomic load, suitable for calling at every node.
    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }

    /// Ask the driver to quit once the depth in progress has been published.
    pub fn stop_after_result(&self) {
        self.stop_after_result.store(true, Ordering::SeqCst);
    }

    #[inline]
    pub fn should_stop_after_result(&self) -> bool {
        self.stop_after_result.load(Ordering::Relaxed)
    }

    /// Get elapsed time since search started.
    pub fn elapsed(&self) -> Duration {
        self.start_time
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .map(|s| s.elapsed())
            .unwrap_or(Duration::ZERO)
    }

    /// Get remaining time (None if no limit).
    pub fn remaining(&self) -> Option<Duration> {
        let limit = self.time_limit?;
        Some(limit.saturating_sub(self.elapsed()))
    }
}

impl Default for TimeControl {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
#[path = "time_control_tests.rs"]
mod time_control_tests;
