//! Iterative deepening driver and the slot it publishes into.
//!
//! The driver searches the root at cutoff depths `d, d + 2, d + 4, ...` and
//! publishes each completed depth. The owner of the job waits on the slot,
//! reads the latest published depth when its budget runs out, and then stops
//! the driver.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use checkers_core::{Color, Move, State, TimeControl};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cache::{float_bits, Cache, DeepeningKey};
use crate::engine::EngineShared;
use crate::search::{minimax, Outcome, Statistics};

/// One completed iteration of the driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthResult {
    pub cutoff_depth: u32,
    #[serde(with = "float_bits")]
    pub value: f64,
    pub best_move: Option<Move>,
    pub stats: Statistics,
}

impl DepthResult {
    /// True when no leaf was cut off, so deeper searches cannot change it.
    pub fn is_resolved(&self) -> bool {
        self.stats.max_depth < self.cutoff_depth
    }
}

#[derive(Debug, Default)]
struct SlotState {
    latest: Option<DepthResult>,
    finished: bool,
}

/// Latest published depth of one job plus a "driver finished" flag.
#[derive(Debug, Default)]
pub struct ResultSlot {
    state: Mutex<SlotState>,
    changed: Condvar,
}

impl ResultSlot {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SlotState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the published result and wake waiters.
    pub fn publish(&self, result: DepthResult) {
        self.lock().latest = Some(result);
        self.changed.notify_all();
    }

    pub fn mark_finished(&self) {
        self.lock().finished = true;
        self.changed.notify_all();
    }

    pub fn latest(&self) -> Option<DepthResult> {
        self.lock().latest.clone()
    }

    /// Wait until the driver finishes or `timeout` passes; `None` waits forever.
    /// Returns whether the driver finished.
    pub fn wait_finished(&self, timeout: Option<Duration>) -> bool {
        let guard = self.lock();
        let guard = match timeout {
            Some(timeout) => {
                self.changed
                    .wait_timeout_while(guard, timeout, |s| !s.finished)
                    .unwrap_or_else(PoisonError::into_inner)
                    .0
            }
            None => self
                .changed
                .wait_while(guard, |s| !s.finished)
                .unwrap_or_else(PoisonError::into_inner),
        };
        guard.finished
    }

    /// Wait until a result is published or the driver finishes without one.
    pub fn wait_for_result(&self) -> Option<DepthResult> {
        let guard = self
            .changed
            .wait_while(self.lock(), |s| s.latest.is_none() && !s.finished)
            .unwrap_or_else(PoisonError::into_inner);
        guard.latest.clone()
    }
}

/// Marks the slot finished when dropped, so waiters wake even if the driver
/// unwinds.
pub(crate) struct FinishOnDrop<'a>(pub &'a ResultSlot);

impl Drop for FinishOnDrop<'_> {
    fn drop(&mut self) {
        self.0.mark_finished();
    }
}

impl EngineShared {
    /// Deepen the search of one root until stopped, resolved or out of depth.
    pub(crate) fn deepen(
        &self,
        board_size: usize,
        state: &State,
        turn: Color,
        tc: &TimeControl,
        slot: &ResultSlot,
    ) {
        let limits = self.config.limits();
        let key = DeepeningKey {
            turn,
            board_size,
            state: state.clone(),
            weights: self.weights.get(),
        };

        let first_depth = match self.deepening.get(&key) {
            Some(cached) => {
                debug!(depth = cached.cutoff_depth, "resuming from cached depth");
                let next = cached.cutoff_depth + 2;
                let resolved = cached.is_resolved();
                slot.publish(cached);
                if resolved {
                    return;
                }
                next
            }
            None => limits.min_depth,
        };

        for cutoff_depth in (first_depth..limits.max_depth).step_by(2) {
            if tc.is_stopped() {
                break;
            }
            let ctx = self.context(board_size, cutoff_depth, tc);
            let Outcome::Complete(root) =
                minimax(&ctx, turn, 0, state, f64::NEG_INFINITY, f64::INFINITY)
            else {
                break;
            };
            if tc.is_stopped() {
                break;
            }

            let result = DepthResult {
                cutoff_depth,
                value: root.value,
                best_move: root.best_move,
                stats: root.stats,
            };
            debug!(
                depth = cutoff_depth,
                value = result.value,
                nodes = result.stats.nodes,
                "depth complete"
            );
            self.deepening.put(key.clone(), result.clone());
            let resolved = result.is_resolved();
            slot.publish(result);

            if resolved || tc.should_stop_after_result() {
                break;
            }
        }
    }
}

#[cfg(test)]
#[path = "deepening_tests.rs"]
mod deepening_tests;
