//! Minimax with alpha-beta pruning over the red/black game tree.
//!
//! Red maximizes, black minimizes. Values are from red's point of view:
//! `+inf` is a red win, `-inf` a black win, `0` a draw, anything else comes
//! from the heuristic at the cutoff depth.

use std::ops::ControlFlow;
use std::sync::atomic::{AtomicU64, Ordering};

use checkers_core::{Color, Move, State, TimeControl};
use rayon::prelude::*;
use rayon::ThreadPool;
use serde::{Deserialize, Serialize};

use crate::cache::{Cache, NodeEntry, NodeKey};
use crate::config::SharedWeights;
use crate::rules::CachedRules;

/// Search statistics for one subtree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    /// Deepest ply reached in the subtree
    pub max_depth: u32,
    /// Nodes visited, this one included
    pub nodes: u64,
    /// Cutoffs taken at red (maximizing) nodes
    pub prunes_in_max: u64,
    /// Cutoffs taken at black (minimizing) nodes
    pub prunes_in_min: u64,
}

impl Statistics {
    /// Statistics of a lone node at `depth`.
    pub fn at_depth(depth: u32) -> Self {
        Self {
            max_depth: depth,
            nodes: 1,
            ..Self::default()
        }
    }

    /// Fold in the statistics of a child subtree.
    pub fn accumulate(&mut self, child: &Statistics) {
        self.max_depth = self.max_depth.max(child.max_depth);
        self.nodes += child.nodes;
        self.prunes_in_max += child.prunes_in_max;
        self.prunes_in_min += child.prunes_in_min;
    }
}

/// Value of a searched subtree.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeResult {
    pub value: f64,
    /// Move achieving `value`; `None` at leaves and when the side passes
    pub best_move: Option<Move>,
    pub stats: Statistics,
}

impl NodeResult {
    fn leaf(value: f64, stats: Statistics) -> Self {
        Self {
            value,
            best_move: None,
            stats,
        }
    }
}

impl From<NodeEntry> for NodeResult {
    fn from(entry: NodeEntry) -> Self {
        Self {
            value: entry.value,
            best_move: entry.best_move,
            stats: entry.stats,
        }
    }
}

impl From<&NodeResult> for NodeEntry {
    fn from(result: &NodeResult) -> Self {
        Self {
            value: result.value,
            best_move: result.best_move,
            stats: result.stats,
        }
    }
}

/// Result of a search call.
///
/// A cancelled search produces no value; partial values are never mixed into
/// a parent's choice.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Complete(NodeResult),
    Cancelled,
}

/// Everything a search call needs besides the node itself.
pub struct SearchContext<'a> {
    pub board_size: usize,
    /// Nodes at this depth are scored by the heuristic
    pub cutoff_depth: u32,
    pub time_control: &'a TimeControl,
    pub rules: &'a CachedRules,
    pub nodes: &'a dyn Cache<NodeKey, NodeEntry>,
    pub weights: &'a SharedWeights,
    /// Pool for the children of the root; sequential when `None`
    pub pool: Option<&'a ThreadPool>,
    /// Count of nodes whose moves were enumerated
    pub expansions: &'a AtomicU64,
}

/// Running best choice at one node.
struct Choice {
    turn: Color,
    alpha: f64,
    beta: f64,
    value: f64,
    best_move: Option<Move>,
    stats: Statistics,
}

impl Choice {
    fn new(turn: Color, alpha: f64, beta: f64, stats: Statistics) -> Self {
        let value = if turn.is_red() {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
        Self {
            turn,
            alpha,
            beta,
            value,
            best_move: None,
            stats,
        }
    }

    /// Ties go to the later move.
    fn consider(&mut self, mv: Move, child: &NodeResult) -> ControlFlow<()> {
        self.stats.accumulate(&child.stats);
        if self.turn.is_red() {
            if child.value >= self.value {
                self.value = child.value;
                self.best_move = Some(mv);
            }
            if self.value >= self.beta {
                self.stats.prunes_in_max += 1;
                return ControlFlow::Break(());
            }
            self.alpha = self.alpha.max(self.value);
        } else {
            if child.value <= self.value {
                self.value = child.value;
                self.best_move = Some(mv);
            }
            if self.value <= self.alpha {
                self.stats.prunes_in_min += 1;
                return ControlFlow::Break(());
            }
            self.beta = self.beta.min(self.value);
        }
        ControlFlow::Continue(())
    }
}

/// Search `state` with `turn` to move, `depth` plies below the root.
pub fn minimax(
    ctx: &SearchContext<'_>,
    turn: Color,
    depth: u32,
    state: &State,
    alpha: f64,
    beta: f64,
) -> Outcome {
    let tc = ctx.time_control;
    if tc.is_stopped() {
        return Outcome::Cancelled;
    }

    let weights = ctx.weights.get();
    let key = NodeKey::new(turn, ctx.board_size, state, alpha, beta, weights);
    if let Some(hit) = ctx.nodes.get(&key) {
        return Outcome::Complete(hit.into());
    }

    let stats = Statistics::at_depth(depth);
    if let Some(value) = ctx.rules.game_ended(ctx.board_size, state).utility() {
        return Outcome::Complete(NodeResult::leaf(value, stats));
    }
    if depth >= ctx.cutoff_depth {
        let value = ctx.rules.evaluate(ctx.board_size, state, &weights);
        return Outcome::Complete(NodeResult::leaf(value, stats));
    }

    let moves = ctx.rules.legal_moves_flat(ctx.board_size, state, turn);
    ctx.expansions.fetch_add(1, Ordering::Relaxed);

    // Nothing to decide at the root; the value is never looked at.
    if depth == 0 && moves.len() == 1 {
        return Outcome::Complete(NodeResult {
            value: 0.0,
            best_move: Some(moves[0]),
            stats,
        });
    }

    let mut choice = Choice::new(turn, alpha, beta, stats);
    match ctx.pool {
        Some(pool) if depth == 0 => {
            // Every root child sees the root window; the fold below is the
            // same as the sequential one.
            let children: Vec<Outcome> = pool.install(|| {
                moves
                    .par_iter()
                    .map(|mv| {
                        let child = ctx.rules.apply(state, mv);
                        minimax(ctx, turn.other(), depth + 1, &child, alpha, beta)
                    })
                    .collect()
            });
            for (mv, child) in moves.iter().zip(children) {
                if tc.is_stopped() {
                    break;
                }
                let Outcome::Complete(child) = child else {
                    break;
                };
                if choice.consider(*mv, &child).is_break() {
                    break;
                }
            }
        }
        _ => {
            for mv in moves.iter() {
                if tc.is_stopped() {
                    break;
                }
                let next = ctx.rules.apply(state, mv);
                let child = minimax(ctx, turn.other(), depth + 1, &next, choice.alpha, choice.beta);
                let Outcome::Complete(child) = child else {
                    break;
                };
                if choice.consider(*mv, &child).is_break() {
                    break;
                }
            }
        }
    }

    if tc.is_stopped() {
        return Outcome::Cancelled;
    }

    let result = if choice.best_move.is_some() {
        NodeResult {
            value: choice.value,
            best_move: choice.best_move,
            stats: choice.stats,
        }
    } else {
        // No move: pass the turn without changing the board.
        let passed = minimax(ctx, turn.other(), depth + 1, state, alpha, beta);
        let Outcome::Complete(passed) = passed else {
            return Outcome::Cancelled;
        };
        let mut stats = choice.stats;
        stats.accumulate(&passed.stats);
        NodeResult {
            value: passed.value,
            best_move: None,
            stats,
        }
    };

    if result.stats.max_depth < ctx.cutoff_depth && !tc.is_stopped() {
        ctx.nodes.put(key, (&result).into());
    }
    Outcome::Complete(result)
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod search_tests;
