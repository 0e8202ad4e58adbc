use super::*;
use crate::cache::MemoryCache;
use checkers_core::{evaluate, game_ended, legal_moves_flat, Difficulty, Place, Weights};

struct Harness {
    rules: CachedRules,
    nodes: MemoryCache<NodeKey, NodeEntry>,
    weights: SharedWeights,
    expansions: AtomicU64,
    tc: TimeControl,
    pool: Option<ThreadPool>,
}

impl Harness {
    fn new(parallel: bool) -> Self {
        let pool = parallel.then(|| {
            rayon::ThreadPoolBuilder::new()
                .num_threads(2)
                .build()
                .unwrap()
        });
        Self {
            rules: CachedRules::new(),
            nodes: MemoryCache::new(),
            weights: SharedWeights::new(Difficulty::Hard.weights()),
            expansions: AtomicU64::new(0),
            tc: TimeControl::new(None),
            pool,
        }
    }

    fn ctx(&self, board_size: usize, cutoff_depth: u32) -> SearchContext<'_> {
        SearchContext {
            board_size,
            cutoff_depth,
            time_control: &self.tc,
            rules: &self.rules,
            nodes: &self.nodes,
            weights: &self.weights,
            pool: self.pool.as_ref(),
            expansions: &self.expansions,
        }
    }

    fn root(&self, board_size: usize, cutoff: u32, state: &State, turn: Color) -> NodeResult {
        let ctx = self.ctx(board_size, cutoff);
        match minimax(&ctx, turn, 0, state, f64::NEG_INFINITY, f64::INFINITY) {
            Outcome::Complete(result) => result,
            Outcome::Cancelled => panic!("search was cancelled"),
        }
    }

    fn expansions(&self) -> u64 {
        self.expansions.load(Ordering::Relaxed)
    }
}

/// Exhaustive minimax without pruning or caching.
fn plain_minimax(
    board_size: usize,
    state: &State,
    turn: Color,
    depth: u32,
    cutoff: u32,
    weights: &Weights,
) -> f64 {
    if let Some(value) = game_ended(board_size, state).utility() {
        return value;
    }
    if depth >= cutoff {
        return evaluate(board_size, state, weights);
    }
    let moves = legal_moves_flat(board_size, state, turn);
    if moves.is_empty() {
        return plain_minimax(board_size, state, turn.other(), depth + 1, cutoff, weights);
    }
    let values = moves.iter().map(|mv| {
        plain_minimax(board_size, &state.apply(mv), turn.other(), depth + 1, cutoff, weights)
    });
    if turn.is_red() {
        values.fold(f64::NEG_INFINITY, f64::max)
    } else {
        values.fold(f64::INFINITY, f64::min)
    }
}

fn p(row: i32, column: i32) -> Place {
    Place::new(row, column)
}

#[test]
fn test_statistics_accumulate() {
    let mut parent = Statistics::at_depth(1);
    let child = Statistics {
        max_depth: 4,
        nodes: 10,
        prunes_in_max: 2,
        prunes_in_min: 3,
    };
    parent.accumulate(&child);
    parent.accumulate(&Statistics::at_depth(2));
    assert_eq!(parent.max_depth, 4);
    assert_eq!(parent.nodes, 12);
    assert_eq!(parent.prunes_in_max, 2);
    assert_eq!(parent.prunes_in_min, 3);
}

#[test]
fn test_pruned_value_matches_plain_minimax_4x4() {
    let state = State::starting(4, 1).unwrap();
    let weights = Difficulty::Hard.weights();
    for parallel in [false, true] {
        for cutoff in [2, 3, 4, 6, 12] {
            for turn in [Color::Black, Color::Red] {
                let harness = Harness::new(parallel);
                let got = harness.root(4, cutoff, &state, turn);
                let want = plain_minimax(4, &state, turn, 0, cutoff, &weights);
                assert_eq!(got.value, want, "cutoff {cutoff}, {turn} to move");
                assert!(got.best_move.is_some());
            }
        }
    }
}

#[test]
fn test_pruned_value_matches_plain_minimax_6x6() {
    let start = State::starting(6, 2).unwrap();
    let opening = legal_moves_flat(6, &start, Color::Black)[2];
    let after = start.apply(&opening);
    let weights = Difficulty::Hard.weights();
    for (state, turn) in [(&start, Color::Black), (&after, Color::Red)] {
        for parallel in [false, true] {
            let harness = Harness::new(parallel);
            let got = harness.root(6, 4, state, turn);
            assert_eq!(got.value, plain_minimax(6, state, turn, 0, 4, &weights));
        }
    }
}

#[test]
fn test_forced_win_prunes_remaining_moves() {
    // Both red pieces can take the only black piece; the first win is final.
    let state = State::new([p(2, 1), p(2, 3)], [p(3, 2)]).unwrap();
    let harness = Harness::new(false);
    let root = harness.root(6, 6, &state, Color::Red);
    assert_eq!(root.value, f64::INFINITY);
    assert_eq!(root.best_move.unwrap().from, p(2, 1));
    assert_eq!(root.stats.prunes_in_max, 1);
}

#[test]
fn test_tie_goes_to_later_move() {
    // Mirror-symmetric position: mirrored moves score the same.
    let state = State::new([p(0, 2), p(0, 3)], [p(5, 0), p(5, 5)]).unwrap();
    let harness = Harness::new(false);
    let root = harness.root(6, 1, &state, Color::Red);
    assert!(root.value.is_finite());
    assert_eq!(root.best_move.unwrap().from, p(0, 3));
}

#[test]
fn test_black_win_is_negative_infinity() {
    let state = State::new([p(2, 1)], [p(3, 0), p(3, 2)]).unwrap();
    let harness = Harness::new(false);
    let root = harness.root(6, 6, &state, Color::Black);
    assert_eq!(root.value, f64::NEG_INFINITY);
    assert!(root.best_move.unwrap().is_capture());
}

#[test]
fn test_single_root_move_returned_without_search() {
    let state = State::new([p(2, 1)], [p(3, 2)]).unwrap();
    let harness = Harness::new(false);
    let root = harness.root(6, 6, &state, Color::Red);
    assert_eq!(root.value, 0.0);
    assert_eq!(root.best_move, Some(Move::jump(p(2, 1), p(3, 2), p(4, 3))));
    assert_eq!(root.stats.nodes, 1);
    assert_eq!(harness.expansions(), 1);
}

#[test]
fn test_stuck_side_passes() {
    // Red sits on its last row; black still has moves.
    let state = State::new([p(5, 0), p(5, 4)], [p(3, 3), p(2, 0)]).unwrap();
    let harness = Harness::new(false);
    let root = harness.root(6, 3, &state, Color::Red);
    assert_eq!(root.best_move, None);
    let weights = harness.weights.get();
    assert_eq!(root.value, plain_minimax(6, &state, Color::Red, 0, 3, &weights));
    assert!(root.stats.nodes > 1);
}

#[test]
fn test_cancelled_before_start() {
    let harness = Harness::new(false);
    harness.tc.stop();
    let ctx = harness.ctx(6, 6);
    let state = State::starting(6, 2).unwrap();
    let outcome = minimax(&ctx, Color::Black, 0, &state, f64::NEG_INFINITY, f64::INFINITY);
    assert_eq!(outcome, Outcome::Cancelled);
    assert_eq!(harness.expansions(), 0);
    assert!(harness.nodes.is_empty());
}

#[test]
fn test_resolved_tree_is_cached() {
    let state = State::starting(4, 1).unwrap();
    let harness = Harness::new(false);
    let first = harness.root(4, 40, &state, Color::Black);
    assert!(first.stats.max_depth < 40, "4x4 game tree should resolve");
    let spent = harness.expansions();
    assert!(spent > 0);

    let second = harness.root(4, 40, &state, Color::Black);
    assert_eq!(second, first);
    assert_eq!(harness.expansions(), spent);
}

#[test]
fn test_truncated_root_not_cached() {
    let state = State::starting(6, 2).unwrap();
    let harness = Harness::new(false);
    let result = harness.root(6, 2, &state, Color::Black);
    assert_eq!(result.stats.max_depth, 2);
    let key = NodeKey::new(
        Color::Black,
        6,
        &state,
        f64::NEG_INFINITY,
        f64::INFINITY,
        harness.weights.get(),
    );
    assert!(harness.nodes.get(&key).is_none());
}

#[test]
fn test_weights_change_the_heuristic_value() {
    let state = State::starting(6, 2).unwrap();
    let harness = Harness::new(false);
    let hard = harness.root(6, 2, &state, Color::Black).value;
    harness.weights.set(Difficulty::Easy.weights());
    let easy = harness.root(6, 2, &state, Color::Black).value;
    let weights = Difficulty::Easy.weights();
    assert_eq!(easy, plain_minimax(6, &state, Color::Black, 0, 2, &weights));
    assert_ne!(hard.to_bits(), easy.to_bits());
}
