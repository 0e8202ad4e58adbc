//! Memoized wrappers around the pure rules in `checkers_core`.

use std::sync::Arc;

use checkers_core::{
    features_with_moves, flatten, game_ended_with, legal_moves, weigh, Color, GameEnd, Move,
    MovesByOrigin, State, Weights,
};

use crate::cache::{Cache, MemoryCache};

type MovesKey = (usize, State, Color);

/// Rules queries backed by in-memory caches.
#[derive(Debug, Default)]
pub struct CachedRules {
    results: MemoryCache<(State, Move), State>,
    by_origin: MemoryCache<MovesKey, Arc<MovesByOrigin>>,
    flat: MemoryCache<MovesKey, Arc<[Move]>>,
}

impl CachedRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&self, state: &State, mv: &Move) -> State {
        self.results
            .get_or_insert_with((state.clone(), *mv), || state.apply(mv))
    }

    pub fn legal_moves(&self, board_size: usize, state: &State, turn: Color) -> Arc<MovesByOrigin> {
        self.by_origin
            .get_or_insert_with((board_size, state.clone(), turn), || {
                Arc::new(legal_moves(board_size, state, turn))
            })
    }

    pub fn legal_moves_flat(&self, board_size: usize, state: &State, turn: Color) -> Arc<[Move]> {
        self.flat.get_or_insert_with((board_size, state.clone(), turn), || {
            flatten(&self.legal_moves(board_size, state, turn)).into()
        })
    }

    pub fn game_ended(&self, board_size: usize, state: &State) -> GameEnd {
        game_ended_with(state, |color| {
            !self.legal_moves(board_size, state, color).is_empty()
        })
    }

    /// Heuristic value of a non-terminal state, reusing cached moves.
    pub fn evaluate(&self, board_size: usize, state: &State, weights: &Weights) -> f64 {
        let red = self.legal_moves_flat(board_size, state, Color::Red);
        let black = self.legal_moves_flat(board_size, state, Color::Black);
        weigh(&features_with_moves(board_size, state, &red, &black), weights)
    }
}
