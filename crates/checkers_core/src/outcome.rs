//! Terminal-state detection.

use serde::{Deserialize, Serialize};

use crate::{board::State, movegen::legal_moves, types::Color};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameEnd {
    NotEnded,
    WinRed,
    WinBlack,
    Draw,
}

impl GameEnd {
    /// Fixed utility of a finished game: red wins are +inf, black wins -inf.
    pub fn utility(self) -> Option<f64> {
        match self {
            GameEnd::NotEnded => None,
            GameEnd::WinRed => Some(f64::INFINITY),
            GameEnd::WinBlack => Some(f64::NEG_INFINITY),
            GameEnd::Draw => Some(0.0),
        }
    }

    pub fn is_over(self) -> bool {
        self != GameEnd::NotEnded
    }

    pub fn winner(self) -> Option<Color> {
        match self {
            GameEnd::WinRed => Some(Color::Red),
            GameEnd::WinBlack => Some(Color::Black),
            _ => None,
        }
    }
}

/// Decides whether the game is over.
///
/// A side without pieces loses. When neither side can move, the side with
/// more pieces wins and equal counts draw.
pub fn game_ended(board_size: usize, state: &State) -> GameEnd {
    game_ended_with(state, |color| {
        !legal_moves(board_size, state, color).is_empty()
    })
}

/// Same as [`game_ended`] but asks `has_moves` instead of generating moves,
/// so callers holding a move cache can reuse it.
pub fn game_ended_with<F>(state: &State, mut has_moves: F) -> GameEnd
where
    F: FnMut(Color) -> bool,
{
    let red = state.count(Color::Red);
    let black = state.count(Color::Black);
    if black == 0 {
        return GameEnd::WinRed;
    }
    if red == 0 {
        return GameEnd::WinBlack;
    }
    if !has_moves(Color::Black) && !has_moves(Color::Red) {
        return match black.cmp(&red) {
            std::cmp::Ordering::Greater => GameEnd::WinBlack,
            std::cmp::Ordering::Less => GameEnd::WinRed,
            std::cmp::Ordering::Equal => GameEnd::Draw,
        };
    }
    GameEnd::NotEnded
}

#[cfg(test)]
#[path = "outcome_tests.rs"]
mod outcome_tests;
