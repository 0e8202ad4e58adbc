//! Weighted heuristic for cutoff leaves.
//!
//! Scores are from red's point of view: positive favors red, negative favors
//! black. Terminal states never get here; the search scores them as +inf,
//! -inf or 0 before calling [`evaluate`].

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::{board::State, movegen::legal_moves_flat, types::*};

/// Number of heuristic features combined by [`evaluate`].
pub const NUM_FEATURES: usize = 6;

/// AI strength levels, each tied to a fixed weight vector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    #[default]
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn weights(self) -> Weights {
        match self {
            Difficulty::Easy => Weights([0.6979, 0.2415, 0.0835, 0.0289, 0.01, 0.0035]),
            Difficulty::Medium => Weights([0.5495, 0.7160, 0.1225, 0.3750, -0.1995, 1.4420]),
            Difficulty::Hard => Weights([0.4174, 0.8370, 0.0456, 0.1986, 0.1112, 0.3588]),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn parse(s: &str) -> Option<Difficulty> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// Weight vector applied to the heuristic features.
///
/// Compared and hashed bit-for-bit so it can be part of a cache key.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Weights(pub [f64; NUM_FEATURES]);

impl PartialEq for Weights {
    fn eq(&self, other: &Self) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(a, b)| a.to_bits() == b.to_bits())
    }
}

impl Eq for Weights {}

impl Hash for Weights {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for w in self.0 {
            w.to_bits().hash(state);
        }
    }
}

impl Default for Weights {
    fn default() -> Self {
        Difficulty::default().weights()
    }
}

/// `ln(numerator / denominator)` that never divides by zero.
///
/// Equal counts give 0. A zero on one side returns the matching sentinel,
/// which keeps the sign and dwarfs any real log-ratio.
pub fn log_fraction_safe(
    numerator: usize,
    denominator: usize,
    if_top_zero: f64,
    if_bottom_zero: f64,
) -> f64 {
    if numerator == denominator {
        0.0
    } else if numerator == 0 {
        if_top_zero
    } else if denominator == 0 {
        if_bottom_zero
    } else {
        (numerator as f64 / denominator as f64).ln()
    }
}

/// Upper bound on the squares one color can ever use; the log-ratio sentinel.
pub fn sentinel(board_size: usize) -> f64 {
    let half_down = board_size / 2;
    let half_up = board_size.div_ceil(2);
    (half_down * half_down + half_up * half_up) as f64
}

/// Raw, unweighted feature values for a state.
pub fn features(board_size: usize, state: &State) -> [f64; NUM_FEATURES] {
    let red_moves = legal_moves_flat(board_size, state, Color::Red);
    let black_moves = legal_moves_flat(board_size, state, Color::Black);
    features_with_moves(board_size, state, &red_moves, &black_moves)
}

/// Same as [`features`] but reuses already generated legal moves.
pub fn features_with_moves(
    board_size: usize,
    state: &State,
    red_moves: &[Move],
    black_moves: &[Move],
) -> [f64; NUM_FEATURES] {
    let limit = sentinel(board_size);
    let middle = (board_size as f64 - 1.0) / 2.0;
    let ratio = |r: usize, b: usize| log_fraction_safe(r, b, -limit, limit);

    let captures = |moves: &[Move]| match moves.first() {
        Some(m) if m.is_capture() => moves.len(),
        _ => 0,
    };

    // A rear square that is off the board or occupied protects the piece
    // from a jump; each one counts.
    let backed = |color: Color| {
        state
            .pieces(color)
            .iter()
            .flat_map(|&from| color.other().forward().iter().map(move |&v| from.offset(v)))
            .filter(|&behind| !behind.on_board(board_size) || state.is_occupied(behind))
            .count()
    };

    let centrality = |color: Color| {
        state
            .pieces(color)
            .iter()
            .map(|p| middle - (p.column as f64 - middle).abs())
            .sum::<f64>()
    };

    // Summed over both colors together, unlike the other features.
    let rows: f64 = state
        .pieces(Color::Red)
        .iter()
        .chain(state.pieces(Color::Black))
        .map(|p| middle - p.row as f64)
        .sum();

    [
        ratio(state.count(Color::Red), state.count(Color::Black)),
        ratio(backed(Color::Red), backed(Color::Black)),
        ratio(captures(red_moves), captures(black_moves)),
        ratio(red_moves.len(), black_moves.len()),
        rows / middle,
        (centrality(Color::Red) - centrality(Color::Black)) / middle,
    ]
}

/// Heuristic value of a non-terminal state under `weights`.
pub fn evaluate(board_size: usize, state: &State, weights: &Weights) -> f64 {
    weigh(&features(board_size, state), weights)
}

pub fn weigh(features: &[f64; NUM_FEATURES], weights: &Weights) -> f64 {
    features.iter().zip(weights.0.iter()).map(|(f, w)| f * w).sum()
}

#[cfg(test)]
#[path = "eval_tests.rs"]
mod eval_tests;
