use std::collections::BTreeMap;

use crate::{board::State, types::*};

/// Legal moves grouped by the square they start from.
pub type MovesByOrigin = BTreeMap<Place, Vec<Move>>;

/// Moves available from one square, ignoring captures elsewhere on the board.
///
/// Either every returned move is a capture or none is: once a jump is found
/// from `from`, plain steps from the same square are dropped.
pub fn moves_from(board_size: usize, state: &State, from: Place) -> Vec<Move> {
    let mut out = Vec::with_capacity(2);
    moves_from_into(board_size, state, from, &mut out);
    out
}

fn moves_from_into(board_size: usize, state: &State, from: Place, out: &mut Vec<Move>) {
    out.clear();
    let Some(mover) = state.color_at(from) else {
        return;
    };

    let mut captures = false;
    for &v in mover.forward() {
        let next = from.offset(v);
        if !next.on_board(board_size) {
            continue;
        }
        match state.color_at(next) {
            None => {
                if !captures {
                    out.push(Move::new(from, next));
                }
            }
            Some(c) if c != mover => {
                let landing = next.offset(v);
                if landing.on_board(board_size) && !state.is_occupied(landing) {
                    if !captures {
                        captures = true;
                        out.clear();
                    }
                    out.push(Move::jump(from, next, landing));
                }
            }
            Some(_) => {}
        }
    }
}

/// All legal moves for `turn`, keyed by origin.
///
/// Forced capture applies board-wide: if any piece can jump, no origin
/// keeps a non-capturing move.
pub fn legal_moves(board_size: usize, state: &State, turn: Color) -> MovesByOrigin {
    let mut result = MovesByOrigin::new();
    let mut captures_only = false;
    let mut buf = Vec::with_capacity(2);

    for &from in state.pieces(turn) {
        moves_from_into(board_size, state, from, &mut buf);
        let Some(first) = buf.first() else {
            continue;
        };
        // moves_from never mixes jumps and steps, so the first move decides.
        let captures = first.is_capture();
        if captures == captures_only {
            result.insert(from, buf.clone());
        } else if captures {
            result.clear();
            result.insert(from, buf.clone());
            captures_only = true;
        }
    }
    result
}

/// Flattened view of [`legal_moves`], in origin order.
pub fn legal_moves_flat(board_size: usize, state: &State, turn: Color) -> Vec<Move> {
    flatten(&legal_moves(board_size, state, turn))
}

pub fn flatten(moves: &MovesByOrigin) -> Vec<Move> {
    moves.values().flatten().copied().collect()
}

#[cfg(test)]
#[path = "movegen_tests.rs"]
mod movegen_tests;
