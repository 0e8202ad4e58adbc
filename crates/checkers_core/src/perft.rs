use crate::{
    board::State,
    movegen::legal_moves_flat,
    outcome::{game_ended, GameEnd},
    types::Color,
};

/// Pure perft node count.
/// Counts the leaves of the legal-move tree `depth` plies below `state`.
/// Finished games are leaves; a side with no move passes, which costs a ply.
pub fn perft(board_size: usize, state: &State, turn: Color, depth: u32) -> u64 {
    if depth == 0 || game_ended(board_size, state) != GameEnd::NotEnded {
        return 1;
    }

    let moves = legal_moves_flat(board_size, state, turn);
    if moves.is_empty() {
        return perft(board_size, state, turn.other(), depth - 1);
    }

    moves
        .iter()
        .map(|mv| perft(board_size, &state.apply(mv), turn.other(), depth - 1))
        .sum()
}
