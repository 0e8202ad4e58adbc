//! Plain-text move notation: `row,col-row,col`, with `xrow,col` appended
//! for the captured square. Rows and columns are zero based.

use crate::{board::State, error::StateError, movegen::legal_moves_flat, types::*};

pub fn place_to_text(p: Place) -> String {
    format!("{},{}", p.row, p.column)
}

pub fn move_to_text(mv: Move) -> String {
    let mut s = format!("{}-{}", place_to_text(mv.from), place_to_text(mv.to));
    if let Some(c) = mv.capture {
        s.push('x');
        s.push_str(&place_to_text(c));
    }
    s
}

pub fn parse_place(txt: &str) -> Option<Place> {
    let (row, column) = txt.trim().split_once(',')?;
    Some(Place::new(row.trim().parse().ok()?, column.trim().parse().ok()?))
}

/// Parses a move and matches it against the legal moves, so only legal moves
/// come back. The capture suffix is optional on input; when given it must
/// name the square the move actually captures.
pub fn parse_move(
    board_size: usize,
    state: &State,
    turn: Color,
    txt: &str,
) -> Result<Move, StateError> {
    let bad = || StateError::Notation(txt.to_string());
    let (body, capture) = match txt.split_once('x') {
        Some((body, capture)) => (body, Some(parse_place(capture).ok_or_else(bad)?)),
        None => (txt, None),
    };
    let (from, to) = body.split_once('-').ok_or_else(bad)?;
    let from = parse_place(from).ok_or_else(bad)?;
    let to = parse_place(to).ok_or_else(bad)?;

    let mv = legal_moves_flat(board_size, state, turn)
        .into_iter()
        .find(|m| m.from == from && m.to == to)
        .ok_or(StateError::IllegalMove(Move::new(from, to)))?;
    match capture {
        Some(c) if mv.capture != Some(c) => {
            Err(StateError::IllegalMove(Move::jump(from, c, to)))
        }
        _ => Ok(mv),
    }
}

/// Text grid of the board: `r` red, `b` black, `.` empty, row 0 on top.
pub fn render(board_size: usize, state: &State) -> String {
    let mut out = String::with_capacity((board_size + 1) * (board_size * 2 + 4));
    out.push_str("  ");
    for column in 0..board_size {
        out.push_str(&format!(" {column}"));
    }
    out.push('\n');
    for row in 0..board_size {
        out.push_str(&format!("{row:>2}"));
        for column in 0..board_size {
            let ch = match state.color_at(Place::new(row as i32, column as i32)) {
                Some(Color::Red) => 'r',
                Some(Color::Black) => 'b',
                None => '.',
            };
            out.push(' ');
            out.push(ch);
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
#[path = "notation_tests.rs"]
mod notation_tests;
