use thiserror::Error;

use crate::types::{Move, Place};

/// Malformed input handed to the board model by a collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("board size {0} is too small; at least 2 squares per side are required")]
    BoardTooSmall(usize),
    #[error("place ({}, {}) is off a {board_size}x{board_size} board", .place.row, .place.column)]
    OffBoard { place: Place, board_size: usize },
    #[error("place ({}, {}) is occupied by both colors", .0.row, .0.column)]
    Overlap(Place),
    #[error("{starting_rows} starting rows do not fit on a board of size {board_size}")]
    StartingRows {
        starting_rows: usize,
        board_size: usize,
    },
    #[error("move {0:?} is not legal in this position")]
    IllegalMove(Move),
    #[error("cannot parse {0:?}")]
    Notation(String),
}
