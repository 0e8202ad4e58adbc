//! Immutable board state and the pure move transition.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::StateError;
use crate::types::*;

/// Positions of both colors. Red and black never share a place.
///
/// Equality, ordering and hashing are structural so a `State` can key the
/// search caches directly.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct State {
    red: BTreeSet<Place>,
    black: BTreeSet<Place>,
}

impl State {
    pub fn new<R, B>(red: R, black: B) -> Result<Self, StateError>
    where
        R: IntoIterator<Item = Place>,
        B: IntoIterator<Item = Place>,
    {
        let red: BTreeSet<Place> = red.into_iter().collect();
        let black: BTreeSet<Place> = black.into_iter().collect();
        if let Some(&shared) = red.intersection(&black).next() {
            return Err(StateError::Overlap(shared));
        }
        Ok(Self { red, black })
    }

    /// Standard opening layout: red fills the top `starting_rows` rows and
    /// black the bottom ones, on alternating squares.
    pub fn starting(board_size: usize, starting_rows: usize) -> Result<Self, StateError> {
        if board_size < crate::MIN_BOARD_SIZE {
            return Err(StateError::BoardTooSmall(board_size));
        }
        if starting_rows == 0 || starting_rows > board_size / 2 {
            return Err(StateError::StartingRows {
                starting_rows,
                board_size,
            });
        }
        let row_places = |row: usize| {
            ((row + 1) % 2..board_size)
                .step_by(2)
                .map(move |column| Place::new(row as i32, column as i32))
        };
        let red = (0..starting_rows).flat_map(row_places);
        let black = (board_size - starting_rows..board_size).flat_map(row_places);
        Self::new(red, black)
    }

    pub fn pieces(&self, color: Color) -> &BTreeSet<Place> {
        match color {
            Color::Red => &self.red,
            Color::Black => &self.black,
        }
    }

    pub fn count(&self, color: Color) -> usize {
        self.pieces(color).len()
    }

    pub fn total_pieces(&self) -> usize {
        self.red.len() + self.black.len()
    }

    pub fn color_at(&self, place: Place) -> Option<Color> {
        if self.red.contains(&place) {
            Some(Color::Red)
        } else if self.black.contains(&place) {
            Some(Color::Black)
        } else {
            None
        }
    }

    #[inline]
    pub fn is_occupied(&self, place: Place) -> bool {
        self.red.contains(&place) || self.black.contains(&place)
    }

    /// Checks that every piece lies on a board of the given size.
    pub fn validate(&self, board_size: usize) -> Result<(), StateError> {
        if board_size < crate::MIN_BOARD_SIZE {
            return Err(StateError::BoardTooSmall(board_size));
        }
        match self.red.iter().chain(&self.black).find(|p| !p.on_board(board_size)) {
            Some(&place) => Err(StateError::OffBoard { place, board_size }),
            None => Ok(()),
        }
    }

    /// Returns the state after `mv`. The move must be legal for this state.
    pub fn apply(&self, mv: &Move) -> State {
        let mover = self.color_at(mv.from);
        debug_assert!(mover.is_some(), "no piece on {:?}", mv.from);
        debug_assert!(!self.is_occupied(mv.to), "destination {:?} is occupied", mv.to);

        let mut next = self.clone();
        let (own, opponent) = match mover {
            Some(Color::Red) => (&mut next.red, &mut next.black),
            _ => (&mut next.black, &mut next.red),
        };
        own.remove(&mv.from);
        own.insert(mv.to);
        if let Some(captured) = mv.capture {
            opponent.remove(&captured);
        }
        next
    }
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod board_tests;
