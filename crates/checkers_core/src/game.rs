//! Game record: position, side to move and move history.

use crate::{
    board::State,
    error::StateError,
    movegen::{legal_moves, MovesByOrigin},
    outcome::{game_ended, GameEnd},
    types::*,
};

#[derive(Debug, Clone)]
pub struct Game {
    board_size: usize,
    state: State,
    turn: Color,
    history: Vec<Move>,
}

impl Game {
    /// New game in the opening layout. Black moves first.
    pub fn new(board_size: usize, starting_rows: usize) -> Result<Self, StateError> {
        Ok(Self {
            board_size,
            state: State::starting(board_size, starting_rows)?,
            turn: Color::Black,
            history: Vec::new(),
        })
    }

    /// Game continuing from an arbitrary position.
    pub fn from_state(board_size: usize, state: State, turn: Color) -> Result<Self, StateError> {
        state.validate(board_size)?;
        Ok(Self {
            board_size,
            state,
            turn,
            history: Vec::new(),
        })
    }

    pub fn board_size(&self) -> usize {
        self.board_size
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn set_turn(&mut self, turn: Color) {
        self.turn = turn;
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    pub fn legal_moves(&self) -> MovesByOrigin {
        legal_moves(self.board_size, &self.state, self.turn)
    }

    pub fn status(&self) -> GameEnd {
        game_ended(self.board_size, &self.state)
    }

    /// Plays a legal move for the side to move and passes the turn.
    pub fn play(&mut self, mv: Move) -> Result<(), StateError> {
        let legal = self
            .legal_moves()
            .get(&mv.from)
            .is_some_and(|moves| moves.contains(&mv));
        if !legal {
            return Err(StateError::IllegalMove(mv));
        }
        self.state = self.state.apply(&mv);
        self.history.push(mv);
        self.turn = self.turn.other();
        Ok(())
    }

    /// Forfeits the turn when the side to move is stuck but the game goes on.
    /// Returns true if the turn was passed.
    pub fn pass_if_stuck(&mut self) -> bool {
        if self.status() == GameEnd::NotEnded && self.legal_moves().is_empty() {
            self.turn = self.turn.other();
            return true;
        }
        false
    }
}

#[cfg(test)]
#[path = "game_tests.rs"]
mod game_tests;
