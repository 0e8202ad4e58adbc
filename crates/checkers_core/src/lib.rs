pub mod board;
pub mod error;
pub mod eval;
pub mod game;
pub mod movegen;
pub mod notation;
pub mod outcome;
pub mod perft;
pub mod time_control;
pub mod types;

// Re-export core game logic (not engine-specific)
pub use board::*;
pub use error::StateError;
pub use eval::*;
pub use game::Game;
pub use movegen::*;
pub use notation::*;
pub use outcome::*;
pub use perft::perft;
pub use time_control::*;
pub use types::*;

/// Smallest supported board; the heuristic divides by half the board extent.
pub const MIN_BOARD_SIZE: usize = 2;

// =============================================================================
// Player trait: implemented by anything that picks moves (search engines,
// scripted opponents in tests, ...)
// =============================================================================

/// Trait that all move pickers must implement.
///
/// This allows the tournament runner and the command line front end to
/// drive different engines through one interface.
pub trait Player: Send {
    /// Pick a move for `turn`. `None` means the side has no move to offer.
    fn choose_move(&mut self, board_size: usize, state: &State, turn: Color) -> Option<Move>;

    /// Returns the player's display name
    fn name(&self) -> &str;

    /// Reset internal state for a new game
    fn new_game(&mut self) {}
}
