//! Match runner for playing games between move pickers

use checkers_core::{legal_moves_flat, move_to_text, Color, Game, GameEnd, Player};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, warn};

use crate::results::{GameRecord, GameResult, MatchResult};

/// Configuration for a match
#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// Number of games to play
    pub num_games: u32,
    pub board_size: usize,
    pub starting_rows: usize,
    /// Random plies played before the players take over
    pub opening_plies: u32,
    /// Plies (passes included) before declaring a draw
    pub max_plies: u32,
    /// Whether to alternate colors each game
    pub alternate_colors: bool,
    /// Seed for the random openings; each pair of games shares an opening
    pub seed: u64,
    /// Print progress during match
    pub verbose: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            num_games: 10,
            board_size: 6,
            starting_rows: 2,
            opening_plies: 2,
            max_plies: 200,
            alternate_colors: true,
            seed: 0,
            verbose: true,
        }
    }
}

/// Runs matches between two players
pub struct MatchRunner {
    config: MatchConfig,
}

impl MatchRunner {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    /// Run a match between two players
    ///
    /// Returns the result from player1's perspective together with the game
    /// records.
    pub fn run_match(
        &self,
        player1: &mut dyn Player,
        player2: &mut dyn Player,
    ) -> Result<(MatchResult, Vec<GameRecord>), checkers_core::StateError> {
        let mut result = MatchResult::new();
        let mut records = Vec::new();

        for game_num in 0..self.config.num_games {
            // Black moves first
            let player1_black = !self.config.alternate_colors || game_num % 2 == 0;
            let opening_seed = self.config.seed.wrapping_add(u64::from(game_num / 2));

            let record = if player1_black {
                self.play_game(player1, player2, opening_seed)?
            } else {
                self.play_game(player2, player1, opening_seed)?
            };
            let player1_color = if player1_black { Color::Black } else { Color::Red };
            let game_result = GameResult::for_color(record.outcome, player1_color);

            match game_result {
                GameResult::Win => result.wins += 1,
                GameResult::Loss => result.losses += 1,
                GameResult::Draw => result.draws += 1,
            }

            if self.config.verbose {
                let color = if player1_black { "B" } else { "R" };
                let outcome = match game_result {
                    GameResult::Win => "1-0",
                    GameResult::Loss => "0-1",
                    GameResult::Draw => "1/2",
                };
                println!(
                    "Game {}/{}: {} ({}) in {} plies - Score: {}-{}-{}",
                    game_num + 1,
                    self.config.num_games,
                    outcome,
                    color,
                    record.moves.len(),
                    result.wins,
                    result.losses,
                    result.draws
                );
            }
            records.push(record);
        }

        Ok((result, records))
    }

    /// Play a single game between the side moving first and the other one
    pub fn play_game(
        &self,
        black: &mut dyn Player,
        red: &mut dyn Player,
        opening_seed: u64,
    ) -> Result<GameRecord, checkers_core::StateError> {
        let mut game = Game::new(self.config.board_size, self.config.starting_rows)?;
        black.new_game();
        red.new_game();

        let mut rng = StdRng::seed_from_u64(opening_seed);
        for _ in 0..self.config.opening_plies {
            if game.status().is_over() {
                break;
            }
            if game.pass_if_stuck() {
                continue;
            }
            let moves = legal_moves_flat(game.board_size(), game.state(), game.turn());
            if let Some(&mv) = moves.choose(&mut rng) {
                game.play(mv)?;
            }
        }
        let opening = game.history().len();

        let mut plies = 0;
        let outcome = loop {
            let status = game.status();
            if status.is_over() {
                break status;
            }
            if plies >= self.config.max_plies {
                break GameEnd::Draw;
            }
            plies += 1;
            if game.pass_if_stuck() {
                continue;
            }

            let turn = game.turn();
            let choice = match turn {
                Color::Black => black.choose_move(game.board_size(), game.state(), turn),
                Color::Red => red.choose_move(game.board_size(), game.state(), turn),
            };
            match choice {
                Some(mv) => {
                    if game.play(mv).is_err() {
                        warn!(side = %turn, mv = %move_to_text(mv), "illegal move forfeits the game");
                        break forfeit(turn);
                    }
                    debug!(side = %turn, mv = %move_to_text(mv), "move");
                }
                // The engine only gives up when it has nothing to play.
                None => break forfeit(turn),
            }
        };

        Ok(GameRecord {
            black: black.name().to_string(),
            red: red.name().to_string(),
            opening_plies: opening,
            moves: game.history().iter().map(|&mv| move_to_text(mv)).collect(),
            outcome,
        })
    }
}

fn forfeit(loser: Color) -> GameEnd {
    match loser {
        Color::Red => GameEnd::WinBlack,
        Color::Black => GameEnd::WinRed,
    }
}

#[cfg(test)]
#[path = "match_runner_tests.rs"]
mod match_runner_tests;
