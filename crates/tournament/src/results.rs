//! Tournament results storage and reporting

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use checkers_core::{Color, GameEnd};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResultsError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Result of a single game
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum GameResult {
    Win,
    Loss,
    Draw,
}

impl GameResult {
    /// Result of a finished game for the side playing `color`
    pub fn for_color(outcome: GameEnd, color: Color) -> GameResult {
        match outcome.winner() {
            Some(winner) if winner == color => GameResult::Win,
            Some(_) => GameResult::Loss,
            None => GameResult::Draw,
        }
    }
}

/// Result of a match (multiple games)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchResult {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

impl MatchResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_games(&self) -> u32 {
        self.wins + self.losses + self.draws
    }

    /// Score from player1's perspective (1 for win, 0.5 for draw, 0 for loss)
    pub fn score(&self) -> f64 {
        let total = self.total_games() as f64;
        if total == 0.0 {
            return 0.5;
        }
        (self.wins as f64 + 0.5 * self.draws as f64) / total
    }
}

/// One played game
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameRecord {
    pub black: String,
    pub red: String,
    /// Leading moves chosen at random
    pub opening_plies: usize,
    pub moves: Vec<String>,
    pub outcome: GameEnd,
}

/// Complete tournament results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentResults {
    /// Name/description of the tournament
    pub name: String,
    /// Participating players
    pub participants: Vec<String>,
    pub matches: Vec<MatchEntry>,
    /// Configuration used
    pub config: TournamentConfig,
}

/// A single match entry in the tournament
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchEntry {
    pub player1: String,
    pub player2: String,
    pub result: MatchResult,
    pub games: Vec<GameRecord>,
}

/// Tournament configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TournamentConfig {
    pub games_per_match: u32,
    pub board_size: usize,
    pub starting_rows: usize,
    pub time_per_move_ms: u64,
    pub opening_plies: u32,
    pub max_plies: u32,
    pub seed: u64,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            games_per_match: 10,
            board_size: 6,
            starting_rows: 2,
            time_per_move_ms: 200,
            opening_plies: 2,
            max_plies: 200,
            seed: 0,
        }
    }
}

impl TournamentResults {
    pub fn new(name: &str, participants: Vec<String>, config: TournamentConfig) -> Self {
        Self {
            name: name.to_string(),
            participants,
            matches: Vec::new(),
            config,
        }
    }

    /// Add a match result
    pub fn add_match(
        &mut self,
        player1: &str,
        player2: &str,
        result: MatchResult,
        games: Vec<GameRecord>,
    ) {
        self.matches.push(MatchEntry {
            player1: player1.to_string(),
            player2: player2.to_string(),
            result,
            games,
        });
    }

    /// Save results to JSON file
    pub fn save(&self, path: &Path) -> Result<(), ResultsError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| ResultsError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(|source| ResultsError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load results from JSON file
    pub fn load(path: &Path) -> Result<Self, ResultsError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ResultsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ResultsError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Generate a text report
    pub fn generate_report(&self) -> String {
        let mut report = String::new();
        report.push_str(&format!("=== Tournament: {} ===\n\n", self.name));
        report.push_str(&format!("Participants: {}\n", self.participants.join(", ")));
        report.push_str(&format!(
            "Config: {} games/match, {}x{} board, {} ms/move\n\n",
            self.config.games_per_match,
            self.config.board_size,
            self.config.board_size,
            self.config.time_per_move_ms
        ));

        report.push_str("Results:\n");
        report.push_str(&format!(
            "{:<12} vs {:<12} {:>5}-{:<5}-{:<5} {:>6}\n",
            "Player 1", "Player 2", "W", "L", "D", "Score"
        ));
        report.push_str(&"-".repeat(60));
        report.push('\n');

        for entry in &self.matches {
            report.push_str(&format!(
                "{:<12} vs {:<12} {:>5}-{:<5}-{:<5} {:>5.1}%\n",
                entry.player1,
                entry.player2,
                entry.result.wins,
                entry.result.losses,
                entry.result.draws,
                entry.result.score() * 100.0
            ));
        }

        report
    }

    /// Print report to stdout
    pub fn print_report(&self) {
        println!("{}", self.generate_report());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score() {
        let result = MatchResult {
            wins: 3,
            losses: 1,
            draws: 2,
        };
        assert_eq!(result.total_games(), 6);
        assert!((result.score() - 4.0 / 6.0).abs() < 1e-12);
        assert_eq!(MatchResult::new().score(), 0.5);
    }

    #[test]
    fn test_game_result_for_color() {
        assert_eq!(GameResult::for_color(GameEnd::WinRed, Color::Red), GameResult::Win);
        assert_eq!(GameResult::for_color(GameEnd::WinRed, Color::Black), GameResult::Loss);
        assert_eq!(GameResult::for_color(GameEnd::Draw, Color::Black), GameResult::Draw);
    }

    #[test]
    fn test_save_and_load() {
        let mut results = TournamentResults::new(
            "easy vs hard",
            vec!["easy".to_string(), "hard".to_string()],
            TournamentConfig::default(),
        );
        let game = GameRecord {
            black: "easy".to_string(),
            red: "hard".to_string(),
            opening_plies: 2,
            moves: vec!["4,1-3,0".to_string()],
            outcome: GameEnd::WinRed,
        };
        results.add_match(
            "easy",
            "hard",
            MatchResult {
                wins: 0,
                losses: 1,
                draws: 0,
            },
            vec![game.clone()],
        );

        let path = std::env::temp_dir().join(format!("tournament-results-{}.json", std::process::id()));
        results.save(&path).unwrap();
        let loaded = TournamentResults::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded.name, "easy vs hard");
        assert_eq!(loaded.config, TournamentConfig::default());
        assert_eq!(loaded.matches[0].games, vec![game]);
        assert!(loaded.generate_report().contains("easy"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = TournamentResults::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ResultsError::Io { .. }));
    }
}
