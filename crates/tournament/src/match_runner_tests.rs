use super::*;
use alphabeta_engine::{EngineConfig, SearchEngine};
use checkers_core::{Difficulty, Move, State};

/// Always plays the first legal move.
struct FirstMove;

impl Player for FirstMove {
    fn choose_move(&mut self, board_size: usize, state: &State, turn: Color) -> Option<Move> {
        legal_moves_flat(board_size, state, turn).first().copied()
    }

    fn name(&self) -> &str {
        "first-move"
    }
}

/// Moves a piece that does not exist.
struct Cheater;

impl Player for Cheater {
    fn choose_move(&mut self, _: usize, _: &State, _: Color) -> Option<Move> {
        Some(Move::new(
            checkers_core::Place::new(0, 0),
            checkers_core::Place::new(1, 1),
        ))
    }

    fn name(&self) -> &str {
        "cheater"
    }
}

fn small_match(num_games: u32) -> MatchConfig {
    MatchConfig {
        num_games,
        board_size: 4,
        starting_rows: 1,
        opening_plies: 1,
        max_plies: 60,
        verbose: false,
        ..Default::default()
    }
}

#[test]
fn test_self_play() {
    let runner = MatchRunner::new(small_match(2));
    let (result, records) = runner.run_match(&mut FirstMove, &mut FirstMove).unwrap();
    assert_eq!(result.total_games(), 2);
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.outcome.is_over()));
}

#[test]
fn test_colors_alternate() {
    let runner = MatchRunner::new(small_match(2));
    let (_, records) = runner.run_match(&mut FirstMove, &mut Cheater).unwrap();
    assert_eq!(records[0].black, "first-move");
    assert_eq!(records[1].black, "cheater");
}

#[test]
fn test_illegal_move_forfeits() {
    let runner = MatchRunner::new(small_match(4));
    let (result, _) = runner.run_match(&mut Cheater, &mut FirstMove).unwrap();
    assert_eq!(result.losses, 4);
}

#[test]
fn test_openings_are_reproducible() {
    let runner = MatchRunner::new(MatchConfig {
        opening_plies: 3,
        max_plies: 0,
        ..small_match(1)
    });
    let a = runner.play_game(&mut FirstMove, &mut FirstMove, 11).unwrap();
    let b = runner.play_game(&mut FirstMove, &mut FirstMove, 11).unwrap();
    assert_eq!(a.moves, b.moves);
    assert_eq!(a.opening_plies, a.moves.len());
}

#[test]
fn test_ply_limit_draws() {
    let runner = MatchRunner::new(MatchConfig {
        board_size: 6,
        starting_rows: 2,
        opening_plies: 0,
        max_plies: 2,
        ..small_match(1)
    });
    let record = runner.play_game(&mut FirstMove, &mut FirstMove, 0).unwrap();
    assert_eq!(record.outcome, GameEnd::Draw);
    assert_eq!(record.moves.len(), 2);
}

#[test]
fn test_engines_finish_a_small_match() {
    let engine = |difficulty: Difficulty| {
        SearchEngine::new(EngineConfig {
            time_budget_ms: 20,
            difficulty,
            parallel_root: false,
            ..EngineConfig::default()
        })
        .unwrap()
        .with_name(difficulty.name())
    };
    let mut easy = engine(Difficulty::Easy);
    let mut hard = engine(Difficulty::Hard);
    let runner = MatchRunner::new(small_match(2));
    let (result, records) = runner.run_match(&mut easy, &mut hard).unwrap();
    assert_eq!(result.total_games(), 2);
    assert_eq!(records[0].red, "hard");
}
