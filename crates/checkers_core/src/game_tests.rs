use super::*;

fn p(row: i32, column: i32) -> Place {
    Place::new(row, column)
}

#[test]
fn test_new_game_black_to_move() {
    let game = Game::new(6, 2).unwrap();
    assert_eq!(game.turn(), Color::Black);
    assert_eq!(game.status(), GameEnd::NotEnded);
    assert!(game.history().is_empty());
}

#[test]
fn test_play_records_and_passes_turn() {
    let mut game = Game::new(6, 2).unwrap();
    let mv = Move::new(p(4, 1), p(3, 0));
    game.play(mv).unwrap();
    assert_eq!(game.turn(), Color::Red);
    assert_eq!(game.history(), &[mv]);
    assert_eq!(game.state().color_at(p(3, 0)), Some(Color::Black));
}

#[test]
fn test_play_rejects_illegal_move() {
    let mut game = Game::new(6, 2).unwrap();
    let err = game.play(Move::new(p(1, 0), p(2, 1))).unwrap_err();
    assert!(matches!(err, StateError::IllegalMove(_)));
    assert_eq!(game.turn(), Color::Black);
}

#[test]
fn test_pass_if_stuck() {
    // Red is on its last row and cannot move; black can.
    let state = State::new([p(5, 0)], [p(3, 3)]).unwrap();
    let mut game = Game::from_state(6, state, Color::Red).unwrap();
    assert!(game.pass_if_stuck());
    assert_eq!(game.turn(), Color::Black);
    assert!(!game.pass_if_stuck());
}

#[test]
fn test_from_state_validates() {
    let state = State::new([p(9, 9)], [p(0, 1)]).unwrap();
    assert!(Game::from_state(6, state, Color::Red).is_err());
}
