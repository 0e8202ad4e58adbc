use super::*;

#[test]
fn test_move_text() {
    let step = Move::new(Place::new(1, 0), Place::new(2, 1));
    assert_eq!(move_to_text(step), "1,0-2,1");
    let jump = Move::jump(Place::new(2, 1), Place::new(3, 2), Place::new(4, 3));
    assert_eq!(move_to_text(jump), "2,1-4,3x3,2");
}

#[test]
fn test_parse_move_fills_in_capture() {
    let state = State::new([Place::new(2, 1)], [Place::new(3, 2)]).unwrap();
    let mv = parse_move(6, &state, Color::Red, "2,1-4,3").unwrap();
    assert_eq!(mv.capture, Some(Place::new(3, 2)));
    let same = parse_move(6, &state, Color::Red, &move_to_text(mv)).unwrap();
    assert_eq!(mv, same);
}

#[test]
fn test_parse_move_rejects_illegal() {
    let state = State::new([Place::new(2, 1)], [Place::new(3, 2)]).unwrap();
    // A plain step is illegal while a jump is available.
    assert!(matches!(
        parse_move(6, &state, Color::Red, "2,1-3,0"),
        Err(StateError::IllegalMove(_))
    ));
    assert!(matches!(
        parse_move(6, &state, Color::Red, "garbage"),
        Err(StateError::Notation(_))
    ));
}

#[test]
fn test_parse_move_checks_capture_suffix() {
    let state = State::new([Place::new(2, 1)], [Place::new(3, 2)]).unwrap();
    assert!(matches!(
        parse_move(6, &state, Color::Red, "2,1-4,3x0,0"),
        Err(StateError::IllegalMove(_))
    ));
    assert!(matches!(
        parse_move(6, &state, Color::Red, "2,1-4,3xjunk"),
        Err(StateError::Notation(_))
    ));
    let mv = parse_move(6, &state, Color::Red, "2,1-4,3x3,2").unwrap();
    assert_eq!(mv.capture, Some(Place::new(3, 2)));
}

#[test]
fn test_render_startpos() {
    let state = State::starting(4, 1).unwrap();
    let text = render(4, &state);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "   0 1 2 3");
    assert_eq!(lines[1], " 0 . r . r");
    assert_eq!(lines[4], " 3 b . b .");
}
