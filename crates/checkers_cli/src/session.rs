//! Game session shared by the input loop and engine callbacks.
//!
//! Every change of turn, side ownership or difficulty cancels the searches in
//! flight, forfeits the turn of a stuck side and, when the side to move is
//! computer controlled, starts a new search job. A delivered move is applied
//! only if it belongs to the job the session is still waiting for.

use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use alphabeta_engine::{JobId, SearchEngine};
use anyhow::{bail, Result};
use checkers_core::{
    flatten, move_to_text, parse_move, render, Color, Difficulty, Game, GameEnd, Move,
};
use tracing::debug;

use crate::commands::{DEFAULT_BOARD_SIZE, DEFAULT_STARTING_ROWS};

struct Session {
    game: Game,
    /// False until a game is started and again once it ends
    active: bool,
    /// Indexed by `Color::idx`
    computer: [bool; 2],
    pending: Option<JobId>,
}

/// Handle to the session; clones share it.
#[derive(Clone)]
pub struct Controller {
    session: Arc<Mutex<Session>>,
    engine: SearchEngine,
    out: Sender<String>,
}

impl Controller {
    /// Red is played by the engine and black by the user until changed.
    pub fn new(engine: SearchEngine, out: Sender<String>) -> Result<Self> {
        let session = Session {
            game: Game::new(DEFAULT_BOARD_SIZE, DEFAULT_STARTING_ROWS)?,
            active: false,
            computer: [true, false],
            pending: None,
        };
        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            engine,
            out,
        })
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn say(&self, line: impl Into<String>) {
        // The printer only goes away at shutdown.
        let _ = self.out.send(line.into());
    }

    pub fn engine(&self) -> &SearchEngine {
        &self.engine
    }

    pub fn new_game(&self, board_size: usize, starting_rows: usize) -> Result<()> {
        let game = Game::new(board_size, starting_rows)?;
        let mut session = self.lock();
        session.game = game;
        session.active = true;
        self.say(format!(
            "new game on {board_size}x{board_size}: {} moves first",
            session.game.turn()
        ));
        self.say(render(board_size, session.game.state()));
        self.turn_changed(&mut session);
        Ok(())
    }

    pub fn show(&self) -> String {
        let session = self.lock();
        let game = &session.game;
        let status = match (session.active, game.status()) {
            (true, _) if session.pending.is_some() => format!("{} is thinking", game.turn()),
            (true, _) => format!("{} to move", game.turn()),
            (false, GameEnd::NotEnded) => "no game in progress; type new".to_string(),
            (false, end) => end_text(end).to_string(),
        };
        format!("{}{status}", render(game.board_size(), game.state()))
    }

    pub fn moves(&self) -> Vec<String> {
        let session = self.lock();
        flatten(&session.game.legal_moves())
            .into_iter()
            .map(move_to_text)
            .collect()
    }

    pub fn history(&self) -> Vec<String> {
        let session = self.lock();
        session
            .game
            .history()
            .iter()
            .enumerate()
            .map(|(i, &mv)| format!("{:>3}. {}", i + 1, move_to_text(mv)))
            .collect()
    }

    /// Play a move typed by the user.
    pub fn play(&self, text: &str) -> Result<()> {
        let mut session = self.lock();
        if !session.active {
            bail!("no game in progress; type new");
        }
        let turn = session.game.turn();
        if session.computer[turn.idx()] {
            bail!("{turn} is played by the computer");
        }
        let game = &session.game;
        let mv = parse_move(game.board_size(), game.state(), turn, text)?;
        self.apply(&mut session, mv)?;
        Ok(())
    }

    /// Have the engine move for the side to move, whoever controls it.
    pub fn go(&self) -> Result<()> {
        let mut session = self.lock();
        if !session.active {
            bail!("no game in progress; type new");
        }
        self.engine.cancel_all_running();
        self.start_job(&mut session);
        Ok(())
    }

    pub fn stop(&self) {
        self.lock().pending = None;
        let cancelled = self.engine.cancel_all_running();
        self.say(format!("cancelled {} search(es)", cancelled.len()));
    }

    pub fn set_turn(&self, turn: Color) {
        let mut session = self.lock();
        session.game.set_turn(turn);
        self.turn_changed(&mut session);
    }

    pub fn set_computer(&self, color: Color, enabled: bool) {
        let mut session = self.lock();
        session.computer[color.idx()] = enabled;
        self.turn_changed(&mut session);
    }

    pub fn set_difficulty(&self, difficulty: Difficulty) {
        let mut session = self.lock();
        self.engine.set_difficulty(difficulty);
        self.say(format!("difficulty set to {}", difficulty.name()));
        self.turn_changed(&mut session);
    }

    fn apply(&self, session: &mut Session, mv: Move) -> Result<()> {
        let turn = session.game.turn();
        session.game.play(mv)?;
        self.say(format!("{turn} plays {}", move_to_text(mv)));
        let game = &session.game;
        self.say(render(game.board_size(), game.state()));
        self.turn_changed(session);
        Ok(())
    }

    fn turn_changed(&self, session: &mut Session) {
        if !session.active {
            return;
        }
        self.engine.cancel_all_running();
        session.pending = None;

        let end = session.game.status();
        if end.is_over() {
            session.active = false;
            self.say(end_text(end));
            return;
        }
        if session.game.pass_if_stuck() {
            self.say(format!(
                "{} has no legal move and passes",
                session.game.turn().other()
            ));
        }
        let turn = session.game.turn();
        if session.computer[turn.idx()] {
            self.start_job(session);
        } else {
            self.say(format!("{turn} to move"));
        }
    }

    fn start_job(&self, session: &mut Session) {
        let job = self.engine.next_job_id();
        let game = &session.game;
        let (board_size, state, turn) = (game.board_size(), game.state().clone(), game.turn());
        let controller = self.clone();
        match self.engine.search(board_size, state, turn, job, move |job, mv| {
            controller.deliver(job, mv)
        }) {
            Ok(()) => {
                session.pending = Some(job);
                self.say(format!("{turn} is thinking"));
            }
            Err(e) => self.say(format!("error: could not start search: {e}")),
        }
    }

    fn deliver(&self, job: JobId, mv: Option<Move>) {
        let mut session = self.lock();
        if !session.active || session.pending != Some(job) {
            debug!(job = %job, "ignoring stale engine move");
            return;
        }
        session.pending = None;
        match mv {
            Some(mv) => {
                if let Err(e) = self.apply(&mut session, mv) {
                    self.say(format!("error: engine move rejected: {e}"));
                }
            }
            None => {
                let turn = session.game.turn();
                self.say(format!("{turn} found no move and passes"));
                session.game.set_turn(turn.other());
                self.turn_changed(&mut session);
            }
        }
    }
}

fn end_text(end: GameEnd) -> &'static str {
    match end {
        GameEnd::WinRed => "game over: red wins",
        GameEnd::WinBlack => "game over: black wins",
        GameEnd::Draw => "game over: draw",
        GameEnd::NotEnded => "game in progress",
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod session_tests;
