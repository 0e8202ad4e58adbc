//! Parsing of the line protocol read from stdin.

use anyhow::{bail, Context, Result};
use checkers_core::{Color, Difficulty};

pub const DEFAULT_BOARD_SIZE: usize = 6;
pub const DEFAULT_STARTING_ROWS: usize = 2;

pub const HELP: &str = "\
commands:
  new [size] [rows]        start a game (default 6x6, 2 rows each)
  show                     print the board
  moves                    list legal moves for the side to move
  play <r,c-r,c[xr,c]>     make a move
  go                       let the engine move for the side to move
  stop                     cancel running searches
  turn red|black           hand the move to a side
  cpu red|black on|off     let the engine play a side
  difficulty easy|medium|hard
  history                  list the moves played
  quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    New { board_size: usize, starting_rows: usize },
    Show,
    Moves,
    Play(String),
    Go,
    Stop,
    Turn(Color),
    Computer { color: Color, enabled: bool },
    Difficulty(Difficulty),
    History,
    Help,
    Quit,
}

fn parse_color(word: Option<&str>) -> Result<Color> {
    match word {
        Some("red") | Some("r") => Ok(Color::Red),
        Some("black") | Some("b") => Ok(Color::Black),
        Some(other) => bail!("unknown side {other:?}; expected red or black"),
        None => bail!("missing side; expected red or black"),
    }
}

fn parse_count(word: Option<&str>, default: usize, what: &str) -> Result<usize> {
    match word {
        Some(text) => text
            .parse()
            .with_context(|| format!("{what} must be a number, got {text:?}")),
        None => Ok(default),
    }
}

impl Command {
    /// Parse one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Command>> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some((&head, args)) = parts.split_first() else {
            return Ok(None);
        };
        let arg = |i: usize| args.get(i).copied();

        let command = match head {
            "new" => Command::New {
                board_size: parse_count(arg(0), DEFAULT_BOARD_SIZE, "board size")?,
                starting_rows: parse_count(arg(1), DEFAULT_STARTING_ROWS, "starting rows")?,
            },
            "show" => Command::Show,
            "moves" => Command::Moves,
            "play" => match args {
                [] => bail!("play needs a move, e.g. play 4,1-3,0"),
                _ => Command::Play(args.join("")),
            },
            "go" => Command::Go,
            "stop" => Command::Stop,
            "turn" => Command::Turn(parse_color(arg(0))?),
            "cpu" => {
                let color = parse_color(arg(0))?;
                let enabled = match arg(1) {
                    Some("on") => true,
                    Some("off") => false,
                    _ => bail!("usage: cpu red|black on|off"),
                };
                Command::Computer { color, enabled }
            }
            "difficulty" => {
                let level = arg(0).context("usage: difficulty easy|medium|hard")?;
                let difficulty = Difficulty::parse(level)
                    .with_context(|| format!("unknown difficulty {level:?}"))?;
                Command::Difficulty(difficulty)
            }
            "history" => Command::History,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => bail!("unknown command {other:?}; type help"),
        };
        Ok(Some(command))
    }
}
