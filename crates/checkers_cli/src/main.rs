mod commands;
mod session;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use alphabeta_engine::{EngineConfig, SearchEngine};
use anyhow::{bail, Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use commands::{Command, HELP};
use session::Controller;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// `--config <path>` and `--cache-dir <dir>`; the cache dir overrides the file.
fn load_config() -> Result<EngineConfig> {
    let mut config_path: Option<PathBuf> = None;
    let mut cache_dir: Option<PathBuf> = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => config_path = Some(args.next().context("--config needs a path")?.into()),
            "--cache-dir" => cache_dir = Some(args.next().context("--cache-dir needs a path")?.into()),
            other => bail!("unknown argument {other:?}; usage: checkers [--config FILE] [--cache-dir DIR]"),
        }
    }

    let mut config = match config_path {
        Some(path) => EngineConfig::load(&path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if cache_dir.is_some() {
        config.cache_dir = cache_dir;
    }
    Ok(config)
}

/// Run one command. Returns false when the session should end.
fn execute(controller: &Controller, command: Command) -> Result<bool> {
    match command {
        Command::New {
            board_size,
            starting_rows,
        } => controller.new_game(board_size, starting_rows)?,
        Command::Show => controller.say(controller.show()),
        Command::Moves => {
            let moves = controller.moves();
            if moves.is_empty() {
                controller.say("no legal moves");
            } else {
                controller.say(moves.join(" "));
            }
        }
        Command::Play(text) => controller.play(&text)?,
        Command::Go => controller.go()?,
        Command::Stop => controller.stop(),
        Command::Turn(color) => controller.set_turn(color),
        Command::Computer { color, enabled } => controller.set_computer(color, enabled),
        Command::Difficulty(difficulty) => controller.set_difficulty(difficulty),
        Command::History => {
            for line in controller.history() {
                controller.say(line);
            }
        }
        Command::Help => controller.say(HELP),
        Command::Quit => return Ok(false),
    }
    Ok(true)
}

fn main() -> Result<()> {
    init_tracing();
    let config = load_config()?;
    let engine = SearchEngine::new(config).context("failed to start the search engine")?;
    engine.load_caches();

    // Engine callbacks print from their own threads; one printer keeps lines whole.
    let (tx, rx) = mpsc::channel::<String>();
    thread::Builder::new()
        .name("printer".to_string())
        .spawn(move || {
            let stdout = io::stdout();
            for line in rx {
                let mut out = stdout.lock();
                writeln!(out, "{line}").ok();
                out.flush().ok();
            }
        })
        .context("failed to spawn printer thread")?;

    let controller = Controller::new(engine.clone(), tx)?;
    controller.say("mini-checkers; type help for commands, new to start");

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else {
            break;
        };
        let outcome = Command::parse(&line).and_then(|command| match command {
            Some(command) => execute(&controller, command),
            None => Ok(true),
        });
        match outcome {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => controller.say(format!("error: {e:#}")),
        }
    }

    controller.engine().cancel_all_running();
    match engine.save_caches() {
        Ok(()) => info!("bye"),
        Err(e) => warn!(error = %e, "could not save search caches"),
    }
    Ok(())
}
