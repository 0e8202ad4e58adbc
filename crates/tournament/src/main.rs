//! Tournament CLI
//!
//! Play matches between the engine's difficulty levels.

use std::env;
use std::io;
use std::path::PathBuf;

use alphabeta_engine::{EngineConfig, SearchEngine};
use anyhow::{bail, Context, Result};
use checkers_core::Difficulty;
use tournament::{MatchConfig, MatchRunner, TournamentConfig, TournamentResults};
use tracing_subscriber::EnvFilter;

fn print_usage() {
    println!("mini-checkers tournament runner");
    println!();
    println!("Usage:");
    println!("  tournament match <level1> <level2> [options]");
    println!("  tournament round-robin [options]");
    println!("  tournament report <results.json>");
    println!();
    println!("Levels: easy, medium, hard");
    println!();
    println!("Options:");
    println!("  --games N      games per match (default 10)");
    println!("  --time MS      milliseconds per move (default 200)");
    println!("  --size N       board size (default 6)");
    println!("  --rows N       starting rows per side (default 2)");
    println!("  --openings N   random opening plies (default 2)");
    println!("  --seed N       seed for the openings (default 0)");
    println!("  --config FILE  engine config (TOML); the options above override it");
    println!("  --out FILE     save results as JSON");
    println!();
    println!("Examples:");
    println!("  tournament match easy hard --games 20 --time 100");
    println!("  tournament round-robin --games 4 --out results.json");
}

struct Options {
    tournament: TournamentConfig,
    engine: EngineConfig,
    out: Option<PathBuf>,
}

fn parse_number<T: std::str::FromStr>(flag: &str, value: Option<&String>) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = value.with_context(|| format!("{flag} needs a value"))?;
    value
        .parse()
        .with_context(|| format!("{flag} expects a number, got {value:?}"))
}

fn parse_options(args: &[String]) -> Result<Options> {
    let mut tournament = TournamentConfig::default();
    let mut engine = None;
    let mut out = None;

    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        let value = args.get(i + 1);
        match flag {
            "--games" | "-g" => tournament.games_per_match = parse_number(flag, value)?,
            "--time" | "-t" => tournament.time_per_move_ms = parse_number(flag, value)?,
            "--size" => tournament.board_size = parse_number(flag, value)?,
            "--rows" => tournament.starting_rows = parse_number(flag, value)?,
            "--openings" => tournament.opening_plies = parse_number(flag, value)?,
            "--seed" => tournament.seed = parse_number(flag, value)?,
            "--config" => {
                let path = value.context("--config needs a path")?;
                engine = Some(
                    EngineConfig::load(path.as_ref())
                        .with_context(|| format!("failed to load {path}"))?,
                );
            }
            "--out" | "-o" => out = Some(PathBuf::from(value.context("--out needs a path")?)),
            other => bail!("unknown option {other:?}"),
        }
        i += 2;
    }

    let engine = EngineConfig {
        time_budget_ms: tournament.time_per_move_ms,
        ..engine.unwrap_or_default()
    };
    Ok(Options {
        tournament,
        engine,
        out,
    })
}

fn parse_level(text: &str) -> Result<Difficulty> {
    Difficulty::parse(text).with_context(|| format!("unknown level {text:?}; use easy, medium or hard"))
}

fn create_engine(base: &EngineConfig, difficulty: Difficulty) -> Result<SearchEngine> {
    let config = EngineConfig {
        difficulty,
        ..base.clone()
    };
    Ok(SearchEngine::new(config)?.with_name(difficulty.name()))
}

fn run_pairings(
    name: &str,
    pairings: &[(Difficulty, Difficulty)],
    options: &Options,
) -> Result<TournamentResults> {
    let config = &options.tournament;
    let mut participants: Vec<String> = Vec::new();
    for (a, b) in pairings {
        for level in [a, b] {
            if !participants.iter().any(|p| p == level.name()) {
                participants.push(level.name().to_string());
            }
        }
    }
    let mut results = TournamentResults::new(name, participants, config.clone());
    let runner = MatchRunner::new(MatchConfig {
        num_games: config.games_per_match,
        board_size: config.board_size,
        starting_rows: config.starting_rows,
        opening_plies: config.opening_plies,
        max_plies: config.max_plies,
        seed: config.seed,
        verbose: true,
        ..Default::default()
    });

    for &(level1, level2) in pairings {
        println!("\n--- {} vs {} ---", level1.name(), level2.name());
        let mut player1 = create_engine(&options.engine, level1)?;
        let mut player2 = create_engine(&options.engine, level2)?;
        let (result, games) = runner.run_match(&mut player1, &mut player2)?;
        println!(
            "Result: {}-{}-{} (Score: {:.1}%)",
            result.wins,
            result.losses,
            result.draws,
            result.score() * 100.0
        );
        results.add_match(level1.name(), level2.name(), result, games);
    }
    Ok(results)
}

fn finish(results: &TournamentResults, out: Option<&PathBuf>) -> Result<()> {
    println!();
    results.print_report();
    if let Some(path) = out {
        results.save(path)?;
        println!("Results saved to {}", path.display());
    }
    Ok(())
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        return Ok(());
    }

    match args[1].as_str() {
        "match" => {
            let [level1, level2, rest @ ..] = &args[2..] else {
                print_usage();
                bail!("match requires two levels");
            };
            let pairing = (parse_level(level1)?, parse_level(level2)?);
            let options = parse_options(rest)?;
            let name = format!("{} vs {}", pairing.0.name(), pairing.1.name());
            let results = run_pairings(&name, &[pairing], &options)?;
            finish(&results, options.out.as_ref())
        }
        "round-robin" => {
            let options = parse_options(&args[2..])?;
            let levels = Difficulty::ALL;
            let pairings: Vec<(Difficulty, Difficulty)> = levels
                .iter()
                .enumerate()
                .flat_map(|(i, &a)| levels[i + 1..].iter().map(move |&b| (a, b)))
                .collect();
            let results = run_pairings("round robin", &pairings, &options)?;
            finish(&results, options.out.as_ref())
        }
        "report" => {
            let path = args.get(2).context("report needs a results file")?;
            let results = TournamentResults::load(path.as_ref())?;
            results.print_report();
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            print_usage();
            bail!("unknown command {other:?}")
        }
    }
}
