//! Tournament runner for mini-checkers
//!
//! This crate provides infrastructure for:
//! - Running matches between engine difficulty levels
//! - Randomized but reproducible openings
//! - Saving results as JSON and printing reports
//!
//! # Usage
//!
//! ```bash
//! # Easy against hard, 10 games, 200 ms per move
//! cargo run -p tournament -- match easy hard --games 10 --time 200
//!
//! # Every level against every other level
//! cargo run -p tournament -- round-robin --games 4 --out results.json
//! ```

mod match_runner;
mod results;

pub use match_runner::*;
pub use results::*;
