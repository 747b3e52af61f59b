//! Command-line arguments

use clap::Parser;
use std::path::PathBuf;

/// Solve a sliding tile puzzle with A*
#[derive(Parser, Debug)]
#[command(name = "slider-puzzle", version, about)]
pub struct Args {
    /// Puzzle file: the dimension followed by the tiles row by row (stdin if omitted)
    pub file: Option<PathBuf>,

    /// Generate a random puzzle of this dimension instead of reading one
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(2..), conflicts_with = "file")]
    pub random: Option<u16>,

    /// With --random, scramble the goal by this many slides instead of shuffling
    #[arg(short, long, requires = "random")]
    pub scramble: Option<usize>,

    /// Seed for puzzle generation
    #[arg(long, requires = "random")]
    pub seed: Option<u64>,

    /// Skip states already expanded in the same race
    #[arg(long)]
    pub closed_set: bool,

    /// Only print the move count (-1 if unsolvable)
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Errors surfaced by the driver
#[derive(thiserror::Error, Debug)]
pub enum CliError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Puzzle text could not be parsed
    #[error("Invalid puzzle: {0}")]
    Parse(#[from] slider_puzzle::ParsePuzzleError),

    /// Generated board was rejected
    #[error("Invalid board: {0}")]
    Board(#[from] slider_puzzle::InvalidBoard),

    /// Solver refused the initial state
    #[error("Solver error: {0}")]
    Solver(#[from] slider_puzzle::InvalidInitialState),
}
