mod cli;

use std::fs;
use std::io::{self, Read, Write};

use clap::Parser;
use crossterm::style::{style, Stylize};
use rand::{rngs::StdRng, SeedableRng};
use tracing_subscriber::EnvFilter;

use cli::{Args, CliError};
use slider_puzzle::{PuzzleSolver, PuzzleState, SolveOptions};

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("slider_puzzle=warn")),
        1 => EnvFilter::new("slider_puzzle=debug"),
        _ => EnvFilter::new("slider_puzzle=trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(args: Args) -> Result<(), CliError> {
    let generated = args.random.is_some();
    let puzzle = load_puzzle(&args)?;
    let options = SolveOptions::new().closed_set(args.closed_set);

    let mut out = io::stdout().lock();

    let solver = PuzzleSolver::with_options(puzzle, options)?;
    let stats = solver.stats();
    tracing::info!(
        closed_set = options.uses_closed_set(),
        original_expanded = stats.original.expanded,
        twin_expanded = stats.twin.expanded,
        "search complete"
    );

    if args.quiet {
        writeln!(out, "{}", solver.moves())?;
        return Ok(());
    }

    if generated {
        writeln!(out, "{}", style("Initial puzzle:").bold())?;
        print_board(&mut out, solver.initial())?;
        writeln!(out)?;
    }

    let outcome = solver.into_outcome();
    let (Some(path), Some(moves)) = (&outcome.path, outcome.moves_between()) else {
        writeln!(out, "{}", style("No solution possible").red().bold())?;
        return Ok(());
    };

    writeln!(
        out,
        "{}",
        style(format!("Minimum number of moves = {}", moves.len())).bold()
    )?;
    for (i, board) in path.iter().enumerate() {
        if i > 0 {
            writeln!(out, "{}", style(moves[i - 1]).cyan())?;
        }
        print_board(&mut out, board)?;
        writeln!(out)?;
    }

    Ok(())
}

fn load_puzzle(args: &Args) -> Result<PuzzleState, CliError> {
    if let Some(size) = args.random {
        let mut rng = match args.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let size = usize::from(size);
        let puzzle = match args.scramble {
            Some(steps) => PuzzleState::scrambled(size, steps, &mut rng)?,
            None => PuzzleState::random(size, &mut rng)?,
        };
        return Ok(puzzle);
    }

    let text = match &args.file {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    Ok(text.parse()?)
}

fn print_board(out: &mut impl Write, board: &PuzzleState) -> io::Result<()> {
    let largest = board.dimension() * board.dimension() - 1;
    let width = largest.to_string().len();

    for row in board.rows() {
        for &val in row {
            let cell = format!("{:>width$}", val, width = width);
            if val == 0 {
                write!(out, "{} ", style(cell).dim())?;
            } else {
                write!(out, "{} ", cell)?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}
