//! Optimal solver for the n-by-n sliding tile puzzle.
//!
//! [`PuzzleState`] is an immutable board with heuristics and neighbor
//! generation; [`PuzzleSolver`] runs A* over it and decides solvability by
//! racing the board against its twin.

pub mod error;
pub mod puzzle;
pub mod solver;

pub use error::{InvalidBoard, InvalidInitialState, ParsePuzzleError};
pub use puzzle::{Move, PuzzleState};
pub use solver::{PuzzleSolver, RaceStats, SearchStats, SolveOptions, SolveOutcome, SolveStatus};
