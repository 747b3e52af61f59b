//! Error types for puzzle construction, parsing and solving

use thiserror::Error;

/// A grid that does not describe a valid n-by-n sliding puzzle
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidBoard {
    /// No rows at all
    #[error("board has no rows")]
    Empty,

    /// Fewer than two rows
    #[error("board dimension must be at least 2, got {dimension}")]
    TooSmall { dimension: usize },

    /// A dimension whose cell count does not fit the tile labels
    #[error("board dimension {dimension} is too large")]
    TooLarge { dimension: usize },

    /// A row whose length differs from the number of rows
    #[error("row {row} has {len} tiles, expected {dimension}")]
    NotSquare { row: usize, len: usize, dimension: usize },

    /// A tile outside `0..=max`
    #[error("tile {tile} is out of range 0..={max}")]
    OutOfRange { tile: u32, max: u32 },

    /// A tile that appears more than once
    #[error("tile {tile} appears more than once")]
    Duplicate { tile: u32 },
}

/// The solver was handed no initial state
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("initial state must be present")]
pub struct InvalidInitialState;

/// Failure to read a puzzle from its text representation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsePuzzleError {
    /// Input had no dimension line
    #[error("input is empty")]
    Empty,

    /// A token that is not a non-negative integer
    #[error("invalid token {0:?}")]
    InvalidToken(String),

    /// Tile count does not match the declared dimension
    #[error("expected {expected} tiles, found {found}")]
    WrongTileCount { expected: usize, found: usize },

    /// Tiles were read but do not form a valid board
    #[error(transparent)]
    Board(#[from] InvalidBoard),
}
