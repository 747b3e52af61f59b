use rand::{seq::SliceRandom, Rng};
use std::fmt;
use std::str::FromStr;

use crate::error::{InvalidBoard, ParsePuzzleError};

/// Direction the blank travels in a single slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Right,
    Down,
    Left,
}

impl Move {
    /// Every direction, in the order neighbors are enumerated.
    pub const ALL: [Move; 4] = [Move::Up, Move::Right, Move::Down, Move::Left];

    /// Row and column delta applied to the blank.
    pub fn as_offset(&self) -> (isize, isize) {
        match self {
            Move::Up => (-1, 0),
            Move::Right => (0, 1),
            Move::Down => (1, 0),
            Move::Left => (0, -1),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Move::Up => Move::Down,
            Move::Down => Move::Up,
            Move::Left => Move::Right,
            Move::Right => Move::Left,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Move::Up => "Up",
            Move::Right => "Right",
            Move::Down => "Down",
            Move::Left => "Left",
        };
        write!(f, "{}", s)
    }
}

/// An immutable n-by-n sliding puzzle configuration.
///
/// Tiles are stored row-major; `0` is the blank. Every transformation returns
/// a fresh state, so states can be shared and compared freely.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PuzzleState {
    size: usize,
    tiles: Box<[u32]>,
    blank: usize,
}

impl PuzzleState {
    /// Builds a state from a square grid of tiles, copying it.
    ///
    /// The grid must be at least 2x2 and hold every value in `0..n*n` exactly once.
    pub fn new<R: AsRef<[u32]>>(grid: &[R]) -> Result<Self, InvalidBoard> {
        let size = grid.len();
        if size == 0 {
            return Err(InvalidBoard::Empty);
        }
        if size < 2 {
            return Err(InvalidBoard::TooSmall { dimension: size });
        }

        if let Some((row, cells)) = grid
            .iter()
            .map(|row| AsRef::<[u32]>::as_ref(row))
            .enumerate()
            .find(|(_, cells)| cells.len() != size)
        {
            return Err(InvalidBoard::NotSquare {
                row,
                len: cells.len(),
                dimension: size,
            });
        }

        let (cells, max) = cell_bounds(size)?;
        let mut seen = vec![false; cells];
        let mut tiles = Vec::with_capacity(cells);

        for row in grid {
            for &tile in row.as_ref() {
                if tile > max {
                    return Err(InvalidBoard::OutOfRange { tile, max });
                }
                if std::mem::replace(&mut seen[tile as usize], true) {
                    return Err(InvalidBoard::Duplicate { tile });
                }
                tiles.push(tile);
            }
        }

        Ok(Self::from_tiles(size, tiles))
    }

    /// The solved configuration: tiles ascending row-major, blank last.
    pub fn goal(size: usize) -> Result<Self, InvalidBoard> {
        if size < 2 {
            return Err(if size == 0 {
                InvalidBoard::Empty
            } else {
                InvalidBoard::TooSmall { dimension: size }
            });
        }

        let (_, max) = cell_bounds(size)?;
        let tiles = (1..=max).chain(std::iter::once(0)).collect();
        Ok(Self::from_tiles(size, tiles))
    }

    /// A uniformly shuffled configuration. Roughly half of these are unsolvable.
    pub fn random<G: Rng + ?Sized>(size: usize, rng: &mut G) -> Result<Self, InvalidBoard> {
        let goal = Self::goal(size)?;
        let mut tiles = goal.tiles.into_vec();
        tiles.shuffle(rng);
        Ok(Self::from_tiles(size, tiles))
    }

    /// A configuration reached by `steps` random slides from the goal.
    ///
    /// Never undoes the previous slide, so short walks do not collapse back
    /// onto the goal immediately. The result is always solvable.
    pub fn scrambled<G: Rng + ?Sized>(
        size: usize,
        steps: usize,
        rng: &mut G,
    ) -> Result<Self, InvalidBoard> {
        let mut state = Self::goal(size)?;
        let mut last: Option<Move> = None;

        for _ in 0..steps {
            let candidates: Vec<(Move, PuzzleState)> = Move::ALL
                .iter()
                .filter(|&&dir| last.map_or(true, |l| dir != l.opposite()))
                .filter_map(|&dir| state.slide(dir).map(|next| (dir, next)))
                .collect();

            // Any blank position has at least two legal slides, so one survives the filter.
            if let Some((dir, next)) = candidates.choose(rng) {
                last = Some(*dir);
                state = next.clone();
            }
        }

        Ok(state)
    }

    fn from_tiles(size: usize, tiles: Vec<u32>) -> Self {
        let blank = tiles.iter().position(|&t| t == 0);
        debug_assert!(blank.is_some(), "validated tiles always contain the blank");
        let blank = blank.unwrap_or_default();
        Self {
            size,
            tiles: tiles.into_boxed_slice(),
            blank,
        }
    }

    /// Board dimension n.
    pub fn dimension(&self) -> usize {
        self.size
    }

    /// Tile at `(row, col)`, or `None` when out of bounds.
    pub fn tile(&self, row: usize, col: usize) -> Option<u32> {
        if row < self.size && col < self.size {
            Some(self.tiles[row * self.size + col])
        } else {
            None
        }
    }

    /// `(row, col)` of the blank.
    pub fn blank_position(&self) -> (usize, usize) {
        (self.blank / self.size, self.blank % self.size)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u32]> + '_ {
        self.tiles.chunks(self.size)
    }

    /// Number of non-blank tiles not in their goal cell (Hamming distance).
    pub fn misplaced_count(&self) -> u32 {
        self.tiles
            .iter()
            .enumerate()
            .filter(|&(i, &t)| t != 0 && t as usize != i + 1)
            .count() as u32
    }

    /// Sum of Manhattan distances of every non-blank tile to its goal cell.
    ///
    /// Admissible: each slide moves one tile by one cell, so this never
    /// exceeds the number of remaining moves.
    pub fn displacement_distance(&self) -> u32 {
        self.tiles
            .iter()
            .enumerate()
            .filter(|&(_, &t)| t != 0)
            .map(|(i, &t)| {
                let (row, col) = (i / self.size, i % self.size);
                let target = (t - 1) as usize;
                let (target_row, target_col) = (target / self.size, target % self.size);
                (row.abs_diff(target_row) + col.abs_diff(target_col)) as u32
            })
            .sum()
    }

    pub fn is_goal(&self) -> bool {
        self.misplaced_count() == 0
    }

    /// The state after moving the blank one cell in `dir`, if that stays on the board.
    pub fn slide(&self, dir: Move) -> Option<Self> {
        let (dr, dc) = dir.as_offset();
        let (row, col) = self.blank_position();

        let new_row = row as isize + dr;
        let new_col = col as isize + dc;
        let size = self.size as isize;

        if new_row >= 0 && new_row < size && new_col >= 0 && new_col < size {
            let target = new_row as usize * self.size + new_col as usize;
            Some(self.swapped(self.blank, target))
        } else {
            None
        }
    }

    /// All states one slide away, in `Move::ALL` order.
    ///
    /// Two for a corner blank, three on an edge, four in the interior.
    pub fn neighbors(&self) -> Vec<Self> {
        Move::ALL.iter().filter_map(|&dir| self.slide(dir)).collect()
    }

    /// This state with two horizontally adjacent tiles exchanged.
    ///
    /// Swaps the first two cells of the top row, or of the second row when the
    /// blank sits in the top row. The single transposition flips permutation
    /// parity, so exactly one of a state and its twin can reach the goal.
    pub fn twin(&self) -> Self {
        let (blank_row, _) = self.blank_position();
        let row = if blank_row == 0 { 1 } else { 0 };
        let first = row * self.size;
        self.swapped(first, first + 1)
    }

    fn swapped(&self, a: usize, b: usize) -> Self {
        let mut tiles = self.tiles.clone();
        tiles.swap(a, b);
        let blank = if self.blank == a {
            b
        } else if self.blank == b {
            a
        } else {
            self.blank
        };
        Self {
            size: self.size,
            tiles,
            blank,
        }
    }
}

/// Cell count and largest tile label of a `size` x `size` board, `size >= 2`.
fn cell_bounds(size: usize) -> Result<(usize, u32), InvalidBoard> {
    size.checked_mul(size)
        .and_then(|cells| Some((cells, u32::try_from(cells - 1).ok()?)))
        .ok_or(InvalidBoard::TooLarge { dimension: size })
}

impl fmt::Display for PuzzleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.size)?;
        for row in self.rows() {
            writeln!(f)?;
            for (j, val) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", val)?;
            }
        }
        Ok(())
    }
}

impl FromStr for PuzzleState {
    type Err = ParsePuzzleError;

    /// Parses the dimension followed by n*n whitespace-separated tiles.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        let first = tokens.next().ok_or(ParsePuzzleError::Empty)?;
        let size: usize = first
            .parse()
            .map_err(|_| ParsePuzzleError::InvalidToken(first.to_string()))?;

        let tiles = tokens
            .map(|tok| {
                tok.parse::<u32>()
                    .map_err(|_| ParsePuzzleError::InvalidToken(tok.to_string()))
            })
            .collect::<Result<Vec<u32>, _>>()?;

        let expected = size
            .checked_mul(size)
            .ok_or(InvalidBoard::TooLarge { dimension: size })?;
        if tiles.len() != expected {
            return Err(ParsePuzzleError::WrongTileCount {
                expected,
                found: tiles.len(),
            });
        }

        let grid: Vec<&[u32]> = if size == 0 {
            Vec::new()
        } else {
            tiles.chunks(size).collect()
        };
        Ok(Self::new(&grid)?)
    }
}
