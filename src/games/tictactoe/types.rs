//! Core domain types for tic-tac-toe.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::instrument;

/// Side length of the board.
pub const SIZE: usize = 3;

/// A player's mark on the board.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, strum::EnumIter,
)]
pub enum Mark {
    /// Mark X (always moves first).
    X,
    /// Mark O (the bot's mark in bot games).
    O,
}

impl Mark {
    /// Returns the opposing mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// A square on the tic-tac-toe board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Square {
    /// Empty square.
    Empty,
    /// Square holding a mark.
    Occupied(Mark),
}

impl Square {
    /// Returns the mark in this square, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Square::Empty => None,
            Square::Occupied(mark) => Some(mark),
        }
    }

    fn symbol(self) -> char {
        match self {
            Square::Empty => '.',
            Square::Occupied(Mark::X) => 'X',
            Square::Occupied(Mark::O) => 'O',
        }
    }
}

/// A validated board coordinate.
///
/// Rows and columns are both in `0..3`, so every `Coord` addresses a real
/// square and board access never has to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[display("({}, {})", row, col)]
pub struct Coord {
    row: usize,
    col: usize,
}

impl Coord {
    /// Creates a coordinate, returning `None` when out of range.
    pub fn new(row: usize, col: usize) -> Option<Self> {
        (row < SIZE && col < SIZE).then_some(Self { row, col })
    }

    /// Builds a coordinate in constant context.
    ///
    /// Out-of-range values fail const evaluation, so tables of fixed
    /// coordinates are checked at compile time.
    pub(crate) const fn at(row: usize, col: usize) -> Self {
        assert!(row < SIZE && col < SIZE, "coordinate out of range");
        Self { row, col }
    }

    /// All nine coordinates in row-major order.
    pub fn all() -> impl Iterator<Item = Coord> {
        (0..SIZE).flat_map(|row| (0..SIZE).map(move |col| Coord { row, col }))
    }
}

/// 3x3 tic-tac-toe board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    rows: [[Square; SIZE]; SIZE],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            rows: [[Square::Empty; SIZE]; SIZE],
        }
    }

    /// Gets the square at the given coordinate.
    pub fn get(&self, at: Coord) -> Square {
        self.rows[at.row][at.col]
    }

    /// Sets the square at the given coordinate.
    ///
    /// No legality checks happen here; see the move validator.
    pub fn set(&mut self, at: Coord, square: Square) {
        self.rows[at.row][at.col] = square;
    }

    /// Returns a copy of this board with `mark` placed at `at`.
    pub fn with_mark(&self, at: Coord, mark: Mark) -> Self {
        let mut next = self.clone();
        next.set(at, Square::Occupied(mark));
        next
    }

    /// Checks if a square is empty.
    pub fn is_empty(&self, at: Coord) -> bool {
        self.get(at) == Square::Empty
    }

    /// Checks if no empty square remains.
    pub fn is_full(&self) -> bool {
        self.rows.iter().flatten().all(|s| *s != Square::Empty)
    }

    /// Empty squares in row-major order.
    pub fn empty_cells(&self) -> impl Iterator<Item = Coord> + '_ {
        Coord::all().filter(|at| self.is_empty(*at))
    }

    /// Number of squares holding `mark`.
    pub fn count(&self, mark: Mark) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|s| **s == Square::Occupied(mark))
            .count()
    }

    /// Compact row-major notation: `X`, `O` and `.` for empty.
    pub fn to_compact(&self) -> String {
        self.rows.iter().flatten().map(|s| s.symbol()).collect()
    }

    /// Formats the board as a human-readable grid.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for (r, row) in self.rows.iter().enumerate() {
            for (c, square) in row.iter().enumerate() {
                result.push(match square {
                    Square::Empty => ' ',
                    other => other.symbol(),
                });
                if c < SIZE - 1 {
                    result.push('|');
                }
            }
            if r < SIZE - 1 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Error parsing a board from compact notation.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum BoardParseError {
    /// Wrong number of squares.
    #[display("expected 9 squares, found {}", _0)]
    Length(#[error(not(source))] usize),
    /// A character other than `X`, `O` or `.`.
    #[display("invalid square '{}'", _0)]
    Symbol(#[error(not(source))] char),
}

impl FromStr for Board {
    type Err = BoardParseError;

    #[instrument]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let symbols: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
        if symbols.len() != SIZE * SIZE {
            return Err(BoardParseError::Length(symbols.len()));
        }

        let mut board = Board::new();
        for (at, symbol) in Coord::all().zip(symbols) {
            let square = match symbol.to_ascii_uppercase() {
                '.' | '_' | '-' => Square::Empty,
                'X' => Square::Occupied(Mark::X),
                'O' => Square::Occupied(Mark::O),
                other => return Err(BoardParseError::Symbol(other)),
            };
            board.set(at, square);
        }
        Ok(board)
    }
}
