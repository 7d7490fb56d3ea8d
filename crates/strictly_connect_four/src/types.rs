//! Core domain types for Connect-Four.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::instrument;

/// Number of rows on the board. Row 0 is the top, row 5 the bottom.
pub const ROWS: usize = 6;

/// Number of columns on the board.
pub const COLS: usize = 7;

/// A side in the game.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumIter,
)]
pub enum Side {
    /// Side X (the engine by default).
    #[display("X")]
    X,
    /// Side O (the human by default).
    #[display("O")]
    O,
}

impl Side {
    /// Returns the opposing side.
    pub fn opponent(self) -> Self {
        match self {
            Side::X => Side::O,
            Side::O => Side::X,
        }
    }

    /// Wire token for this side.
    pub fn token(self) -> char {
        match self {
            Side::X => 'x',
            Side::O => 'o',
        }
    }

    /// Parses a side from its exact wire token (`x` or `o`).
    pub fn from_token(token: &str) -> Option<Self> {
        let mut chars = token.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c),
            _ => None,
        }
    }

    /// Side whose wire token is `c`.
    pub fn from_char(c: char) -> Option<Self> {
        Side::iter().find(|side| side.token() == c)
    }
}

/// A cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Empty cell.
    Empty,
    /// Cell occupied by a side.
    Occupied(Side),
}

impl Cell {
    /// Wire character for this cell.
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Occupied(side) => side.token(),
        }
    }

    /// Parses a cell from its wire character.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '.' => Some(Cell::Empty),
            c => Side::from_char(c).map(Cell::Occupied),
        }
    }

    /// Checks if the cell is empty.
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

/// Error raised when a piece cannot be dropped into a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum DropError {
    /// Column index is outside the board.
    #[display("Column {} is out of range", _0)]
    InvalidColumn(usize),
    /// Column has no empty cell left.
    #[display("Column {} is full", _0)]
    ColumnFull(usize),
}

impl std::error::Error for DropError {}

/// 6x7 Connect-Four board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    /// Cells in row-major order, row 0 on top.
    cells: [[Cell; COLS]; ROWS],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; COLS]; ROWS],
        }
    }

    /// Builds a board from raw rows without checking gravity.
    pub(crate) fn from_rows(cells: [[Cell; COLS]; ROWS]) -> Self {
        Self { cells }
    }

    /// Gets the cell at `(row, col)`, or `None` off the board.
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Returns all rows, top first.
    pub fn rows(&self) -> &[[Cell; COLS]; ROWS] {
        &self.cells
    }

    /// Checks if a column has no empty cell. Out-of-range columns count as full.
    pub fn is_column_full(&self, col: usize) -> bool {
        !matches!(self.get(0, col), Some(Cell::Empty))
    }

    /// Lowest empty row of a column (scanning 5 up to 0).
    pub fn lowest_empty_row(&self, col: usize) -> Option<usize> {
        if col >= COLS {
            return None;
        }
        (0..ROWS).rev().find(|&row| self.cells[row][col].is_empty())
    }

    /// Number of filled cells in a column.
    pub fn column_height(&self, col: usize) -> usize {
        if col >= COLS {
            return 0;
        }
        (0..ROWS).filter(|&row| !self.cells[row][col].is_empty()).count()
    }

    /// Drops a piece into a column, returning the new board and the landing row.
    #[instrument(skip(self))]
    pub fn drop_piece(&self, col: usize, side: Side) -> Result<(Board, usize), DropError> {
        if col >= COLS {
            return Err(DropError::InvalidColumn(col));
        }
        let row = self.lowest_empty_row(col).ok_or(DropError::ColumnFull(col))?;
        let mut next = *self;
        next.cells[row][col] = Cell::Occupied(side);
        Ok((next, row))
    }

    /// Total number of filled cells.
    pub fn filled(&self) -> usize {
        self.cells.iter().flatten().filter(|c| !c.is_empty()).count()
    }

    /// Number of cells owned by a side.
    pub fn count(&self, side: Side) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|c| **c == Cell::Occupied(side))
            .count()
    }

    /// Checks if every column is full.
    pub fn is_full(&self) -> bool {
        (0..COLS).all(|col| self.is_column_full(col))
    }

    /// Checks the gravity invariant: filled cells in each column form a
    /// contiguous run ending at the bottom row.
    pub fn obeys_gravity(&self) -> bool {
        (0..COLS).all(|col| {
            let height = self.column_height(col);
            (ROWS - height..ROWS).all(|row| !self.cells[row][col].is_empty())
        })
    }

    /// Formats the board as a human-readable grid with column numbers.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in self.cells.iter() {
            result.push('|');
            for cell in row.iter() {
                let symbol = match cell {
                    Cell::Empty => ' ',
                    Cell::Occupied(Side::X) => 'X',
                    Cell::Occupied(Side::O) => 'O',
                };
                result.push(symbol);
                result.push('|');
            }
            result.push('\n');
        }
        result.push(' ');
        for col in 0..COLS {
            result.push_str(&format!("{} ", col + 1));
        }
        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
