//! Canonical text encoding of the board.
//!
//! A board is 6 rows of 7 characters over `{x, o, .}`, top row first. The
//! HTTP wire joins rows with `;`, the oracle's stdin/stdout with newlines.

use crate::error::FormatError;
use crate::types::{Board, COLS, Cell, ROWS};
use tracing::{debug, instrument};

/// Row separator used by an encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    /// `;` as used in the `/solve` URL path.
    Semicolon,
    /// `\n` as used on the oracle's standard streams.
    Newline,
}

impl Separator {
    /// The separator character.
    pub fn as_char(self) -> char {
        match self {
            Separator::Semicolon => ';',
            Separator::Newline => '\n',
        }
    }
}

/// Encodes a board with `;` between rows.
pub fn encode(board: &Board) -> String {
    encode_with(board, Separator::Semicolon)
}

/// Decodes `;`-separated board text.
pub fn decode(text: &str) -> Result<Board, FormatError> {
    decode_with(text, Separator::Semicolon)
}

/// Encodes a board using the given row separator.
pub fn encode_with(board: &Board, separator: Separator) -> String {
    let mut out = String::with_capacity(ROWS * (COLS + 1));
    for (i, row) in board.rows().iter().enumerate() {
        if i > 0 {
            out.push(separator.as_char());
        }
        out.extend(row.iter().map(|cell| cell.to_char()));
    }
    out
}

/// Decodes board text using the given row separator.
///
/// # Errors
///
/// Returns `FormatError` on a wrong row count, a wrong row length, a
/// character outside `{x, o, .}` or a floating piece.
#[instrument(skip(text), fields(len = text.len()))]
pub fn decode_with(text: &str, separator: Separator) -> Result<Board, FormatError> {
    let rows: Vec<&str> = text.split(separator.as_char()).collect();
    if rows.len() != ROWS {
        debug!(rows = rows.len(), "Wrong row count");
        return Err(FormatError::new(format!(
            "expected {} rows, found {}",
            ROWS,
            rows.len()
        )));
    }

    let mut cells = [[Cell::Empty; COLS]; ROWS];
    for (i, row) in rows.iter().enumerate() {
        let chars: Vec<char> = row.chars().collect();
        if chars.len() != COLS {
            return Err(FormatError::new(format!(
                "row {} has {} cells, expected {}",
                i,
                chars.len(),
                COLS
            )));
        }
        for (j, c) in chars.into_iter().enumerate() {
            cells[i][j] = Cell::from_char(c).ok_or_else(|| {
                FormatError::new(format!("invalid cell {:?} at row {}, column {}", c, i, j))
            })?;
        }
    }

    let board = Board::from_rows(cells);
    if !board.obeys_gravity() {
        return Err(FormatError::new("board has a piece above an empty cell"));
    }
    Ok(board)
}
