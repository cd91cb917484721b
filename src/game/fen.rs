//! FEN codec
//!
//! Turns the position string into a grid model for rendering and reads the
//! fixed fields the controller needs (side to move, fullmove number).
//!
//! # Grid layout
//!
//! Row 0 is rank 8 (the top of the board as seen by White), column 0 is
//! file a. Each cell holds the piece symbol verbatim or `None`.
//!
//! The grid is derived data. [`Position`] is the only thing the controller
//! stores; the grid is recomputed from it whenever a view is needed.
//!
//! No serializer lives here: new positions only ever come back from the
//! engine service.

use crate::game::moves::Square;
use crate::game::types::Side;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Standard starting position
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

const FEN_FIELDS: usize = 6;
const BOARD_SIZE: usize = 8;

/// Errors raised while reading a FEN
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("FEN is empty")]
    Empty,

    #[error("FEN must have 6 fields, found {found}")]
    FieldCount { found: usize },

    #[error("Board placement must have 8 ranks, found {found}")]
    RankCount { found: usize },

    #[error("Rank {rank} expands to {cells} cells instead of 8")]
    RankWidth { rank: usize, cells: usize },

    #[error("Invalid empty-run digit '{0}' (must be 1-8)")]
    InvalidDigit(char),

    #[error("Invalid side to move: '{0}'")]
    InvalidSide(String),
}

/// 8x8 grid derived from the placement field of a FEN
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoardGrid {
    cells: [[Option<char>; BOARD_SIZE]; BOARD_SIZE],
}

impl BoardGrid {
    /// Cell by grid coordinates (row 0 = rank 8, column 0 = file a)
    pub fn cell(&self, row: usize, col: usize) -> Option<char> {
        self.cells.get(row).and_then(|r| r.get(col)).copied().flatten()
    }

    /// Piece symbol standing on an algebraic square
    pub fn piece_at(&self, square: Square) -> Option<char> {
        let (row, col) = square.grid_index();
        self.cell(row, col)
    }

    /// Number of occupied cells
    pub fn piece_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_some()).count()
    }

    pub fn rows(&self) -> &[[Option<char>; BOARD_SIZE]; BOARD_SIZE] {
        &self.cells
    }
}

/// Parse the placement field of a FEN into a grid.
///
/// Digits 1-8 expand to that many empty cells; every other character is
/// placed as a piece symbol. Anything that does not produce exactly 8 rows
/// of exactly 8 cells is rejected.
pub fn parse_board(fen: &str) -> Result<BoardGrid, FenError> {
    let placement = fen.split_whitespace().next().ok_or(FenError::Empty)?;
    let rows: Vec<&str> = placement.split('/').collect();
    if rows.len() != BOARD_SIZE {
        return Err(FenError::RankCount { found: rows.len() });
    }

    let mut grid = BoardGrid::default();
    for (row_index, row) in rows.iter().enumerate() {
        let mut col = 0usize;
        for symbol in row.chars() {
            if let Some(run) = symbol.to_digit(10) {
                if !(1..=8).contains(&run) {
                    return Err(FenError::InvalidDigit(symbol));
                }
                col += run as usize;
            } else {
                if col < BOARD_SIZE {
                    grid.cells[row_index][col] = Some(symbol);
                }
                col += 1;
            }
        }
        if col != BOARD_SIZE {
            return Err(FenError::RankWidth {
                rank: BOARD_SIZE - row_index,
                cells: col,
            });
        }
    }
    Ok(grid)
}

/// Side to move, read from field 1
pub fn side_to_move(fen: &str) -> Result<Side, FenError> {
    let field = fen.split_whitespace().nth(1).unwrap_or_default();
    Side::from_fen_field(field).ok_or_else(|| FenError::InvalidSide(field.to_string()))
}

/// Fullmove number, read from field 5. Missing or non-numeric means 1.
pub fn fullmove_number(fen: &str) -> u32 {
    fen.split_whitespace()
        .nth(5)
        .and_then(|field| field.parse().ok())
        .unwrap_or(1)
}

/// A validated 6-field FEN
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Position(String);

impl Position {
    /// Validate a FEN and wrap it.
    ///
    /// Checks the field count, the placement field and the side-to-move
    /// token. Castling, en-passant and the clocks are carried verbatim.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.is_empty() {
            return Err(FenError::Empty);
        }
        if fields.len() != FEN_FIELDS {
            return Err(FenError::FieldCount {
                found: fields.len(),
            });
        }
        parse_board(fields[0])?;
        if Side::from_fen_field(fields[1]).is_none() {
            return Err(FenError::InvalidSide(fields[1].to_string()));
        }
        Ok(Position(fields.join(" ")))
    }

    pub fn start() -> Self {
        Position(START_FEN.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Grid for rendering; recomputed on every call
    pub fn board(&self) -> BoardGrid {
        // Validated on construction, so this never falls back in practice.
        parse_board(&self.0).unwrap_or_default()
    }

    pub fn side_to_move(&self) -> Side {
        side_to_move(&self.0).unwrap_or(Side::White)
    }

    pub fn fullmove_number(&self) -> u32 {
        fullmove_number(&self.0)
    }

    pub fn is_start(&self) -> bool {
        self.0 == START_FEN
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::start()
    }
}

impl FromStr for Position {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::parse(s)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Position {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
