//! Shared game types
//!
//! Small value types used across the codec, the resources and the controller.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The side owning a piece or holding the move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    White,
    Black,
}

impl Side {
    /// Both sides in display order
    pub const ALL: [Side; 2] = [Side::White, Side::Black];

    /// Read the side-to-move token of a FEN (`w` or `b`)
    pub fn from_fen_field(field: &str) -> Option<Self> {
        match field {
            "w" => Some(Side::White),
            "b" => Some(Side::Black),
            _ => None,
        }
    }

    /// Side owning a piece symbol; uppercase is White
    pub fn of_piece(symbol: char) -> Self {
        if symbol.is_ascii_uppercase() {
            Side::White
        } else {
            Side::Black
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Side::White => "White",
            Side::Black => "Black",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
