//! Squares and move tokens
//!
//! A move token is the coordinate form the engine service understands:
//! source square, destination square and an optional promotion letter
//! (`e2e4`, `e7e8q`). Typed input may also be short algebraic notation
//! (`Nf3`, `exd5`), which is passed to the service untouched.
//!
//! Drag-and-drop gestures always produce coordinate tokens. A pawn dropped
//! on its last rank is promoted to a queen; there is no underpromotion
//! prompt.

use crate::game::fen::BoardGrid;
use crate::game::types::Side;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while building a move
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    #[error("move is empty")]
    Empty,

    #[error("'{0}' is not a move")]
    Degenerate(String),

    #[error("invalid square '{0}'")]
    InvalidSquare(String),

    #[error("invalid promotion piece '{0}'")]
    InvalidPromotion(char),

    #[error("promotion is only possible on the first or last rank ({0})")]
    PromotionRank(String),

    #[error("{0} is not a pawn reaching its last rank, so it cannot promote")]
    IllegalPromotion(String),

    #[error("source and destination are both {0}")]
    SameSquare(Square),

    #[error("there is no piece on {0}")]
    EmptySource(Square),
}

/// A board square; file 0 = a, rank 0 = rank 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Square {
    file: u8,
    rank: u8,
}

impl Square {
    pub fn new(file: u8, rank: u8) -> Option<Self> {
        (file < 8 && rank < 8).then_some(Square { file, rank })
    }

    pub fn parse(s: &str) -> Result<Self, MoveError> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(MoveError::InvalidSquare(s.to_string()));
        }
        let file = bytes[0].to_ascii_lowercase().wrapping_sub(b'a');
        let rank = bytes[1].wrapping_sub(b'1');
        Square::new(file, rank).ok_or_else(|| MoveError::InvalidSquare(s.to_string()))
    }

    pub fn file(self) -> u8 {
        self.file
    }

    pub fn rank(self) -> u8 {
        self.rank
    }

    /// (row, column) in a [`BoardGrid`], where row 0 is rank 8
    pub fn grid_index(self) -> (usize, usize) {
        (7 - self.rank as usize, self.file as usize)
    }

    /// Last rank for pawns of `side`
    pub fn is_promotion_rank_for(self, side: Side) -> bool {
        match side {
            Side::White => self.rank == 7,
            Side::Black => self.rank == 0,
        }
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file) as char, self.rank + 1)
    }
}

impl FromStr for Square {
    type Err = MoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Square::parse(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Promotion {
    Queen,
    Rook,
    Bishop,
    Knight,
}

impl Promotion {
    pub fn from_char(c: char) -> Result<Self, MoveError> {
        match c.to_ascii_lowercase() {
            'q' => Ok(Promotion::Queen),
            'r' => Ok(Promotion::Rook),
            'b' => Ok(Promotion::Bishop),
            'n' => Ok(Promotion::Knight),
            _ => Err(MoveError::InvalidPromotion(c)),
        }
    }

    pub fn letter(self) -> char {
        match self {
            Promotion::Queen => 'q',
            Promotion::Rook => 'r',
            Promotion::Bishop => 'b',
            Promotion::Knight => 'n',
        }
    }
}

/// Coordinate move token such as `e2e4` or `e7e8q`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveToken {
    from: Square,
    to: Square,
    promotion: Option<Promotion>,
}

impl MoveToken {
    pub fn new(from: Square, to: Square, promotion: Option<Promotion>) -> Result<Self, MoveError> {
        if from == to {
            return Err(MoveError::SameSquare(from));
        }
        if promotion.is_some() && to.rank() != 0 && to.rank() != 7 {
            return Err(MoveError::PromotionRank(to.to_string()));
        }
        Ok(MoveToken {
            from,
            to,
            promotion,
        })
    }

    pub fn parse(s: &str) -> Result<Self, MoveError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(MoveError::Empty);
        }
        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return Err(MoveError::Degenerate(s.to_string()));
        }
        let from = Square::parse(&s[0..2])?;
        let to = Square::parse(&s[2..4])?;
        let promotion = s[4..].chars().next().map(Promotion::from_char).transpose()?;
        MoveToken::new(from, to, promotion)
    }

    /// Build the token for a drag-and-drop gesture.
    ///
    /// A pawn landing on its last rank is promoted to a queen.
    pub fn from_drag(board: &BoardGrid, from: Square, to: Square) -> Result<Self, MoveError> {
        if from == to {
            return Err(MoveError::SameSquare(from));
        }
        let piece = board.piece_at(from).ok_or(MoveError::EmptySource(from))?;
        let is_pawn = piece.eq_ignore_ascii_case(&'p');
        let promotion = (is_pawn && to.is_promotion_rank_for(Side::of_piece(piece)))
            .then_some(Promotion::Queen);
        MoveToken::new(from, to, promotion)
    }

    /// A promotion letter needs a pawn of `side` on the source square that
    /// lands on its last rank
    pub fn check_promotion(&self, board: &BoardGrid, side: Side) -> Result<(), MoveError> {
        if self.promotion.is_none() {
            return Ok(());
        }
        let own_pawn = board
            .piece_at(self.from)
            .is_some_and(|piece| piece.eq_ignore_ascii_case(&'p') && Side::of_piece(piece) == side);
        if !own_pawn || !self.to.is_promotion_rank_for(side) {
            return Err(MoveError::IllegalPromotion(self.to_string()));
        }
        Ok(())
    }

    pub fn from(&self) -> Square {
        self.from
    }

    pub fn to(&self) -> Square {
        self.to
    }

    pub fn promotion(&self) -> Option<Promotion> {
        self.promotion
    }
}

impl fmt::Display for MoveToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{}", promotion.letter())?;
        }
        Ok(())
    }
}

impl FromStr for MoveToken {
    type Err = MoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MoveToken::parse(s)
    }
}

/// A move as the user entered it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveInput {
    Coordinate(MoveToken),
    /// Algebraic notation; the service resolves it against the position
    Notation(String),
}

impl MoveInput {
    /// Validate typed input before it is sent anywhere.
    ///
    /// Anything that starts with two squares is read as a coordinate token
    /// and must be a well-formed one. Everything else must at least look
    /// like algebraic notation.
    pub fn parse(s: &str) -> Result<Self, MoveError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(MoveError::Empty);
        }
        if looks_like_coordinates(s) {
            return MoveToken::parse(s).map(MoveInput::Coordinate);
        }
        let allowed = |c: char| c.is_ascii_alphanumeric() || "=+#-x".contains(c);
        if s.len() < 2 || !s.chars().all(allowed) || !s.chars().any(|c| c.is_ascii_digit() || c == 'O') {
            return Err(MoveError::Degenerate(s.to_string()));
        }
        Ok(MoveInput::Notation(s.to_string()))
    }

    /// Text sent to the service
    pub fn as_wire(&self) -> String {
        match self {
            MoveInput::Coordinate(token) => token.to_string(),
            MoveInput::Notation(san) => san.clone(),
        }
    }
}

impl From<MoveToken> for MoveInput {
    fn from(token: MoveToken) -> Self {
        MoveInput::Coordinate(token)
    }
}

impl fmt::Display for MoveInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_wire())
    }
}

fn looks_like_coordinates(s: &str) -> bool {
    s.is_ascii()
        && s.len() >= 4
        && Square::parse(&s[0..2]).is_ok()
        && Square::parse(&s[2..4]).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::fen::{parse_board, START_FEN};

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_square_parse_and_display() {
        let e4 = sq("e4");
        assert_eq!(e4.file(), 4);
        assert_eq!(e4.rank(), 3);
        assert_eq!(e4.to_string(), "e4");
        assert_eq!(sq("A1").to_string(), "a1");
        assert_eq!(e4.grid_index(), (4, 4));
        assert_eq!(sq("a8").grid_index(), (0, 0));
    }

    #[test]
    fn test_square_rejects_out_of_range() {
        for bad in ["i1", "a9", "a0", "e", "e44", ""] {
            assert!(Square::parse(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_move_token_parse() {
        let token = MoveToken::parse("e2e4").unwrap();
        assert_eq!(token.from(), sq("e2"));
        assert_eq!(token.to(), sq("e4"));
        assert_eq!(token.promotion(), None);

        let promo = MoveToken::parse("a7a8N").unwrap();
        assert_eq!(promo.promotion(), Some(Promotion::Knight));
        assert_eq!(promo.to_string(), "a7a8n");
    }

    #[test]
    fn test_move_token_rejects_degenerate_input() {
        assert_eq!(MoveToken::parse(""), Err(MoveError::Empty));
        assert_eq!(MoveToken::parse("e2e2"), Err(MoveError::SameSquare(sq("e2"))));
        assert!(matches!(MoveToken::parse("e2"), Err(MoveError::Degenerate(_))));
        assert!(matches!(MoveToken::parse("e2e4qq"), Err(MoveError::Degenerate(_))));
        assert_eq!(MoveToken::parse("e7e8k"), Err(MoveError::InvalidPromotion('k')));
        assert!(matches!(MoveToken::parse("e2e4q"), Err(MoveError::PromotionRank(_))));
    }

    #[test]
    fn test_drag_white_pawn_to_last_rank_defaults_to_queen() {
        let board = parse_board("8/4P3/8/8/8/8/8/K6k w - - 0 1").unwrap();
        let token = MoveToken::from_drag(&board, sq("e7"), sq("e8")).unwrap();
        assert_eq!(token.to_string(), "e7e8q");
    }

    #[test]
    fn test_drag_black_pawn_to_first_rank_defaults_to_queen() {
        let board = parse_board("K6k/8/8/8/8/8/3p4/8 b - - 0 1").unwrap();
        let token = MoveToken::from_drag(&board, sq("d2"), sq("d1")).unwrap();
        assert_eq!(token.to_string(), "d2d1q");
    }

    #[test]
    fn test_drag_without_promotion() {
        let board = parse_board(START_FEN).unwrap();
        assert_eq!(
            MoveToken::from_drag(&board, sq("e2"), sq("e4")).unwrap().to_string(),
            "e2e4"
        );
        assert_eq!(
            MoveToken::from_drag(&board, sq("g1"), sq("f3")).unwrap().to_string(),
            "g1f3"
        );
    }

    #[test]
    fn test_drag_rook_to_last_rank_does_not_promote() {
        let board = parse_board("8/R7/8/8/8/8/8/K6k w - - 0 1").unwrap();
        let token = MoveToken::from_drag(&board, sq("a7"), sq("a8")).unwrap();
        assert_eq!(token.to_string(), "a7a8");
    }

    #[test]
    fn test_drag_errors() {
        let board = parse_board(START_FEN).unwrap();
        assert_eq!(
            MoveToken::from_drag(&board, sq("e4"), sq("e5")),
            Err(MoveError::EmptySource(sq("e4")))
        );
        assert_eq!(
            MoveToken::from_drag(&board, sq("e2"), sq("e2")),
            Err(MoveError::SameSquare(sq("e2")))
        );
    }

    #[test]
    fn test_promotion_letter_checked_against_board() {
        let board = parse_board("8/4P3/8/8/8/8/3p4/K6k w - - 0 1").unwrap();
        let check = |token: &str, side| MoveToken::parse(token).unwrap().check_promotion(&board, side);

        assert_eq!(check("e7e8q", Side::White), Ok(()));
        assert_eq!(check("d2d1n", Side::Black), Ok(()));
        assert_eq!(check("e7e8", Side::White), Ok(()));
        // King on a1 is not a pawn
        assert!(matches!(check("a1b1q", Side::White), Err(MoveError::IllegalPromotion(_))));
        // Black pawn, White to move
        assert!(matches!(check("d2d1q", Side::White), Err(MoveError::IllegalPromotion(_))));
        // White pawn heading for Black's last rank
        assert!(matches!(check("e7e1q", Side::White), Err(MoveError::IllegalPromotion(_))));
    }

    #[test]
    fn test_move_input_accepts_coordinates_and_notation() {
        assert_eq!(
            MoveInput::parse(" e2e4 ").unwrap(),
            MoveInput::Coordinate(MoveToken::parse("e2e4").unwrap())
        );
        assert_eq!(MoveInput::parse("Nf3").unwrap(), MoveInput::Notation("Nf3".to_string()));
        assert_eq!(MoveInput::parse("e8=Q").unwrap().as_wire(), "e8=Q");
        assert_eq!(MoveInput::parse("O-O").unwrap().as_wire(), "O-O");
    }

    #[test]
    fn test_move_input_rejects_degenerate_tokens() {
        assert_eq!(MoveInput::parse("   "), Err(MoveError::Empty));
        assert!(MoveInput::parse("e2e2").is_err());
        assert!(MoveInput::parse("x").is_err());
        assert!(MoveInput::parse("hello").is_err());
        assert!(MoveInput::parse("e2 e4").is_err());
    }
}
