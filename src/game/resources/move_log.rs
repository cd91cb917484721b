//! Move log shown beside the board
//!
//! One entry per move the engine service accepted, in the order they were
//! applied. This is display state: it is appended on every applied move and
//! cleared on reset, but stepping back does not remove entries.

use crate::game::fen::Position;
use crate::game::resources::grades::Grade;
use crate::game::types::Side;
use chrono::{DateTime, Utc};

/// One applied move
#[derive(Debug, Clone, PartialEq)]
pub struct MoveLogEntry {
    /// Half-move index since the last reset, starting at 1
    pub ply: usize,
    /// Fullmove number of the position the move was played from
    pub fullmove: u32,
    pub mover: Side,
    /// Move as submitted
    pub notation: String,
    pub fen_after: Position,
    pub grade: Grade,
    pub eval_change: i32,
    pub recorded_at: DateTime<Utc>,
}

impl MoveLogEntry {
    /// `12. Nf3` for White, `12... Nc6` for Black
    pub fn label(&self) -> String {
        match self.mover {
            Side::White => format!("{}. {}", self.fullmove, self.notation),
            Side::Black => format!("{}... {}", self.fullmove, self.notation),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct MoveLog {
    entries: Vec<MoveLogEntry>,
}

impl MoveLog {
    /// Append an applied move and return the stored entry
    pub fn record(
        &mut self,
        mover: Side,
        fullmove: u32,
        notation: impl Into<String>,
        fen_after: Position,
        grade: Grade,
        eval_change: i32,
    ) -> &MoveLogEntry {
        let entry = MoveLogEntry {
            ply: self.entries.len() + 1,
            fullmove,
            mover,
            notation: notation.into(),
            fen_after,
            grade,
            eval_change,
            recorded_at: Utc::now(),
        };
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[MoveLogEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&MoveLogEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
