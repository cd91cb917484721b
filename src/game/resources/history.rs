//! Position history stack
//!
//! Ordered record of the positions that preceded the current one, newest on
//! top. The controller pushes the old position only after the engine service
//! confirms a move, and pops it again when the player steps back.
//!
//! # Invariant
//!
//! The top of the stack is always the position immediately before the
//! current one. Popping is destructive: there is no redo pointer, so a
//! step back cannot be undone.
//!
//! # Lifecycle
//!
//! - `push` after every applied move
//! - `pop` on step back
//! - `clear` on board reset
//!
//! Depth is unbounded for the lifetime of a session.

use crate::game::fen::Position;

/// Stack of prior positions
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HistoryStack {
    /// Oldest first; the last element is the top of the stack
    positions: Vec<Position>,
}

impl HistoryStack {
    /// Push the position that was current before a confirmed move
    pub fn push(&mut self, position: Position) {
        self.positions.push(position);
    }

    /// Pop the most recent prior position.
    ///
    /// Returns `None` on an empty stack; callers treat that as "nothing to
    /// go back to" rather than an error.
    pub fn pop(&mut self) -> Option<Position> {
        self.positions.pop()
    }

    /// The position a step back would restore
    pub fn peek(&self) -> Option<&Position> {
        self.positions.last()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Number of stored positions (equals the number of undoable moves)
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Drop every stored position (new game)
    pub fn clear(&mut self) {
        self.positions.clear();
    }

    /// Iterate oldest to newest
    pub fn iter(&self) -> std::slice::Iter<'_, Position> {
        self.positions.iter()
    }
}
