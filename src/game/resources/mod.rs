//! Board state owned by the move controller
//!
//! Each resource is a plain struct with explicit methods. The
//! [`crate::game::controller::MoveController`] owns exactly one of each and
//! is the only thing that mutates them.
//!
//! - [`HistoryStack`] - prior positions for stepping back
//! - [`GradeTracker`] - per-side grade tally
//! - [`Evaluation`] - latest score, deltas and best line
//! - [`MoveLog`] - applied moves for the log panel

pub mod evaluation;
pub mod grades;
pub mod history;
pub mod move_log;

pub use evaluation::{eval_bar_percent, format_score, Evaluation, EVAL_BAR_CLAMP, MATE_THRESHOLD};
pub use grades::{Grade, GradeCounts, GradeDistribution, GradeTracker, Rgb, UnknownGrade};
pub use history::HistoryStack;
pub use move_log::{MoveLog, MoveLogEntry};
