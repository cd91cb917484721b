//! Evaluation display state
//!
//! Scores are centipawns from White's point of view. The evaluation bar
//! clamps to +/-5 pawns and maps linearly onto 0-100%.
//!
//! | Score     | Bar  | Text   |
//! |-----------|------|--------|
//! | -500 or less | 0%   | -5.00 |
//! | 0         | 50%  | +0.00  |
//! | 500 or more  | 100% | +5.00 |
//! | 1000 or more | 100% | `#`  |
//!
//! Anything at or beyond [`MATE_THRESHOLD`] is shown as a forced mate. The
//! service reports mates as very large scores and has no separate mate
//! field, so a huge non-mate score would also be drawn as mate.

/// Scores are clamped to +/- this many centipawns for the bar
pub const EVAL_BAR_CLAMP: i32 = 500;

/// Magnitude at which a score is read as a forced mate
pub const MATE_THRESHOLD: i32 = 1000;

/// Bar fill in percent, 0 = Black winning, 100 = White winning
pub fn eval_bar_percent(centipawns: i32) -> f64 {
    let clamped = centipawns.clamp(-EVAL_BAR_CLAMP, EVAL_BAR_CLAMP) as f64;
    (clamped / EVAL_BAR_CLAMP as f64 + 1.0) * 50.0
}

pub fn is_mate_score(centipawns: i32) -> bool {
    centipawns.saturating_abs() >= MATE_THRESHOLD
}

/// `#` / `-#` for mates, otherwise pawns with two decimals and a sign
pub fn format_score(centipawns: i32) -> String {
    if is_mate_score(centipawns) {
        if centipawns > 0 {
            "#".to_string()
        } else {
            "-#".to_string()
        }
    } else {
        format!("{:+.2}", centipawns as f64 / 100.0)
    }
}

/// Latest evaluation shown next to the board
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Evaluation {
    /// Centipawns, White's perspective
    pub score: i32,
    /// Change caused by the last move, from the mover's perspective
    pub change: Option<i32>,
    /// Material balance, White minus Black, in pawns
    pub material: Option<i32>,
    pub material_change: Option<i32>,
    /// Value of the best capture now available to the side to move
    pub hanging_piece_value: Option<i32>,
    /// Engine continuation from the current position
    pub best_line: Vec<String>,
}

impl Evaluation {
    pub fn from_score(score: i32) -> Self {
        Evaluation {
            score,
            ..Default::default()
        }
    }

    pub fn bar_percent(&self) -> f64 {
        eval_bar_percent(self.score)
    }

    pub fn is_mate(&self) -> bool {
        is_mate_score(self.score)
    }

    pub fn score_text(&self) -> String {
        format_score(self.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_midpoint() {
        assert_eq!(eval_bar_percent(0), 50.0);
    }

    #[test]
    fn test_bar_clamps() {
        assert_eq!(eval_bar_percent(-500), 0.0);
        assert_eq!(eval_bar_percent(-2_000), 0.0);
        assert_eq!(eval_bar_percent(500), 100.0);
        assert_eq!(eval_bar_percent(100_000), 100.0);
        assert_eq!(eval_bar_percent(i32::MIN), 0.0);
    }

    #[test]
    fn test_bar_is_linear_inside_clamp() {
        assert_eq!(eval_bar_percent(250), 75.0);
        assert_eq!(eval_bar_percent(-250), 25.0);
    }

    #[test]
    fn test_mate_scores_render_as_symbol() {
        assert_eq!(format_score(1000), "#");
        assert_eq!(format_score(100_000), "#");
        assert_eq!(format_score(-1000), "-#");
        assert_eq!(format_score(i32::MIN), "-#");
        assert!(!format_score(1000).contains('.'));
    }

    #[test]
    fn test_regular_scores_render_in_pawns() {
        assert_eq!(format_score(0), "+0.00");
        assert_eq!(format_score(35), "+0.35");
        assert_eq!(format_score(-120), "-1.20");
        assert_eq!(format_score(999), "+9.99");
    }

    #[test]
    fn test_evaluation_helpers() {
        let eval = Evaluation::from_score(-1500);
        assert!(eval.is_mate());
        assert_eq!(eval.bar_percent(), 0.0);
        assert_eq!(eval.score_text(), "-#");
        assert!(eval.best_line.is_empty());
    }
}
