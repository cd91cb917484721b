//! Plain-text rendering of controller state
//!
//! Every function returns a `String`; printing is left to the caller.

use crate::game::controller::{BoardView, ControllerState, MoveApplied, Suggestion};
use crate::game::fen::BoardGrid;
use crate::game::resources::{Evaluation, Grade, GradeDistribution, MoveLogEntry};
use std::fmt::Write;

/// Width of the evaluation bar in characters
pub const EVAL_BAR_WIDTH: usize = 40;

const FILES: &str = "a b c d e f g h";

/// Board from White's side, rank 8 on top, `.` for empty squares
pub fn render_board(board: &BoardGrid) -> String {
    let mut out = String::new();
    for (row, cells) in board.rows().iter().enumerate() {
        let rank = 8 - row;
        let line: Vec<String> = cells
            .iter()
            .map(|cell| cell.unwrap_or('.').to_string())
            .collect();
        let _ = writeln!(out, "{} | {}", rank, line.join(" "));
    }
    let _ = writeln!(out, "    {}", "-".repeat(FILES.len()));
    let _ = write!(out, "    {}", FILES);
    out
}

/// `W` fill for White's share, `.` for Black's, followed by the score
pub fn render_eval_bar(evaluation: Option<&Evaluation>, width: usize) -> String {
    let Some(evaluation) = evaluation else {
        return format!("[{}]  --", " ".repeat(width));
    };
    let filled = ((evaluation.bar_percent() / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!(
        "[{}{}] {}",
        "W".repeat(filled),
        ".".repeat(width - filled),
        evaluation.score_text()
    )
}

pub fn render_grade_table(grades: &GradeDistribution) -> String {
    let mut out = format!("{:<8} {:>5} {:>5}", "Grade", "White", "Black");
    for grade in Grade::ALL {
        let _ = write!(
            out,
            "\n{:<8} {:>5} {:>5}",
            grade.label(),
            grades.white.get(grade),
            grades.black.get(grade)
        );
    }
    out
}

pub fn render_move_log(entries: &[MoveLogEntry]) -> String {
    if entries.is_empty() {
        return "No moves yet".to_string();
    }
    entries
        .iter()
        .map(|entry| {
            format!(
                "{:<14} {:<8} {:+}  ({})",
                entry.label(),
                entry.grade.label(),
                entry.eval_change,
                entry.recorded_at.format("%H:%M:%S")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_details(evaluation: &Evaluation) -> String {
    let mut out = String::new();
    if let Some(material) = evaluation.material {
        let _ = write!(out, "Material: {:+}", material);
        if let Some(change) = evaluation.material_change.filter(|c| *c != 0) {
            let _ = write!(out, " ({:+})", change);
        }
        out.push('\n');
    }
    if let Some(value) = evaluation.hanging_piece_value {
        let _ = writeln!(out, "Hanging piece worth {} available", value);
    }
    if !evaluation.best_line.is_empty() {
        let _ = writeln!(out, "Best line: {}", evaluation.best_line.join(" "));
    }
    out
}

/// Summary of an applied move: grade, score change and the new position
pub fn render_move_applied(applied: &MoveApplied) -> String {
    let mut out = format!(
        "{} played {}: {} [{}]",
        applied.mover, applied.notation, applied.grade, applied.grade_color
    );
    if let Some(change) = applied.evaluation.change {
        let _ = write!(out, "  eval {} ({:+})", applied.evaluation.score_text(), change);
    }
    out.push('\n');
    out.push_str(&render_details(&applied.evaluation));
    if applied.is_game_over {
        let result = applied.result.as_deref().unwrap_or("*");
        let _ = writeln!(out, "Game over: {}", result);
    }
    out.push_str(&render_board(&applied.position.board()));
    out
}

pub fn render_suggestion(suggestion: &Suggestion) -> String {
    if suggestion.best_line.is_empty() {
        format!("Suggested move: {}", suggestion.best_move)
    } else {
        format!(
            "Suggested move: {}  (line: {})",
            suggestion.best_move,
            suggestion.best_line.join(" ")
        )
    }
}

/// Engine readiness and the outstanding request, if any
pub fn render_status(view: &BoardView) -> String {
    let engine = if view.ready { "ready" } else { "not ready" };
    let request = match view.state {
        ControllerState::Idle => "idle".to_string(),
        ControllerState::AwaitingService { token, kind } => {
            format!("waiting for {} {}", kind, token)
        }
    };
    format!("Engine: {}, {}", engine, request)
}

/// Full screen: board, turn, evaluation bar and status
pub fn render_view(view: &BoardView) -> String {
    let mut out = render_board(&view.board);
    let _ = write!(
        out,
        "\n\nMove {}, {} to play (history {})\n{}",
        view.fullmove,
        view.side_to_move,
        view.history_depth,
        render_eval_bar(view.evaluation.as_ref(), EVAL_BAR_WIDTH)
    );
    if let Some(suggestion) = &view.suggestion {
        let _ = write!(out, "\n{}", render_suggestion(suggestion));
    }
    let _ = write!(out, "\n{}", render_status(view));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::fen::Position;

    #[test]
    fn test_start_board_rendering() {
        let text = render_board(&Position::start().board());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "8 | r n b q k b n r");
        assert_eq!(lines[3], "5 | . . . . . . . .");
        assert_eq!(lines[7], "1 | R N B Q K B N R");
        assert!(lines[9].ends_with("a b c d e f g h"));
    }

    #[test]
    fn test_eval_bar_fill() {
        let even = render_eval_bar(Some(&Evaluation::from_score(0)), 10);
        assert_eq!(even, "[WWWWW.....] +0.00");

        let crushing = render_eval_bar(Some(&Evaluation::from_score(-900)), 10);
        assert_eq!(crushing, "[..........] -9.00");

        let mate = render_eval_bar(Some(&Evaluation::from_score(5000)), 10);
        assert_eq!(mate, "[WWWWWWWWWW] #");

        assert_eq!(render_eval_bar(None, 4), "[    ]  --");
    }

    #[test]
    fn test_grade_table_lists_every_grade() {
        let table = render_grade_table(&GradeDistribution::default());

        assert_eq!(table.lines().count(), Grade::ALL.len() + 1);
        assert!(table.contains("Sigma"));
        assert!(table.contains("Clown"));
    }

    #[test]
    fn test_empty_move_log() {
        assert_eq!(render_move_log(&[]), "No moves yet");
    }
}
