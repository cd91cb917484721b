//! Wire types for the move-evaluation service
//!
//! All endpoints speak JSON. Unknown response fields are ignored and
//! optional ones default, so the client keeps working against service
//! versions that add fields.
//!
//! | Method | Path        | Request          | Response               |
//! |--------|-------------|------------------|------------------------|
//! | GET    | `/health`   |                  | [`HealthResponse`]     |
//! | POST   | `/board`    | [`MoveRequest`]  | [`MoveResponse`]       |
//! | POST   | `/suggest`  | [`FenRequest`]   | [`SuggestResponse`]    |
//! | POST   | `/evaluate` | [`FenRequest`]   | [`EvaluateResponse`]   |
//! | POST   | `/moves`    | [`FenRequest`]   | [`LegalMovesResponse`] |
//!
//! Failures come back with a non-2xx status and an [`ErrorResponse`] body.

use crate::game::resources::grades::Rgb;
use serde::{Deserialize, Serialize};

pub const HEALTH_PATH: &str = "/health";
pub const BOARD_PATH: &str = "/board";
pub const SUGGEST_PATH: &str = "/suggest";
pub const EVALUATE_PATH: &str = "/evaluate";
pub const MOVES_PATH: &str = "/moves";

/// Body of `POST /board`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub fen: String,
    #[serde(rename = "move")]
    pub mv: String,
}

/// Body of every position-only request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FenRequest {
    pub fen: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub status: Option<String>,
    /// Whether the engine behind the service is running
    #[serde(default)]
    pub engine: bool,
}

/// Result of applying and grading a move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResponse {
    /// Position after the move
    pub fen: String,
    /// The move as it was submitted
    #[serde(rename = "move", default)]
    pub mv: Option<String>,
    #[serde(default)]
    pub move_uci: Option<String>,
    pub grade: String,
    #[serde(default)]
    pub grade_color: Option<Rgb>,
    #[serde(default)]
    pub eval_before: Option<i32>,
    pub eval_after: i32,
    /// Evaluation change from the mover's perspective
    pub eval_change: i32,
    #[serde(default)]
    pub material: Option<i32>,
    pub material_change: i32,
    #[serde(default)]
    pub hanging_piece_value: Option<i32>,
    #[serde(default)]
    pub best_line: Option<Vec<String>>,
    #[serde(default)]
    pub is_game_over: bool,
    #[serde(default)]
    pub result: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestResponse {
    #[serde(default)]
    pub best_move: Option<String>,
    #[serde(default)]
    pub best_line: Option<Vec<String>>,
}

/// Static evaluation of a position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluateResponse {
    pub fen: String,
    pub eval: i32,
    #[serde(default)]
    pub material: Option<i32>,
    #[serde(default)]
    pub legal_moves: Option<u32>,
    #[serde(default)]
    pub turn: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalMovesResponse {
    #[serde(default)]
    pub moves: Vec<String>,
}

/// Error body of a non-2xx response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_move_request_uses_move_key() {
        let request = MoveRequest {
            fen: "fen".to_string(),
            mv: "e2e4".to_string(),
        };

        let value = serde_json::to_value(&request).expect("Should serialize");
        assert_eq!(value, json!({ "fen": "fen", "move": "e2e4" }));
    }

    #[test]
    fn test_move_response_full_body() {
        let body = json!({
            "fen": "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
            "move": "e2e4",
            "move_uci": "e2e4",
            "eval_before": 20,
            "eval_after": 35,
            "eval_change": 15,
            "material_change": 0,
            "hanging_piece_value": 0,
            "grade": "Good",
            "grade_color": [0, 255, 0],
            "best_line": ["e5", "Nf3"],
            "is_game_over": false,
            "result": null
        });

        let response: MoveResponse = serde_json::from_value(body).expect("Should deserialize");
        assert_eq!(response.grade, "Good");
        assert_eq!(response.grade_color, Some(Rgb(0, 255, 0)));
        assert_eq!(response.eval_change, 15);
        assert_eq!(response.best_line, Some(vec!["e5".to_string(), "Nf3".to_string()]));
        assert_eq!(response.result, None);
    }

    #[test]
    fn test_move_response_minimal_body() {
        let body = json!({
            "fen": "8/8/8/8/8/8/8/K6k b - - 0 1",
            "grade": "Okay",
            "eval_after": -10,
            "eval_change": -30,
            "material_change": 0,
            "grade_color": null,
            "best_line": null,
            "extra_field": "ignored"
        });

        let response: MoveResponse = serde_json::from_value(body).expect("Should deserialize");
        assert_eq!(response.grade_color, None);
        assert_eq!(response.best_line, None);
        assert!(!response.is_game_over);
    }

    #[test]
    fn test_suggest_response_missing_move() {
        let response: SuggestResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(response.best_move, None);
        assert_eq!(response.best_line, None);
    }

    #[test]
    fn test_health_response_without_engine_field() {
        let response: HealthResponse = serde_json::from_value(json!({ "status": "ok" })).unwrap();
        assert!(!response.engine);
    }
}
