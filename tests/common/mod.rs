//! Shared fixtures: a scripted engine service and canned responses

#![allow(dead_code)]

use async_trait::async_trait;
use gradeboard::networking::protocol::{
    EvaluateResponse, HealthResponse, LegalMovesResponse, MoveResponse, SuggestResponse,
};
use gradeboard::networking::{EngineService, ServiceError, ServiceResult};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub const AFTER_E4: &str = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
pub const AFTER_E4_E5: &str = "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2";
pub const AFTER_E4_E5_NF3: &str =
    "rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2";

/// Graded move response as the service would send it
pub fn move_response(fen: &str, mv: &str, grade: &str) -> MoveResponse {
    serde_json::from_value(json!({
        "fen": fen,
        "move": mv,
        "move_uci": mv,
        "grade": grade,
        "grade_color": [0, 255, 0],
        "eval_before": 20,
        "eval_after": 35,
        "eval_change": 15,
        "material": 0,
        "material_change": 0,
        "hanging_piece_value": 0,
        "best_line": ["e7e5", "g1f3"],
        "is_game_over": false
    }))
    .expect("Fixture should deserialize")
}

pub fn suggest_response(best_move: &str) -> SuggestResponse {
    serde_json::from_value(json!({
        "best_move": best_move,
        "best_line": [best_move, "e5"]
    }))
    .expect("Fixture should deserialize")
}

pub fn rejection(message: &str) -> ServiceError {
    ServiceError::Status {
        status: 400,
        message: message.to_string(),
    }
}

/// Engine service that replays scripted replies in order
#[derive(Default)]
pub struct ScriptedEngine {
    moves: Mutex<VecDeque<ServiceResult<MoveResponse>>>,
    suggestions: Mutex<VecDeque<ServiceResult<SuggestResponse>>>,
    submitted: Mutex<Vec<(String, String)>>,
    calls: AtomicUsize,
    healthy: AtomicBool,
    /// When set, every reply waits for a permit first
    gate: Option<Arc<Notify>>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self {
            healthy: AtomicBool::new(true),
            ..Default::default()
        }
    }

    /// Replies are held back until `gate` is notified, once per reply
    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::new()
        }
    }

    pub fn push_move(&self, reply: ServiceResult<MoveResponse>) {
        self.moves.lock().unwrap().push_back(reply);
    }

    pub fn push_suggestion(&self, reply: ServiceResult<SuggestResponse>) {
        self.suggestions.lock().unwrap().push_back(reply);
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    /// Number of service calls made, `/health` excluded
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// `(fen, move)` pairs sent to `/board`
    pub fn submitted(&self) -> Vec<(String, String)> {
        self.submitted.lock().unwrap().clone()
    }

    async fn wait_for_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
    }
}

#[async_trait]
impl EngineService for ScriptedEngine {
    async fn health(&self) -> ServiceResult<HealthResponse> {
        Ok(HealthResponse {
            status: Some("ok".to_string()),
            engine: self.healthy.load(Ordering::SeqCst),
        })
    }

    async fn submit_move(&self, fen: &str, mv: &str) -> ServiceResult<MoveResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.submitted
            .lock()
            .unwrap()
            .push((fen.to_string(), mv.to_string()));
        self.wait_for_gate().await;
        self.moves
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(rejection("No scripted reply")))
    }

    async fn suggest(&self, _fen: &str) -> ServiceResult<SuggestResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.wait_for_gate().await;
        self.suggestions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(rejection("No scripted reply")))
    }

    async fn evaluate(&self, fen: &str) -> ServiceResult<EvaluateResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.wait_for_gate().await;
        Ok(EvaluateResponse {
            fen: fen.to_string(),
            eval: 42,
            material: Some(1),
            legal_moves: Some(20),
            turn: Some("white".to_string()),
        })
    }

    async fn legal_moves(&self, _fen: &str) -> ServiceResult<LegalMovesResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.wait_for_gate().await;
        Ok(LegalMovesResponse {
            moves: vec!["e2e4".to_string(), "d2d4".to_string(), "g1f3".to_string()],
        })
    }
}
