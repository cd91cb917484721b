//! Move controller - the board's single source of truth
//!
//! Owns the current [`Position`] and every resource derived from the moves
//! played on it. All mutations go through here, and all of them that need
//! the engine service follow the same two-step shape:
//!
//! 1. `begin_*` checks the preconditions, snapshots what the reply will need
//!    (the position and the side to move), issues a [`RequestToken`] and
//!    moves the controller to [`ControllerState::AwaitingService`]. It
//!    returns a [`ServiceCall`] describing the request to send.
//! 2. `complete_*` takes the token and the service result. It returns the
//!    controller to `Idle` and, on success, applies the result.
//!
//! The `async` helpers ([`MoveController::submit_move`] and friends) run both
//! steps around a direct service call. The session actor runs them apart so
//! the call can happen on another task.
//!
//! # State Machine
//!
//! ```text
//!            begin_*                       complete_* (matching token)
//!   Idle  ------------>  AwaitingService  ----------------------------->  Idle
//!    ^                        |
//!    +------ reset_board -----+   (any later completion is stale)
//! ```
//!
//! Only one request may be outstanding. `begin_*` while awaiting fails with
//! [`ControllerError::Busy`]; a completion whose token is not the
//! outstanding one fails with [`ControllerError::Stale`] and changes nothing.
//!
//! # Failure Semantics
//!
//! Nothing is mutated until a successful, well-formed reply arrives. A
//! failed or malformed reply leaves position, history and grades exactly as
//! they were and returns the controller to `Idle`. Nothing is retried.
//!
//! # Grades and History
//!
//! A grade is credited to the side that was to move when the request was
//! issued. Stepping back restores the previous position but never removes a
//! grade; only [`MoveController::reset_board`] zeroes the tally.

use crate::game::fen::{BoardGrid, Position};
use crate::game::moves::{MoveError, MoveInput, MoveToken, Square};
use crate::game::resources::{
    Evaluation, Grade, GradeDistribution, GradeTracker, HistoryStack, MoveLog, MoveLogEntry, Rgb,
};
use crate::game::types::Side;
use crate::networking::client::EngineService;
use crate::networking::error::{ServiceError, ServiceResult};
use crate::networking::health::ReadinessFlag;
use crate::networking::protocol::{
    EvaluateResponse, LegalMovesResponse, MoveResponse, SuggestResponse,
};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Identifies one issued request; strictly increasing per controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Move,
    Suggestion,
    Evaluation,
    LegalMoves,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RequestKind::Move => "move",
            RequestKind::Suggestion => "suggestion",
            RequestKind::Evaluation => "evaluation",
            RequestKind::LegalMoves => "legal moves",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    AwaitingService {
        token: RequestToken,
        kind: RequestKind,
    },
}

/// Errors surfaced to the user; none of them are fatal
#[derive(Error, Debug)]
pub enum ControllerError {
    #[error("Engine is not ready yet. Wait for the engine service to come online and try again.")]
    ServiceUnready,

    #[error("Still waiting for the engine to answer the previous {0} request")]
    Busy(RequestKind),

    #[error("Invalid move: {0}")]
    InvalidMove(#[from] MoveError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("Could not compute: {0}")]
    MalformedResponse(String),

    #[error("No suggestion to accept; ask for one first")]
    NoSuggestion,

    #[error("No earlier position to go back to")]
    NothingToUndo,

    #[error("Forward navigation is not available")]
    ForwardUnavailable,

    #[error("Discarded the reply to request {0}; it is no longer current")]
    Stale(RequestToken),
}

impl ControllerError {
    pub fn is_stale(&self) -> bool {
        matches!(self, ControllerError::Stale(_))
    }
}

pub type ControllerResult<T> = Result<T, ControllerError>;

/// A request the caller must send to the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCall {
    pub token: RequestToken,
    pub kind: RequestKind,
    /// Position the request is about
    pub fen: String,
    /// Move text, for [`RequestKind::Move`] only
    pub mv: Option<String>,
}

impl ServiceCall {
    /// Send the request and wrap the result for [`MoveController::complete`]
    pub async fn execute(&self, service: &dyn EngineService) -> ServiceReply {
        match self.kind {
            RequestKind::Move => {
                let mv = self.mv.as_deref().unwrap_or_default();
                ServiceReply::Move(service.submit_move(&self.fen, mv).await)
            }
            RequestKind::Suggestion => ServiceReply::Suggestion(service.suggest(&self.fen).await),
            RequestKind::Evaluation => ServiceReply::Evaluation(service.evaluate(&self.fen).await),
            RequestKind::LegalMoves => {
                ServiceReply::LegalMoves(service.legal_moves(&self.fen).await)
            }
        }
    }
}

/// Raw service result, tagged by request kind
#[derive(Debug)]
pub enum ServiceReply {
    Move(ServiceResult<MoveResponse>),
    Suggestion(ServiceResult<SuggestResponse>),
    Evaluation(ServiceResult<EvaluateResponse>),
    LegalMoves(ServiceResult<LegalMovesResponse>),
}

/// Engine suggestion kept for display and input pre-fill
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub best_move: String,
    pub best_line: Vec<String>,
}

/// Reconciled state after a move was applied, handed to rendering
#[derive(Debug, Clone, PartialEq)]
pub struct MoveApplied {
    /// Move as submitted
    pub notation: String,
    /// Coordinate form, when the service reports it
    pub move_uci: Option<String>,
    pub mover: Side,
    pub previous: Position,
    pub position: Position,
    pub grade: Grade,
    pub grade_color: Rgb,
    pub evaluation: Evaluation,
    pub is_game_over: bool,
    pub result: Option<String>,
}

/// Result of a completed request
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    MoveApplied(MoveApplied),
    Suggested(Suggestion),
    Evaluated(Evaluation),
    LegalMoves(Vec<String>),
}

/// Everything a renderer needs, copied out of the controller
#[derive(Debug, Clone, PartialEq)]
pub struct BoardView {
    pub position: Position,
    pub board: BoardGrid,
    pub side_to_move: Side,
    pub fullmove: u32,
    pub history_depth: usize,
    pub evaluation: Option<Evaluation>,
    pub suggestion: Option<Suggestion>,
    pub grades: GradeDistribution,
    pub move_log: Vec<MoveLogEntry>,
    pub ready: bool,
    pub state: ControllerState,
}

/// Snapshot taken when a request is issued
#[derive(Debug, Clone)]
struct PendingRequest {
    token: RequestToken,
    kind: RequestKind,
    position: Position,
    mover: Side,
    notation: Option<String>,
}

/// Owner of the position, history, grades and display state
#[derive(Debug, Default)]
pub struct MoveController {
    position: Position,
    history: HistoryStack,
    grades: GradeTracker,
    evaluation: Option<Evaluation>,
    suggestion: Option<Suggestion>,
    move_log: MoveLog,
    readiness: ReadinessFlag,
    pending: Option<PendingRequest>,
    last_token: u64,
}

impl MoveController {
    /// Controller at the start position, gated by `readiness`
    pub fn new(readiness: ReadinessFlag) -> Self {
        MoveController {
            readiness,
            ..Default::default()
        }
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Grid for the current position, recomputed on every call
    pub fn board(&self) -> BoardGrid {
        self.position.board()
    }

    pub fn side_to_move(&self) -> Side {
        self.position.side_to_move()
    }

    pub fn history_depth(&self) -> usize {
        self.history.len()
    }

    pub fn grades(&self) -> GradeDistribution {
        self.grades.snapshot()
    }

    pub fn evaluation(&self) -> Option<&Evaluation> {
        self.evaluation.as_ref()
    }

    pub fn suggestion(&self) -> Option<&Suggestion> {
        self.suggestion.as_ref()
    }

    pub fn move_log(&self) -> &MoveLog {
        &self.move_log
    }

    pub fn state(&self) -> ControllerState {
        match &self.pending {
            Some(pending) => ControllerState::AwaitingService {
                token: pending.token,
                kind: pending.kind,
            },
            None => ControllerState::Idle,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_ready(&self) -> bool {
        self.readiness.is_ready()
    }

    pub fn set_ready(&self, ready: bool) {
        self.readiness.set(ready);
    }

    pub fn view(&self) -> BoardView {
        BoardView {
            position: self.position.clone(),
            board: self.board(),
            side_to_move: self.side_to_move(),
            fullmove: self.position.fullmove_number(),
            history_depth: self.history.len(),
            evaluation: self.evaluation.clone(),
            suggestion: self.suggestion.clone(),
            grades: self.grades.snapshot(),
            move_log: self.move_log.entries().to_vec(),
            ready: self.is_ready(),
            state: self.state(),
        }
    }

    // ------------------------------------------------------------------
    // Issuing requests
    // ------------------------------------------------------------------

    fn ensure_can_send(&self) -> ControllerResult<()> {
        if !self.is_ready() {
            warn!("[CONTROLLER] Engine service not ready; request blocked");
            return Err(ControllerError::ServiceUnready);
        }
        if let Some(pending) = &self.pending {
            return Err(ControllerError::Busy(pending.kind));
        }
        Ok(())
    }

    fn issue(&mut self, kind: RequestKind, notation: Option<String>) -> ServiceCall {
        self.last_token += 1;
        let token = RequestToken(self.last_token);
        let mover = self.position.side_to_move();

        debug!(
            "[CONTROLLER] Issuing {} request {} ({} to move)",
            kind, token, mover
        );
        self.pending = Some(PendingRequest {
            token,
            kind,
            position: self.position.clone(),
            mover,
            notation: notation.clone(),
        });

        ServiceCall {
            token,
            kind,
            fen: self.position.to_string(),
            mv: notation,
        }
    }

    fn begin_move_input(&mut self, input: MoveInput) -> ControllerResult<ServiceCall> {
        if let MoveInput::Coordinate(token) = &input {
            token.check_promotion(&self.board(), self.side_to_move())?;
        }
        Ok(self.issue(RequestKind::Move, Some(input.as_wire())))
    }

    /// Start submitting typed move text (coordinates or algebraic)
    pub fn begin_move(&mut self, input: &str) -> ControllerResult<ServiceCall> {
        self.ensure_can_send()?;
        let input = MoveInput::parse(input)?;
        self.begin_move_input(input)
    }

    /// Start submitting a drag-and-drop gesture
    pub fn begin_drag(&mut self, from: Square, to: Square) -> ControllerResult<ServiceCall> {
        self.ensure_can_send()?;
        let token = MoveToken::from_drag(&self.board(), from, to)?;
        self.begin_move_input(token.into())
    }

    /// Start submitting the last suggested move
    pub fn begin_accept_suggestion(&mut self) -> ControllerResult<ServiceCall> {
        let best_move = self
            .suggestion
            .as_ref()
            .map(|s| s.best_move.clone())
            .ok_or(ControllerError::NoSuggestion)?;
        self.ensure_can_send()?;
        let input = MoveInput::parse(&best_move)?;
        self.begin_move_input(input)
    }

    pub fn begin_suggestion(&mut self) -> ControllerResult<ServiceCall> {
        self.ensure_can_send()?;
        Ok(self.issue(RequestKind::Suggestion, None))
    }

    pub fn begin_evaluation(&mut self) -> ControllerResult<ServiceCall> {
        self.ensure_can_send()?;
        Ok(self.issue(RequestKind::Evaluation, None))
    }

    pub fn begin_legal_moves(&mut self) -> ControllerResult<ServiceCall> {
        self.ensure_can_send()?;
        Ok(self.issue(RequestKind::LegalMoves, None))
    }

    // ------------------------------------------------------------------
    // Completing requests
    // ------------------------------------------------------------------

    /// Release the outstanding request if `token` and `kind` match it
    fn take_pending(
        &mut self,
        token: RequestToken,
        kind: RequestKind,
    ) -> ControllerResult<PendingRequest> {
        let current = self
            .pending
            .as_ref()
            .is_some_and(|p| p.token == token && p.kind == kind);
        if !current {
            debug!("[CONTROLLER] Dropping stale {} reply {}", kind, token);
            return Err(ControllerError::Stale(token));
        }
        self.pending.take().ok_or(ControllerError::Stale(token))
    }

    /// Split a service result into transport/status failures and bodies that
    /// arrived with a success status but could not be read
    fn service_result<T>(kind: RequestKind, result: ServiceResult<T>) -> ControllerResult<T> {
        result.map_err(|e| match e {
            ServiceError::Decode(e) => {
                warn!("[CONTROLLER] Unreadable {} reply: {}", kind, e);
                ControllerError::MalformedResponse(format!("engine sent an incomplete {kind} reply ({e})"))
            }
            other => ControllerError::Service(other),
        })
    }

    /// Apply any reply; dispatches on its kind
    pub fn complete(&mut self, token: RequestToken, reply: ServiceReply) -> ControllerResult<Outcome> {
        match reply {
            ServiceReply::Move(result) => self.complete_move(token, result).map(Outcome::MoveApplied),
            ServiceReply::Suggestion(result) => {
                self.complete_suggestion(token, result).map(Outcome::Suggested)
            }
            ServiceReply::Evaluation(result) => {
                self.complete_evaluation(token, result).map(Outcome::Evaluated)
            }
            ServiceReply::LegalMoves(result) => {
                self.complete_legal_moves(token, result).map(Outcome::LegalMoves)
            }
        }
    }

    /// Apply the reply to a move submission
    pub fn complete_move(
        &mut self,
        token: RequestToken,
        result: ServiceResult<MoveResponse>,
    ) -> ControllerResult<MoveApplied> {
        let pending = self.take_pending(token, RequestKind::Move)?;
        let notation = pending.notation.unwrap_or_default();

        let response = Self::service_result(RequestKind::Move, result).inspect_err(|e| {
            warn!("[CONTROLLER] Move {} was not applied: {}", notation, e);
        })?;
        let position = Position::parse(&response.fen).map_err(|e| {
            ControllerError::MalformedResponse(format!("engine returned an invalid position ({e})"))
        })?;
        let grade: Grade = response
            .grade
            .parse()
            .map_err(|e| ControllerError::MalformedResponse(format!("engine returned an {e}")))?;

        let evaluation = Evaluation {
            score: response.eval_after,
            change: Some(response.eval_change),
            material: response.material,
            material_change: Some(response.material_change),
            hanging_piece_value: response.hanging_piece_value.filter(|value| *value > 0),
            best_line: response.best_line.unwrap_or_default(),
        };

        let previous = std::mem::replace(&mut self.position, position.clone());
        debug_assert_eq!(previous, pending.position);
        self.history.push(previous.clone());
        self.grades.record(pending.mover, grade);
        self.move_log.record(
            pending.mover,
            previous.fullmove_number(),
            notation.clone(),
            position.clone(),
            grade,
            response.eval_change,
        );
        self.evaluation = Some(evaluation.clone());
        self.suggestion = None;

        info!(
            "[CONTROLLER] {} played {} - {} (eval {}, history depth {})",
            pending.mover,
            notation,
            grade,
            evaluation.score_text(),
            self.history.len()
        );

        Ok(MoveApplied {
            notation,
            move_uci: response.move_uci,
            mover: pending.mover,
            previous,
            position,
            grade,
            grade_color: response.grade_color.unwrap_or_else(|| grade.default_color()),
            evaluation,
            is_game_over: response.is_game_over,
            result: response.result,
        })
    }

    /// Apply the reply to a suggestion request. Only the displayed best line
    /// changes; position, history and grades are left alone.
    pub fn complete_suggestion(
        &mut self,
        token: RequestToken,
        result: ServiceResult<SuggestResponse>,
    ) -> ControllerResult<Suggestion> {
        self.take_pending(token, RequestKind::Suggestion)?;
        let response = Self::service_result(RequestKind::Suggestion, result)?;

        let best_move = response
            .best_move
            .map(|mv| mv.trim().to_string())
            .filter(|mv| !mv.is_empty())
            .ok_or_else(|| {
                ControllerError::MalformedResponse("no suggested move for this position".to_string())
            })?;
        let suggestion = Suggestion {
            best_move,
            best_line: response.best_line.unwrap_or_default(),
        };

        info!("[CONTROLLER] Engine suggests {}", suggestion.best_move);
        if let Some(evaluation) = self.evaluation.as_mut() {
            evaluation.best_line = suggestion.best_line.clone();
        }
        self.suggestion = Some(suggestion.clone());
        Ok(suggestion)
    }

    /// Apply the reply to an evaluation request. Only the display changes.
    pub fn complete_evaluation(
        &mut self,
        token: RequestToken,
        result: ServiceResult<EvaluateResponse>,
    ) -> ControllerResult<Evaluation> {
        self.take_pending(token, RequestKind::Evaluation)?;
        let response = Self::service_result(RequestKind::Evaluation, result)?;

        let evaluation = Evaluation {
            material: response.material,
            ..Evaluation::from_score(response.eval)
        };
        self.evaluation = Some(evaluation.clone());
        Ok(evaluation)
    }

    pub fn complete_legal_moves(
        &mut self,
        token: RequestToken,
        result: ServiceResult<LegalMovesResponse>,
    ) -> ControllerResult<Vec<String>> {
        self.take_pending(token, RequestKind::LegalMoves)?;
        Ok(Self::service_result(RequestKind::LegalMoves, result)?.moves)
    }

    // ------------------------------------------------------------------
    // One-shot async helpers
    // ------------------------------------------------------------------

    /// Submit typed move text and wait for the graded result
    pub async fn submit_move(
        &mut self,
        service: &dyn EngineService,
        input: &str,
    ) -> ControllerResult<MoveApplied> {
        let call = self.begin_move(input)?;
        self.finish_move(service, call).await
    }

    /// Submit a drag-and-drop gesture
    pub async fn submit_drag(
        &mut self,
        service: &dyn EngineService,
        from: Square,
        to: Square,
    ) -> ControllerResult<MoveApplied> {
        let call = self.begin_drag(from, to)?;
        self.finish_move(service, call).await
    }

    /// Submit the move from the last suggestion
    pub async fn accept_suggestion(
        &mut self,
        service: &dyn EngineService,
    ) -> ControllerResult<MoveApplied> {
        let call = self.begin_accept_suggestion()?;
        self.finish_move(service, call).await
    }

    async fn finish_move(
        &mut self,
        service: &dyn EngineService,
        call: ServiceCall,
    ) -> ControllerResult<MoveApplied> {
        let mv = call.mv.as_deref().unwrap_or_default();
        let result = service.submit_move(&call.fen, mv).await;
        self.complete_move(call.token, result)
    }

    pub async fn request_suggestion(
        &mut self,
        service: &dyn EngineService,
    ) -> ControllerResult<Suggestion> {
        let call = self.begin_suggestion()?;
        let result = service.suggest(&call.fen).await;
        self.complete_suggestion(call.token, result)
    }

    /// Re-evaluate the current position without changing it
    pub async fn refresh_evaluation(
        &mut self,
        service: &dyn EngineService,
    ) -> ControllerResult<Evaluation> {
        let call = self.begin_evaluation()?;
        let result = service.evaluate(&call.fen).await;
        self.complete_evaluation(call.token, result)
    }

    pub async fn legal_moves(&mut self, service: &dyn EngineService) -> ControllerResult<Vec<String>> {
        let call = self.begin_legal_moves()?;
        let result = service.legal_moves(&call.fen).await;
        self.complete_legal_moves(call.token, result)
    }

    // ------------------------------------------------------------------
    // Local navigation
    // ------------------------------------------------------------------

    /// Restore the previous position. Grades are left as they are.
    pub fn step_back(&mut self) -> ControllerResult<&Position> {
        if let Some(pending) = &self.pending {
            return Err(ControllerError::Busy(pending.kind));
        }
        let previous = self.history.pop().ok_or(ControllerError::NothingToUndo)?;

        self.position = previous;
        self.evaluation = None;
        self.suggestion = None;
        info!(
            "[CONTROLLER] Stepped back to {} (history depth {})",
            self.position,
            self.history.len()
        );
        Ok(&self.position)
    }

    pub fn undo(&mut self) -> ControllerResult<&Position> {
        self.step_back()
    }

    pub fn back(&mut self) -> ControllerResult<&Position> {
        self.step_back()
    }

    /// Redo is not supported: history pops are destructive
    pub fn forward(&self) -> ControllerResult<()> {
        Err(ControllerError::ForwardUnavailable)
    }

    /// Back to the start position with empty history, grades and log.
    ///
    /// An outstanding request is abandoned; its reply will be stale.
    pub fn reset_board(&mut self) {
        if let Some(pending) = self.pending.take() {
            debug!(
                "[CONTROLLER] Abandoning {} request {} on reset",
                pending.kind, pending.token
            );
        }
        self.position = Position::start();
        self.history.clear();
        self.grades.reset();
        self.evaluation = None;
        self.suggestion = None;
        self.move_log.clear();
        info!("[CONTROLLER] Board reset to start position");
    }
}
