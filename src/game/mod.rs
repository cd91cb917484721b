//! Game module - board state and the move controller
//!
//! Everything here is local to the client: no chess rules are evaluated.
//! Legality, grading and scoring are delegated to the engine service and
//! the controller reconciles its answers into local state.
//!
//! # Module Organization
//!
//! - `types` - [`Side`]
//! - `fen` - FEN codec and the [`Position`] newtype
//! - `moves` - squares, coordinate tokens and raw move input
//! - `resources` - history stack, grade tally, evaluation, move log
//! - `controller` - [`MoveController`], the single owner of all of the above
//! - `session` - actor that runs the controller off the front end's task
//!
//! # Data Flow
//!
//! 1. The front end sends a command to the session
//! 2. The controller validates it and issues a tokened request
//! 3. A spawned task calls the engine service
//! 4. The reply is matched to its token and applied, or dropped as stale
//! 5. The session emits an event and the front end redraws

pub mod controller;
pub mod fen;
pub mod moves;
pub mod resources;
pub mod session;
pub mod types;

pub use controller::{
    BoardView, ControllerError, ControllerResult, ControllerState, MoveApplied, MoveController,
    Outcome, RequestKind, RequestToken, ServiceCall, ServiceReply, Suggestion,
};
pub use fen::{BoardGrid, FenError, Position, START_FEN};
pub use moves::{MoveError, MoveInput, MoveToken, Promotion, Square};
pub use session::{spawn_session, SessionCommand, SessionError, SessionEvent, SessionHandle};
pub use types::Side;
