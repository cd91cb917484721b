//! Session actor
//!
//! Runs a [`MoveController`] on its own task so the front end never waits
//! on the network. The front end sends [`SessionCommand`]s through a
//! [`SessionHandle`] and reads [`SessionEvent`]s back.
//!
//! Service calls are spawned as separate tasks. Their replies come back to
//! the actor tagged with the request token and are applied in arrival
//! order. A reply for a request that is no longer outstanding (the board
//! was reset in the meantime) is dropped.

use crate::game::controller::{
    BoardView, ControllerError, MoveApplied, MoveController, Outcome, RequestKind, RequestToken,
    ServiceCall, ServiceReply, Suggestion,
};
use crate::game::fen::Position;
use crate::game::moves::Square;
use crate::game::resources::Evaluation;
use crate::networking::client::EngineService;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Capacity of the command channel
const COMMAND_BUFFER: usize = 32;

/// Requests from the front end
#[derive(Debug)]
pub enum SessionCommand {
    Move(String),
    Drag { from: Square, to: Square },
    Suggest,
    AcceptSuggestion,
    Evaluate,
    LegalMoves,
    StepBack,
    Forward,
    Reset,
    Snapshot(oneshot::Sender<BoardView>),
    Shutdown,
}

/// Notifications for the front end
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    RequestSent {
        token: RequestToken,
        kind: RequestKind,
    },
    MoveApplied(MoveApplied),
    Suggested(Suggestion),
    Evaluated(Evaluation),
    LegalMoves(Vec<String>),
    SteppedBack(Position),
    BoardReset,
    /// User-facing message for a refused or failed action
    Rejected(String),
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    #[error("Session has shut down")]
    Closed,
}

/// Reply from a spawned service call
#[derive(Debug)]
struct Completion {
    token: RequestToken,
    reply: ServiceReply,
}

/// Cloneable sender side of a running session
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    pub async fn send(&self, command: SessionCommand) -> Result<(), SessionError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| SessionError::Closed)
    }

    pub async fn submit_move(&self, input: impl Into<String>) -> Result<(), SessionError> {
        self.send(SessionCommand::Move(input.into())).await
    }

    pub async fn drag(&self, from: Square, to: Square) -> Result<(), SessionError> {
        self.send(SessionCommand::Drag { from, to }).await
    }

    pub async fn suggest(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::Suggest).await
    }

    pub async fn accept_suggestion(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::AcceptSuggestion).await
    }

    pub async fn evaluate(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::Evaluate).await
    }

    pub async fn legal_moves(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::LegalMoves).await
    }

    pub async fn step_back(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::StepBack).await
    }

    pub async fn forward(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::Forward).await
    }

    pub async fn reset(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::Reset).await
    }

    /// Current board state, as seen after every earlier command
    pub async fn snapshot(&self) -> Result<BoardView, SessionError> {
        let (tx, rx) = oneshot::channel();
        self.send(SessionCommand::Snapshot(tx)).await?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    pub async fn shutdown(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::Shutdown).await
    }
}

/// Start the actor. Returns the command handle, the event stream and the
/// actor task; the task ends on [`SessionCommand::Shutdown`] or once every
/// handle is dropped.
pub fn spawn_session(
    controller: MoveController,
    service: Arc<dyn EngineService>,
) -> (
    SessionHandle,
    mpsc::UnboundedReceiver<SessionEvent>,
    JoinHandle<()>,
) {
    let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let (completion_tx, completion_rx) = mpsc::unbounded_channel();

    let session = Session {
        controller,
        service,
        events: event_tx,
        completions: completion_tx,
    };
    let task = tokio::spawn(session.run(command_rx, completion_rx));

    (SessionHandle { commands: command_tx }, event_rx, task)
}

struct Session {
    controller: MoveController,
    service: Arc<dyn EngineService>,
    events: mpsc::UnboundedSender<SessionEvent>,
    completions: mpsc::UnboundedSender<Completion>,
}

impl Session {
    async fn run(
        mut self,
        mut commands: mpsc::Receiver<SessionCommand>,
        mut completions: mpsc::UnboundedReceiver<Completion>,
    ) {
        info!("[SESSION] Session started");

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(SessionCommand::Shutdown) | None => break,
                    Some(command) => self.handle_command(command),
                },
                Some(completion) = completions.recv() => self.handle_completion(completion),
            }
        }

        info!("[SESSION] Session closed");
    }

    fn handle_command(&mut self, command: SessionCommand) {
        let started = match command {
            SessionCommand::Move(input) => self.controller.begin_move(&input),
            SessionCommand::Drag { from, to } => self.controller.begin_drag(from, to),
            SessionCommand::Suggest => self.controller.begin_suggestion(),
            SessionCommand::AcceptSuggestion => self.controller.begin_accept_suggestion(),
            SessionCommand::Evaluate => self.controller.begin_evaluation(),
            SessionCommand::LegalMoves => self.controller.begin_legal_moves(),
            SessionCommand::StepBack => {
                match self.controller.step_back() {
                    Ok(position) => {
                        let position = position.clone();
                        self.emit(SessionEvent::SteppedBack(position));
                    }
                    Err(e) => self.reject(e),
                }
                return;
            }
            SessionCommand::Forward => {
                if let Err(e) = self.controller.forward() {
                    self.reject(e);
                }
                return;
            }
            SessionCommand::Reset => {
                self.controller.reset_board();
                self.emit(SessionEvent::BoardReset);
                return;
            }
            SessionCommand::Snapshot(reply) => {
                if reply.send(self.controller.view()).is_err() {
                    debug!("[SESSION] Snapshot requester went away");
                }
                return;
            }
            SessionCommand::Shutdown => return,
        };

        match started {
            Ok(call) => self.dispatch(call),
            Err(e) => self.reject(e),
        }
    }

    /// Run the call on its own task and route the reply back here
    fn dispatch(&self, call: ServiceCall) {
        self.emit(SessionEvent::RequestSent {
            token: call.token,
            kind: call.kind,
        });

        let service = Arc::clone(&self.service);
        let completions = self.completions.clone();
        tokio::spawn(async move {
            let reply = call.execute(service.as_ref()).await;
            let _ = completions.send(Completion {
                token: call.token,
                reply,
            });
        });
    }

    fn handle_completion(&mut self, completion: Completion) {
        match self.controller.complete(completion.token, completion.reply) {
            Ok(Outcome::MoveApplied(applied)) => self.emit(SessionEvent::MoveApplied(applied)),
            Ok(Outcome::Suggested(suggestion)) => self.emit(SessionEvent::Suggested(suggestion)),
            Ok(Outcome::Evaluated(evaluation)) => self.emit(SessionEvent::Evaluated(evaluation)),
            Ok(Outcome::LegalMoves(moves)) => self.emit(SessionEvent::LegalMoves(moves)),
            Err(e) if e.is_stale() => debug!("[SESSION] {}", e),
            Err(e) => self.reject(e),
        }
    }

    fn reject(&self, error: ControllerError) {
        self.emit(SessionEvent::Rejected(error.to_string()));
    }

    fn emit(&self, event: SessionEvent) {
        if self.events.send(event).is_err() {
            debug!("[SESSION] No one is listening for events");
        }
    }
}
