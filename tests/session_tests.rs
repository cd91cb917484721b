//! Session Actor Tests
//!
//! Commands go through a `SessionHandle`; replies arrive as events once the
//! spawned service call finishes.

mod common;

use common::{move_response, suggest_response, ScriptedEngine, AFTER_E4};
use gradeboard::game::resources::Grade;
use gradeboard::game::{
    spawn_session, ControllerState, MoveController, RequestKind, SessionError, SessionEvent,
};
use gradeboard::networking::{EngineService, ReadinessFlag};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Notify};
use tokio::time::timeout;

async fn next_event(events: &mut mpsc::UnboundedReceiver<SessionEvent>) -> SessionEvent {
    timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("Event should arrive in time")
        .expect("Session should still be running")
}

#[tokio::test]
async fn test_move_round_trip_through_session() {
    let engine = Arc::new(ScriptedEngine::new());
    engine.push_move(Ok(move_response(AFTER_E4, "e2e4", "Good")));
    let service: Arc<dyn EngineService> = engine.clone();
    let controller = MoveController::new(ReadinessFlag::new(true));
    let (handle, mut events, task) = spawn_session(controller, service);

    handle.submit_move("e2e4").await.unwrap();

    assert!(matches!(
        next_event(&mut events).await,
        SessionEvent::RequestSent {
            kind: RequestKind::Move,
            ..
        }
    ));
    match next_event(&mut events).await {
        SessionEvent::MoveApplied(applied) => {
            assert_eq!(applied.grade, Grade::Good);
            assert_eq!(applied.position.as_str(), AFTER_E4);
        }
        other => panic!("Expected MoveApplied, got {other:?}"),
    }

    let view = handle.snapshot().await.unwrap();
    assert_eq!(view.history_depth, 1);
    assert_eq!(view.state, ControllerState::Idle);

    handle.shutdown().await.unwrap();
    task.await.unwrap();
}

#[tokio::test]
async fn test_second_command_while_waiting_is_rejected() {
    let gate = Arc::new(Notify::new());
    let engine = Arc::new(ScriptedEngine::gated(gate.clone()));
    engine.push_move(Ok(move_response(AFTER_E4, "e2e4", "Good")));
    let service: Arc<dyn EngineService> = engine.clone();
    let controller = MoveController::new(ReadinessFlag::new(true));
    let (handle, mut events, _task) = spawn_session(controller, service);

    handle.submit_move("e2e4").await.unwrap();
    assert!(matches!(next_event(&mut events).await, SessionEvent::RequestSent { .. }));

    handle.suggest().await.unwrap();
    match next_event(&mut events).await {
        SessionEvent::Rejected(message) => assert!(message.contains("Still waiting")),
        other => panic!("Expected Rejected, got {other:?}"),
    }
    assert!(matches!(
        handle.snapshot().await.unwrap().state,
        ControllerState::AwaitingService { .. }
    ));

    gate.notify_one();
    assert!(matches!(next_event(&mut events).await, SessionEvent::MoveApplied(_)));
    assert_eq!(engine.calls(), 1);
}

#[tokio::test]
async fn test_reply_after_reset_is_dropped() {
    //! Reset while a move is in flight: the late reply must not touch the
    //! fresh board.

    let gate = Arc::new(Notify::new());
    let engine = Arc::new(ScriptedEngine::gated(gate.clone()));
    engine.push_move(Ok(move_response(AFTER_E4, "e2e4", "Good")));
    let service: Arc<dyn EngineService> = engine.clone();
    let controller = MoveController::new(ReadinessFlag::new(true));
    let (handle, mut events, _task) = spawn_session(controller, service);

    handle.submit_move("e2e4").await.unwrap();
    assert!(matches!(next_event(&mut events).await, SessionEvent::RequestSent { .. }));
    handle.reset().await.unwrap();
    assert_eq!(next_event(&mut events).await, SessionEvent::BoardReset);

    gate.notify_one();
    // Give the late reply time to reach the actor
    tokio::time::sleep(Duration::from_millis(100)).await;

    let view = handle.snapshot().await.unwrap();
    assert!(view.position.is_start());
    assert_eq!(view.history_depth, 0);
    assert!(view.grades.is_empty());
    assert_eq!(view.state, ControllerState::Idle);
    assert!(events.try_recv().is_err(), "Stale reply must not emit an event");
}

#[tokio::test]
async fn test_unready_and_local_errors_become_rejections() {
    let engine = Arc::new(ScriptedEngine::new());
    let service: Arc<dyn EngineService> = engine.clone();
    let readiness = ReadinessFlag::new(false);
    let controller = MoveController::new(readiness.clone());
    let (handle, mut events, _task) = spawn_session(controller, service);

    handle.submit_move("e2e4").await.unwrap();
    match next_event(&mut events).await {
        SessionEvent::Rejected(message) => assert!(message.contains("not ready")),
        other => panic!("Expected Rejected, got {other:?}"),
    }

    handle.step_back().await.unwrap();
    assert!(matches!(next_event(&mut events).await, SessionEvent::Rejected(_)));
    handle.forward().await.unwrap();
    assert!(matches!(next_event(&mut events).await, SessionEvent::Rejected(_)));
    assert_eq!(engine.calls(), 0);
}

#[tokio::test]
async fn test_suggest_and_accept_through_session() {
    let engine = Arc::new(ScriptedEngine::new());
    engine.push_suggestion(Ok(suggest_response("e4")));
    engine.push_move(Ok(move_response(AFTER_E4, "e4", "Sigma")));
    let service: Arc<dyn EngineService> = engine.clone();
    let controller = MoveController::new(ReadinessFlag::new(true));
    let (handle, mut events, _task) = spawn_session(controller, service);

    handle.suggest().await.unwrap();
    next_event(&mut events).await;
    match next_event(&mut events).await {
        SessionEvent::Suggested(suggestion) => assert_eq!(suggestion.best_move, "e4"),
        other => panic!("Expected Suggested, got {other:?}"),
    }

    handle.accept_suggestion().await.unwrap();
    next_event(&mut events).await;
    assert!(matches!(next_event(&mut events).await, SessionEvent::MoveApplied(_)));
    assert_eq!(engine.submitted()[0].1, "e4");
}

#[tokio::test]
async fn test_handle_reports_closed_session() {
    let service: Arc<dyn EngineService> = Arc::new(ScriptedEngine::new());
    let (handle, _events, task) = spawn_session(MoveController::default(), service);

    handle.shutdown().await.unwrap();
    task.await.unwrap();

    assert_eq!(handle.snapshot().await.unwrap_err(), SessionError::Closed);
}
