//! Interactive console front end
//!
//! Reads commands from stdin and prints session events as they arrive. Both
//! run on the same task through `tokio::select!`, so a reply that lands while
//! the user is typing is printed straight away.

use super::commands::{CommandError, ConsoleCommand, HELP};
use super::render;
use crate::game::session::{SessionEvent, SessionHandle};
use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

/// Run until `quit`, end of input, or the session closing
pub async fn run_console(
    handle: SessionHandle,
    mut events: mpsc::UnboundedReceiver<SessionEvent>,
) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", render::render_view(&handle.snapshot().await?));
    println!("Type 'help' for commands.");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if !handle_line(&handle, &line).await? {
                    break;
                }
            }
            event = events.recv() => {
                let Some(event) = event else { break };
                print_event(&handle, event).await?;
            }
        }
    }

    // The session may already be gone; nothing left to tell it.
    let _ = handle.shutdown().await;
    Ok(())
}

/// Returns `false` when the user asked to quit
async fn handle_line(handle: &SessionHandle, line: &str) -> Result<bool> {
    let command = match ConsoleCommand::parse(line) {
        Ok(command) => command,
        Err(CommandError::Empty) => return Ok(true),
        Err(e) => {
            println!("{}", e);
            return Ok(true);
        }
    };

    match command {
        ConsoleCommand::Move(input) => handle.submit_move(input).await?,
        ConsoleCommand::Drag { from, to } => handle.drag(from, to).await?,
        ConsoleCommand::Suggest => handle.suggest().await?,
        ConsoleCommand::Accept => handle.accept_suggestion().await?,
        ConsoleCommand::StepBack => handle.step_back().await?,
        ConsoleCommand::Forward => handle.forward().await?,
        ConsoleCommand::Reset => handle.reset().await?,
        ConsoleCommand::Eval => handle.evaluate().await?,
        ConsoleCommand::Moves => handle.legal_moves().await?,
        ConsoleCommand::Fen => println!("{}", handle.snapshot().await?.position),
        ConsoleCommand::Board => println!("{}", render::render_view(&handle.snapshot().await?)),
        ConsoleCommand::Grades => {
            println!("{}", render::render_grade_table(&handle.snapshot().await?.grades))
        }
        ConsoleCommand::Log => {
            println!("{}", render::render_move_log(&handle.snapshot().await?.move_log))
        }
        ConsoleCommand::Status => println!("{}", render::render_status(&handle.snapshot().await?)),
        ConsoleCommand::Help => println!("{}", HELP),
        ConsoleCommand::Quit => return Ok(false),
    }
    Ok(true)
}

async fn print_event(handle: &SessionHandle, event: SessionEvent) -> Result<()> {
    match event {
        SessionEvent::RequestSent { kind, .. } => println!("Asking the engine ({})...", kind),
        SessionEvent::MoveApplied(applied) => println!("{}", render::render_move_applied(&applied)),
        SessionEvent::Suggested(suggestion) => println!("{}", render::render_suggestion(&suggestion)),
        SessionEvent::Evaluated(evaluation) => println!(
            "{}",
            render::render_eval_bar(Some(&evaluation), render::EVAL_BAR_WIDTH)
        ),
        SessionEvent::LegalMoves(moves) => {
            println!("{} legal moves: {}", moves.len(), moves.join(" "))
        }
        SessionEvent::SteppedBack(_) | SessionEvent::BoardReset => {
            println!("{}", render::render_view(&handle.snapshot().await?))
        }
        SessionEvent::Rejected(message) => println!("{}", message),
    }
    Ok(())
}
