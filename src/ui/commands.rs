//! Console command parsing
//!
//! One command per line. Anything that is not a command word is taken as a
//! move, so typing `e2e4` or `Nf3` on its own submits it.

use crate::game::moves::{MoveError, Square};
use thiserror::Error;

pub const HELP: &str = "\
Commands:
  move <move>        submit a move (e2e4, e7e8q, Nf3, O-O); bare moves work too
  drag <from> <to>   drag the piece on <from> to <to>
  suggest            ask the engine for the best move
  accept             play the last suggestion
  undo | back        step back one position
  forward            step forward (not available)
  reset              back to the start position
  fen                print the current FEN
  board              redraw the board
  grades             show the grade table
  log                show the move log
  eval               re-evaluate the current position
  moves              list legal moves
  status             engine readiness and pending request
  help               this text
  quit               exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Move(String),
    Drag { from: Square, to: Square },
    Suggest,
    Accept,
    StepBack,
    Forward,
    Reset,
    Fen,
    Board,
    Grades,
    Log,
    Eval,
    Moves,
    Status,
    Help,
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Nothing entered")]
    Empty,

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("{0}")]
    InvalidSquare(#[from] MoveError),
}

impl ConsoleCommand {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Err(CommandError::Empty);
        };
        let rest: Vec<&str> = words.collect();

        let command = match head.to_ascii_lowercase().as_str() {
            "move" | "m" => {
                if rest.is_empty() {
                    return Err(CommandError::Usage("move <move>"));
                }
                ConsoleCommand::Move(rest.join(" "))
            }
            "drag" => match rest.as_slice() {
                [from, to] => ConsoleCommand::Drag {
                    from: Square::parse(from)?,
                    to: Square::parse(to)?,
                },
                _ => return Err(CommandError::Usage("drag <from> <to>")),
            },
            "suggest" | "hint" => ConsoleCommand::Suggest,
            "accept" => ConsoleCommand::Accept,
            "undo" | "back" => ConsoleCommand::StepBack,
            "forward" => ConsoleCommand::Forward,
            "reset" => ConsoleCommand::Reset,
            "fen" => ConsoleCommand::Fen,
            "board" => ConsoleCommand::Board,
            "grades" => ConsoleCommand::Grades,
            "log" => ConsoleCommand::Log,
            "eval" => ConsoleCommand::Eval,
            "moves" => ConsoleCommand::Moves,
            "status" => ConsoleCommand::Status,
            "help" | "?" => ConsoleCommand::Help,
            "quit" | "exit" | "q" => ConsoleCommand::Quit,
            _ => ConsoleCommand::Move(line.trim().to_string()),
        };
        Ok(command)
    }
}
