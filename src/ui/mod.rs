//! UI module - terminal front end
//!
//! - **commands**: parses one console line into a [`ConsoleCommand`]
//! - **render**: text rendering of the board, evaluation bar, grades and log
//! - **console**: stdin loop that drives a session and prints its events

pub mod commands;
pub mod console;
pub mod render;

pub use commands::{CommandError, ConsoleCommand, HELP};
pub use console::run_console;
