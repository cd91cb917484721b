//! Gradeboard - a chessboard client that grades every move
//!
//! The board state lives on the client; move legality, grading and
//! evaluation come from an external HTTP engine service.
//!
//! - [`core`] - configuration, errors and logging
//! - [`game`] - FEN codec, move input, board resources and the controller
//! - [`networking`] - service client and readiness probe
//! - [`ui`] - terminal rendering and the console front end

pub mod core;
pub mod game;
pub mod networking;
pub mod ui;
