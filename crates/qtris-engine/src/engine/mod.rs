//! Game rules built on the [`core`](crate::core) geometry.
//!
//! - [`Board`] - the board engine: grid, active piece, counters, game phase and the
//!   individual rule steps (spawn, move, rotate, lock, line clear, drop, game over)
//! - [`GameState`] - immutable snapshot of a board plus its run [`History`]; one call to
//!   [`GameState::generate_successor_state`] is one tick
//! - [`Action`] - the decision vocabulary of the controller
//! - [`GameStats`] - score, level and line counters
//! - [`PieceBuffer`] / [`PieceSeed`] - seeded 7-bag piece generation

pub use self::{action::*, board::*, game_state::*, game_stats::*, history::*, piece_buffer::*};

mod action;
mod board;
mod game_state;
mod game_stats;
mod history;
mod piece_buffer;
