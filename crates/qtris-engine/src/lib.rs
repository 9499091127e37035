//! Falling-block puzzle simulation used as the learning environment.
//!
//! The crate is split in two layers:
//!
//! - [`core`] - board geometry: the labelled [`Grid`], [`Piece`] placement and the seven
//!   [`PieceKind`] shapes
//! - [`engine`] - game rules on top of the geometry: the [`Board`] engine (spawn, move,
//!   rotate, lock, line clear, scoring, phases) and the [`GameState`] transition machine
//!   consumed by the learning agent
//!
//! # Example
//!
//! ```
//! use qtris_engine::{Action, Board, GameState};
//!
//! let state = GameState::new(Board::new());
//! assert!(state.is_starting_menu());
//!
//! let state = state.generate_successor_state(Action::Restart);
//! assert!(state.is_game_running());
//! assert_eq!(state.history_len(), 2);
//! ```

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("piece colliding after move or rotation")]
pub struct PieceCollisionError;
