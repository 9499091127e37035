//! Q-learning controller for the qtris game.
//!
//! [`TetrisQAgent`] plugs the game into the generic
//! [`ApproximateQAgent`](qtris_learning::ApproximateQAgent): it supplies the
//! [`TetrisFeatures`] extractor and the [`TetrisReward`] function, learns from each observed
//! tick and keeps its weights in a JSON [`WeightStore`].
//!
//! # Example
//!
//! ```no_run
//! use qtris_agent::{TetrisQAgent, WeightStore};
//! use qtris_engine::{Board, GameState};
//! use qtris_learning::AgentParams;
//!
//! let mut agent = TetrisQAgent::new(AgentParams::default(), WeightStore::new("weights.json"));
//! let mut state = GameState::new(Board::new());
//! for _ in 0..1000 {
//!     let action = agent.choose_action(&state);
//!     state = state.generate_successor_state(action);
//! }
//! agent.finish_episode(&state)?;
//! # Ok::<(), qtris_agent::WeightStoreError>(())
//! ```

pub use self::{agent::*, features::*, reward::*, store::*};

mod agent;
mod features;
mod reward;
mod store;
