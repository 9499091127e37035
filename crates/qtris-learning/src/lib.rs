//! Online approximate Q-learning with a linear action-value function.
//!
//! The learner never sees states directly: a [`FeatureExtractor`] turns every
//! (state, action) pair into a sparse, named [`FeatureVector`], and the Q-value is the dot
//! product of that vector with the learned [`Weights`]. The state type only has to say which
//! actions are legal ([`QState`]).
//!
//! - [`ApproximateQAgent`] - Q-values, state values, epsilon-greedy choice and TD updates
//! - [`AgentParams`] - learning rate, exploration rate, discount and weight bound
//! - [`RewardFunction`] - reward of an observed transition, supplied by concrete agents

use std::fmt::Debug;

pub use self::{agent::*, feature::*, params::*, weights::*};

mod agent;
mod feature;
mod params;
mod weights;

/// A state the agent can act in.
pub trait QState {
    type Action: Copy + PartialEq + Debug;

    /// Returns the actions available in this state, in tie-breaking order.
    ///
    /// An empty slice means no decision can be taken (for example a terminal state).
    fn legal_actions(&self) -> &[Self::Action];
}

/// Maps a (state, action) pair to named feature values.
pub trait FeatureExtractor<S: QState> {
    fn features(&self, state: &S, action: S::Action) -> FeatureVector;
}

/// Reward for the transition from `state` to `next_state`.
pub trait RewardFunction<S> {
    fn reward(&self, state: &S, next_state: &S) -> f32;
}
