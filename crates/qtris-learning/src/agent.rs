use std::marker::PhantomData;

use rand::{Rng as _, SeedableRng as _, seq::IndexedRandom as _};
use rand_pcg::Pcg32;

use crate::{AgentParams, FeatureExtractor, QState, Weights};

/// Approximate Q-learning agent with a linear action-value function.
///
/// `Q(s, a) = Σ feature(s, a)[f] · weight[f]`, learned online with temporal-difference
/// updates:
///
/// ```text
/// δ = (reward + discount · V(s')) − Q(s, a)
/// weight[f] += alpha · δ · feature(s, a)[f]
/// ```
///
/// where `V(s') = max_a' Q(s', a')`, or 0 when `s'` has no legal actions. After each update
/// every weight is clamped to `±weight_limit` so that a run of large rewards cannot blow the
/// weights up.
#[derive(Debug, Clone)]
pub struct ApproximateQAgent<S, F> {
    extractor: F,
    weights: Weights,
    params: AgentParams,
    rng: Pcg32,
    update_count: u64,
    _state: PhantomData<fn(&S)>,
}

impl<S, F> ApproximateQAgent<S, F>
where
    S: QState,
    F: FeatureExtractor<S>,
{
    /// Creates an agent whose exploration is seeded from the thread-local RNG.
    #[must_use]
    pub fn new(extractor: F, weights: Weights, params: AgentParams) -> Self {
        Self::with_rng(extractor, weights, params, Pcg32::from_rng(&mut rand::rng()))
    }

    /// Like [`Self::new`], but with deterministic exploration.
    #[must_use]
    pub fn with_seed(extractor: F, weights: Weights, params: AgentParams, seed: u64) -> Self {
        Self::with_rng(extractor, weights, params, Pcg32::seed_from_u64(seed))
    }

    fn with_rng(extractor: F, weights: Weights, params: AgentParams, rng: Pcg32) -> Self {
        Self {
            extractor,
            weights,
            params,
            rng,
            update_count: 0,
            _state: PhantomData,
        }
    }

    #[must_use]
    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    #[must_use]
    pub fn params(&self) -> &AgentParams {
        &self.params
    }

    /// Number of weight updates performed so far.
    #[must_use]
    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    #[must_use]
    pub fn q_value(&self, state: &S, action: S::Action) -> f32 {
        let features = self.extractor.features(state, action);
        for (name, _) in features.iter().filter(|(_, value)| value.is_nan()) {
            tracing::debug!(feature = name, ?action, "skipping undefined feature");
        }
        self.weights.dot(&features)
    }

    /// Returns the best Q-value over the legal actions, or 0.0 if there are none.
    #[must_use]
    pub fn value(&self, state: &S) -> f32 {
        state
            .legal_actions()
            .iter()
            .map(|&action| self.q_value(state, action))
            .reduce(f32::max)
            .unwrap_or(0.0)
    }

    /// Returns the legal action with the highest Q-value.
    ///
    /// Ties go to the action listed first by [`QState::legal_actions`]. Returns `None` when
    /// there are no legal actions.
    #[must_use]
    pub fn best_action(&self, state: &S) -> Option<S::Action> {
        let mut best: Option<(S::Action, f32)> = None;
        for &action in state.legal_actions() {
            let q = self.q_value(state, action);
            if best.is_none_or(|(_, best_q)| q > best_q) {
                best = Some((action, q));
            }
        }
        best.map(|(action, _)| action)
    }

    /// Epsilon-greedy choice: a uniformly random legal action with probability epsilon,
    /// otherwise [`Self::best_action`].
    pub fn choose_action(&mut self, state: &S) -> Option<S::Action> {
        let legal_actions = state.legal_actions();
        if legal_actions.is_empty() {
            return None;
        }
        let epsilon = self.params.effective_epsilon();
        let epsilon = if epsilon.is_finite() {
            f64::from(epsilon).clamp(0.0, 1.0)
        } else {
            0.0
        };
        if self.rng.random_bool(epsilon) {
            return legal_actions.choose(&mut self.rng).copied();
        }
        self.best_action(state)
    }

    /// Performs one temporal-difference update for the observed transition.
    ///
    /// Does nothing in evaluation mode.
    pub fn update(&mut self, state: &S, action: S::Action, next_state: &S, reward: f32) {
        if !self.params.is_learning() {
            return;
        }

        let features = self.extractor.features(state, action);
        let target = reward + self.params.effective_discount() * self.value(next_state);
        let delta = target - self.weights.dot(&features);

        for (name, value) in features.iter().filter(|(_, value)| !value.is_nan()) {
            self.weights.adjust(name, self.params.alpha * delta * value);
        }
        self.weights.clip(self.params.weight_limit);
        self.update_count += 1;

        tracing::debug!(
            update = self.update_count,
            ?action,
            reward,
            delta,
            "temporal difference update"
        );
    }
}

#[cfg(test)]
mod tests {
    use crate::{AgentMode, FeatureVector};

    use super::*;

    /// A state offering a fixed list of numbered actions.
    struct Choice(Vec<u8>);

    impl QState for Choice {
        type Action = u8;

        fn legal_actions(&self) -> &[u8] {
            &self.0
        }
    }

    /// One indicator feature per action plus a bias.
    struct Indicator;

    impl FeatureExtractor<Choice> for Indicator {
        fn features(&self, _state: &Choice, action: u8) -> FeatureVector {
            [("bias".to_owned(), 1.0), (format!("a{action}"), 1.0)]
                .into_iter()
                .collect()
        }
    }

    fn agent(weights: Weights, params: AgentParams) -> ApproximateQAgent<Choice, Indicator> {
        ApproximateQAgent::with_seed(Indicator, weights, params, 7)
    }

    #[test]
    fn test_no_legal_actions() {
        let mut agent = agent(Weights::new(), AgentParams::default());
        let state = Choice(vec![]);
        assert_eq!(agent.value(&state), 0.0);
        assert_eq!(agent.best_action(&state), None);
        assert_eq!(agent.choose_action(&state), None);
    }

    #[test]
    fn test_q_value_is_dot_product() {
        let weights: Weights = [("bias", 0.5), ("a1", 2.0)].into_iter().collect();
        let agent = agent(weights, AgentParams::default());
        let state = Choice(vec![1, 2]);
        assert_eq!(agent.q_value(&state, 1), 2.5);
        assert_eq!(agent.q_value(&state, 2), 0.5);
        assert_eq!(agent.value(&state), 2.5);
    }

    #[test]
    fn test_best_action_and_ties() {
        let weights: Weights = [("a2", 1.0), ("a3", 1.0)].into_iter().collect();
        let agent = agent(weights, AgentParams::default());
        assert_eq!(agent.best_action(&Choice(vec![1, 2, 3])), Some(2));
        assert_eq!(agent.best_action(&Choice(vec![1, 3, 2])), Some(3));
        assert_eq!(agent.best_action(&Choice(vec![5, 4])), Some(5));
    }

    #[test]
    fn test_full_exploration_stays_legal() {
        let mut agent = agent(Weights::new(), AgentParams::default());
        let state = Choice(vec![3, 5, 8]);
        for _ in 0..100 {
            let action = agent.choose_action(&state).unwrap();
            assert!(state.0.contains(&action));
        }
        assert_eq!(agent.choose_action(&Choice(vec![9])), Some(9));
    }

    #[test]
    fn test_greedy_choice_without_exploration() {
        let weights: Weights = [("a4", 1.0)].into_iter().collect();
        let params = AgentParams {
            epsilon: 0.0,
            ..AgentParams::default()
        };
        let mut agent = agent(weights, params);
        for _ in 0..10 {
            assert_eq!(agent.choose_action(&Choice(vec![1, 4, 2])), Some(4));
        }
    }

    #[test]
    fn test_undefined_epsilon_acts_greedily() {
        let weights: Weights = [("a3", 1.0)].into_iter().collect();
        for epsilon in [f32::NAN, f32::INFINITY] {
            let params = AgentParams {
                epsilon,
                ..AgentParams::default()
            };
            let mut agent = agent(weights.clone(), params);
            for _ in 0..10 {
                assert_eq!(agent.choose_action(&Choice(vec![1, 3, 2])), Some(3));
            }
        }
    }

    #[test]
    fn test_update_moves_weights_along_features() {
        let params = AgentParams {
            alpha: 0.5,
            ..AgentParams::default()
        };
        let mut agent = agent(Weights::new(), params);
        let state = Choice(vec![1]);
        agent.update(&state, 1, &Choice(vec![]), 1.0);

        // delta = 1 - 0
        assert_eq!(agent.weights().get("bias"), 0.5);
        assert_eq!(agent.weights().get("a1"), 0.5);
        assert_eq!(agent.update_count(), 1);
    }

    #[test]
    fn test_update_uses_discounted_next_value() {
        let weights: Weights = [("a2", 4.0)].into_iter().collect();
        let params = AgentParams {
            alpha: 1.0,
            discount: 0.5,
            ..AgentParams::default()
        };
        let mut agent = agent(weights, params);
        agent.update(&Choice(vec![1]), 1, &Choice(vec![1, 2]), 0.0);

        // delta = 0 + 0.5 * 4 - 0 = 2
        assert_eq!(agent.weights().get("bias"), 2.0);
        assert_eq!(agent.weights().get("a1"), 2.0);
    }

    #[test]
    fn test_zero_delta_keeps_weights() {
        let weights: Weights = [("bias", 1.0), ("a1", 2.0)].into_iter().collect();
        let mut agent = agent(weights.clone(), AgentParams::default());
        agent.update(&Choice(vec![1]), 1, &Choice(vec![]), 3.0);
        assert_eq!(agent.weights(), &weights);
    }

    #[test]
    fn test_weights_are_clipped() {
        let params = AgentParams {
            alpha: 1.0,
            weight_limit: 10.0,
            ..AgentParams::default()
        };
        let mut agent = agent(Weights::new(), params);
        agent.update(&Choice(vec![1]), 1, &Choice(vec![]), -1_000.0);
        assert_eq!(agent.weights().get("bias"), -10.0);
        assert_eq!(agent.weights().get("a1"), -10.0);
    }

    #[test]
    fn test_evaluation_mode_is_greedy_and_frozen() {
        let weights: Weights = [("a2", 1.0)].into_iter().collect();
        let params = AgentParams {
            mode: AgentMode::Evaluation,
            ..AgentParams::default()
        };
        let mut agent = agent(weights.clone(), params);
        let state = Choice(vec![1, 2, 3]);
        for _ in 0..10 {
            assert_eq!(agent.choose_action(&state), Some(2));
        }
        agent.update(&state, 1, &state, 100.0);
        assert_eq!(agent.weights(), &weights);
        assert_eq!(agent.update_count(), 0);
    }
}
