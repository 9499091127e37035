use serde::{Deserialize, Serialize};

/// Whether the agent learns while it plays.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(rename_all = "camelCase")]
pub enum AgentMode {
    /// Explore with the configured epsilon and update weights after every transition.
    #[default]
    Training,
    /// Act greedily with frozen weights.
    Evaluation,
}

/// Hyperparameters of an [`ApproximateQAgent`](crate::ApproximateQAgent).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentParams {
    /// Learning rate.
    pub alpha: f32,
    /// Probability of taking a uniformly random legal action.
    pub epsilon: f32,
    /// Discount applied to the value of the next state.
    pub discount: f32,
    /// Weights are clamped to `[-weight_limit, weight_limit]` after every update.
    pub weight_limit: f32,
    pub mode: AgentMode,
}

impl Default for AgentParams {
    fn default() -> Self {
        Self {
            alpha: 0.7,
            epsilon: 1.0,
            discount: 0.0,
            weight_limit: 10_000.0,
            mode: AgentMode::Training,
        }
    }
}

impl AgentParams {
    /// Returns these parameters switched to evaluation mode.
    #[must_use]
    pub fn evaluation(self) -> Self {
        Self {
            mode: AgentMode::Evaluation,
            ..self
        }
    }

    /// Exploration rate in effect: zero in evaluation mode.
    #[must_use]
    pub fn effective_epsilon(&self) -> f32 {
        match self.mode {
            AgentMode::Training => self.epsilon,
            AgentMode::Evaluation => 0.0,
        }
    }

    /// Discount in effect: zero in evaluation mode.
    #[must_use]
    pub fn effective_discount(&self) -> f32 {
        match self.mode {
            AgentMode::Training => self.discount,
            AgentMode::Evaluation => 0.0,
        }
    }

    #[must_use]
    pub fn is_learning(&self) -> bool {
        self.mode.is_training()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = AgentParams::default();
        assert_eq!(params.alpha, 0.7);
        assert_eq!(params.epsilon, 1.0);
        assert_eq!(params.discount, 0.0);
        assert!(params.is_learning());
    }

    #[test]
    fn test_evaluation_disables_exploration() {
        let params = AgentParams {
            discount: 0.9,
            ..AgentParams::default()
        }
        .evaluation();
        assert_eq!(params.effective_epsilon(), 0.0);
        assert_eq!(params.effective_discount(), 0.0);
        assert!(!params.is_learning());
        // the configured values are kept for reporting
        assert_eq!(params.discount, 0.9);
    }

    #[test]
    fn test_json_uses_camel_case() {
        let json = serde_json::to_value(AgentParams::default()).unwrap();
        assert_eq!(json["weightLimit"], 10_000.0);
        assert_eq!(json["mode"], "training");
    }
}
