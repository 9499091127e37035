use qtris_engine::{Action, GameState};
use qtris_learning::{AgentParams, ApproximateQAgent, RewardFunction as _, Weights};

use crate::{TetrisFeatures, TetrisReward, WeightStore, WeightStoreError};

/// The game-playing Q-learning agent.
///
/// Call [`Self::choose_action`] once per tick with the newest state. The agent learns from
/// the transition that produced that state before it decides, so the driver never has to
/// report rewards itself. Asking again about the same state does not learn twice. At the end
/// of a game call [`Self::finish_episode`] to persist the weights.
#[derive(Debug)]
pub struct TetrisQAgent {
    agent: ApproximateQAgent<GameState, TetrisFeatures>,
    reward: TetrisReward,
    store: WeightStore,
    episodes: usize,
    last_observed: Option<GameState>,
}

impl TetrisQAgent {
    /// Creates an agent with the weights found in `store` (empty if there are none).
    #[must_use]
    pub fn new(params: AgentParams, store: WeightStore) -> Self {
        let weights = store.load();
        Self::from_parts(ApproximateQAgent::new(TetrisFeatures, weights, params), store)
    }

    /// Like [`Self::new`], but with deterministic exploration.
    #[must_use]
    pub fn with_seed(params: AgentParams, store: WeightStore, seed: u64) -> Self {
        let weights = store.load();
        Self::from_parts(
            ApproximateQAgent::with_seed(TetrisFeatures, weights, params, seed),
            store,
        )
    }

    /// Creates an agent with the given weights, ignoring what `store` currently holds.
    #[must_use]
    pub fn with_weights(params: AgentParams, store: WeightStore, weights: Weights, seed: u64) -> Self {
        Self::from_parts(
            ApproximateQAgent::with_seed(TetrisFeatures, weights, params, seed),
            store,
        )
    }

    fn from_parts(agent: ApproximateQAgent<GameState, TetrisFeatures>, store: WeightStore) -> Self {
        tracing::debug!(params = ?agent.params(), weights = agent.weights().len(), "agent ready");
        Self {
            agent,
            reward: TetrisReward,
            store,
            episodes: 0,
            last_observed: None,
        }
    }

    /// Learns from the last transition, then picks the action for `state`.
    ///
    /// The transition into `state` is learned from only when its source was a running game
    /// and the agent is in training mode. Outside a running game, and on the first
    /// observation of a run, the answer is always [`Action::Restart`].
    pub fn choose_action(&mut self, state: &GameState) -> Action {
        let repeated = self
            .last_observed
            .as_ref()
            .is_some_and(|observed| observed.ptr_eq(state));
        if !repeated
            && let Some(previous) = state.previous()
            && previous.is_game_running()
            && let Some(action) = state.incoming_action()
        {
            let reward = self.reward.reward(&previous, state);
            self.agent.update(&previous, action, state, reward);
        }
        self.last_observed = Some(state.clone());

        if state.is_first_observation() || !state.is_game_running() {
            return Action::Restart;
        }
        self.agent.choose_action(state).unwrap_or(Action::Restart)
    }

    /// Closes an episode: counts it and persists the weights.
    ///
    /// Nothing is written in evaluation mode, since the weights cannot have changed.
    pub fn finish_episode(&mut self, state: &GameState) -> Result<(), WeightStoreError> {
        self.episodes += 1;
        tracing::info!(
            episode = self.episodes,
            score = state.score(),
            lines = state.lines_removed(),
            ticks = state.history_len() - 1,
            updates = self.agent.update_count(),
            "episode finished"
        );
        if self.agent.params().is_learning() {
            self.store.save(self.agent.weights())?;
        }
        Ok(())
    }

    #[must_use]
    pub fn weights(&self) -> &Weights {
        self.agent.weights()
    }

    #[must_use]
    pub fn params(&self) -> &AgentParams {
        self.agent.params()
    }

    #[must_use]
    pub fn episodes(&self) -> usize {
        self.episodes
    }

    #[must_use]
    pub fn update_count(&self) -> u64 {
        self.agent.update_count()
    }

    #[must_use]
    pub fn store(&self) -> &WeightStore {
        &self.store
    }

    /// Q-value of an action under the current weights.
    #[must_use]
    pub fn q_value(&self, state: &GameState, action: Action) -> f32 {
        self.agent.q_value(state, action)
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::PathBuf};

    use qtris_engine::{Board, PieceSeed};
    use qtris_learning::AgentMode;

    use super::*;

    const SEED: PieceSeed = PieceSeed::from_bytes([9; 16]);
    const LOOP_SEED: PieceSeed = PieceSeed::from_bytes([0x5a; 16]);

    fn temp_weights(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("qtris-agent-{}-{name}.json", std::process::id()))
    }

    fn step(agent: &mut TetrisQAgent, state: &GameState) -> GameState {
        let action = agent.choose_action(state);
        state.generate_successor_state(action)
    }

    fn store() -> WeightStore {
        WeightStore::new(std::env::temp_dir().join(format!(
            "qtris-agent-unit-{}-never-written.json",
            std::process::id()
        )))
    }

    fn agent(params: AgentParams) -> TetrisQAgent {
        TetrisQAgent::with_weights(params, store(), Weights::new(), 5)
    }

    #[test]
    fn test_first_observation_restarts() {
        let mut agent = agent(AgentParams::default());
        let state = GameState::new(Board::with_seed(SEED));
        assert_eq!(agent.choose_action(&state), Action::Restart);
        assert_eq!(agent.update_count(), 0);
    }

    #[test]
    fn test_no_update_from_starting_menu() {
        let mut agent = agent(AgentParams::default());
        let state = GameState::new(Board::with_seed(SEED)).generate_successor_state(Action::Restart);
        assert!(state.is_game_running());

        let action = agent.choose_action(&state);
        assert!(Action::LEGAL.contains(&action));
        assert_eq!(agent.update_count(), 0);
    }

    #[test]
    fn test_learns_from_running_transitions() {
        let mut agent = agent(AgentParams::default());
        let mut state = GameState::new(Board::with_seed(SEED)).generate_successor_state(Action::Restart);
        for _ in 0..5 {
            let action = agent.choose_action(&state);
            state = state.generate_successor_state(action);
        }
        assert_eq!(agent.update_count(), 4);
        assert!(!agent.weights().is_empty());
        assert!(agent.weights().iter().all(|(_, w)| w.abs() <= 10_000.0));
    }

    #[test]
    fn test_running_game_first_observation_restarts() {
        let mut agent = agent(AgentParams::default());
        let state = GameState::new(Board::with_seed(SEED))
            .generate_successor_state(Action::Restart)
            .with_fresh_history();
        assert_eq!(agent.choose_action(&state), Action::Restart);
    }

    #[test]
    fn test_evaluation_neither_learns_nor_writes() {
        let params = AgentParams {
            mode: AgentMode::Evaluation,
            ..AgentParams::default()
        };
        let mut agent = agent(params);
        let mut state = GameState::new(Board::with_seed(SEED)).generate_successor_state(Action::Restart);
        for _ in 0..5 {
            let action = agent.choose_action(&state);
            state = state.generate_successor_state(action);
        }
        assert_eq!(agent.update_count(), 0);

        agent.finish_episode(&state).unwrap();
        assert_eq!(agent.episodes(), 1);
        assert!(!agent.store().path().exists());
    }

    #[test]
    fn test_repeated_observation_learns_once() {
        let mut agent = agent(AgentParams::default());
        let start = GameState::new(Board::with_seed(SEED)).generate_successor_state(Action::Restart);
        let state = start.generate_successor_state(Action::Down);

        agent.choose_action(&state);
        assert_eq!(agent.update_count(), 1);
        let weights = agent.weights().clone();
        agent.choose_action(&state);
        agent.choose_action(&state.clone());
        assert_eq!(agent.update_count(), 1);
        assert_eq!(agent.weights(), &weights);

        // an equal state reached again is a new observation
        let replayed = start.generate_successor_state(Action::Down);
        agent.choose_action(&replayed);
        assert_eq!(agent.update_count(), 2);
    }

    #[test]
    fn test_episode_persists_weights() {
        let path = temp_weights("persist");
        let _ = fs::remove_file(&path);

        let mut agent = TetrisQAgent::with_seed(AgentParams::default(), WeightStore::new(&path), 1);
        assert!(agent.weights().is_empty());

        let mut state = GameState::new(Board::with_seed(LOOP_SEED));
        for _ in 0..300 {
            state = step(&mut agent, &state);
        }
        assert!(agent.update_count() > 0);
        agent.finish_episode(&state).unwrap();
        assert_eq!(agent.episodes(), 1);

        let stored: Weights = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(&stored, agent.weights());

        let reloaded = TetrisQAgent::with_seed(AgentParams::default(), WeightStore::new(&path), 2);
        assert_eq!(reloaded.weights(), agent.weights());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_play_until_game_over_and_restart() {
        let path = temp_weights("game-over");
        let mut agent =
            TetrisQAgent::with_weights(AgentParams::default(), WeightStore::new(&path), Weights::new(), 3);

        let mut state = GameState::new(Board::with_seed(LOOP_SEED));
        let mut ticks = 0;
        while !state.is_terminal() {
            assert!(ticks < 100_000, "game did not end");
            state = step(&mut agent, &state);
            ticks += 1;
        }
        let updates = agent.update_count();
        assert!(updates > 0);

        // the transition into game over is still learned from; afterwards only restarts
        assert_eq!(agent.choose_action(&state), Action::Restart);
        assert_eq!(agent.update_count(), updates + 1);
        let menu = state.generate_successor_state(Action::Restart);
        assert!(menu.is_starting_menu());
        assert_eq!(agent.choose_action(&menu), Action::Restart);
        assert_eq!(agent.update_count(), updates + 1);

        agent.finish_episode(&state).unwrap();
        let state = state.with_fresh_history();
        let menu = step(&mut agent, &state);
        assert!(menu.is_starting_menu());
        let running = step(&mut agent, &menu);
        assert!(running.is_game_running());
        assert_eq!(running.score(), 0);

        fs::remove_file(&path).unwrap();
    }
}
