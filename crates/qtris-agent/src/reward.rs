use qtris_engine::GameState;
use qtris_learning::RewardFunction;

use crate::features::smoothness;

const LINE_BONUS: f32 = 100.0;
const NO_LINE_PENALTY: f32 = 1.0;
const LOW_SCORE_PENALTY: f32 = 10_000.0;
const SMOOTHER_BONUS: f32 = 100.0;
const FLAT_BONUS: f32 = 1_000_000.0;
const GAME_OVER_PENALTY: f32 = 12_345.0;

/// The parts of a game state the reward looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub score: f32,
    pub lines: f32,
    pub smoothness: f32,
    pub terminal: bool,
}

impl Observation {
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn of(state: &GameState) -> Self {
        Self {
            score: state.score() as f32,
            lines: state.lines_removed() as f32,
            smoothness: smoothness(state),
            terminal: state.is_terminal(),
        }
    }

    /// Reward for moving from `self` to `next`.
    ///
    /// ```text
    ///   Δscore
    /// + 100 · Δlines
    /// − 1 if no line was removed
    /// − 10000 / (next score + 1)
    /// + 100 if the surface got smoother
    /// + 1000000 if the surface is flat
    /// − 12345 if the game is over
    /// ```
    #[must_use]
    pub fn reward_to(&self, next: &Observation) -> f32 {
        let lines = next.lines - self.lines;
        let mut reward = next.score - self.score;
        reward += LINE_BONUS * lines;
        if lines == 0.0 {
            reward -= NO_LINE_PENALTY;
        }
        reward -= LOW_SCORE_PENALTY / (next.score + 1.0);
        if next.smoothness < self.smoothness {
            reward += SMOOTHER_BONUS;
        }
        if next.smoothness == 0.0 {
            reward += FLAT_BONUS;
        }
        if next.terminal {
            reward -= GAME_OVER_PENALTY;
        }
        reward
    }
}

/// Reward shaping for the falling-block game; see [`Observation::reward_to`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TetrisReward;

impl RewardFunction<GameState> for TetrisReward {
    fn reward(&self, state: &GameState, next_state: &GameState) -> f32 {
        Observation::of(state).reward_to(&Observation::of(next_state))
    }
}

#[cfg(test)]
mod tests {
    use qtris_engine::{Action, Board, PieceSeed};

    use super::*;

    #[test]
    fn test_line_clear_scenario() {
        let before = Observation {
            score: 100.0,
            lines: 0.0,
            smoothness: 2.0,
            terminal: false,
        };
        let after = Observation {
            score: 240.0,
            lines: 1.0,
            smoothness: 1.0,
            terminal: false,
        };
        // 140 + 100 - 10000 / 241 + 100
        assert!((before.reward_to(&after) - 298.506).abs() < 1e-2);
    }

    #[test]
    fn test_penalties() {
        let before = Observation {
            score: 0.0,
            lines: 0.0,
            smoothness: 1.0,
            terminal: false,
        };
        let stuck = Observation {
            smoothness: 1.5,
            ..before
        };
        assert!((before.reward_to(&stuck) - (-1.0 - 10_000.0)).abs() < 1e-3);

        let over = Observation {
            terminal: true,
            ..stuck
        };
        assert!((before.reward_to(&over) - (-1.0 - 10_000.0 - 12_345.0)).abs() < 1e-3);
    }

    #[test]
    fn test_flat_surface_bonus() {
        let state = GameState::new(Board::with_seed(PieceSeed::from_bytes([1; 16])));
        let next = state.generate_successor_state(Action::Restart);
        // score stays 0 and both surfaces are flat
        let expected = -1.0 - 10_000.0 + 1_000_000.0;
        assert!((TetrisReward.reward(&state, &next) - expected).abs() < 1e-1);
    }
}
