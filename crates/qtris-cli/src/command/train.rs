use std::path::PathBuf;

use qtris_agent::{TetrisQAgent, WeightStore};
use qtris_engine::PieceSeed;
use qtris_learning::{AgentMode, AgentParams};

use crate::session::SessionLimits;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Weight file to start from and to update after every episode
    #[arg(long, default_value = "weights.json")]
    weights: PathBuf,
    /// Number of games to play
    #[arg(long, default_value_t = 10)]
    episodes: usize,
    /// Total tick budget over all games
    #[arg(long, default_value_t = 1_000_000)]
    max_ticks: usize,
    /// Learning rate
    #[arg(long, default_value_t = AgentParams::default().alpha, value_parser = super::parse_finite)]
    alpha: f32,
    /// Exploration rate
    #[arg(long, default_value_t = AgentParams::default().epsilon, value_parser = super::parse_probability)]
    epsilon: f32,
    /// Discount of the next state's value
    #[arg(long, default_value_t = AgentParams::default().discount, value_parser = super::parse_probability)]
    discount: f32,
    /// Bound on the magnitude of every weight
    #[arg(long, default_value_t = AgentParams::default().weight_limit, value_parser = super::parse_limit)]
    weight_limit: f32,
    /// Piece sequence seed as 32 hex digits (random if omitted)
    #[arg(long)]
    seed: Option<PieceSeed>,
    /// Seed of the exploration policy (random if omitted)
    #[arg(long)]
    explore_seed: Option<u64>,
}

impl TrainArg {
    pub(crate) fn agent_params(&self) -> AgentParams {
        AgentParams {
            alpha: self.alpha,
            epsilon: self.epsilon,
            discount: self.discount,
            weight_limit: self.weight_limit,
            mode: AgentMode::Training,
        }
    }
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let store = WeightStore::new(&arg.weights);
    let params = arg.agent_params();
    let mut agent = match arg.explore_seed {
        Some(seed) => TetrisQAgent::with_seed(params, store, seed),
        None => TetrisQAgent::new(params, store),
    };
    let limits = SessionLimits {
        episodes: arg.episodes,
        max_ticks: arg.max_ticks,
    };
    super::drive(&mut agent, arg.seed, limits)
}
