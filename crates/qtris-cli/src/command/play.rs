use std::path::PathBuf;

use qtris_agent::{TetrisQAgent, WeightStore};
use qtris_engine::PieceSeed;
use qtris_learning::AgentParams;

use crate::session::SessionLimits;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Weight file to play with; it is never written
    #[arg(long, default_value = "weights.json")]
    weights: PathBuf,
    /// Number of games to play
    #[arg(long, default_value_t = 1)]
    episodes: usize,
    /// Total tick budget over all games
    #[arg(long, default_value_t = 100_000)]
    max_ticks: usize,
    /// Piece sequence seed as 32 hex digits (random if omitted)
    #[arg(long)]
    seed: Option<PieceSeed>,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let store = WeightStore::new(&arg.weights);
    // greedy play has no randomness left to seed
    let mut agent = TetrisQAgent::with_seed(AgentParams::default().evaluation(), store, 0);
    if agent.weights().is_empty() {
        tracing::warn!(path = %arg.weights.display(), "playing without learned weights");
    }
    let limits = SessionLimits {
        episodes: arg.episodes,
        max_ticks: arg.max_ticks,
    };
    super::drive(&mut agent, arg.seed, limits)
}
