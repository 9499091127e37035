use anyhow::Context as _;
use qtris_agent::TetrisQAgent;
use qtris_engine::{Board, GameState};
use qtris_stats::summary::Summary;

use crate::input::KeyDispatcher;

#[derive(Debug, Clone, Copy)]
pub(crate) struct SessionLimits {
    /// Stop after this many finished games.
    pub(crate) episodes: usize,
    /// Stop after this many ticks in total.
    pub(crate) max_ticks: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EpisodeReport {
    pub(crate) episode: usize,
    pub(crate) score: usize,
    pub(crate) lines: usize,
    pub(crate) level: usize,
    pub(crate) pieces: usize,
    pub(crate) ticks: usize,
    /// `false` when the tick budget ran out before the game ended.
    pub(crate) game_over: bool,
}

impl EpisodeReport {
    fn new(episode: usize, state: &GameState, ticks: usize) -> Self {
        Self {
            episode,
            score: state.score(),
            lines: state.lines_removed(),
            level: state.level(),
            pieces: state.board().stats().completed_pieces(),
            ticks,
            game_over: state.is_terminal(),
        }
    }
}

/// Drives the agent over the board until the episode or tick budget is spent.
///
/// Every tick the agent chooses an action for the newest state, the action is sent to the
/// dispatcher and applied. A finished game closes the episode (persisting weights in
/// training mode) and the next one starts with a fresh history, so the agent restarts it.
pub(crate) fn run_session<D>(
    agent: &mut TetrisQAgent,
    dispatcher: &mut D,
    board: Board,
    limits: SessionLimits,
) -> anyhow::Result<Vec<EpisodeReport>>
where
    D: KeyDispatcher,
{
    let mut state = GameState::new(board);
    let mut reports = vec![];
    let mut ticks = 0;

    for _ in 0..limits.max_ticks {
        let action = agent.choose_action(&state);
        if state.is_terminal() {
            finish_episode(agent, &state, ticks, &mut reports)?;
            if reports.len() >= limits.episodes {
                return Ok(reports);
            }
            state = state.with_fresh_history();
            ticks = 0;
        }
        dispatcher.dispatch(action);
        state = state.generate_successor_state(action);
        ticks += 1;
    }

    if state.is_terminal() {
        // learn from the final transition before closing the episode
        agent.choose_action(&state);
        finish_episode(agent, &state, ticks, &mut reports)?;
    } else if state.is_game_running() {
        tracing::info!(ticks, "tick budget exhausted mid-game");
        finish_episode(agent, &state, ticks, &mut reports)?;
    }
    Ok(reports)
}

fn finish_episode(
    agent: &mut TetrisQAgent,
    state: &GameState,
    ticks: usize,
    reports: &mut Vec<EpisodeReport>,
) -> anyhow::Result<()> {
    agent.finish_episode(state).with_context(|| {
        format!(
            "Failed to save weights to {}",
            agent.store().path().display()
        )
    })?;
    reports.push(EpisodeReport::new(reports.len() + 1, state, ticks));
    Ok(())
}

/// Prints a per-episode table and score/line summaries to stderr.
#[expect(clippy::cast_precision_loss)]
pub(crate) fn print_reports(reports: &[EpisodeReport]) {
    eprintln!("Episode  Score  Lines  Level  Pieces   Ticks  End");
    for report in reports {
        eprintln!(
            "{:>7} {:>6} {:>6} {:>6} {:>7} {:>7}  {}",
            report.episode,
            report.score,
            report.lines,
            report.level,
            report.pieces,
            report.ticks,
            if report.game_over { "game over" } else { "tick limit" },
        );
    }

    let scores: Summary = reports.iter().map(|r| r.score as f32).collect();
    let lines: Summary = reports.iter().map(|r| r.lines as f32).collect();
    if let (Some(mean), Some(max), Some(std_dev)) = (scores.mean(), scores.max(), scores.std_dev())
    {
        eprintln!("Score: mean {mean:.1}, max {max:.0}, std dev {std_dev:.1}");
    }
    if let (Some(mean), Some(max)) = (lines.mean(), lines.max()) {
        eprintln!("Lines: mean {mean:.1}, max {max:.0}");
    }
}
