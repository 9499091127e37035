use chrono::Utc;
use clap::{Parser, Subcommand};
use qtris_agent::TetrisQAgent;
use qtris_engine::{Board, PieceSeed};
use rand::Rng as _;
use tracing::Level;
use tracing_subscriber::{filter::LevelFilter, prelude::*};

use crate::{
    input::LogDispatcher,
    session::{self, SessionLimits},
};

use self::{play::PlayArg, train::TrainArg};

mod play;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Increase log verbosity (-v: debug, -vv: trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Learn weights online while playing
    Train(#[clap(flatten)] TrainArg),
    /// Play greedily with frozen weights
    Play(#[clap(flatten)] PlayArg),
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(LevelFilter::from_level(level))
        .init();
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_logging(args.verbose);
    match args.mode {
        Mode::Train(arg) => train::run(&arg)?,
        Mode::Play(arg) => play::run(&arg)?,
    }
    Ok(())
}

/// Runs a session on a board seeded with `seed` (random if `None`) and reports the results.
fn drive(
    agent: &mut TetrisQAgent,
    seed: Option<PieceSeed>,
    limits: SessionLimits,
) -> anyhow::Result<()> {
    let seed = seed.unwrap_or_else(|| rand::rng().random());
    let started = Utc::now();
    tracing::info!(%seed, params = ?agent.params(), ?limits, "session started");

    let reports = session::run_session(agent, &mut LogDispatcher, Board::with_seed(seed), limits)?;

    let elapsed = Utc::now() - started;
    eprintln!();
    eprintln!("Started:  {}", started.format("%Y-%m-%d %H:%M:%S UTC"));
    eprintln!("Elapsed:  {:.1}s", elapsed.as_seconds_f64());
    eprintln!("Seed:     {seed}");
    eprintln!("Weights:  {} ({} features)", agent.store().path().display(), agent.weights().len());
    eprintln!("Updates:  {}", agent.update_count());
    eprintln!();
    session::print_reports(&reports);
    Ok(())
}

/// Parses a probability in `[0, 1]`.
fn parse_probability(s: &str) -> Result<f32, String> {
    let value: f32 = s.parse().map_err(|e| format!("{e}"))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{value} is not between 0 and 1"))
    }
}

/// Parses a finite number.
fn parse_finite(s: &str) -> Result<f32, String> {
    let value: f32 = s.parse().map_err(|e| format!("{e}"))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("{value} is not a finite number"))
    }
}

/// Parses a finite, non-negative bound.
fn parse_limit(s: &str) -> Result<f32, String> {
    let value = parse_finite(s)?;
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(format!("{value} is negative"))
    }
}
