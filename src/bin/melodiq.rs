//! melodiq CLI - interactive human-in-the-loop melody training.
//!
//! Runs a console session: each step the current track is rendered and the
//! user is prompted for a rating (0-9), which drives one Q-learning update.
//! The learned Q-table is persisted per user id at session end.

use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use melodiq::{
    ScaleType,
    adapters::{JsonlObserver, MsgPackRepository, NullRenderer, ProgressObserver, StdinFeedback},
    app::AppBuilder,
    session::SessionConfig,
};

#[derive(Parser)]
#[command(name = "melodiq")]
#[command(version, about = "Human-in-the-loop melody evolution", long_about = None)]
struct Cli {
    /// User id keying the persisted Q-table
    #[arg(long, default_value = "000000")]
    user_id: String,

    /// Base MIDI note the scale is rooted at
    #[arg(long, default_value_t = 60)]
    base_note: u8,

    /// Scale type for the pitch pool; unknown names fall back to major
    #[arg(long, default_value = "major")]
    scale: String,

    /// Notes per freshly generated track
    #[arg(long, default_value_t = 8)]
    track_length: usize,

    /// Number of episodes to run
    #[arg(long, default_value_t = 10)]
    episodes: usize,

    /// Learning rate α
    #[arg(long, default_value_t = 0.1)]
    learning_rate: f64,

    /// Discount factor γ
    #[arg(long, default_value_t = 0.9)]
    discount_factor: f64,

    /// Initial exploration rate ε₀
    #[arg(long, default_value_t = 0.5)]
    epsilon: f64,

    /// Multiplicative exploration decay per episode
    #[arg(long, default_value_t = 0.01)]
    epsilon_decay: f64,

    /// Random seed for a reproducible session
    #[arg(long)]
    seed: Option<u64>,

    /// Directory holding persisted Q-tables
    #[arg(long, default_value = "q_tables")]
    store_dir: String,

    /// Write a JSONL session log to this path
    #[arg(long)]
    log: Option<String>,

    /// Resume from this user's previously saved Q-table, if any
    #[arg(long)]
    resume: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = SessionConfig::new(cli.user_id.as_str())
        .with_base_note(cli.base_note)
        .with_scale_type(ScaleType::parse_lossy(&cli.scale))
        .with_track_length(cli.track_length)
        .with_total_episodes(cli.episodes)
        .with_learning_rate(cli.learning_rate)
        .with_discount_factor(cli.discount_factor)
        .with_initial_epsilon(cli.epsilon)
        .with_epsilon_decay(cli.epsilon_decay);
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }

    let app = AppBuilder::new()
        .with_repository(MsgPackRepository::new(cli.store_dir.as_str()))
        .build();

    let mut session = app.create_session(
        config,
        Box::new(NullRenderer::new()),
        Box::new(StdinFeedback::new()),
    )?;

    if let Some(log_path) = &cli.log {
        session.add_observer(Box::new(JsonlObserver::new(log_path)?));
    }
    session.add_observer(Box::new(ProgressObserver::new()));

    if cli.resume {
        if session.try_resume()? {
            println!("Resumed Q-table for user {}", cli.user_id);
        } else {
            println!("No saved Q-table for user {}, starting fresh", cli.user_id);
        }
    }

    session.run(Duration::from_millis(33))?;

    println!(
        "Session complete: {} Q-values learned for user {}",
        session.q_table().size(),
        cli.user_id
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_scale_name_degrades_to_major() {
        // An unrecognized name must survive argument parsing and fall back
        // to major instead of aborting the session before it starts.
        let cli = Cli::try_parse_from(["melodiq", "--scale", "phrygian"]).unwrap();
        assert_eq!(ScaleType::parse_lossy(&cli.scale), ScaleType::Major);
    }

    #[test]
    fn test_known_scale_name_is_parsed() {
        let cli = Cli::try_parse_from(["melodiq", "--scale", "blues_minor"]).unwrap();
        assert_eq!(ScaleType::parse_lossy(&cli.scale), ScaleType::BluesMinor);
    }

    #[test]
    fn test_scale_defaults_to_major() {
        let cli = Cli::try_parse_from(["melodiq"]).unwrap();
        assert_eq!(ScaleType::parse_lossy(&cli.scale), ScaleType::Major);
    }
}
