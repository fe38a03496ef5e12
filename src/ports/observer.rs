//! Observer port - abstraction for session observation and logging.
//!
//! Observers receive every learning event in order, allowing composable
//! data collection (structured log files, progress bars, metrics) without
//! coupling the session loop to specific output formats.

use crate::{Result, q_learning::StepReport, session::SessionConfig, track::Track};

/// Observer trait for monitoring a human-in-the-loop session.
///
/// # Event Sequence
///
/// 1. `on_session_start(config)` - once, when the session starts
/// 2. For each step:
///    - `on_track_rendered(episode, step, track)`
///    - `on_rating(episode, step, rating)`
///    - `on_step(episode, step, report)` - after the Q update
/// 3. `on_episode_end(episode)` - at each episode boundary
/// 4. `on_session_end(table_size)` - once, before persistence
///
/// All methods default to no-ops; implement only what you need.
pub trait SessionObserver: Send {
    /// Called when a session starts, with the full configuration.
    fn on_session_start(&mut self, _config: &SessionConfig) -> Result<()> {
        Ok(())
    }

    /// Called after a track has been rendered and handed to playback.
    fn on_track_rendered(&mut self, _episode: usize, _step: usize, _track: &Track) -> Result<()> {
        Ok(())
    }

    /// Called when a valid human rating arrives.
    fn on_rating(&mut self, _episode: usize, _step: usize, _rating: u8) -> Result<()> {
        Ok(())
    }

    /// Called after each learning step, with the explore/exploit decision,
    /// the chosen action, and the Q-value change.
    fn on_step(&mut self, _episode: usize, _step: usize, _report: &StepReport) -> Result<()> {
        Ok(())
    }

    /// Called when an episode completes.
    fn on_episode_end(&mut self, _episode: usize) -> Result<()> {
        Ok(())
    }

    /// Called when the session completes, before the table is persisted.
    fn on_session_end(&mut self, _table_size: usize) -> Result<()> {
        Ok(())
    }
}
