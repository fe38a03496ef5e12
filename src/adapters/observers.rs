//! Observer adapters for session logging and progress display.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use crate::{
    Result,
    ports::SessionObserver,
    q_learning::{SelectionKind, StepReport},
    session::SessionConfig,
    track::Track,
};

/// One structured log record, written as a single JSON line.
#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum SessionEvent<'a> {
    SessionStart {
        config: &'a SessionConfig,
    },
    TrackRendered {
        episode: usize,
        step: usize,
        melody_len: usize,
        total_ticks: usize,
    },
    Rating {
        episode: usize,
        step: usize,
        rating: u8,
    },
    Step {
        episode: usize,
        step: usize,
        state: &'a str,
        action_kind: &'a str,
        action_index: usize,
        selection: SelectionKind,
        effective_epsilon: f64,
        previous_q: f64,
        updated_q: f64,
    },
    EpisodeEnd {
        episode: usize,
    },
    SessionEnd {
        table_size: usize,
    },
}

/// JSONL observer - appends one structured record per session event.
///
/// This is the session's durable log: configuration, every explore/exploit
/// decision with the chosen action, every Q-value update, and the episode
/// and session boundaries.
pub struct JsonlObserver {
    writer: BufWriter<File>,
}

impl JsonlObserver {
    /// Create a JSONL observer writing to `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    fn write_event(&mut self, event: &SessionEvent<'_>) -> Result<()> {
        serde_json::to_writer(&mut self.writer, event)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}

impl SessionObserver for JsonlObserver {
    fn on_session_start(&mut self, config: &SessionConfig) -> Result<()> {
        self.write_event(&SessionEvent::SessionStart { config })
    }

    fn on_track_rendered(&mut self, episode: usize, step: usize, track: &Track) -> Result<()> {
        self.write_event(&SessionEvent::TrackRendered {
            episode,
            step,
            melody_len: track.melody_len(),
            total_ticks: track.total_ticks(),
        })
    }

    fn on_rating(&mut self, episode: usize, step: usize, rating: u8) -> Result<()> {
        self.write_event(&SessionEvent::Rating {
            episode,
            step,
            rating,
        })
    }

    fn on_step(&mut self, episode: usize, step: usize, report: &StepReport) -> Result<()> {
        self.write_event(&SessionEvent::Step {
            episode,
            step,
            state: report.state.as_str(),
            action_kind: report.action.kind_name(),
            action_index: report.action.index(),
            selection: report.selection,
            effective_epsilon: report.effective_epsilon,
            previous_q: report.previous_q,
            updated_q: report.updated_q,
        })
    }

    fn on_episode_end(&mut self, episode: usize) -> Result<()> {
        self.write_event(&SessionEvent::EpisodeEnd { episode })
    }

    fn on_session_end(&mut self, table_size: usize) -> Result<()> {
        self.write_event(&SessionEvent::SessionEnd { table_size })?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Progress bar observer - shows episode progress during a session.
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    steps_seen: usize,
}

impl ProgressObserver {
    /// Create a new progress observer.
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            steps_seen: 0,
        }
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionObserver for ProgressObserver {
    fn on_session_start(&mut self, config: &SessionConfig) -> Result<()> {
        let pb = ProgressBar::new(config.total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_step(&mut self, _episode: usize, _step: usize, _report: &StepReport) -> Result<()> {
        self.steps_seen += 1;
        if let Some(pb) = &self.progress_bar {
            pb.set_message(format!("{} ratings", self.steps_seen));
        }
        Ok(())
    }

    fn on_episode_end(&mut self, episode: usize) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            // `episode` is the just-completed episode index.
            pb.set_position(episode as u64 + 1);
        }
        Ok(())
    }

    fn on_session_end(&mut self, table_size: usize) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(format!("{table_size} Q-values learned"));
        }
        Ok(())
    }
}
