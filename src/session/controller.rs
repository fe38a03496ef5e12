//! Episode controller: the session state machine.
//!
//! Sequences render → feedback → learning-update steps across episodes,
//! driven by repeated [`SessionController::tick`] calls. The feedback wait
//! is a suspension point: a tick with no rating available leaves the machine
//! in `AwaitingFeedback`, so callers poll on a fixed cadence instead of
//! blocking.

use std::{sync::Arc, time::Duration};

use rand::{SeedableRng, rngs::StdRng};

use crate::{
    error::{Error, Result},
    ports::{FeedbackSource, MAX_RATING, QTableRepository, SessionObserver, TrackRenderer},
    q_learning::MelodyAgent,
    session::SessionConfig,
    track::{Track, TrackGenerator},
};

/// Phase of the session state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No active session yet.
    Idle,
    /// A track is ready and must be rendered and played.
    AwaitingRender,
    /// Playback has started; waiting for a human rating.
    AwaitingFeedback,
    /// A valid rating arrived; the next tick performs the learning update.
    Updating,
    /// An episode boundary was crossed; the next tick starts a fresh track
    /// or completes the session.
    EpisodeComplete,
    /// All episodes are done and the table has been persisted. Terminal.
    SessionComplete,
}

/// Controller owning one human-in-the-loop session end to end.
///
/// The controller owns the track, the agent (and with it the Q-table), and
/// the collaborator ports. Each `tick` performs exactly one transition,
/// which keeps the machine observable in tests and lets an interactive
/// front-end interleave its own work between ticks.
pub struct SessionController {
    config: SessionConfig,
    generator: TrackGenerator,
    agent: MelodyAgent,
    renderer: Box<dyn TrackRenderer>,
    feedback: Box<dyn FeedbackSource>,
    observers: Vec<Box<dyn SessionObserver>>,
    repository: Arc<dyn QTableRepository + Send + Sync>,
    phase: SessionPhase,
    track: Option<Track>,
    pending_rating: Option<u8>,
    episode: usize,
    step: usize,
    rng: StdRng,
}

impl SessionController {
    /// Create a controller for the given configuration and collaborators.
    pub fn new(
        config: SessionConfig,
        repository: Arc<dyn QTableRepository + Send + Sync>,
        renderer: Box<dyn TrackRenderer>,
        feedback: Box<dyn FeedbackSource>,
    ) -> Result<Self> {
        config.validate()?;

        let generator = TrackGenerator::new(config.base_note, config.scale_type);
        let mut agent = MelodyAgent::new(
            config.learning_rate,
            config.discount_factor,
            config.initial_epsilon,
            config.epsilon_decay,
        );
        // Agent and track generation draw from separate streams so action
        // sampling does not perturb track generation under a shared seed.
        let rng = match config.seed {
            Some(seed) => {
                agent = agent.with_seed(seed);
                StdRng::seed_from_u64(seed.wrapping_add(1))
            }
            None => StdRng::from_rng(&mut rand::rng()),
        };

        Ok(Self {
            config,
            generator,
            agent,
            renderer,
            feedback,
            observers: Vec::new(),
            repository,
            phase: SessionPhase::Idle,
            track: None,
            pending_rating: None,
            episode: 0,
            step: 0,
            rng,
        })
    }

    /// Register an observer. Observers are notified in registration order.
    pub fn add_observer(&mut self, observer: Box<dyn SessionObserver>) {
        self.observers.push(observer);
    }

    /// Replace the agent's Q-table with the one stored for this user.
    ///
    /// Returns `Ok(false)` when no record exists yet; a missing record is
    /// the normal first-session case, not a fault.
    pub fn try_resume(&mut self) -> Result<bool> {
        match self.repository.load(&self.config.user_id) {
            Ok(q_table) => {
                self.agent.replace_q_table(q_table);
                Ok(true)
            }
            Err(Error::UserNotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Start the session: generate the initial random track.
    pub fn start(&mut self) -> Result<()> {
        if self.phase != SessionPhase::Idle {
            return Err(Error::InvalidSessionState {
                operation: "start an already-started session".to_string(),
            });
        }

        for observer in &mut self.observers {
            observer.on_session_start(&self.config)?;
        }

        self.track = Some(
            self.generator
                .random_track(self.config.track_length, &mut self.rng)?,
        );
        self.phase = SessionPhase::AwaitingRender;
        Ok(())
    }

    /// Advance the state machine by one transition.
    pub fn tick(&mut self) -> Result<SessionPhase> {
        match self.phase {
            SessionPhase::Idle => {
                return Err(Error::InvalidSessionState {
                    operation: "tick before start".to_string(),
                });
            }
            SessionPhase::AwaitingRender => self.render_current_track()?,
            SessionPhase::AwaitingFeedback => self.poll_feedback()?,
            SessionPhase::Updating => self.apply_update()?,
            SessionPhase::EpisodeComplete => self.advance_episode()?,
            SessionPhase::SessionComplete => {}
        }
        Ok(self.phase)
    }

    /// Drive the session to completion, sleeping `poll_interval` between
    /// feedback polls that come back empty.
    pub fn run(&mut self, poll_interval: Duration) -> Result<()> {
        if self.phase == SessionPhase::Idle {
            self.start()?;
        }
        while self.phase != SessionPhase::SessionComplete {
            let before = self.phase;
            let after = self.tick()?;
            if before == SessionPhase::AwaitingFeedback && after == SessionPhase::AwaitingFeedback {
                std::thread::sleep(poll_interval);
            }
        }
        Ok(())
    }

    fn render_current_track(&mut self) -> Result<()> {
        let track = self.track.as_ref().ok_or(Error::InvalidSessionState {
            operation: "render without a current track".to_string(),
        })?;

        let handle = self.renderer.render(track, self.episode, self.step)?;
        self.renderer.play(&handle)?;

        for observer in &mut self.observers {
            observer.on_track_rendered(self.episode, self.step, track)?;
        }

        self.phase = SessionPhase::AwaitingFeedback;
        Ok(())
    }

    fn poll_feedback(&mut self) -> Result<()> {
        // Malformed input surfaces as None and out-of-range ratings are
        // dropped here; either way the machine stays in AwaitingFeedback
        // and no learning step happens.
        match self.feedback.poll()? {
            Some(rating) if rating <= MAX_RATING => {
                for observer in &mut self.observers {
                    observer.on_rating(self.episode, self.step, rating)?;
                }
                self.pending_rating = Some(rating);
                self.phase = SessionPhase::Updating;
            }
            _ => {}
        }
        Ok(())
    }

    fn apply_update(&mut self) -> Result<()> {
        let rating = self.pending_rating.take().ok_or(Error::InvalidSessionState {
            operation: "update without a pending rating".to_string(),
        })?;
        let track = self.track.as_ref().ok_or(Error::InvalidSessionState {
            operation: "update without a current track".to_string(),
        })?;

        let (next_track, report) =
            self.agent
                .observe_reward(&self.generator, track, rating, self.episode)?;

        for observer in &mut self.observers {
            observer.on_step(self.episode, self.step, &report)?;
        }

        self.track = Some(next_track);
        self.step += 1;

        if self.step >= self.config.track_length {
            self.step = 0;
            for observer in &mut self.observers {
                observer.on_episode_end(self.episode)?;
            }
            self.episode += 1;
            self.phase = SessionPhase::EpisodeComplete;
        } else {
            self.phase = SessionPhase::AwaitingRender;
        }
        Ok(())
    }

    fn advance_episode(&mut self) -> Result<()> {
        if self.episode >= self.config.total_episodes {
            self.complete_session()
        } else {
            // Each episode begins from a fresh random track.
            self.track = Some(
                self.generator
                    .random_track(self.config.track_length, &mut self.rng)?,
            );
            self.phase = SessionPhase::AwaitingRender;
            Ok(())
        }
    }

    /// Persist the table, then reload it as a round-trip validation of the
    /// stored record.
    fn complete_session(&mut self) -> Result<()> {
        for observer in &mut self.observers {
            observer.on_session_end(self.agent.q_table_size())?;
        }

        self.repository
            .save(&self.config.user_id, self.agent.q_table())?;
        let restored = self.repository.load(&self.config.user_id)?;
        self.agent.replace_q_table(restored);

        self.phase = SessionPhase::SessionComplete;
        Ok(())
    }

    /// Current phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Current episode index.
    pub fn episode(&self) -> usize {
        self.episode
    }

    /// Current step index within the episode.
    pub fn step(&self) -> usize {
        self.step
    }

    /// The track currently being evolved, if a session is active.
    pub fn current_track(&self) -> Option<&Track> {
        self.track.as_ref()
    }

    /// The agent's learned Q-table.
    pub fn q_table(&self) -> &crate::q_learning::QTable {
        self.agent.q_table()
    }

    /// The session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}
