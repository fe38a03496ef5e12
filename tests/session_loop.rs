//! End-to-end session loop tests.
//!
//! Drives the controller tick by tick with scripted feedback and asserts
//! the state machine, counter, and Q-table behavior of a full session.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use melodiq::{
    Action, Result, SelectionKind, SessionConfig, SessionPhase, StateKey, StepReport, UserId,
    adapters::{InMemoryRepository, QueuedFeedback, RecordingRenderer},
    app::App,
    ports::{QTableRepository, SessionObserver},
};

/// Observer counting learning steps and recording what was selected.
#[derive(Clone, Default)]
struct CountingObserver {
    updates: Arc<AtomicUsize>,
    episodes_ended: Arc<AtomicUsize>,
    selections: Arc<Mutex<Vec<SelectionKind>>>,
    written_pairs: Arc<Mutex<Vec<(StateKey, Action)>>>,
}

impl SessionObserver for CountingObserver {
    fn on_step(&mut self, _episode: usize, _step: usize, report: &StepReport) -> Result<()> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.selections.lock().unwrap().push(report.selection);
        self.written_pairs
            .lock()
            .unwrap()
            .push((report.state.clone(), report.action));
        Ok(())
    }

    fn on_episode_end(&mut self, _episode: usize) -> Result<()> {
        self.episodes_ended.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn test_config() -> SessionConfig {
    SessionConfig::new("test_user")
        .with_track_length(4)
        .with_total_episodes(1)
        .with_seed(42)
}

#[test]
fn test_single_episode_session_end_to_end() {
    let repository = InMemoryRepository::new();
    let app = App::for_testing()
        .with_repository(repository.clone())
        .build();

    let renderer = RecordingRenderer::new();
    let counting = CountingObserver::default();

    let mut session = app
        .create_session(
            test_config(),
            Box::new(renderer.clone()),
            Box::new(QueuedFeedback::new([7, 3, 9, 5])),
        )
        .unwrap();
    session.add_observer(Box::new(counting.clone()));

    session.start().unwrap();
    assert_eq!(session.phase(), SessionPhase::AwaitingRender);

    let mut ticks = 0;
    while session.phase() != SessionPhase::SessionComplete {
        session.tick().unwrap();
        ticks += 1;
        assert!(ticks < 100, "session did not complete");
    }

    // Exactly one update per rating.
    assert_eq!(counting.updates.load(Ordering::SeqCst), 4);
    assert_eq!(counting.episodes_ended.load(Ordering::SeqCst), 1);

    // Episode 0 forces exploration on every step.
    let selections = counting.selections.lock().unwrap();
    assert!(
        selections
            .iter()
            .all(|&selection| selection == SelectionKind::Explored)
    );

    // Counters: step reset to 0, episode advanced past the last one.
    assert_eq!(session.step(), 0);
    assert_eq!(session.episode(), 1);

    // The table holds exactly the (state, action) pairs the steps touched.
    let written_pairs = counting.written_pairs.lock().unwrap();
    assert_eq!(written_pairs.len(), 4);
    let unique_pairs: std::collections::HashSet<_> = written_pairs.iter().collect();
    assert_eq!(session.q_table().size(), unique_pairs.len());

    // Every step rendered the track before asking for a rating.
    assert_eq!(renderer.rendered().len(), 4);
    assert_eq!(renderer.played().len(), 4);

    // The table was persisted for the session's user at completion.
    let stored = repository.load(&UserId::new("test_user")).unwrap();
    assert_eq!(&stored, session.q_table());
}

#[test]
fn test_missing_rating_leaves_session_waiting() {
    let app = App::for_testing()
        .with_repository(InMemoryRepository::new())
        .build();

    let mut session = app
        .create_session(
            test_config(),
            Box::new(RecordingRenderer::new()),
            Box::new(QueuedFeedback::new([])),
        )
        .unwrap();

    session.start().unwrap();
    session.tick().unwrap();
    assert_eq!(session.phase(), SessionPhase::AwaitingFeedback);

    // No rating available: the machine stays put, no learning happens.
    for _ in 0..5 {
        assert_eq!(session.tick().unwrap(), SessionPhase::AwaitingFeedback);
    }
    assert_eq!(session.q_table().size(), 0);
    assert_eq!(session.step(), 0);
}

#[test]
fn test_out_of_range_rating_is_ignored() {
    let app = App::for_testing()
        .with_repository(InMemoryRepository::new())
        .build();

    let mut session = app
        .create_session(
            test_config(),
            Box::new(RecordingRenderer::new()),
            Box::new(QueuedFeedback::new([42, 7])),
        )
        .unwrap();

    session.start().unwrap();
    session.tick().unwrap();

    // 42 is outside 0..=9 and must not trigger an update.
    assert_eq!(session.tick().unwrap(), SessionPhase::AwaitingFeedback);
    assert_eq!(session.q_table().size(), 0);

    // The next valid rating proceeds normally.
    assert_eq!(session.tick().unwrap(), SessionPhase::Updating);
    session.tick().unwrap();
    assert_eq!(session.q_table().size(), 1);
}

#[test]
fn test_tick_before_start_is_an_error() {
    let app = App::for_testing()
        .with_repository(InMemoryRepository::new())
        .build();

    let mut session = app
        .create_session(
            test_config(),
            Box::new(RecordingRenderer::new()),
            Box::new(QueuedFeedback::new([])),
        )
        .unwrap();

    assert!(session.tick().is_err());
}

#[test]
fn test_melody_length_is_non_increasing_within_episode() {
    let app = App::for_testing()
        .with_repository(InMemoryRepository::new())
        .build();

    let mut session = app
        .create_session(
            SessionConfig::new("test_user")
                .with_track_length(6)
                .with_total_episodes(1)
                .with_seed(7),
            Box::new(RecordingRenderer::new()),
            Box::new(QueuedFeedback::new([5, 5, 5, 5, 5, 5])),
        )
        .unwrap();

    session.start().unwrap();
    let mut previous_len = session.current_track().unwrap().melody_len();
    while session.phase() != SessionPhase::SessionComplete {
        session.tick().unwrap();
        if let Some(track) = session.current_track() {
            let len = track.melody_len();
            assert!(len <= previous_len);
            assert_eq!(track.percussion.len(), track.total_ticks());
            previous_len = len;
        }
    }
}

#[test]
fn test_two_seeded_sessions_are_identical() {
    let run = || {
        let app = App::for_testing()
            .with_repository(InMemoryRepository::new())
            .build();
        let mut session = app
            .create_session(
                test_config(),
                Box::new(RecordingRenderer::new()),
                Box::new(QueuedFeedback::new([7, 3, 9, 5])),
            )
            .unwrap();
        session.start().unwrap();
        while session.phase() != SessionPhase::SessionComplete {
            session.tick().unwrap();
        }
        session.q_table().clone()
    };

    assert_eq!(run(), run());
}
