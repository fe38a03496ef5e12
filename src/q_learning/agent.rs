//! Human-in-the-loop Q-learning agent.
//!
//! The agent owns the Q-table and the exploration schedule. Each human
//! rating drives one learning step: encode the current track, pick a
//! mutation ε-greedily, apply it, and fold the rating into the table.

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use crate::{
    action::Action,
    error::{Error, Result},
    q_learning::q_table::QTable,
    state::StateKey,
    track::{Track, TrackGenerator},
};

/// Whether a step's action came from exploration or exploitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionKind {
    Explored,
    Exploited,
}

/// Record of one learning step, handed to observers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepReport {
    /// Canonical state the action was selected in.
    pub state: StateKey,
    /// The mutation that was applied.
    pub action: Action,
    /// Explore/exploit decision for this step.
    pub selection: SelectionKind,
    /// Exploration rate in effect for this episode.
    pub effective_epsilon: f64,
    /// Q-value before the update.
    pub previous_q: f64,
    /// Q-value after the update.
    pub updated_q: f64,
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Tabular Q-learning agent driven by human ratings.
#[derive(Debug, Clone)]
pub struct MelodyAgent {
    q_table: QTable,
    initial_epsilon: f64,
    epsilon_decay: f64,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl MelodyAgent {
    /// Create a new agent.
    ///
    /// # Arguments
    ///
    /// * `learning_rate` - α parameter (0.0 to 1.0)
    /// * `discount_factor` - γ parameter (0.0 to 1.0)
    /// * `initial_epsilon` - ε₀, exploration rate at episode 0
    /// * `epsilon_decay` - multiplicative decay per episode, in (0, 1]
    pub fn new(
        learning_rate: f64,
        discount_factor: f64,
        initial_epsilon: f64,
        epsilon_decay: f64,
    ) -> Self {
        Self {
            q_table: QTable::new(learning_rate, discount_factor),
            initial_epsilon,
            epsilon_decay,
            rng: build_rng(None),
            rng_seed: None,
        }
    }

    /// Seed the agent's RNG for deterministic sessions.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        self
    }

    /// Exploration rate in effect for `episode`: ε₀ · decay^episode.
    ///
    /// There is no floor; the rate approaches but never reaches zero for
    /// decay in (0, 1).
    pub fn effective_epsilon(&self, episode: usize) -> f64 {
        self.initial_epsilon * self.epsilon_decay.powi(episode as i32)
    }

    /// ε-greedy action selection over the track's current action space.
    ///
    /// The very first episode always explores, regardless of ε₀, so the
    /// table has no influence before any rating has been absorbed.
    fn select_action(
        &mut self,
        state: &StateKey,
        actions: &[Action],
        episode: usize,
    ) -> Result<(Action, SelectionKind)> {
        let draw = self.rng.random::<f64>();
        if episode < 1 || draw < self.effective_epsilon(episode) {
            let action = actions.choose(&mut self.rng).copied().ok_or(Error::EmptyMelody)?;
            Ok((action, SelectionKind::Explored))
        } else {
            let action = self
                .q_table
                .greedy_action(state, actions)
                .ok_or(Error::EmptyMelody)?;
            Ok((action, SelectionKind::Exploited))
        }
    }

    /// Absorb one human rating and return the mutated track.
    ///
    /// Encodes the track, selects a mutation ε-greedily, applies it through
    /// the generator, and updates the table. The bootstrap term maxes over
    /// the pre-action state's action values, not the successor state's; the
    /// learned values depend on this and it must not change silently.
    pub fn observe_reward(
        &mut self,
        generator: &TrackGenerator,
        track: &Track,
        reward: u8,
        episode: usize,
    ) -> Result<(Track, StepReport)> {
        let actions = Action::space(track);
        if actions.is_empty() {
            return Err(Error::EmptyMelody);
        }

        let state = StateKey::encode(track);
        let (action, selection) = self.select_action(&state, &actions, episode)?;

        let next_track = generator.apply_action(track, action, &mut self.rng)?;

        let previous_q = self.q_table.get(&state, action);
        let best_next = self.q_table.max_q(&state, &actions);
        let updated_q = self
            .q_table
            .update(state.clone(), action, f64::from(reward), best_next);

        let report = StepReport {
            state,
            action,
            selection,
            effective_epsilon: self.effective_epsilon(episode),
            previous_q,
            updated_q,
        };

        Ok((next_track, report))
    }

    /// The learned table.
    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    /// Replace the table, e.g. after loading a persisted one.
    pub fn replace_q_table(&mut self, q_table: QTable) {
        self.q_table = q_table;
    }

    /// Number of entries learned so far.
    pub fn q_table_size(&self) -> usize {
        self.q_table.size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::ScaleType;

    fn agent(initial_epsilon: f64, decay: f64) -> MelodyAgent {
        MelodyAgent::new(0.1, 0.9, initial_epsilon, decay).with_seed(99)
    }

    fn generator() -> TrackGenerator {
        TrackGenerator::new(60, ScaleType::Major)
    }

    #[test]
    fn test_effective_epsilon_is_non_increasing() {
        let agent = agent(0.5, 0.8);
        let mut previous = f64::INFINITY;
        for episode in 0..20 {
            let epsilon = agent.effective_epsilon(episode);
            assert!(epsilon <= previous);
            assert!(epsilon > 0.0);
            previous = epsilon;
        }
    }

    #[test]
    fn test_first_episode_always_explores() {
        // ε₀ = 0.0 would never explore by the draw alone.
        let mut agent = agent(0.0, 0.5);
        let generator = generator();
        let mut rng = StdRng::seed_from_u64(5);
        let track = generator.random_track(4, &mut rng).unwrap();

        let (_, report) = agent.observe_reward(&generator, &track, 7, 0).unwrap();
        assert_eq!(report.selection, SelectionKind::Explored);
    }

    #[test]
    fn test_later_episode_exploits_when_epsilon_is_zero() {
        let mut agent = agent(0.0, 0.5);
        let generator = generator();
        let mut rng = StdRng::seed_from_u64(5);
        let track = generator.random_track(4, &mut rng).unwrap();

        let (_, report) = agent.observe_reward(&generator, &track, 7, 3).unwrap();
        assert_eq!(report.selection, SelectionKind::Exploited);
        // Nothing learned yet: the greedy tie resolves to the first action
        // in enumeration order.
        assert_eq!(report.action, Action::RaisePitch(0));
    }

    #[test]
    fn test_observe_reward_writes_one_entry() {
        let mut agent = agent(0.5, 0.9);
        let generator = generator();
        let mut rng = StdRng::seed_from_u64(5);
        let track = generator.random_track(4, &mut rng).unwrap();

        let (_next_track, report) = agent.observe_reward(&generator, &track, 9, 0).unwrap();
        assert_eq!(agent.q_table_size(), 1);
        // First write with an empty table: q = 0 + 0.1 * (9 + 0.9*0 - 0).
        assert!((report.updated_q - 0.9).abs() < 1e-12);
        assert_eq!(report.previous_q, 0.0);
    }

    #[test]
    fn test_bootstrap_uses_pre_action_state_values() {
        let mut agent = agent(0.0, 0.5);
        let generator = generator();
        let mut rng = StdRng::seed_from_u64(5);
        let track = generator.random_track(2, &mut rng).unwrap();
        let state = StateKey::encode(&track);

        // Seed a high value on an action in the *current* state; the update
        // target must bootstrap from it even though the applied action leads
        // to a different successor state.
        agent
            .q_table
            .set(state.clone(), Action::RemoveNote(1), 10.0);

        let (_, report) = agent.observe_reward(&generator, &track, 0, 5).unwrap();
        // Exploited greedy pick is the seeded best action itself here, so
        // check the arithmetic: q = 10 + 0.1 * (0 + 0.9*10 - 10) = 9.9.
        assert_eq!(report.action, Action::RemoveNote(1));
        assert!((report.updated_q - 9.9).abs() < 1e-12);
    }

    #[test]
    fn test_seeded_agents_make_identical_choices() {
        let generator = generator();
        let mut rng = StdRng::seed_from_u64(5);
        let track = generator.random_track(4, &mut rng).unwrap();

        let mut agent_a = agent(0.5, 0.9);
        let mut agent_b = agent(0.5, 0.9);
        let (track_a, report_a) = agent_a.observe_reward(&generator, &track, 6, 0).unwrap();
        let (track_b, report_b) = agent_b.observe_reward(&generator, &track, 6, 0).unwrap();

        assert_eq!(report_a.action, report_b.action);
        assert_eq!(track_a, track_b);
    }
}
