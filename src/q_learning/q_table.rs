//! Q-table for tabular human-in-the-loop learning.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{action::Action, state::StateKey};

/// Q-table mapping (state, action) pairs to learned values.
///
/// Absent entries read as 0.0. The table owns the learning rate and discount
/// factor so the update arithmetic lives next to the values it mutates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QTable {
    /// Q-values: (canonical track state, mutation action) -> Q-value
    q_values: HashMap<(StateKey, Action), f64>,
    /// Learning rate α
    learning_rate: f64,
    /// Discount factor γ
    discount_factor: f64,
}

impl QTable {
    /// Create a new empty Q-table.
    pub fn new(learning_rate: f64, discount_factor: f64) -> Self {
        Self {
            q_values: HashMap::new(),
            learning_rate,
            discount_factor,
        }
    }

    /// Get the Q-value for a state-action pair, defaulting to 0.0.
    pub fn get(&self, state: &StateKey, action: Action) -> f64 {
        self.q_values
            .get(&(state.clone(), action))
            .copied()
            .unwrap_or(0.0)
    }

    /// Set the Q-value for a state-action pair.
    pub fn set(&mut self, state: StateKey, action: Action, value: f64) {
        self.q_values.insert((state, action), value);
    }

    /// Maximum Q-value over the given actions in a state.
    ///
    /// An empty action slice reads as 0.0, matching the default for unseen
    /// entries.
    pub fn max_q(&self, state: &StateKey, actions: &[Action]) -> f64 {
        if actions.is_empty() {
            return 0.0;
        }
        actions
            .iter()
            .map(|&action| self.get(state, action))
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Greedy action: the highest-valued action, ties keeping the earliest
    /// action in enumeration order.
    pub fn greedy_action(&self, state: &StateKey, actions: &[Action]) -> Option<Action> {
        let mut best: Option<(Action, f64)> = None;
        for &action in actions {
            let value = self.get(state, action);
            match best {
                Some((_, best_value)) if value <= best_value => {}
                _ => best = Some((action, value)),
            }
        }
        best.map(|(action, _)| action)
    }

    /// Bellman update for one human rating.
    ///
    /// `Q(s,a) ← Q(s,a) + α[r + γ·best_next − Q(s,a)]`. Returns the updated
    /// value. The caller supplies `best_next`; which state it is maxed over
    /// is the policy's decision, not the table's.
    pub fn update(&mut self, state: StateKey, action: Action, reward: f64, best_next: f64) -> f64 {
        let current_q = self.get(&state, action);
        let td_target = reward + self.discount_factor * best_next;
        let td_error = td_target - current_q;
        let new_q = current_q + self.learning_rate * td_error;
        self.set(state, action, new_q);
        new_q
    }

    /// Number of entries written so far.
    pub fn size(&self) -> usize {
        self.q_values.len()
    }

    /// Learning rate α.
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Discount factor γ.
    pub fn discount_factor(&self) -> f64 {
        self.discount_factor
    }

    /// Iterate over all written entries.
    pub fn entries(&self) -> impl Iterator<Item = (&(StateKey, Action), &f64)> {
        self.q_values.iter()
    }
}
