//! Tabular Q-learning over melody mutation actions.
//!
//! The [`QTable`] holds learned values keyed by canonical track state and
//! mutation action; the [`MelodyAgent`] wraps it with the ε-greedy policy
//! and the per-rating update step.

pub mod agent;
pub mod q_table;

pub use agent::{MelodyAgent, SelectionKind, StepReport};
pub use q_table::QTable;
