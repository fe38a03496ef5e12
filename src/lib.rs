//! Human-in-the-loop reinforcement learning for evolving short melodies.
//!
//! This crate provides:
//! - A mutable track model (melody plus derived percussion line) with a
//!   fixed vocabulary of mutation actions
//! - A tabular Q-learning agent with an ε-greedy exploration policy driven
//!   by human ratings
//! - An episode controller sequencing render, feedback and learning steps
//! - Ports and adapters for rendering, feedback collection, observation and
//!   Q-table persistence

pub mod action;
pub mod adapters;
pub mod app;
pub mod error;
pub mod identifiers;
pub mod ports;
pub mod q_learning;
pub mod scale;
pub mod session;
pub mod state;
pub mod track;

pub use action::Action;
pub use error::{Error, Result};
pub use identifiers::UserId;
pub use q_learning::{MelodyAgent, QTable, SelectionKind, StepReport};
pub use scale::{ChordType, ScaleType};
pub use session::{SessionConfig, SessionController, SessionPhase};
pub use state::StateKey;
pub use track::{Note, NoteDuration, Track, TrackGenerator};
