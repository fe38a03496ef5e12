//! Session layer: configuration and the episode controller.

pub mod config;
pub mod controller;

pub use config::SessionConfig;
pub use controller::{SessionController, SessionPhase};
