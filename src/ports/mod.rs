//! Ports (trait boundaries) for external dependencies.
//!
//! Following hexagonal architecture, these traits are owned by the domain
//! and implemented by adapters in the infrastructure layer: rendering and
//! playback, human feedback collection, session observation, and Q-table
//! persistence.

pub mod feedback;
pub mod observer;
pub mod renderer;
pub mod repository;

pub use feedback::{FeedbackSource, MAX_RATING, MIN_RATING};
pub use observer::SessionObserver;
pub use renderer::{RenderHandle, TrackRenderer};
pub use repository::QTableRepository;
