//! Infrastructure adapters implementing the domain ports.

pub mod feedback;
pub mod in_memory_repository;
pub mod msgpack_repository;
pub mod observers;
pub mod renderer;

pub use feedback::{QueuedFeedback, StdinFeedback};
pub use in_memory_repository::InMemoryRepository;
pub use msgpack_repository::MsgPackRepository;
pub use observers::{JsonlObserver, ProgressObserver};
pub use renderer::{NullRenderer, RecordingRenderer};
