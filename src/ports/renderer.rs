//! Renderer port - abstraction over audio rendering and playback.
//!
//! The learning core never touches audio; it hands tracks to this port and
//! moves on. Adapters may write MIDI files, drive a synthesizer, or do
//! nothing at all (tests).

use serde::{Deserialize, Serialize};

use crate::{Result, track::Track};

/// Opaque handle to a rendered track, e.g. a file path or clip id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RenderHandle(String);

impl RenderHandle {
    /// Create a handle from an adapter-specific identifier.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Port for rendering a track and playing the result back to the human.
///
/// Render settings that are irrelevant to learning (tempo, volume, chord
/// accompaniment) are adapter construction parameters, passed through from
/// the session configuration.
pub trait TrackRenderer: Send {
    /// Render a track, returning a handle to the rendered artifact.
    ///
    /// `episode` and `step` identify the artifact for naming purposes.
    fn render(&mut self, track: &Track, episode: usize, step: usize) -> Result<RenderHandle>;

    /// Play a previously rendered track.
    fn play(&mut self, handle: &RenderHandle) -> Result<()>;
}
