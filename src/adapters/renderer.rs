//! Renderer adapters.
//!
//! Audio rendering lives outside this crate; these adapters satisfy the
//! renderer port for console sessions and tests.

use std::sync::{Arc, Mutex};

use crate::{
    Result,
    ports::{RenderHandle, TrackRenderer},
    track::Track,
};

/// Renderer that produces handles without rendering anything.
///
/// Used by console sessions where playback is handled out of band, and
/// anywhere a session must run without an audio stack.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl NullRenderer {
    /// Create a new null renderer.
    pub fn new() -> Self {
        Self
    }
}

impl TrackRenderer for NullRenderer {
    fn render(&mut self, _track: &Track, episode: usize, step: usize) -> Result<RenderHandle> {
        Ok(RenderHandle::new(format!("track_ep_{episode}_step_{step}")))
    }

    fn play(&mut self, _handle: &RenderHandle) -> Result<()> {
        Ok(())
    }
}

/// Renderer that records every track handed to it.
///
/// Clones share the same recording, so a test can keep one clone and hand
/// the other to the session loop.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    rendered: Arc<Mutex<Vec<Track>>>,
    played: Arc<Mutex<Vec<RenderHandle>>>,
}

impl RecordingRenderer {
    /// Create a new recording renderer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracks rendered so far, in order.
    pub fn rendered(&self) -> Vec<Track> {
        self.rendered.lock().unwrap().clone()
    }

    /// Handles played so far, in order.
    pub fn played(&self) -> Vec<RenderHandle> {
        self.played.lock().unwrap().clone()
    }
}

impl TrackRenderer for RecordingRenderer {
    fn render(&mut self, track: &Track, episode: usize, step: usize) -> Result<RenderHandle> {
        self.rendered.lock().unwrap().push(track.clone());
        Ok(RenderHandle::new(format!("track_ep_{episode}_step_{step}")))
    }

    fn play(&mut self, handle: &RenderHandle) -> Result<()> {
        self.played.lock().unwrap().push(handle.clone());
        Ok(())
    }
}
