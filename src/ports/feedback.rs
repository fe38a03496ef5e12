//! Feedback port - abstraction over human rating collection.

use crate::Result;

/// Lowest accepted rating.
pub const MIN_RATING: u8 = 0;
/// Highest accepted rating.
pub const MAX_RATING: u8 = 9;

/// Port yielding human ratings for the track currently playing.
///
/// The controller polls this once per tick while awaiting feedback. `None`
/// means "no rating yet" and leaves the session waiting; adapters translate
/// malformed input into `None` rather than an error so a typo never ends a
/// session. Out-of-range values are rejected by the controller.
pub trait FeedbackSource: Send {
    /// Poll for a rating. Returns `Ok(None)` when none is available yet.
    fn poll(&mut self) -> Result<Option<u8>>;
}
