//! Canonical state encoding for Q-table keys.

use std::{borrow::Borrow, fmt, fmt::Write as _};

use serde::{Deserialize, Serialize};

use crate::track::Track;

/// Canonical, hashable encoding of a [`Track`].
///
/// The encoding is a pure function of the track's content: melody notes as
/// `pitch:ticks` pairs, a `|` separator, then the percussion hits. Two tracks
/// with identical content always produce equal keys, and distinguishable
/// tracks produce distinct keys.
///
/// # Examples
///
/// ```
/// use melodiq::{state::StateKey, track::{Note, NoteDuration, Track}};
///
/// let track = Track {
///     melody: vec![Note { pitch: 60, duration: NoteDuration::from_ticks(2) }],
///     percussion: vec![38, 35],
/// };
/// assert_eq!(StateKey::encode(&track).as_str(), "60:2|38,35");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StateKey(String);

impl StateKey {
    /// Encode a track into its canonical state key.
    pub fn encode(track: &Track) -> Self {
        let mut label = String::with_capacity(track.melody.len() * 6 + track.percussion.len() * 3);

        for (position, note) in track.melody.iter().enumerate() {
            if position > 0 {
                label.push(',');
            }
            let _ = write!(label, "{}:{}", note.pitch, note.duration.ticks());
        }
        label.push('|');
        for (position, hit) in track.percussion.iter().enumerate() {
            if position > 0 {
                label.push(',');
            }
            let _ = write!(label, "{hit}");
        }

        Self(label)
    }

    /// Get the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert the key into its inner String.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Borrow<str> for StateKey {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<str> for StateKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
