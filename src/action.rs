//! Mutation action vocabulary.
//!
//! Each action is a tagged variant carrying the target index it mutates.
//! The enumeration order of [`Action::space`] is part of the contract:
//! greedy tie-breaking in the policy resolves to the first action in this
//! order, which keeps seeded sessions reproducible.

use serde::{Deserialize, Serialize};

use crate::track::Track;

/// One discrete, parameterized mutation of a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "index", rename_all = "snake_case")]
pub enum Action {
    /// Raise the pitch of the melody note at `index` by one semitone.
    RaisePitch(usize),
    /// Lower the pitch of the melody note at `index` by one semitone.
    LowerPitch(usize),
    /// Lengthen the melody note at `index` by one tick.
    IncreaseDuration(usize),
    /// Shorten the melody note at `index` by one tick.
    DecreaseDuration(usize),
    /// Replace the percussion hit at `index` with a different palette value.
    ChangePercussion(usize),
    /// Delete the melody note at `index`.
    RemoveNote(usize),
}

impl Action {
    /// The target index this action mutates.
    pub fn index(self) -> usize {
        match self {
            Action::RaisePitch(index)
            | Action::LowerPitch(index)
            | Action::IncreaseDuration(index)
            | Action::DecreaseDuration(index)
            | Action::ChangePercussion(index)
            | Action::RemoveNote(index) => index,
        }
    }

    /// Short kind name for log records.
    pub fn kind_name(self) -> &'static str {
        match self {
            Action::RaisePitch(_) => "raise_pitch",
            Action::LowerPitch(_) => "lower_pitch",
            Action::IncreaseDuration(_) => "increase_duration",
            Action::DecreaseDuration(_) => "decrease_duration",
            Action::ChangePercussion(_) => "change_percussion",
            Action::RemoveNote(_) => "remove_note",
        }
    }

    /// Enumerate the action space for the track's current melody length.
    ///
    /// Kind-major, index-minor order over indices `[0, N)`. RemoveNote is
    /// omitted when only one note remains, so no action can drain the melody.
    pub fn space(track: &Track) -> Vec<Action> {
        let len = track.melody_len();
        let mut actions = Vec::with_capacity(len * 6);

        for constructor in [
            Action::RaisePitch as fn(usize) -> Action,
            Action::LowerPitch,
            Action::IncreaseDuration,
            Action::DecreaseDuration,
            Action::ChangePercussion,
        ] {
            actions.extend((0..len).map(constructor));
        }
        if len > 1 {
            actions.extend((0..len).map(Action::RemoveNote));
        }

        actions
    }
}
