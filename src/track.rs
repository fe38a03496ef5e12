//! Track model: the mutable melody representation.
//!
//! A [`Track`] pairs an ordered melody of pitch/duration notes with a
//! percussion line derived from the melody's total duration. The
//! [`TrackGenerator`] owns the fixed musical material (scale pitch pool,
//! duration set, percussion palette) and implements random generation and
//! action application.

use rand::{rngs::StdRng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use crate::{
    action::Action,
    error::{Error, Result},
    scale::ScaleType,
};

/// Note duration in quarter-beat ticks.
///
/// One tick is 0.25 beats; valid durations span 1..=4 ticks (0.25 to 1.0
/// beats). Integer ticks keep durations exactly comparable and hashable,
/// which the state encoding relies on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NoteDuration(u8);

impl NoteDuration {
    /// Shortest allowed duration (0.25 beats).
    pub const MIN: NoteDuration = NoteDuration(1);
    /// Longest allowed duration (1.0 beats).
    pub const MAX: NoteDuration = NoteDuration(4);

    /// Beats per tick.
    pub const TICK_BEATS: f64 = 0.25;

    /// Create a duration from a tick count, clamped to the valid range.
    pub fn from_ticks(ticks: u8) -> Self {
        Self(ticks.clamp(Self::MIN.0, Self::MAX.0))
    }

    /// Duration in ticks.
    pub fn ticks(self) -> u8 {
        self.0
    }

    /// Duration in beats.
    pub fn as_beats(self) -> f64 {
        f64::from(self.0) * Self::TICK_BEATS
    }

    /// One tick longer, clamped at the maximum.
    pub fn increased(self) -> Self {
        Self::from_ticks(self.0.saturating_add(1))
    }

    /// One tick shorter, clamped at the minimum.
    pub fn decreased(self) -> Self {
        Self::from_ticks(self.0.saturating_sub(1))
    }
}

/// A single melody note: MIDI pitch plus duration.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Note {
    pub pitch: u8,
    pub duration: NoteDuration,
}

/// The unit of mutation: a melody plus its derived percussion line.
///
/// The percussion line always holds one hit per melody tick; it is re-derived
/// whenever a mutation changes the melody's total duration, never resized
/// independently.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Track {
    pub melody: Vec<Note>,
    pub percussion: Vec<u8>,
}

impl Track {
    /// Number of notes in the melody.
    pub fn melody_len(&self) -> usize {
        self.melody.len()
    }

    /// Total melody duration in ticks.
    pub fn total_ticks(&self) -> usize {
        self.melody
            .iter()
            .map(|note| usize::from(note.duration.ticks()))
            .sum()
    }
}

/// Generator owning the fixed musical material for one session.
///
/// Holds the precomputed scale pitch pool, the duration set, and the
/// percussion palette. All randomness comes from the caller-supplied RNG so
/// sessions are reproducible under a fixed seed.
#[derive(Debug, Clone)]
pub struct TrackGenerator {
    scale: Vec<u8>,
    durations: Vec<NoteDuration>,
    percussion_palette: Vec<u8>,
}

/// Default percussion palette: acoustic snare and acoustic bass drum.
pub const PERCUSSION_PALETTE: [u8; 2] = [38, 35];

impl TrackGenerator {
    /// Create a generator for the given scale rooted at `base_note`.
    pub fn new(base_note: u8, scale_type: ScaleType) -> Self {
        Self {
            scale: scale_type.build(base_note),
            durations: (NoteDuration::MIN.ticks()..=NoteDuration::MAX.ticks())
                .map(NoteDuration::from_ticks)
                .collect(),
            percussion_palette: PERCUSSION_PALETTE.to_vec(),
        }
    }

    /// The scale pitch pool random tracks draw from.
    pub fn scale(&self) -> &[u8] {
        &self.scale
    }

    /// The percussion palette.
    pub fn percussion_palette(&self) -> &[u8] {
        &self.percussion_palette
    }

    /// Generate a random track of `length` notes.
    ///
    /// Pitches are drawn uniformly from the scale and durations uniformly
    /// from the duration set. The percussion line is derived from the
    /// melody's total tick count by cycling the palette.
    pub fn random_track(&self, length: usize, rng: &mut StdRng) -> Result<Track> {
        if length == 0 {
            return Err(Error::EmptyMelody);
        }

        let melody: Vec<Note> = (0..length)
            .map(|_| {
                let pitch = *self
                    .scale
                    .choose(rng)
                    .expect("scale tables are never empty");
                let duration = *self
                    .durations
                    .choose(rng)
                    .expect("duration set is never empty");
                Note { pitch, duration }
            })
            .collect();

        let total_ticks = melody
            .iter()
            .map(|note| usize::from(note.duration.ticks()))
            .sum();
        let percussion = self.derive_percussion(total_ticks);

        Ok(Track { melody, percussion })
    }

    /// Apply `action` to `track`, returning the mutated copy.
    ///
    /// The caller's track is left untouched. Indices outside the current
    /// track bounds are a caller bug and surface as
    /// [`Error::ActionIndexOutOfBounds`] rather than panicking; the action
    /// space must always be derived from the current track length.
    pub fn apply_action(&self, track: &Track, action: Action, rng: &mut StdRng) -> Result<Track> {
        let mut next = track.clone();

        match action {
            Action::RaisePitch(index) => {
                let note = Self::melody_note_mut(&mut next, index)?;
                note.pitch = note.pitch.saturating_add(1).min(127);
            }
            Action::LowerPitch(index) => {
                let note = Self::melody_note_mut(&mut next, index)?;
                note.pitch = note.pitch.saturating_sub(1);
            }
            Action::IncreaseDuration(index) => {
                let note = Self::melody_note_mut(&mut next, index)?;
                note.duration = note.duration.increased();
                self.resync_percussion(&mut next);
            }
            Action::DecreaseDuration(index) => {
                let note = Self::melody_note_mut(&mut next, index)?;
                note.duration = note.duration.decreased();
                self.resync_percussion(&mut next);
            }
            Action::ChangePercussion(index) => {
                let len = next.percussion.len();
                let hit = next
                    .percussion
                    .get_mut(index)
                    .ok_or(Error::ActionIndexOutOfBounds { index, len })?;
                let alternatives: Vec<u8> = self
                    .percussion_palette
                    .iter()
                    .copied()
                    .filter(|&candidate| candidate != *hit)
                    .collect();
                if let Some(&replacement) = alternatives.choose(rng) {
                    *hit = replacement;
                }
            }
            Action::RemoveNote(index) => {
                if next.melody.len() <= 1 {
                    return Err(Error::EmptyMelody);
                }
                let len = next.melody.len();
                if index >= len {
                    return Err(Error::ActionIndexOutOfBounds { index, len });
                }
                next.melody.remove(index);
                self.resync_percussion(&mut next);
            }
        }

        Ok(next)
    }

    fn melody_note_mut(track: &mut Track, index: usize) -> Result<&mut Note> {
        let len = track.melody.len();
        track
            .melody
            .get_mut(index)
            .ok_or(Error::ActionIndexOutOfBounds { index, len })
    }

    /// Re-derive the percussion line length from the melody's tick count.
    ///
    /// Existing hits are kept; excess hits are truncated and missing hits are
    /// filled by cycling the palette from the current position.
    fn resync_percussion(&self, track: &mut Track) {
        let target = track.total_ticks();
        if track.percussion.len() > target {
            track.percussion.truncate(target);
        } else {
            while track.percussion.len() < target {
                let position = track.percussion.len() % self.percussion_palette.len();
                track.percussion.push(self.percussion_palette[position]);
            }
        }
    }

    fn derive_percussion(&self, total_ticks: usize) -> Vec<u8> {
        (0..total_ticks)
            .map(|position| self.percussion_palette[position % self.percussion_palette.len()])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    fn generator() -> TrackGenerator {
        TrackGenerator::new(60, ScaleType::Major)
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_random_track_has_requested_length() {
        let track = generator().random_track(8, &mut rng()).unwrap();
        assert_eq!(track.melody_len(), 8);
    }

    #[test]
    fn test_random_track_pitches_come_from_scale() {
        let generator = generator();
        let track = generator.random_track(16, &mut rng()).unwrap();
        for note in &track.melody {
            assert!(generator.scale().contains(&note.pitch));
        }
    }

    #[test]
    fn test_percussion_length_matches_total_ticks() {
        let track = generator().random_track(8, &mut rng()).unwrap();
        assert_eq!(track.percussion.len(), track.total_ticks());
    }

    #[test]
    fn test_zero_length_track_is_rejected() {
        assert!(matches!(
            generator().random_track(0, &mut rng()),
            Err(Error::EmptyMelody)
        ));
    }

    #[test]
    fn test_raise_pitch_clamps_at_midi_ceiling() {
        let generator = generator();
        let mut rng = rng();
        let mut track = generator.random_track(1, &mut rng).unwrap();
        track.melody[0].pitch = 127;

        let raised = generator
            .apply_action(&track, Action::RaisePitch(0), &mut rng)
            .unwrap();
        assert_eq!(raised.melody[0].pitch, 127);
    }

    #[test]
    fn test_lower_pitch_clamps_at_zero() {
        let generator = generator();
        let mut rng = rng();
        let mut track = generator.random_track(1, &mut rng).unwrap();
        track.melody[0].pitch = 0;

        let lowered = generator
            .apply_action(&track, Action::LowerPitch(0), &mut rng)
            .unwrap();
        assert_eq!(lowered.melody[0].pitch, 0);
    }

    #[test]
    fn test_duration_clamps_under_repeated_mutation() {
        let generator = generator();
        let mut rng = rng();
        let mut track = generator.random_track(2, &mut rng).unwrap();

        for _ in 0..10 {
            track = generator
                .apply_action(&track, Action::IncreaseDuration(0), &mut rng)
                .unwrap();
            track = generator
                .apply_action(&track, Action::DecreaseDuration(1), &mut rng)
                .unwrap();
        }

        assert_eq!(track.melody[0].duration, NoteDuration::MAX);
        assert_eq!(track.melody[1].duration, NoteDuration::MIN);
    }

    #[test]
    fn test_duration_change_resyncs_percussion() {
        let generator = generator();
        let mut rng = rng();
        let track = generator.random_track(4, &mut rng).unwrap();

        let grown = generator
            .apply_action(&track, Action::DecreaseDuration(0), &mut rng)
            .unwrap();
        assert_eq!(grown.percussion.len(), grown.total_ticks());
    }

    #[test]
    fn test_remove_note_shrinks_melody_and_resyncs_percussion() {
        let generator = generator();
        let mut rng = rng();
        let track = generator.random_track(4, &mut rng).unwrap();

        let shrunk = generator
            .apply_action(&track, Action::RemoveNote(2), &mut rng)
            .unwrap();
        assert_eq!(shrunk.melody_len(), 3);
        assert_eq!(shrunk.percussion.len(), shrunk.total_ticks());
    }

    #[test]
    fn test_remove_last_note_is_rejected() {
        let generator = generator();
        let mut rng = rng();
        let track = generator.random_track(1, &mut rng).unwrap();

        assert!(matches!(
            generator.apply_action(&track, Action::RemoveNote(0), &mut rng),
            Err(Error::EmptyMelody)
        ));
    }

    #[test]
    fn test_out_of_bounds_index_is_an_error() {
        let generator = generator();
        let mut rng = rng();
        let track = generator.random_track(3, &mut rng).unwrap();

        assert!(matches!(
            generator.apply_action(&track, Action::RaisePitch(3), &mut rng),
            Err(Error::ActionIndexOutOfBounds { index: 3, len: 3 })
        ));
    }

    #[test]
    fn test_change_percussion_picks_a_different_hit() {
        let generator = generator();
        let mut rng = rng();
        let track = generator.random_track(4, &mut rng).unwrap();
        let before = track.percussion[0];

        let changed = generator
            .apply_action(&track, Action::ChangePercussion(0), &mut rng)
            .unwrap();
        assert_ne!(changed.percussion[0], before);
    }

    #[test]
    fn test_apply_action_leaves_original_track_intact() {
        let generator = generator();
        let mut rng = rng();
        let track = generator.random_track(4, &mut rng).unwrap();
        let snapshot = track.clone();

        let _ = generator
            .apply_action(&track, Action::RemoveNote(0), &mut rng)
            .unwrap();
        assert_eq!(track, snapshot);
    }
}
