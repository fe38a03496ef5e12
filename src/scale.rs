//! Scale and chord interval tables.
//!
//! These are fixed musical configuration data: interval patterns added to a
//! base MIDI note to produce the pitch pool that random tracks draw from.

use serde::{Deserialize, Serialize};

/// Scale type selecting the interval pattern for the pitch pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleType {
    #[default]
    Major,
    Minor,
    BluesMinor,
    BluesMajor,
    DiatonicMajorHexatonic,
}

impl ScaleType {
    /// Semitone intervals above the base note for this scale.
    pub fn intervals(self) -> &'static [u8] {
        match self {
            ScaleType::Major => &[0, 2, 4, 5, 7, 9, 11, 12],
            ScaleType::Minor => &[0, 2, 3, 5, 7, 8, 10, 12],
            ScaleType::BluesMinor => &[0, 3, 5, 8, 10, 12],
            ScaleType::BluesMajor => &[0, 2, 5, 7, 9, 12],
            ScaleType::DiatonicMajorHexatonic => &[0, 3, 6, 9, 12, 15, 18],
        }
    }

    /// Parse a scale name, falling back to major for unknown names.
    ///
    /// Unknown scale types are a configuration slip, not a fault: the
    /// fallback is reported on stderr and the session proceeds.
    pub fn parse_lossy(name: &str) -> Self {
        match name {
            "major" => ScaleType::Major,
            "minor" => ScaleType::Minor,
            "blues_minor" => ScaleType::BluesMinor,
            "blues_major" => ScaleType::BluesMajor,
            "diatonic_major_hexatonic" => ScaleType::DiatonicMajorHexatonic,
            other => {
                eprintln!("warning: unknown scale type '{other}', defaulting to major");
                ScaleType::Major
            }
        }
    }

    /// Build the concrete pitch pool for this scale rooted at `base_note`.
    ///
    /// Pitches are clamped to the valid MIDI range.
    pub fn build(self, base_note: u8) -> Vec<u8> {
        self.intervals()
            .iter()
            .map(|&interval| base_note.saturating_add(interval).min(127))
            .collect()
    }
}

/// Chord quality selecting the interval stack above a root pitch.
///
/// Building block for chord accompaniment in render adapters. The console
/// renderers shipped in this crate do not add accompaniment; external
/// audio adapters consume this together with the chord settings in the
/// session configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChordType {
    Major,
    Minor,
    Diminished,
}

impl ChordType {
    /// Semitone intervals above the root for this chord quality.
    pub fn intervals(self) -> &'static [u8] {
        match self {
            ChordType::Major => &[0, 4, 7],
            ChordType::Minor => &[0, 3, 7],
            ChordType::Diminished => &[0, 3, 6],
        }
    }

    /// Concrete chord pitches rooted at `pitch`, clamped to the MIDI range.
    pub fn pitches(self, pitch: u8) -> Vec<u8> {
        self.intervals()
            .iter()
            .map(|&interval| pitch.saturating_add(interval).min(127))
            .collect()
    }
}
