// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Pitch token and duration mapping.
//!
//! Converts pitch tokens such as `"C#_4"` into numeric pitch values and
//! duration classes into tick spans on a 16 ticks-per-quarter timeline.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::scale::PitchClass;

/// Ticks per quarter note on the output timeline
pub const TICKS_PER_QUARTER: u32 = 16;

/// Lowest octave a pitch token may name
pub const MIN_OCTAVE: i8 = 0;

/// Highest octave a pitch token may name
pub const MAX_OCTAVE: i8 = 8;

/// Semitones per octave
pub const NOTES_IN_OCTAVE: u8 = 12;

/// Token marking a rest
pub const REST_TOKEN: &str = "R";

/// Errors raised while resolving a pitch token
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PitchError {
    /// Token does not follow `LETTER[#]_OCTAVE`
    #[error("invalid pitch format '{0}', expected LETTER[#]_OCTAVE or R")]
    InvalidFormat(String),
    /// Octave outside the supported range
    #[error("octave {0} out of range [0, 8]")]
    OctaveOutOfRange(i64),
}

/// Note duration classes, named by their beat-resolution denominator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Duration {
    Whole,
    Half,
    Quarter,
    Eighth,
    Sixteenth,
    ThirtySecond,
    SixtyFourth,
}

impl Duration {
    /// Every duration class, longest first
    pub const ALL: [Duration; 7] = [
        Duration::Whole,
        Duration::Half,
        Duration::Quarter,
        Duration::Eighth,
        Duration::Sixteenth,
        Duration::ThirtySecond,
        Duration::SixtyFourth,
    ];

    /// Denominator: whole = 1, half = 2, ... sixty-fourth = 64
    pub fn denominator(self) -> u32 {
        match self {
            Duration::Whole => 1,
            Duration::Half => 2,
            Duration::Quarter => 4,
            Duration::Eighth => 8,
            Duration::Sixteenth => 16,
            Duration::ThirtySecond => 32,
            Duration::SixtyFourth => 64,
        }
    }

    /// Duration class from its denominator
    pub fn from_denominator(denominator: u32) -> Option<Self> {
        Duration::ALL
            .into_iter()
            .find(|d| d.denominator() == denominator)
    }

    /// Length in sixty-fourths of a whole-note measure.
    ///
    /// Summing these keeps measure arithmetic exact.
    pub fn measure_units(self) -> u32 {
        64 / self.denominator()
    }

    /// Length in timeline ticks
    pub fn ticks(self) -> u32 {
        TICKS_PER_QUARTER * 4 / self.denominator()
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.denominator())
    }
}

/// Resolve a pitch token into its numeric value.
///
/// Returns `Ok(None)` for the rest marker. The value is
/// `octave * 12 + pitch_class`.
pub fn resolve_pitch(token: &str) -> Result<Option<u8>, PitchError> {
    let token = token.trim();
    if token == REST_TOKEN {
        return Ok(None);
    }

    let invalid = || PitchError::InvalidFormat(token.to_string());
    let (name, octave) = token.split_once('_').ok_or_else(invalid)?;
    let octave: i64 = octave.parse().map_err(|_| invalid())?;
    if octave < MIN_OCTAVE as i64 || octave > MAX_OCTAVE as i64 {
        return Err(PitchError::OctaveOutOfRange(octave));
    }
    let pitch = PitchClass::parse(name).ok_or_else(invalid)?;

    Ok(Some(octave as u8 * NOTES_IN_OCTAVE + pitch.value()))
}

/// Build the pitch token for a pitch class and octave
pub fn pitch_token(pitch: PitchClass, octave: i8) -> String {
    format!("{}_{}", pitch, octave)
}

/// Resolve a duration class into `(start_tick, end_tick)` relative to the
/// note's own slice of the timeline.
pub fn resolve_duration(duration: Duration) -> (u32, u32) {
    (0, duration.ticks())
}
