// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! A single sounded or rested event in a generated line.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::pitch::{pitch_token, Duration, REST_TOKEN};
use super::scale::PitchClass;

/// Velocity given to every generated note
pub const DEFAULT_VELOCITY: u8 = 20;

/// An immutable note: pitch class (none for a rest), octave, duration, velocity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Note {
    pitch: Option<PitchClass>,
    octave: i8,
    duration: Duration,
    velocity: u8,
}

impl Note {
    /// Create a sounded note with the default velocity
    pub fn new(pitch: PitchClass, octave: i8, duration: Duration) -> Self {
        Self {
            pitch: Some(pitch),
            octave,
            duration,
            velocity: DEFAULT_VELOCITY,
        }
    }

    /// Create a rest
    pub fn rest(duration: Duration) -> Self {
        Self {
            pitch: None,
            octave: 0,
            duration,
            velocity: 0,
        }
    }

    /// Set the velocity for this note
    pub fn with_velocity(mut self, velocity: u8) -> Self {
        self.velocity = velocity.min(127);
        self
    }

    /// Same pitch, duration and velocity in another octave
    pub fn in_octave(self, octave: i8) -> Self {
        Self { octave, ..self }
    }

    pub fn pitch(&self) -> Option<PitchClass> {
        self.pitch
    }

    pub fn octave(&self) -> i8 {
        self.octave
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn velocity(&self) -> u8 {
        self.velocity
    }

    pub fn is_rest(&self) -> bool {
        self.pitch.is_none()
    }

    /// Pitch token understood by the pitch mapper (`"C#_4"`, or `"R"`)
    pub fn token(&self) -> String {
        match self.pitch {
            Some(pitch) => pitch_token(pitch, self.octave),
            None => REST_TOKEN.to_string(),
        }
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.token(), self.duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_creation() {
        let note = Note::new(PitchClass::E, 4, Duration::Eighth);
        assert_eq!(note.pitch(), Some(PitchClass::E));
        assert_eq!(note.octave(), 4);
        assert_eq!(note.duration(), Duration::Eighth);
        assert_eq!(note.velocity(), DEFAULT_VELOCITY);
        assert!(!note.is_rest());
    }

    #[test]
    fn test_in_octave_keeps_everything_else() {
        let note = Note::new(PitchClass::Gs, 5, Duration::Sixteenth).with_velocity(90);
        let moved = note.in_octave(3);
        assert_eq!(moved.octave(), 3);
        assert_eq!(moved.pitch(), note.pitch());
        assert_eq!(moved.duration(), note.duration());
        assert_eq!(moved.velocity(), 90);
    }

    #[test]
    fn test_tokens() {
        assert_eq!(Note::new(PitchClass::Cs, 5, Duration::Half).token(), "C#_5");
        assert_eq!(Note::rest(Duration::Quarter).token(), "R");
        assert_eq!(Note::new(PitchClass::A, 2, Duration::Quarter).to_string(), "(A_2, 4)");
    }

    #[test]
    fn test_velocity_clamped() {
        let note = Note::new(PitchClass::C, 4, Duration::Quarter).with_velocity(200);
        assert_eq!(note.velocity(), 127);
    }
}
