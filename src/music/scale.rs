// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Scale and key system for melody generation.
//!
//! Provides pitch classes, the fixed catalog of seven-note scales, and key
//! resolution from free text such as `"C# Natural Minor"`.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Semitone offset type
pub type Semitones = i8;

/// Number of degrees in every catalog scale
pub const SCALE_DEGREES: usize = 7;

/// Errors raised while resolving a key description
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// The root is not a letter A-G with an optional `#`
    #[error("invalid key root '{0}'")]
    InvalidRoot(String),
    /// No scale description followed the root
    #[error("key '{0}' has no scale description")]
    MissingScale(String),
    /// The scale description is not in the catalog
    #[error("unsupported scale '{0}'")]
    UnknownScale(String),
}

/// Pitch classes (sharps only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PitchClass {
    C,
    Cs, // C#
    D,
    Ds, // D#
    E,
    F,
    Fs, // F#
    G,
    Gs, // G#
    A,
    As, // A#
    B,
}

impl PitchClass {
    /// All pitch classes in chromatic order
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::Cs,
        PitchClass::D,
        PitchClass::Ds,
        PitchClass::E,
        PitchClass::F,
        PitchClass::Fs,
        PitchClass::G,
        PitchClass::Gs,
        PitchClass::A,
        PitchClass::As,
        PitchClass::B,
    ];

    /// Get the numeric pitch class (0-11)
    pub fn value(self) -> u8 {
        match self {
            PitchClass::C => 0,
            PitchClass::Cs => 1,
            PitchClass::D => 2,
            PitchClass::Ds => 3,
            PitchClass::E => 4,
            PitchClass::F => 5,
            PitchClass::Fs => 6,
            PitchClass::G => 7,
            PitchClass::Gs => 8,
            PitchClass::A => 9,
            PitchClass::As => 10,
            PitchClass::B => 11,
        }
    }

    /// Get pitch class from a value, wrapping modulo 12
    pub fn from_value(pc: u8) -> Self {
        PitchClass::ALL[(pc % 12) as usize]
    }

    /// Parse a pitch name: a letter A-G and an optional `#`.
    ///
    /// Flats and the enharmonic spellings `E#`/`B#` are rejected.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_uppercase();
        match s.as_str() {
            "C" => Some(PitchClass::C),
            "C#" => Some(PitchClass::Cs),
            "D" => Some(PitchClass::D),
            "D#" => Some(PitchClass::Ds),
            "E" => Some(PitchClass::E),
            "F" => Some(PitchClass::F),
            "F#" => Some(PitchClass::Fs),
            "G" => Some(PitchClass::G),
            "G#" => Some(PitchClass::Gs),
            "A" => Some(PitchClass::A),
            "A#" => Some(PitchClass::As),
            "B" => Some(PitchClass::B),
            _ => None,
        }
    }

    /// Transpose by semitones
    pub fn transpose(self, semitones: Semitones) -> Self {
        let new_pc = (self.value() as i8 + semitones).rem_euclid(12) as u8;
        PitchClass::from_value(new_pc)
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PitchClass::C => "C",
            PitchClass::Cs => "C#",
            PitchClass::D => "D",
            PitchClass::Ds => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::Fs => "F#",
            PitchClass::G => "G",
            PitchClass::Gs => "G#",
            PitchClass::A => "A",
            PitchClass::As => "A#",
            PitchClass::B => "B",
        };
        f.write_str(name)
    }
}

/// Scales in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleType {
    Major,
    NaturalMinor,
    HarmonicMinor,
    Gypsy,      // Hungarian minor
    Neapolitan, // Neapolitan major
    Flamenco,   // Phrygian dominant
}

impl ScaleType {
    /// Every catalog entry
    pub const ALL: [ScaleType; 6] = [
        ScaleType::Major,
        ScaleType::NaturalMinor,
        ScaleType::HarmonicMinor,
        ScaleType::Gypsy,
        ScaleType::Neapolitan,
        ScaleType::Flamenco,
    ];

    /// Get the intervals (semitones from root) for this scale type
    pub fn intervals(self) -> [u8; SCALE_DEGREES] {
        match self {
            ScaleType::Major => [0, 2, 4, 5, 7, 9, 11],
            ScaleType::NaturalMinor => [0, 2, 3, 5, 7, 8, 10],
            ScaleType::HarmonicMinor => [0, 2, 3, 5, 7, 8, 11],
            ScaleType::Gypsy => [0, 2, 3, 6, 7, 8, 11],
            ScaleType::Neapolitan => [0, 1, 3, 5, 7, 9, 11],
            ScaleType::Flamenco => [0, 1, 4, 5, 7, 8, 10],
        }
    }

    /// Parse scale type from a description, ignoring case, spaces, `-` and `_`
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase().replace([' ', '-', '_'], "");
        match s.as_str() {
            "major" => Some(ScaleType::Major),
            "minor" | "naturalminor" => Some(ScaleType::NaturalMinor),
            "harmonicminor" => Some(ScaleType::HarmonicMinor),
            "gypsy" => Some(ScaleType::Gypsy),
            "neapolitan" | "neopolitan" => Some(ScaleType::Neapolitan),
            "flamenco" => Some(ScaleType::Flamenco),
            _ => None,
        }
    }

    /// Get a human-readable name for this scale type
    pub fn name(self) -> &'static str {
        match self {
            ScaleType::Major => "Major",
            ScaleType::NaturalMinor => "Natural Minor",
            ScaleType::HarmonicMinor => "Harmonic Minor",
            ScaleType::Gypsy => "Gypsy",
            ScaleType::Neapolitan => "Neapolitan",
            ScaleType::Flamenco => "Flamenco",
        }
    }
}

impl fmt::Display for ScaleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A resolved key: root, scale and the seven root-transposed degrees
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
    root: PitchClass,
    scale_type: ScaleType,
    degrees: [PitchClass; SCALE_DEGREES],
}

impl Key {
    /// Create a key from a root and scale type
    pub fn new(root: PitchClass, scale_type: ScaleType) -> Self {
        let degrees = scale_type
            .intervals()
            .map(|interval| root.transpose(interval as Semitones));

        Self {
            root,
            scale_type,
            degrees,
        }
    }

    /// Resolve free text of the form `"<ROOT> <SCALE DESCRIPTION>"`.
    ///
    /// The text is split at the first whitespace; the description may
    /// contain further spaces (`"C# harmonic minor"`).
    pub fn resolve(text: &str) -> Result<Self, KeyError> {
        let text = text.trim();
        let (root_str, description) = match text.split_once(char::is_whitespace) {
            Some((root, rest)) => (root, rest.trim()),
            None => (text, ""),
        };

        let root = PitchClass::parse(root_str)
            .ok_or_else(|| KeyError::InvalidRoot(root_str.to_string()))?;
        if description.is_empty() {
            return Err(KeyError::MissingScale(text.to_string()));
        }
        let scale_type = ScaleType::parse(description)
            .ok_or_else(|| KeyError::UnknownScale(description.to_string()))?;

        Ok(Key::new(root, scale_type))
    }

    /// Get the root pitch class
    pub fn root(&self) -> PitchClass {
        self.root
    }

    /// Get the scale type
    pub fn scale_type(&self) -> ScaleType {
        self.scale_type
    }

    /// Get the seven scale degrees, root first
    pub fn degrees(&self) -> &[PitchClass; SCALE_DEGREES] {
        &self.degrees
    }

    /// Get the pitch class at a 0-based degree index
    pub fn degree(&self, index: usize) -> Option<PitchClass> {
        self.degrees.get(index).copied()
    }

    /// Get the 0-based degree index of a pitch class, if it is in the key
    pub fn index_of(&self, pitch: PitchClass) -> Option<usize> {
        self.degrees.iter().position(|&p| p == pitch)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.root, self.scale_type)
    }
}
