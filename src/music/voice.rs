// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Voice registers.
//!
//! The register code doubles as the home octave of the line and selects
//! the motif catalog.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the four voice registers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Voice {
    Bass,
    Tenor,
    Alto,
    Soprano,
}

impl Voice {
    /// All voices, lowest first
    pub const ALL: [Voice; 4] = [Voice::Bass, Voice::Tenor, Voice::Alto, Voice::Soprano];

    /// Register code (2-5)
    pub fn code(self) -> u8 {
        match self {
            Voice::Bass => 2,
            Voice::Tenor => 3,
            Voice::Alto => 4,
            Voice::Soprano => 5,
        }
    }

    /// Voice from its register code
    pub fn from_code(code: u8) -> Option<Self> {
        Voice::ALL.into_iter().find(|v| v.code() == code)
    }

    /// Starting octave of a line in this register
    pub fn home_octave(self) -> i8 {
        self.code() as i8
    }

    /// Upper bound of the random modulus deciding motif insertion.
    /// A lower bound inserts motifs more often.
    pub fn motif_modulus_max(self) -> usize {
        match self {
            Voice::Soprano | Voice::Bass => 24,
            Voice::Tenor | Voice::Alto => 16,
        }
    }

    /// Parse a voice from its name or register code
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        match s.as_str() {
            "bass" | "2" => Some(Voice::Bass),
            "tenor" | "3" => Some(Voice::Tenor),
            "alto" | "4" => Some(Voice::Alto),
            "soprano" | "5" => Some(Voice::Soprano),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Voice::Bass => "BASS",
            Voice::Tenor => "TENOR",
            Voice::Alto => "ALTO",
            Voice::Soprano => "SOPRANO",
        }
    }
}

impl fmt::Display for Voice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
