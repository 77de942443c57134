// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Motif catalogs, one per voice register.
//!
//! Catalog files are line oriented: each non-blank, non-comment line is one
//! motif written as whitespace-separated `DEGREE:DURATION` pairs.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::music::scale::SCALE_DEGREES;
use crate::music::{Duration, Key, Note, Voice};

const SOPRANO_DB: &str = include_str!("../../db/motifs_soprano.txt");
const ALTO_DB: &str = include_str!("../../db/motifs_alto.txt");
const TENOR_DB: &str = include_str!("../../db/motifs_tenor.txt");
const BASS_DB: &str = include_str!("../../db/motifs_bass.txt");

/// Errors raised while loading a motif catalog
#[derive(Debug, Error)]
pub enum MotifError {
    #[error("failed to read motif file {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("line {line}: scale degree {degree} out of range 0-6")]
    DegreeOutOfRange { line: usize, degree: usize },
    #[error("motif step {index}: scale degree {degree} out of range 0-6")]
    InvalidStep { index: usize, degree: usize },
}

/// One step of a motif: a 0-based scale degree and a duration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotifStep {
    pub degree: usize,
    pub duration: Duration,
}

/// A pre-authored melodic fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Motif {
    steps: Vec<MotifStep>,
}

impl Motif {
    /// Create a motif from steps. Every degree must be a scale index 0-6.
    pub fn new(steps: Vec<MotifStep>) -> Result<Self, MotifError> {
        if let Some((index, step)) = steps
            .iter()
            .enumerate()
            .find(|(_, step)| step.degree >= SCALE_DEGREES)
        {
            return Err(MotifError::InvalidStep {
                index,
                degree: step.degree,
            });
        }
        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[MotifStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Realize the motif in a key at the given octave
    pub fn realize<'a>(&'a self, key: &'a Key, octave: i8) -> impl Iterator<Item = Note> + 'a {
        // Degrees were checked in `new`, so every step resolves
        self.steps.iter().filter_map(move |step| {
            key.degree(step.degree)
                .map(|pitch| Note::new(pitch, octave, step.duration))
        })
    }
}

/// Read-only collection of motifs for a voice register
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MotifCatalog {
    motifs: Vec<Motif>,
}

impl MotifCatalog {
    /// Create a catalog from motifs
    pub fn new(motifs: Vec<Motif>) -> Self {
        Self { motifs }
    }

    /// Catalog file name for a voice register
    pub fn file_name(voice: Voice) -> &'static str {
        match voice {
            Voice::Bass => "motifs_bass.txt",
            Voice::Tenor => "motifs_tenor.txt",
            Voice::Alto => "motifs_alto.txt",
            Voice::Soprano => "motifs_soprano.txt",
        }
    }

    /// Load the catalog bundled with the crate for a voice register
    pub fn builtin(voice: Voice) -> Result<Self, MotifError> {
        let text = match voice {
            Voice::Bass => BASS_DB,
            Voice::Tenor => TENOR_DB,
            Voice::Alto => ALTO_DB,
            Voice::Soprano => SOPRANO_DB,
        };
        Self::parse(text)
    }

    /// Load a voice register's catalog from a directory of motif files
    pub fn load_dir<P: AsRef<Path>>(dir: P, voice: Voice) -> Result<Self, MotifError> {
        let path = dir.as_ref().join(Self::file_name(voice));
        let text = fs::read_to_string(&path).map_err(|source| MotifError::Io {
            path: path.clone(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Parse catalog text
    pub fn parse(text: &str) -> Result<Self, MotifError> {
        let mut motifs = Vec::new();

        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let content = raw.split('#').next().unwrap_or("").trim();
            if content.is_empty() {
                continue;
            }

            let steps = content
                .split_whitespace()
                .map(|pair| parse_step(pair, line))
                .collect::<Result<Vec<_>, _>>()?;
            motifs.push(Motif::new(steps)?);
        }

        Ok(Self { motifs })
    }

    pub fn motifs(&self) -> &[Motif] {
        &self.motifs
    }

    pub fn get(&self, index: usize) -> Option<&Motif> {
        self.motifs.get(index)
    }

    pub fn len(&self) -> usize {
        self.motifs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.motifs.is_empty()
    }

    /// Length of the longest motif, in notes
    pub fn longest(&self) -> usize {
        self.motifs.iter().map(Motif::len).max().unwrap_or(0)
    }
}

fn parse_step(pair: &str, line: usize) -> Result<MotifStep, MotifError> {
    let parse_error = |message: String| MotifError::Parse { line, message };

    let (degree, duration) = pair
        .split_once(':')
        .ok_or_else(|| parse_error(format!("expected DEGREE:DURATION, found '{}'", pair)))?;
    let degree: usize = degree
        .parse()
        .map_err(|_| parse_error(format!("invalid scale degree '{}'", degree)))?;
    if degree >= SCALE_DEGREES {
        return Err(MotifError::DegreeOutOfRange { line, degree });
    }
    let duration = duration
        .parse::<u32>()
        .ok()
        .and_then(Duration::from_denominator)
        .ok_or_else(|| parse_error(format!("invalid duration '{}'", duration)))?;

    Ok(MotifStep { degree, duration })
}
