// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Cantus: stochastic melodic line generation.
//!
//! A [`SequenceGenerator`] grows a line note by note in a key and voice
//! register, recalling captured passages and inserting pre-authored motifs
//! along the way. Finished lines are written to a [`Song`] and exported as
//! a Standard MIDI File.

pub mod config;
pub mod generators;
pub mod motifs;
pub mod music;
pub mod recording;

pub use config::CompositionFile;
pub use generators::{GenerationError, GeneratorSettings, NoteSequence, SequenceGenerator};
pub use music::{Duration, Key, Note, PitchClass, ScaleType, Voice};
pub use recording::{MidiExporter, MidiFileFormat, Song};
