// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Generative engine for melodic lines.
//!
//! This module provides the sequence generator and the probability models
//! that drive its note and duration choices.

pub mod probability;
pub mod sequence;

use thiserror::Error;

use crate::motifs::MotifError;
use crate::music::KeyError;

pub use probability::{FirstOrderMarkov, ProbabilityModel, ThresholdError};
pub use sequence::{GeneratorSettings, NoteSequence, Passage, SequenceGenerator, StepInsertions};

/// Errors that stop a generation run
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Key(#[from] KeyError),
    #[error("failed to load motifs: {0}")]
    Motif(#[from] MotifError),
    #[error("probability model broke its contract: {0}")]
    Thresholds(#[from] ThresholdError),
    #[error("invalid generator settings: {0}")]
    InvalidSettings(String),
}
