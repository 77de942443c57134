// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Conditional probability models for pitch and duration choice.
//!
//! A model hands the generator cumulative thresholds; a uniform draw in
//! [0, 1) selects the first threshold it falls below, with the final
//! threshold treated as a closed bound. Thresholds are validated on every
//! draw so a broken model fails loudly instead of stalling generation.

use std::fmt;

use thiserror::Error;

use crate::music::scale::SCALE_DEGREES;
use crate::music::{Duration, Key, Note};

/// Durations a generated note may take, in threshold order
pub const CHOICE_DURATIONS: [Duration; 4] = [
    Duration::Half,
    Duration::Quarter,
    Duration::Eighth,
    Duration::Sixteenth,
];

/// How far the final threshold may sit from 1.0
const COMPLETION_TOLERANCE: f64 = 1e-9;

/// Violations of the cumulative threshold contract
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ThresholdError {
    #[error("no thresholds supplied")]
    Empty,
    #[error("threshold {index} is not a probability: {value}")]
    OutOfRange { index: usize, value: f64 },
    #[error("threshold {index} ({value}) is below the threshold before it")]
    Decreasing { index: usize, value: f64 },
    #[error("final threshold {0} does not reach 1.0")]
    Incomplete(f64),
    #[error("draw {0} resolved no threshold")]
    Unresolved(f64),
}

/// Policy producing cumulative thresholds for the generator's choices
pub trait ProbabilityModel: fmt::Debug {
    /// Thresholds over the seven scale degrees of `key`, conditioned on the
    /// notes generated so far.
    fn degree_thresholds(&self, key: &Key, history: &[Note]) -> [f64; SCALE_DEGREES];

    /// Thresholds over [`CHOICE_DURATIONS`], conditioned on the durations
    /// generated so far.
    fn duration_thresholds(&self, history: &[Duration]) -> [f64; 4];
}

/// Check that thresholds are finite probabilities, non-decreasing, and end
/// at 1.0.
pub fn validate(thresholds: &[f64]) -> Result<(), ThresholdError> {
    let last = *thresholds.last().ok_or(ThresholdError::Empty)?;
    let mut previous = 0.0;

    for (index, &value) in thresholds.iter().enumerate() {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(ThresholdError::OutOfRange { index, value });
        }
        if value < previous {
            return Err(ThresholdError::Decreasing { index, value });
        }
        previous = value;
    }

    if (1.0 - last).abs() > COMPLETION_TOLERANCE {
        return Err(ThresholdError::Incomplete(last));
    }
    Ok(())
}

/// Pick the index selected by `draw`: the first threshold the draw is
/// strictly below, or the last threshold if the draw equals it.
pub fn select(thresholds: &[f64], draw: f64) -> Result<usize, ThresholdError> {
    validate(thresholds)?;
    let last = thresholds.len() - 1;

    thresholds
        .iter()
        .enumerate()
        .find(|&(index, &t)| draw < t || (index == last && draw <= t))
        .map(|(index, _)| index)
        .ok_or(ThresholdError::Unresolved(draw))
}

/// Turn non-negative weights into cumulative thresholds ending exactly at 1.0
pub fn cumulative<const N: usize>(weights: [f64; N]) -> [f64; N] {
    let total: f64 = weights.iter().sum();
    let mut thresholds = [0.0; N];
    let mut running = 0.0;

    for (threshold, weight) in thresholds.iter_mut().zip(weights) {
        running += weight / total;
        *threshold = running.min(1.0);
    }
    if let Some(last) = thresholds.last_mut() {
        *last = 1.0;
    }
    thresholds
}

/// Count of sixteenth notes at the end of a duration history
pub fn trailing_sixteenths(history: &[Duration]) -> usize {
    history
        .iter()
        .rev()
        .take_while(|&&d| d == Duration::Sixteenth)
        .count()
}

/// Weight by scale-step distance from the previous degree (0 = repeat)
const STEP_WEIGHTS: [f64; 4] = [0.10, 0.30, 0.15, 0.05];

/// Duration weights (half, quarter, eighth, sixteenth) after each duration
const AFTER_HALF: [f64; 4] = [0.15, 0.40, 0.30, 0.15];
const AFTER_QUARTER: [f64; 4] = [0.15, 0.35, 0.35, 0.15];
const AFTER_EIGHTH: [f64; 4] = [0.05, 0.25, 0.50, 0.20];
const AFTER_SIXTEENTHS: [f64; 4] = [0.05, 0.30, 0.35, 0.30];

/// First-order Markov model.
///
/// Degrees are weighted by their circular scale-step distance from the last
/// sounded degree. Durations depend on the previous duration; an unpaired
/// sixteenth is always completed with another sixteenth.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstOrderMarkov;

impl FirstOrderMarkov {
    pub fn new() -> Self {
        Self
    }
}

impl ProbabilityModel for FirstOrderMarkov {
    fn degree_thresholds(&self, key: &Key, history: &[Note]) -> [f64; SCALE_DEGREES] {
        let previous = history
            .iter()
            .rev()
            .find_map(|note| note.pitch())
            .and_then(|pitch| key.index_of(pitch))
            .unwrap_or(0);

        let mut weights = [0.0; SCALE_DEGREES];
        for (degree, weight) in weights.iter_mut().enumerate() {
            let distance = degree.abs_diff(previous);
            let distance = distance.min(SCALE_DEGREES - distance);
            *weight = STEP_WEIGHTS[distance];
        }
        cumulative(weights)
    }

    fn duration_thresholds(&self, history: &[Duration]) -> [f64; 4] {
        if trailing_sixteenths(history) % 2 == 1 {
            return [0.0, 0.0, 0.0, 1.0];
        }

        let weights = match history.last() {
            Some(Duration::Half) => AFTER_HALF,
            Some(Duration::Eighth) => AFTER_EIGHTH,
            Some(Duration::Sixteenth) => AFTER_SIXTEENTHS,
            _ => AFTER_QUARTER,
        };
        cumulative(weights)
    }
}
