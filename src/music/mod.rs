// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Music theory utilities for Cantus.
//!
//! This module provides the scale catalog, key resolution, pitch and
//! duration mapping, and the note value the generator builds lines from.

pub mod note;
pub mod pitch;
pub mod scale;
pub mod voice;

pub use note::{Note, DEFAULT_VELOCITY};
pub use pitch::{resolve_duration, resolve_pitch, Duration, PitchError, TICKS_PER_QUARTER};
pub use scale::{Key, KeyError, PitchClass, ScaleType};
pub use voice::Voice;
