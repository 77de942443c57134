// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Pre-authored melodic fragments.
//!
//! Each voice register has its own catalog of motifs written as scale-degree
//! and duration pairs. The built-in catalogs are compiled into the crate;
//! a directory of replacement files can be loaded instead.

pub mod catalog;

pub use catalog::{Motif, MotifCatalog, MotifError, MotifStep};
