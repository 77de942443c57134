// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Song assembly and export.
//!
//! This module provides:
//! - The song container that turns note lines into track timelines
//! - Standard MIDI file export

pub mod export;
pub mod song;

pub use export::{MidiExporter, MidiFileFormat};
pub use song::{EventKind, Song, SongError, TimelineEvent, Track};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_song_creation() {
        let song = Song::new(4, 180).unwrap();
        assert_eq!(song.tracks().len(), 4);
        assert_eq!(song.tempo(), 180);
    }

    #[test]
    fn test_exporter_creation() {
        let exporter = MidiExporter::default();
        assert_eq!(exporter.format(), MidiFileFormat::Type1);
    }
}
