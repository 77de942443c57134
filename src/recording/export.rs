// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Standard MIDI file export.
//!
//! Exports a song as a Type 0 or Type 1 MIDI file.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use super::song::{EventKind, Song, SongError, Track};
use crate::music::TICKS_PER_QUARTER;

/// MIDI file format type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MidiFileFormat {
    /// Type 0: Single track with all channels
    Type0,
    /// Type 1: Multiple simultaneous tracks
    #[default]
    Type1,
}

/// Raw MIDI event with an absolute tick
#[derive(Debug, Clone)]
struct MidiExportEvent {
    tick: u64,
    data: Vec<u8>,
}

impl MidiExportEvent {
    fn note_on(tick: u64, channel: u8, note: u8, velocity: u8) -> Self {
        Self {
            tick,
            data: vec![0x90 | (channel & 0x0F), note & 0x7F, velocity & 0x7F],
        }
    }

    fn note_off(tick: u64, channel: u8, note: u8) -> Self {
        Self {
            tick,
            data: vec![0x80 | (channel & 0x0F), note & 0x7F, 0],
        }
    }

    fn tempo(tick: u64, data: [u8; 3]) -> Self {
        let mut bytes = vec![0xFF, 0x51, 0x03];
        bytes.extend_from_slice(&data);
        Self { tick, data: bytes }
    }

    fn track_name(tick: u64, name: &str) -> Self {
        let bytes = name.as_bytes();
        let len = bytes.len().min(127);
        let mut data = vec![0xFF, 0x03, len as u8];
        data.extend_from_slice(&bytes[..len]);
        Self { tick, data }
    }

    fn end_of_track(tick: u64) -> Self {
        Self {
            tick,
            data: vec![0xFF, 0x2F, 0x00],
        }
    }
}

/// MIDI file exporter
#[derive(Debug, Clone, Default)]
pub struct MidiExporter {
    format: MidiFileFormat,
}

impl MidiExporter {
    /// Create a new exporter
    pub fn new(format: MidiFileFormat) -> Self {
        Self { format }
    }

    /// Get format
    pub fn format(&self) -> MidiFileFormat {
        self.format
    }

    /// Export to file
    pub fn export<P: AsRef<Path>>(&self, song: &Song, path: P) -> Result<(), SongError> {
        song.ensure_ended()?;
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        self.write(song, &mut writer)?;
        writer.flush()?;
        info!(path = %path.as_ref().display(), tracks = song.tracks().len(), "wrote MIDI file");
        Ok(())
    }

    /// Export to bytes
    pub fn export_to_bytes(&self, song: &Song) -> Result<Vec<u8>, SongError> {
        let mut buffer = Vec::new();
        self.write(song, &mut buffer)?;
        Ok(buffer)
    }

    /// Write MIDI data to writer
    pub fn write<W: Write>(&self, song: &Song, writer: &mut W) -> Result<(), SongError> {
        song.ensure_ended()?;
        match self.format {
            MidiFileFormat::Type0 => self.write_type0(song, writer),
            MidiFileFormat::Type1 => self.write_type1(song, writer),
        }
    }

    /// Write Type 0 MIDI file (single track)
    fn write_type0<W: Write>(&self, song: &Song, writer: &mut W) -> Result<(), SongError> {
        let mut events = vec![MidiExportEvent::tempo(0, song.tempo_data())];
        let mut end = 0u64;

        for (index, track) in song.tracks().iter().enumerate() {
            let (track_events, track_end) = track_events(track, channel_for(index));
            events.extend(track_events);
            end = end.max(track_end);
        }

        // Stable sort keeps each track's note-off before a note-on at the same tick
        events.sort_by_key(|e| e.tick);
        events.push(MidiExportEvent::end_of_track(end));

        write_header(writer, 0, 1)?;
        write_track(writer, &events)
    }

    /// Write Type 1 MIDI file (tempo track plus one track per voice)
    fn write_type1<W: Write>(&self, song: &Song, writer: &mut W) -> Result<(), SongError> {
        let num_tracks = song.tracks().len() + 1;
        write_header(writer, 1, num_tracks as u16)?;

        let tempo_events = vec![
            MidiExportEvent::track_name(0, song.name()),
            MidiExportEvent::tempo(0, song.tempo_data()),
            MidiExportEvent::end_of_track(0),
        ];
        write_track(writer, &tempo_events)?;

        for (index, track) in song.tracks().iter().enumerate() {
            let mut events = vec![MidiExportEvent::track_name(0, track.name())];
            let (track_events, end) = track_events(track, channel_for(index));
            events.extend(track_events);
            events.push(MidiExportEvent::end_of_track(end));
            write_track(writer, &events)?;
        }

        Ok(())
    }
}

/// Channel for a track, skipping the General MIDI percussion channel
fn channel_for(index: usize) -> u8 {
    let channel = (index % 15) as u8;
    if channel >= 9 {
        channel + 1
    } else {
        channel
    }
}

/// Convert a delta-timed track to absolute events, returning the end tick
fn track_events(track: &Track, channel: u8) -> (Vec<MidiExportEvent>, u64) {
    let mut events = Vec::new();
    let mut tick = 0u64;

    for event in track.events() {
        tick += event.delta as u64;
        match event.kind {
            EventKind::NoteOn { pitch, velocity } => {
                events.push(MidiExportEvent::note_on(tick, channel, pitch, velocity))
            }
            EventKind::NoteOff { pitch } => {
                events.push(MidiExportEvent::note_off(tick, channel, pitch))
            }
            EventKind::EndOfTrack => {}
        }
    }
    (events, tick)
}

/// Write MIDI file header chunk
fn write_header<W: Write>(writer: &mut W, format: u16, num_tracks: u16) -> Result<(), SongError> {
    writer.write_all(b"MThd")?;
    // Chunk length (always 6)
    writer.write_all(&[0, 0, 0, 6])?;
    writer.write_all(&format.to_be_bytes())?;
    writer.write_all(&num_tracks.to_be_bytes())?;
    writer.write_all(&(TICKS_PER_QUARTER as u16).to_be_bytes())?;
    Ok(())
}

/// Write a track chunk; events must be sorted and end with end-of-track
fn write_track<W: Write>(writer: &mut W, events: &[MidiExportEvent]) -> Result<(), SongError> {
    let mut track_data = Vec::new();
    let mut last_tick = 0u64;

    for event in events {
        let delta = event.tick.saturating_sub(last_tick);
        write_variable_length(&mut track_data, delta as u32);
        track_data.extend_from_slice(&event.data);
        last_tick = event.tick;
    }

    writer.write_all(b"MTrk")?;
    writer.write_all(&(track_data.len() as u32).to_be_bytes())?;
    writer.write_all(&track_data)?;
    Ok(())
}

/// Append a variable-length quantity
fn write_variable_length(buffer: &mut Vec<u8>, mut value: u32) {
    let mut bytes = vec![(value & 0x7F) as u8];
    value >>= 7;

    while value > 0 {
        bytes.push((value & 0x7F) as u8 | 0x80);
        value >>= 7;
    }

    bytes.reverse();
    buffer.extend_from_slice(&bytes);
}
