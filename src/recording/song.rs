// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Song container: one timeline track per voice.
//!
//! Notes are written as delta-timed note-on/note-off pairs. A note-on sits
//! at tick 0 of the note's slice and its note-off at the slice's end. Rests
//! emit nothing; their length is carried onto the next event of the track.

use std::io;

use thiserror::Error;

use crate::music::pitch::{pitch_token, resolve_duration, resolve_pitch, PitchError};
use crate::music::{Duration, Note, PitchClass};

/// Microseconds in one minute
pub const MICROSECONDS_PER_MINUTE: u32 = 60_000_000;

/// Errors raised while building or writing a song
#[derive(Debug, Error)]
pub enum SongError {
    #[error(transparent)]
    Pitch(#[from] PitchError),
    #[error("track {index} does not exist (song has {count} tracks)")]
    NoTrack { index: usize, count: usize },
    #[error("track {0} has already been ended")]
    TrackEnded(usize),
    #[error("track {0} was never ended; call mark_song_end first")]
    Unterminated(usize),
    #[error("tempo must be positive")]
    InvalidTempo,
    #[error("failed to write MIDI data")]
    Io(#[from] io::Error),
}

/// Kinds of events on a track timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    NoteOn { pitch: u8, velocity: u8 },
    NoteOff { pitch: u8 },
    EndOfTrack,
}

/// An event with its delta time from the previous event on the track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineEvent {
    pub delta: u32,
    pub kind: EventKind,
}

impl TimelineEvent {
    pub fn new(delta: u32, kind: EventKind) -> Self {
        Self { delta, kind }
    }
}

/// A single voice's timeline
#[derive(Debug, Clone, Default)]
pub struct Track {
    name: String,
    events: Vec<TimelineEvent>,
    /// Rest ticks not yet attached to an event
    pending: u32,
    ended: bool,
}

impl Track {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn events(&self) -> &[TimelineEvent] {
        &self.events
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Total length of the track in ticks, including trailing rests
    pub fn length_ticks(&self) -> u64 {
        let events: u64 = self.events.iter().map(|e| e.delta as u64).sum();
        events + self.pending as u64
    }
}

/// Name given to a song until one is set
pub const DEFAULT_SONG_NAME: &str = "Untitled";

/// A multi-track song at a fixed tempo
#[derive(Debug, Clone)]
pub struct Song {
    name: String,
    tempo: u32,
    tracks: Vec<Track>,
}

impl Song {
    /// Create a song with `num_tracks` empty tracks
    pub fn new(num_tracks: usize, tempo: u32) -> Result<Self, SongError> {
        if tempo == 0 {
            return Err(SongError::InvalidTempo);
        }
        let tracks = (0..num_tracks)
            .map(|i| Track {
                name: format!("Track {}", i + 1),
                ..Default::default()
            })
            .collect();
        Ok(Self {
            name: DEFAULT_SONG_NAME.to_string(),
            tempo,
            tracks,
        })
    }

    /// Song title, written as the name of the tempo track
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Tempo in beats per minute
    pub fn tempo(&self) -> u32 {
        self.tempo
    }

    /// Microseconds per beat as the three big-endian bytes of a tempo event
    pub fn tempo_data(&self) -> [u8; 3] {
        let micros = MICROSECONDS_PER_MINUTE / self.tempo;
        let [_, a, b, c] = micros.min(0x00FF_FFFF).to_be_bytes();
        [a, b, c]
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn track(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// Name a track
    pub fn set_track_name(&mut self, index: usize, name: impl Into<String>) -> Result<(), SongError> {
        self.track_mut(index)?.name = name.into();
        Ok(())
    }

    /// Append a sounded note to a track
    pub fn add_note(
        &mut self,
        index: usize,
        pitch: PitchClass,
        octave: i8,
        duration: Duration,
        velocity: u8,
    ) -> Result<(), SongError> {
        let value = resolve_pitch(&pitch_token(pitch, octave))?;
        let Some(value) = value else {
            return self.add_rest(index, duration);
        };
        let (start, end) = resolve_duration(duration);

        let track = self.open_track(index)?;
        let on_delta = track.pending + start;
        track.pending = 0;
        track.events.push(TimelineEvent::new(
            on_delta,
            EventKind::NoteOn {
                pitch: value,
                velocity: velocity.min(127),
            },
        ));
        track
            .events
            .push(TimelineEvent::new(end - start, EventKind::NoteOff { pitch: value }));
        Ok(())
    }

    /// Append a rest to a track. No event is emitted until the next note.
    pub fn add_rest(&mut self, index: usize, duration: Duration) -> Result<(), SongError> {
        let (_, end) = resolve_duration(duration);
        let track = self.open_track(index)?;
        track.pending += end;
        Ok(())
    }

    /// Write a line of notes, in order, to a track
    pub fn write_sequence(&mut self, index: usize, notes: &[Note]) -> Result<(), SongError> {
        for note in notes {
            match note.pitch() {
                Some(pitch) => {
                    self.add_note(index, pitch, note.octave(), note.duration(), note.velocity())?
                }
                None => self.add_rest(index, note.duration())?,
            }
        }
        Ok(())
    }

    /// End every open track. Must be called before the song is exported.
    pub fn mark_song_end(&mut self) {
        for track in self.tracks.iter_mut().filter(|t| !t.ended) {
            let delta = track.pending;
            track.pending = 0;
            track.events.push(TimelineEvent::new(delta, EventKind::EndOfTrack));
            track.ended = true;
        }
    }

    /// Check that every track has been ended
    pub fn ensure_ended(&self) -> Result<(), SongError> {
        match self.tracks.iter().position(|t| !t.ended) {
            Some(index) => Err(SongError::Unterminated(index)),
            None => Ok(()),
        }
    }

    fn track_mut(&mut self, index: usize) -> Result<&mut Track, SongError> {
        let count = self.tracks.len();
        self.tracks
            .get_mut(index)
            .ok_or(SongError::NoTrack { index, count })
    }

    fn open_track(&mut self, index: usize) -> Result<&mut Track, SongError> {
        let track = self.track_mut(index)?;
        if track.ended {
            return Err(SongError::TrackEnded(index));
        }
        Ok(track)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_on_at_slice_start_off_at_duration() {
        let mut song = Song::new(1, 180).unwrap();
        song.add_note(0, PitchClass::A, 4, Duration::Quarter, 20).unwrap();
        song.add_note(0, PitchClass::C, 5, Duration::Half, 20).unwrap();

        assert_eq!(
            song.track(0).unwrap().events(),
            &[
                TimelineEvent::new(0, EventKind::NoteOn { pitch: 57, velocity: 20 }),
                TimelineEvent::new(16, EventKind::NoteOff { pitch: 57 }),
                TimelineEvent::new(0, EventKind::NoteOn { pitch: 60, velocity: 20 }),
                TimelineEvent::new(32, EventKind::NoteOff { pitch: 60 }),
            ]
        );
    }

    #[test]
    fn test_rest_emits_no_note_on() {
        let mut song = Song::new(1, 120).unwrap();
        song.add_rest(0, Duration::Quarter).unwrap();
        assert!(song.track(0).unwrap().events().is_empty());

        song.add_rest(0, Duration::Eighth).unwrap();
        song.add_note(0, PitchClass::E, 4, Duration::Eighth, 30).unwrap();
        let events = song.track(0).unwrap().events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].delta, 24);
        assert_eq!(events[1].delta, 8);
        assert_eq!(song.track(0).unwrap().length_ticks(), 32);
    }

    #[test]
    fn test_write_sequence_handles_rests() {
        let notes = [
            Note::new(PitchClass::G, 3, Duration::Quarter),
            Note::rest(Duration::Quarter),
            Note::new(PitchClass::G, 3, Duration::Sixteenth),
        ];
        let mut song = Song::new(2, 120).unwrap();
        song.write_sequence(1, &notes).unwrap();

        let events = song.track(1).unwrap().events();
        let ons = events
            .iter()
            .filter(|e| matches!(e.kind, EventKind::NoteOn { .. }))
            .count();
        assert_eq!(ons, 2);
        assert_eq!(events[2].delta, 16);
        assert!(song.track(0).unwrap().events().is_empty());
    }

    #[test]
    fn test_octave_out_of_range_propagates() {
        let mut song = Song::new(1, 120).unwrap();
        let result = song.add_note(0, PitchClass::C, 9, Duration::Quarter, 20);
        assert!(matches!(
            result,
            Err(SongError::Pitch(PitchError::OctaveOutOfRange(9)))
        ));
    }

    #[test]
    fn test_missing_track() {
        let mut song = Song::new(1, 120).unwrap();
        let result = song.add_rest(3, Duration::Quarter);
        assert!(matches!(result, Err(SongError::NoTrack { index: 3, count: 1 })));
    }

    #[test]
    fn test_mark_song_end() {
        let mut song = Song::new(2, 120).unwrap();
        assert!(matches!(song.ensure_ended(), Err(SongError::Unterminated(0))));

        song.add_rest(1, Duration::Whole).unwrap();
        song.mark_song_end();
        assert!(song.ensure_ended().is_ok());
        assert_eq!(
            song.track(1).unwrap().events(),
            &[TimelineEvent::new(64, EventKind::EndOfTrack)]
        );

        let result = song.add_note(0, PitchClass::C, 4, Duration::Quarter, 20);
        assert!(matches!(result, Err(SongError::TrackEnded(0))));
    }

    #[test]
    fn test_tempo_data() {
        // 180 BPM = 333333 microseconds per beat = 0x05_16_15
        let song = Song::new(1, 180).unwrap();
        assert_eq!(song.tempo_data(), [0x05, 0x16, 0x15]);
        assert_eq!(song.name(), DEFAULT_SONG_NAME);
        assert!(matches!(Song::new(1, 0), Err(SongError::InvalidTempo)));
    }
}
