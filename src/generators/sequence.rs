// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! History-aware melodic line generator.
//!
//! Builds a line note by note from a first-order probability model while
//! drifting around the voice's home octave. Along the way it captures
//! measure-aligned passages of its own output for later replay, and splices
//! in pre-authored motifs. Insertions only happen once every run of
//! sixteenth notes has been completed in pairs.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::probability::{
    select, trailing_sixteenths, FirstOrderMarkov, ProbabilityModel, CHOICE_DURATIONS,
};
use super::GenerationError;
use crate::motifs::MotifCatalog;
use crate::music::{Duration, Key, Note, Voice, DEFAULT_VELOCITY};
use crate::recording::{Song, SongError};

/// Sixty-fourth units in one measure
const MEASURE_UNITS: u64 = 64;

/// Chance per note of stepping down an octave (when at or above home)
const OCTAVE_DOWN_CHANCE: f64 = 0.1;

/// Cumulative chance per note of stepping up an octave (when at or below home)
const OCTAVE_UP_CHANCE: f64 = 0.2;

/// Tunable generator settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorSettings {
    /// Fixed seed for reproducible output; `None` seeds from entropy
    #[serde(default)]
    pub seed: Option<u64>,
    /// Passage lengths must be a multiple of this many measures
    #[serde(default = "default_passage_length")]
    pub passage_length: u32,
    /// Passages may be replayed whenever the line length is a multiple of this
    #[serde(default = "default_passage_ratio")]
    pub passage_ratio: usize,
    /// Velocity of generated notes
    #[serde(default = "default_velocity")]
    pub velocity: u8,
}

fn default_passage_length() -> u32 {
    2
}
fn default_passage_ratio() -> usize {
    16
}
fn default_velocity() -> u8 {
    DEFAULT_VELOCITY
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            seed: None,
            passage_length: default_passage_length(),
            passage_ratio: default_passage_ratio(),
            velocity: default_velocity(),
        }
    }
}

impl GeneratorSettings {
    /// Settings with a fixed seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Default::default()
        }
    }

    fn validate(&self) -> Result<(), GenerationError> {
        if self.passage_length == 0 {
            return Err(GenerationError::InvalidSettings(
                "passage_length must be at least 1".to_string(),
            ));
        }
        if self.passage_ratio == 0 {
            return Err(GenerationError::InvalidSettings(
                "passage_ratio must be at least 1".to_string(),
            ));
        }
        if self.velocity == 0 || self.velocity > 127 {
            return Err(GenerationError::InvalidSettings(format!(
                "velocity {} outside 1-127",
                self.velocity
            )));
        }
        Ok(())
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// A span of earlier output, captured for replay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passage {
    notes: Vec<Note>,
}

impl Passage {
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Total length in whole-note measures (may be fractional)
    pub fn measures(&self) -> f64 {
        measure_units(&self.notes) as f64 / MEASURE_UNITS as f64
    }
}

/// Total length of notes in sixty-fourths of a measure
pub fn measure_units(notes: &[Note]) -> u64 {
    notes
        .iter()
        .map(|n| n.duration().measure_units() as u64)
        .sum()
}

/// True when the most recent run of sixteenth notes is complete: the latest
/// duration is not a sixteenth, or the trailing sixteenth run is even.
pub fn check_duration_history(history: &[Duration]) -> bool {
    trailing_sixteenths(history) % 2 == 0
}

/// True when every maximal run of sixteenth notes has even length
pub fn sixteenth_runs_even(notes: &[Note]) -> bool {
    let mut run = 0usize;
    for note in notes {
        if note.duration() == Duration::Sixteenth {
            run += 1;
        } else {
            if run % 2 != 0 {
                return false;
            }
            run = 0;
        }
    }
    run % 2 == 0
}

/// Notes spliced in by one step, beyond the newly chosen note
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepInsertions {
    /// Notes appended by a passage replay
    pub passage: usize,
    /// Notes appended by a motif
    pub motif: usize,
}

/// Generator state for one run
pub struct SequenceGenerator {
    key: Key,
    voice: Voice,
    current_octave: i8,
    target_length: usize,
    settings: GeneratorSettings,
    motifs: MotifCatalog,
    passages: Vec<Passage>,
    note_history: Vec<Note>,
    duration_history: Vec<Duration>,
    sequence: Vec<Note>,
    model: Box<dyn ProbabilityModel>,
    rng: StdRng,
}

impl SequenceGenerator {
    /// Create a generator with default settings and the built-in motifs
    pub fn new(key: &str, voice: Voice, target_length: usize) -> Result<Self, GenerationError> {
        Self::with_settings(key, voice, target_length, GeneratorSettings::default())
    }

    /// Create a generator with explicit settings and the built-in motifs.
    ///
    /// The key is resolved first; an unknown key fails before any state
    /// exists.
    pub fn with_settings(
        key: &str,
        voice: Voice,
        target_length: usize,
        settings: GeneratorSettings,
    ) -> Result<Self, GenerationError> {
        let key = Key::resolve(key)?;
        settings.validate()?;
        let motifs = MotifCatalog::builtin(voice)?;

        let home = voice.home_octave();
        let seed = Note::new(key.root(), home, Duration::Quarter).with_velocity(settings.velocity);

        Ok(Self {
            key,
            voice,
            current_octave: home,
            target_length,
            rng: settings.rng(),
            settings,
            motifs,
            passages: Vec::new(),
            note_history: vec![seed],
            duration_history: vec![Duration::Quarter],
            sequence: vec![seed],
            model: Box::new(FirstOrderMarkov::new()),
        })
    }

    /// Replace the motif catalog
    pub fn with_motifs(mut self, motifs: MotifCatalog) -> Self {
        self.motifs = motifs;
        self
    }

    /// Replace the probability model
    pub fn with_model(mut self, model: Box<dyn ProbabilityModel>) -> Self {
        self.model = model;
        self
    }

    /// Replace the random source
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    pub fn voice(&self) -> Voice {
        self.voice
    }

    pub fn current_octave(&self) -> i8 {
        self.current_octave
    }

    pub fn target_length(&self) -> usize {
        self.target_length
    }

    pub fn sequence(&self) -> &[Note] {
        &self.sequence
    }

    pub fn note_history(&self) -> &[Note] {
        &self.note_history
    }

    pub fn duration_history(&self) -> &[Duration] {
        &self.duration_history
    }

    pub fn passages(&self) -> &[Passage] {
        &self.passages
    }

    pub fn motifs(&self) -> &MotifCatalog {
        &self.motifs
    }

    /// Length of the longest captured passage
    pub fn longest_passage(&self) -> usize {
        self.passages.iter().map(Passage::len).max().unwrap_or(0)
    }

    /// Length of the longest fragment that can currently be inserted
    pub fn longest_fragment(&self) -> usize {
        self.longest_passage().max(self.motifs.longest())
    }

    /// Most notes a single step can add: the new note, one passage and one
    /// motif.
    pub fn max_step_growth(&self) -> usize {
        1 + self.longest_passage() + self.motifs.longest()
    }

    /// Whether the latest duration leaves no unpaired sixteenth behind
    pub fn check_duration_history(&self) -> bool {
        check_duration_history(&self.duration_history)
    }

    /// Extend the line until it reaches the target length
    pub fn run(&mut self) -> Result<(), GenerationError> {
        while self.sequence.len() < self.target_length {
            self.step()?;
        }
        Ok(())
    }

    /// Run to completion and hand back the finished line
    pub fn generate(mut self) -> Result<NoteSequence, GenerationError> {
        self.run()?;
        info!(
            key = %self.key,
            voice = %self.voice,
            notes = self.sequence.len(),
            passages = self.passages.len(),
            "generated sequence"
        );
        Ok(NoteSequence {
            key: self.key,
            voice: self.voice,
            notes: self.sequence,
        })
    }

    /// One iteration of the main loop: a new note, passage capture, then
    /// the passage replay and motif checks in turn. The motif check sees the
    /// line as left by any replay.
    pub fn step(&mut self) -> Result<StepInsertions, GenerationError> {
        self.drift_octave();
        let note = self.next_note()?;
        self.sequence.push(note);
        self.note_history.push(note);

        self.determine_to_save_passage();

        let mut inserted = StepInsertions::default();
        if self.determine_to_replay_passage() {
            inserted.passage = self.replay_passage();
        }
        if self.determine_to_add_motif() {
            inserted.motif = self.add_motif();
        }
        Ok(inserted)
    }

    /// Random walk around the home octave. Steps down only from at or above
    /// home, up only from at or below home.
    fn drift_octave(&mut self) {
        let home = self.voice.home_octave();
        let chooser: f64 = self.rng.gen();

        if chooser < OCTAVE_DOWN_CHANCE && self.current_octave >= home {
            self.current_octave -= 1;
        } else if chooser < OCTAVE_UP_CHANCE && self.current_octave <= home {
            self.current_octave += 1;
        }
    }

    /// Choose degree and duration from the model. The duration is logged
    /// as soon as it is chosen.
    fn next_note(&mut self) -> Result<Note, GenerationError> {
        let chooser: f64 = self.rng.gen();
        let thresholds = self.model.degree_thresholds(&self.key, &self.note_history);
        let degree = select(&thresholds, chooser)?;

        let chooser: f64 = self.rng.gen();
        let thresholds = self.model.duration_thresholds(&self.duration_history);
        let duration = CHOICE_DURATIONS[select(&thresholds, chooser)?];
        self.duration_history.push(duration);

        let pitch = self.key.degrees()[degree];
        Ok(Note::new(pitch, self.current_octave, duration).with_velocity(self.settings.velocity))
    }

    /// Scan backward from the newest note for a span worth keeping. The scan
    /// stops at the start of history and captures at most one passage.
    fn determine_to_save_passage(&mut self) {
        let passage_units = MEASURE_UNITS * self.settings.passage_length as u64;
        let mut units = 0u64;
        let mut candidate = Vec::new();

        for note in self.note_history.iter().rev() {
            units += note.duration().measure_units() as u64;
            candidate.push(*note);

            if units % passage_units == 0
                && candidate.len() > 3
                && sixteenth_runs_even(&candidate)
            {
                candidate.reverse();
                debug!(
                    notes = candidate.len(),
                    measures = units / MEASURE_UNITS,
                    "captured passage"
                );
                self.passages.push(Passage { notes: candidate });
                return;
            }
        }
    }

    fn determine_to_replay_passage(&self) -> bool {
        !self.passages.is_empty()
            && self.sequence.len() % self.settings.passage_ratio == 0
            && self.check_duration_history()
    }

    /// Replay a random passage at the current octave, returning the
    /// number of notes appended
    fn replay_passage(&mut self) -> usize {
        if self.passages.is_empty() {
            return 0;
        }
        let index = self.rng.gen_range(0..self.passages.len());
        let notes = self.passages[index].notes.clone();
        debug!(index, notes = notes.len(), octave = self.current_octave, "replaying passage");

        let count = notes.len();
        for note in notes {
            self.append(note.in_octave(self.current_octave));
        }
        count
    }

    /// Motifs fire when the line length is divisible by a random modulus
    /// drawn from the voice's range.
    fn determine_to_add_motif(&mut self) -> bool {
        let modulus = self.rng.gen_range(2..=self.voice.motif_modulus_max());
        self.sequence.len() % modulus == 0 && self.check_duration_history()
    }

    /// Splice a random motif in at the current octave, returning the
    /// number of notes appended. An empty catalog inserts nothing.
    fn add_motif(&mut self) -> usize {
        if self.motifs.is_empty() {
            return 0;
        }
        let index = self.rng.gen_range(0..self.motifs.len());
        let Some(motif) = self.motifs.get(index) else {
            return 0;
        };
        let notes: Vec<Note> = motif
            .realize(&self.key, self.current_octave)
            .map(|n| n.with_velocity(self.settings.velocity))
            .collect();
        debug!(index, notes = notes.len(), octave = self.current_octave, "inserting motif");

        let count = notes.len();
        for note in notes {
            self.append(note);
        }
        count
    }

    fn append(&mut self, note: Note) {
        self.sequence.push(note);
        self.note_history.push(note);
        self.duration_history.push(note.duration());
    }
}

impl fmt::Debug for SequenceGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SequenceGenerator")
            .field("key", &self.key)
            .field("voice", &self.voice)
            .field("current_octave", &self.current_octave)
            .field("target_length", &self.target_length)
            .field("sequence_len", &self.sequence.len())
            .field("passages", &self.passages.len())
            .field("model", &self.model)
            .finish()
    }
}

/// A finished line, ready to be written to a track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteSequence {
    pub key: Key,
    pub voice: Voice,
    pub notes: Vec<Note>,
}

impl NoteSequence {
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Write every note, in order, to a song track
    pub fn write_to_track(&self, song: &mut Song, track: usize) -> Result<(), SongError> {
        song.write_sequence(track, &self.notes)
    }
}

impl fmt::Display for NoteSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let degrees: Vec<String> = self.key.degrees().iter().map(|p| p.to_string()).collect();
        writeln!(f, "Key: {} [{}]", self.key, degrees.join(", "))?;
        writeln!(f, "{}", self.voice)?;
        write!(f, "[")?;
        for note in &self.notes {
            write!(f, "{}", note)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motifs::{Motif, MotifStep};
    use crate::music::PitchClass;
    use Duration::*;

    /// One motif of three leading-tone half notes
    fn leading_tone_motif() -> MotifCatalog {
        let step = MotifStep { degree: 6, duration: Half };
        MotifCatalog::new(vec![Motif::new(vec![step; 3]).unwrap()])
    }

    fn seeded(key: &str, voice: Voice, length: usize, seed: u64) -> SequenceGenerator {
        SequenceGenerator::with_settings(key, voice, length, GeneratorSettings::seeded(seed))
            .unwrap()
    }

    /// Model that always picks one degree and one duration
    #[derive(Debug)]
    struct FixedModel {
        degree: usize,
        duration: usize,
    }

    impl ProbabilityModel for FixedModel {
        fn degree_thresholds(&self, _key: &Key, _history: &[Note]) -> [f64; 7] {
            let mut t = [1.0; 7];
            for value in t.iter_mut().take(self.degree) {
                *value = 0.0;
            }
            t
        }

        fn duration_thresholds(&self, _history: &[Duration]) -> [f64; 4] {
            let mut t = [1.0; 4];
            for value in t.iter_mut().take(self.duration) {
                *value = 0.0;
            }
            t
        }
    }

    /// Model whose thresholds never reach 1.0
    #[derive(Debug)]
    struct BrokenModel;

    impl ProbabilityModel for BrokenModel {
        fn degree_thresholds(&self, _key: &Key, _history: &[Note]) -> [f64; 7] {
            [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7]
        }

        fn duration_thresholds(&self, _history: &[Duration]) -> [f64; 4] {
            [0.25, 0.5, 0.75, 1.0]
        }
    }

    #[test]
    fn test_initial_state() {
        let gen = seeded("C major", Voice::Soprano, 8, 1);
        assert_eq!(gen.sequence(), &[Note::new(PitchClass::C, 5, Quarter)]);
        assert_eq!(gen.note_history(), gen.sequence());
        assert_eq!(gen.duration_history(), &[Quarter]);
        assert_eq!(gen.current_octave(), 5);
        assert!(gen.passages().is_empty());
    }

    #[test]
    fn test_unknown_key_fails() {
        let result = SequenceGenerator::new("C Lydian", Voice::Alto, 8);
        assert!(matches!(result, Err(GenerationError::Key(_))));
    }

    #[test]
    fn test_invalid_settings() {
        let settings = GeneratorSettings {
            passage_ratio: 0,
            ..Default::default()
        };
        let result = SequenceGenerator::with_settings("C major", Voice::Alto, 8, settings);
        assert!(matches!(result, Err(GenerationError::InvalidSettings(_))));
    }

    #[test]
    fn test_reaches_target_length() {
        for voice in Voice::ALL {
            for seed in 0..20 {
                let mut gen = seeded("D harmonic minor", voice, 48, seed);
                gen.run().unwrap();
                let len = gen.sequence().len();
                assert!(len >= 48);
                // The last step started below 48 and may add a passage and a motif
                assert!(len < 48 + gen.max_step_growth(), "len {} overshoots", len);
            }
        }
    }

    #[test]
    fn test_histories_mirror_sequence() {
        let mut gen = seeded("G gypsy", Voice::Tenor, 120, 9);
        gen.run().unwrap();

        assert_eq!(gen.note_history(), gen.sequence());
        let durations: Vec<Duration> = gen.sequence().iter().map(|n| n.duration()).collect();
        assert_eq!(gen.duration_history(), durations.as_slice());
    }

    #[test]
    fn test_seed_reproduces_sequence() {
        let first = seeded("C major", Voice::Soprano, 8, 42).generate().unwrap();
        let second = seeded("C major", Voice::Soprano, 8, 42).generate().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.notes[0], Note::new(PitchClass::C, 5, Quarter));
    }

    #[test]
    fn test_notes_stay_in_key() {
        let mut gen = seeded("F# flamenco", Voice::Bass, 200, 3);
        gen.run().unwrap();
        let key = gen.key().clone();
        for note in gen.sequence() {
            let pitch = note.pitch().unwrap();
            assert!(key.index_of(pitch).is_some(), "{} not in {}", pitch, key);
        }
    }

    #[test]
    fn test_octave_drift_is_bounded() {
        let mut gen = seeded("A minor", Voice::Alto, 1, 11);
        let home = Voice::Alto.home_octave();
        for _ in 0..2000 {
            let before = gen.current_octave();
            gen.drift_octave();
            let after = gen.current_octave();
            assert!((after - before).abs() <= 1);
            if after < before {
                assert!(before >= home);
            }
            if after > before {
                assert!(before <= home);
            }
            assert!((home - 1..=home + 1).contains(&after));
        }
    }

    #[test]
    fn test_check_duration_history() {
        assert!(check_duration_history(&[]));
        assert!(check_duration_history(&[Quarter]));
        assert!(!check_duration_history(&[Quarter, Sixteenth]));
        assert!(check_duration_history(&[Quarter, Sixteenth, Sixteenth]));
        assert!(!check_duration_history(&[Sixteenth, Sixteenth, Sixteenth]));
        assert!(check_duration_history(&[Sixteenth, Eighth]));
    }

    #[test]
    fn test_sixteenth_runs_even() {
        let n = |d| Note::new(PitchClass::C, 4, d);
        assert!(sixteenth_runs_even(&[n(Quarter), n(Eighth)]));
        assert!(sixteenth_runs_even(&[n(Sixteenth), n(Sixteenth), n(Quarter)]));
        assert!(!sixteenth_runs_even(&[n(Sixteenth), n(Quarter), n(Sixteenth), n(Sixteenth)]));
        assert!(!sixteenth_runs_even(&[n(Quarter), n(Sixteenth)]));
    }

    #[test]
    fn test_passage_captured_from_quarters() {
        // Quarter notes only: the seed plus seven more make two full measures.
        let mut gen = seeded("C major", Voice::Alto, 8, 5)
            .with_model(Box::new(FixedModel { degree: 2, duration: 1 }))
            .with_motifs(MotifCatalog::default());
        gen.run().unwrap();

        assert_eq!(gen.sequence().len(), 8);
        assert_eq!(gen.passages().len(), 1);
        let passage = &gen.passages()[0];
        assert_eq!(passage.len(), 8);
        assert_eq!(passage.measures(), 2.0);
        assert_eq!(passage.notes()[0], Note::new(PitchClass::C, 4, Quarter));
    }

    #[test]
    fn test_captured_passages_obey_rules() {
        for seed in 0..10 {
            let mut gen = seeded("E major", Voice::Soprano, 150, seed);
            gen.run().unwrap();
            for passage in gen.passages() {
                assert!(passage.len() > 3);
                let units = measure_units(passage.notes());
                assert_eq!(units % (MEASURE_UNITS * 2), 0);
                assert!(sixteenth_runs_even(passage.notes()));
            }
        }
    }

    #[test]
    fn test_passage_scan_stops_at_history_start() {
        // A single sixteenth after the seed never forms a measure.
        let mut gen = seeded("C major", Voice::Alto, 2, 5)
            .with_model(Box::new(FixedModel { degree: 0, duration: 3 }))
            .with_motifs(MotifCatalog::default());
        gen.run().unwrap();
        assert!(gen.passages().is_empty());
    }

    #[test]
    fn test_passage_replayed_at_current_octave() {
        let mut gen = seeded("C major", Voice::Tenor, 8, 2)
            .with_model(Box::new(FixedModel { degree: 0, duration: 1 }))
            .with_motifs(MotifCatalog::default());
        gen.run().unwrap();
        assert_eq!(gen.passages().len(), 1);

        gen.target_length = 16;
        gen.current_octave = 2;
        while gen.sequence().len() < 16 {
            gen.step().unwrap();
        }
        // The step reaching length 16 replays the 8-note passage.
        assert!(gen.sequence().len() >= 24);
        let replayed = &gen.sequence()[16..24];
        assert!(replayed.iter().all(|n| n.duration() == Quarter));
        assert!(replayed
            .iter()
            .all(|n| n.octave() == gen.current_octave()));
    }

    #[test]
    fn test_motifs_use_key_degrees() {
        let mut gen = seeded("C major", Voice::Tenor, 300, 8)
            .with_model(Box::new(FixedModel { degree: 0, duration: 1 }))
            .with_motifs(leading_tone_motif());
        gen.run().unwrap();

        // Generated notes are all tonic quarters, so any B half note came
        // from the motif.
        let inserted = gen
            .sequence()
            .iter()
            .filter(|n| n.pitch() == Some(PitchClass::B) && n.duration() == Half)
            .count();
        assert!(inserted >= 3);
    }

    #[test]
    fn test_replay_and_motif_can_share_a_step() {
        let mut both = 0;
        let mut replays = 0;

        for seed in 0..200 {
            let mut gen = seeded("C major", Voice::Tenor, 64, seed)
                .with_model(Box::new(FixedModel { degree: 0, duration: 1 }))
                .with_motifs(leading_tone_motif());

            while gen.sequence().len() < 64 {
                let before = gen.sequence().len();
                let inserted = gen.step().unwrap();
                assert_eq!(
                    gen.sequence().len(),
                    before + 1 + inserted.passage + inserted.motif
                );
                if inserted.passage > 0 {
                    replays += 1;
                    if inserted.motif > 0 {
                        both += 1;
                        // The motif lands after the replayed passage
                        let tail = &gen.sequence()[gen.sequence().len() - 3..];
                        assert!(tail.iter().all(|n| n.pitch() == Some(PitchClass::B)));
                    }
                }
            }
        }
        assert!(replays > 0);
        assert!(both > 0, "no step out of {} replays also inserted a motif", replays);
    }

    #[test]
    fn test_with_rng_reproduces_sequence() {
        let build = || {
            SequenceGenerator::new("E natural minor", Voice::Bass, 96)
                .unwrap()
                .with_rng(StdRng::seed_from_u64(77))
        };
        let first = build().generate().unwrap();
        let second = build().generate().unwrap();
        assert_eq!(first, second);

        let other = SequenceGenerator::new("E natural minor", Voice::Bass, 96)
            .unwrap()
            .with_rng(StdRng::seed_from_u64(78))
            .generate()
            .unwrap();
        assert_ne!(first.notes, other.notes);
    }

    #[test]
    fn test_broken_model_is_fatal() {
        let mut gen = seeded("C major", Voice::Alto, 8, 1).with_model(Box::new(BrokenModel));
        let result = gen.run();
        assert!(matches!(result, Err(GenerationError::Thresholds(_))));
    }

    #[test]
    fn test_display() {
        let sequence = seeded("C major", Voice::Soprano, 1, 1).generate().unwrap();
        let text = sequence.to_string();
        assert!(text.starts_with("Key: C Major [C, D, E, F, G, A, B]\nSOPRANO\n["));
        assert!(text.ends_with("(C_5, 4)]"));
    }
}
