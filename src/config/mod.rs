// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Configuration system for Cantus.
//!
//! A composition file names the song's tempo and generator settings and
//! lists the voices to generate. Files are YAML, or TOML when the extension
//! is `.toml`.

pub mod watcher;

pub use watcher::{validate_config, ConfigEvent, ConfigWatcher};

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::generators::{GeneratorSettings, NoteSequence, SequenceGenerator};
use crate::motifs::MotifCatalog;
use crate::music::{Key, Voice};
use crate::recording::Song;

/// Root configuration for a composition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompositionFile {
    /// Song metadata and generator settings
    #[serde(default)]
    pub song: SongSettings,
    /// Voices to generate, one track each
    #[serde(default)]
    pub voices: Vec<VoiceConfig>,
}

impl CompositionFile {
    /// A composition with a single voice and default song settings
    pub fn single(key: impl Into<String>, voice: Voice, length: usize) -> Self {
        Self {
            song: SongSettings::default(),
            voices: vec![VoiceConfig {
                length,
                ..VoiceConfig::new(key, voice)
            }],
        }
    }

    /// Load a composition, choosing TOML or YAML by extension
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        if is_toml(path) {
            Self::from_toml(&contents)
        } else {
            Self::from_yaml(&contents)
        }
    }

    /// Parse a composition from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse YAML configuration")
    }

    /// Parse a composition from a TOML string
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse TOML configuration")
    }

    /// Serialize to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize configuration to YAML")
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).context("Failed to serialize configuration to TOML")
    }

    /// Save the composition, choosing TOML or YAML by extension
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let text = if is_toml(path) {
            self.to_toml()?
        } else {
            self.to_yaml()?
        };
        fs::write(path, text).with_context(|| format!("Failed to write config file: {:?}", path))
    }

    /// Check settings and resolve every voice's key without generating
    pub fn validate(&self) -> Result<()> {
        if self.song.tempo == 0 {
            bail!("Tempo must be positive");
        }
        if self.voices.is_empty() {
            bail!("Composition has no voices");
        }
        for (index, voice) in self.voices.iter().enumerate() {
            Key::resolve(&voice.key)
                .with_context(|| format!("Voice {} has an invalid key", index + 1))?;
            if voice.length == 0 {
                bail!("Voice {} has length 0", index + 1);
            }
        }
        Ok(())
    }

    /// Generator settings for the voice at `index`.
    ///
    /// A voice's own seed wins; otherwise the song seed is offset by the
    /// voice index so voices in the same key do not come out identical.
    pub fn settings_for(&self, index: usize) -> GeneratorSettings {
        let mut settings = self.song.generator.clone();
        settings.seed = match self.voices.get(index).and_then(|v| v.seed) {
            Some(seed) => Some(seed),
            None => settings.seed.map(|seed| seed.wrapping_add(index as u64)),
        };
        settings
    }

    /// Build the generator for the voice at `index`
    pub fn generator(&self, index: usize) -> Result<SequenceGenerator> {
        let voice = self
            .voices
            .get(index)
            .with_context(|| format!("No voice at index {}", index))?;

        let mut generator = SequenceGenerator::with_settings(
            &voice.key,
            voice.voice,
            voice.length,
            self.settings_for(index),
        )
        .with_context(|| format!("Failed to set up voice {}", index + 1))?;

        if let Some(dir) = &self.song.motif_dir {
            let motifs = MotifCatalog::load_dir(dir, voice.voice)
                .with_context(|| format!("Failed to load motifs from {:?}", dir))?;
            generator = generator.with_motifs(motifs);
        }
        Ok(generator)
    }

    /// Generate every voice in order
    pub fn generate(&self) -> Result<Vec<NoteSequence>> {
        self.validate()?;
        (0..self.voices.len())
            .map(|index| {
                self.generator(index)?
                    .generate()
                    .with_context(|| format!("Failed to generate voice {}", index + 1))
            })
            .collect()
    }

    /// Generate every voice and write each to its own track
    pub fn render(&self) -> Result<Song> {
        let sequences = self.generate()?;
        self.to_song(&sequences)
    }

    /// Write already generated voices to a song, one track each
    pub fn to_song(&self, sequences: &[NoteSequence]) -> Result<Song> {
        let mut song = Song::new(sequences.len(), self.song.tempo)?;
        song.set_name(&self.song.name);

        for (index, (sequence, voice)) in sequences.iter().zip(&self.voices).enumerate() {
            song.set_track_name(index, voice.track_name())?;
            sequence
                .write_to_track(&mut song, index)
                .with_context(|| format!("Failed to write voice {}", index + 1))?;
        }
        song.mark_song_end();
        Ok(song)
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "toml")
}

/// Song-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SongSettings {
    /// Song name
    #[serde(default = "default_name")]
    pub name: String,
    /// Tempo in BPM
    #[serde(default = "default_tempo")]
    pub tempo: u32,
    /// Directory holding `motifs_<voice>.txt` files; built-in motifs otherwise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motif_dir: Option<PathBuf>,
    /// Seed, passage and velocity settings shared by every voice
    #[serde(flatten)]
    pub generator: GeneratorSettings,
}

fn default_name() -> String {
    "Untitled".to_string()
}
fn default_tempo() -> u32 {
    180
}

impl Default for SongSettings {
    fn default() -> Self {
        Self {
            name: default_name(),
            tempo: default_tempo(),
            motif_dir: None,
            generator: GeneratorSettings::default(),
        }
    }
}

/// One generated voice
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VoiceConfig {
    /// Key string, e.g. "C major" or "F# harmonic minor"
    pub key: String,
    /// Register the line is written for
    pub voice: Voice,
    /// Target number of notes
    #[serde(default = "default_length")]
    pub length: usize,
    /// Track name; defaults to the voice name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Seed for this voice alone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_length() -> usize {
    32
}

impl VoiceConfig {
    pub fn new(key: impl Into<String>, voice: Voice) -> Self {
        Self {
            key: key.into(),
            voice,
            length: default_length(),
            name: None,
            seed: None,
        }
    }

    pub fn track_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| self.voice.name().to_string())
    }
}
