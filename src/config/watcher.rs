// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! File watcher for composition files.
//!
//! Detects edits to composition files, re-parses and validates them, and
//! reports the result so a caller can regenerate on every save.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, warn};

use super::CompositionFile;

/// Default quiet period before a burst of edits is reloaded
const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// How often the debounce thread checks for a settled burst
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Events emitted by the config watcher
#[derive(Debug, Clone)]
pub enum ConfigEvent {
    /// A composition was modified and successfully reloaded
    Reloaded(Box<CompositionFile>),
    /// A composition was modified but failed to parse or validate
    Error(String),
    /// A composition was deleted from the watched location
    Removed(PathBuf),
}

/// Paths touched since the last reload, flushed once edits go quiet
#[derive(Debug, Default)]
struct PendingEdits {
    paths: Vec<PathBuf>,
    last_edit: Option<Instant>,
}

impl PendingEdits {
    fn touch(&mut self, paths: impl IntoIterator<Item = PathBuf>, now: Instant) {
        for path in paths {
            if !self.paths.contains(&path) {
                self.paths.push(path);
            }
        }
        self.last_edit = Some(now);
    }

    /// Drain the paths if nothing has been touched for `quiet`
    fn settled(&mut self, now: Instant, quiet: Duration) -> Vec<PathBuf> {
        match self.last_edit {
            Some(last) if now.duration_since(last) >= quiet => {
                self.last_edit = None;
                std::mem::take(&mut self.paths)
            }
            _ => Vec::new(),
        }
    }
}

/// Composition file watcher with debouncing and validation
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
    event_receiver: Receiver<ConfigEvent>,
    watched_path: PathBuf,
}

impl ConfigWatcher {
    /// Watch a composition file, or a directory of them.
    ///
    /// Saves are debounced by `debounce_ms` (500 ms when `None`); each
    /// settled file is reloaded and reported as a [`ConfigEvent`].
    pub fn new<P: AsRef<Path>>(path: P, debounce_ms: Option<u64>) -> Result<Self> {
        let watched_path = path.as_ref().to_path_buf();
        let quiet = Duration::from_millis(debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS));

        let (event_tx, event_rx): (Sender<ConfigEvent>, Receiver<ConfigEvent>) = mpsc::channel();
        let (notify_tx, notify_rx): (Sender<Event>, Receiver<Event>) = mpsc::channel();

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| {
                if let Ok(event) = res {
                    let _ = notify_tx.send(event);
                }
            },
            Config::default(),
        )
        .map_err(|e| anyhow!("Failed to create file watcher: {}", e))?;

        let mode = if watched_path.is_dir() {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        watcher
            .watch(&watched_path, mode)
            .map_err(|e| anyhow!("Failed to watch path {:?}: {}", watched_path, e))?;

        let target = canonical(&watched_path);
        std::thread::spawn(move || {
            let mut pending = PendingEdits::default();

            loop {
                match notify_rx.recv_timeout(POLL_INTERVAL) {
                    Ok(event) => {
                        let paths = event
                            .paths
                            .into_iter()
                            .filter(|p| is_watched(p, &target))
                            .collect::<Vec<_>>();
                        match event.kind {
                            // Editors often save by writing a new file and renaming it
                            EventKind::Create(_) | EventKind::Modify(_) => {
                                if !paths.is_empty() {
                                    pending.touch(paths, Instant::now());
                                }
                            }
                            EventKind::Remove(_) => {
                                for path in paths {
                                    let _ = event_tx.send(ConfigEvent::Removed(path));
                                }
                            }
                            _ => {}
                        }
                    }
                    Err(mpsc::RecvTimeoutError::Timeout) => {
                        for path in pending.settled(Instant::now(), quiet) {
                            if event_tx.send(reload(&path)).is_err() {
                                return;
                            }
                        }
                    }
                    Err(mpsc::RecvTimeoutError::Disconnected) => break,
                }
            }
        });

        Ok(Self {
            _watcher: watcher,
            event_receiver: event_rx,
            watched_path,
        })
    }

    /// Try to receive the next config event (non-blocking)
    pub fn try_recv(&self) -> Option<ConfigEvent> {
        self.event_receiver.try_recv().ok()
    }

    /// Receive all pending config events
    pub fn recv_all(&self) -> Vec<ConfigEvent> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }

    /// Block until the next config event is received
    pub fn recv(&self) -> Option<ConfigEvent> {
        self.event_receiver.recv().ok()
    }

    /// Get the path being watched
    pub fn watched_path(&self) -> &Path {
        &self.watched_path
    }
}

/// Load a composition and check that every voice can be generated
pub fn validate_config<P: AsRef<Path>>(path: P) -> Result<CompositionFile> {
    let config = CompositionFile::load(path)?;
    config.validate()?;
    Ok(config)
}

fn is_composition(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext == "yaml" || ext == "yml" || ext == "toml")
}

/// Absolute form of a path with symlinks resolved. A path that no longer
/// exists is resolved through its parent directory.
fn canonical(path: &Path) -> PathBuf {
    if let Ok(resolved) = path.canonicalize() {
        return resolved;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => parent
            .canonicalize()
            .map(|p| p.join(name))
            .unwrap_or_else(|_| path.to_path_buf()),
        _ => path.to_path_buf(),
    }
}

/// The watched file itself, or any composition inside a watched directory.
/// `target` must already be canonical.
fn is_watched(path: &Path, target: &Path) -> bool {
    if target.is_dir() {
        is_composition(path)
    } else {
        canonical(path) == target
    }
}

fn reload(path: &Path) -> ConfigEvent {
    match validate_config(path) {
        Ok(config) => {
            debug!(path = %path.display(), voices = config.voices.len(), "reloaded composition");
            ConfigEvent::Reloaded(Box::new(config))
        }
        Err(e) => {
            warn!(path = %path.display(), error = %format!("{:#}", e), "composition reload failed");
            ConfigEvent::Error(format!("Failed to load {:?}: {:#}", path, e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const INITIAL: &str = r#"
song:
  name: Initial
  tempo: 120
voices:
  - key: C major
    voice: soprano
"#;

    #[test]
    fn test_validate_config() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test_song.yaml");
        fs::write(&file_path, INITIAL).unwrap();

        let config = validate_config(&file_path).unwrap();
        assert_eq!(config.song.name, "Initial");
        assert_eq!(config.song.tempo, 120);
    }

    #[test]
    fn test_validate_invalid_config() {
        let dir = tempdir().unwrap();

        let file_path = dir.path().join("invalid.yaml");
        fs::write(&file_path, "this is not valid yaml: [").unwrap();
        assert!(validate_config(&file_path).is_err());

        let file_path = dir.path().join("lydian.yaml");
        fs::write(&file_path, "voices:\n  - key: C Lydian\n    voice: alto\n").unwrap();
        assert!(validate_config(&file_path).is_err());
    }

    #[test]
    fn test_reload_reports_errors() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("broken.toml");
        fs::write(&file_path, "[song\n").unwrap();

        match reload(&file_path) {
            ConfigEvent::Error(message) => assert!(message.contains("TOML")),
            other => panic!("expected an error event, got {:?}", other),
        }
    }

    #[test]
    fn test_pending_edits_debounce() {
        let start = Instant::now();
        let quiet = Duration::from_millis(100);
        let mut pending = PendingEdits::default();
        assert!(pending.settled(start, quiet).is_empty());

        let path = PathBuf::from("song.yaml");
        pending.touch([path.clone()], start);
        pending.touch([path.clone()], start + Duration::from_millis(50));

        assert!(pending.settled(start + Duration::from_millis(120), quiet).is_empty());
        assert_eq!(
            pending.settled(start + Duration::from_millis(150), quiet),
            vec![path]
        );
        assert!(pending.settled(start + Duration::from_millis(400), quiet).is_empty());
    }

    #[test]
    fn test_is_composition() {
        assert!(is_composition(Path::new("a/song.yaml")));
        assert!(is_composition(Path::new("song.yml")));
        assert!(is_composition(Path::new("song.toml")));
        assert!(!is_composition(Path::new("song.mid")));
        assert!(!is_composition(Path::new("README")));
    }

    #[test]
    fn test_is_watched_matches_full_path() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        let file_path = dir.path().join("song.yaml");
        fs::write(&file_path, INITIAL).unwrap();
        fs::write(nested.join("song.yaml"), INITIAL).unwrap();

        let target = canonical(&file_path);
        assert!(is_watched(&file_path, &target));
        assert!(is_watched(&nested.join("..").join("song.yaml"), &target));
        // Same file name in another directory is a different file
        assert!(!is_watched(&nested.join("song.yaml"), &target));
        assert!(!is_watched(&dir.path().join("other.yaml"), &target));

        // Deleted files still match so removals are reported
        fs::remove_file(&file_path).unwrap();
        assert!(is_watched(&file_path, &target));
    }

    #[test]
    fn test_is_watched_directory_takes_compositions() {
        let dir = tempdir().unwrap();
        let target = canonical(dir.path());
        assert!(is_watched(&dir.path().join("a.toml"), &target));
        assert!(!is_watched(&dir.path().join("a.mid"), &target));
    }

    #[test]
    fn test_watcher_creation() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("watch_test.yaml"), INITIAL).unwrap();

        let watcher = ConfigWatcher::new(dir.path(), Some(100)).unwrap();
        assert_eq!(watcher.watched_path(), dir.path());
        assert!(ConfigWatcher::new(dir.path().join("missing"), None).is_err());
    }

    #[test]
    fn test_watcher_detects_changes() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("detect_test.yaml");
        fs::write(&file_path, INITIAL).unwrap();

        let watcher = ConfigWatcher::new(dir.path(), Some(100)).unwrap();
        std::thread::sleep(Duration::from_millis(50));

        fs::write(&file_path, INITIAL.replace("Initial", "Modified")).unwrap();
        std::thread::sleep(Duration::from_millis(400));

        let events = watcher.recv_all();
        // File events can be dropped or delayed on some CI filesystems
        if let Some(ConfigEvent::Reloaded(config)) = events
            .iter()
            .find(|e| matches!(e, ConfigEvent::Reloaded(_)))
        {
            assert_eq!(config.song.name, "Modified");
        }
    }
}
