// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cantus::config::{validate_config, ConfigEvent, ConfigWatcher};
use cantus::{CompositionFile, MidiExporter, ScaleType, Voice};

fn print_usage() {
    println!("Cantus - Stochastic Melody Generator");
    println!();
    println!("Usage: cantus [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --key <KEY> --voice <VOICE>  Generate one line, e.g. --key \"C major\" --voice soprano");
    println!("    --length <N>               Target number of notes (default 32)");
    println!("    --seed <N>                 Seed for reproducible output");
    println!("    --tempo <BPM>              Tempo of the MIDI file (default 180)");
    println!("    --out <FILE>               MIDI file to write (default cantus.mid)");
    println!("  --config <FILE> [--out F]    Generate every voice in a composition file");
    println!("  --watch <FILE>               Regenerate a composition whenever it is saved");
    println!("  --list-scales                List supported scales and voices");
    println!("  --help                       Show this help message");
}

/// Value following `flag`, if the flag is present
fn flag_value<'a>(args: &'a [String], flag: &str) -> Result<Option<&'a str>> {
    match args.iter().position(|a| a == flag) {
        Some(i) => args
            .get(i + 1)
            .map(|v| Some(v.as_str()))
            .ok_or_else(|| anyhow!("{} requires a value", flag)),
        None => Ok(None),
    }
}

fn parse_flag<T: std::str::FromStr>(args: &[String], flag: &str) -> Result<Option<T>> {
    flag_value(args, flag)?
        .map(|v| v.parse().map_err(|_| anyhow!("Invalid value for {}: {}", flag, v)))
        .transpose()
}

fn list_scales() {
    println!("Scales:");
    for scale in ScaleType::ALL {
        println!("  {}", scale.name());
    }
    println!();
    println!("Voices:");
    for voice in Voice::ALL {
        println!("  {:<8} home octave {}", voice.name().to_lowercase(), voice.home_octave());
    }
}

/// Generate, print and export a composition
fn compose(config: &CompositionFile, out: &Path) -> Result<()> {
    let sequences = config.generate()?;
    for sequence in &sequences {
        println!("{}", sequence);
        println!();
    }

    let song = config.to_song(&sequences)?;
    MidiExporter::default()
        .export(&song, out)
        .with_context(|| format!("Failed to write MIDI file {:?}", out))?;
    println!("Wrote {} voice(s) to {}", sequences.len(), out.display());
    Ok(())
}

fn generate_single(args: &[String]) -> Result<()> {
    let key = flag_value(args, "--key")?.context("--key is required")?;
    let voice = flag_value(args, "--voice")?.context("--voice is required")?;
    let voice = Voice::parse(voice).ok_or_else(|| anyhow!("Unknown voice: {}", voice))?;
    let length = parse_flag(args, "--length")?.unwrap_or(32);

    let mut config = CompositionFile::single(key, voice, length);
    config.song.generator.seed = parse_flag(args, "--seed")?;
    if let Some(tempo) = parse_flag(args, "--tempo")? {
        config.song.tempo = tempo;
    }

    let out = flag_value(args, "--out")?.unwrap_or("cantus.mid");
    compose(&config, Path::new(out))
}

fn generate_config(args: &[String], path: &str) -> Result<()> {
    let config = validate_config(path)?;
    let out = match flag_value(args, "--out")? {
        Some(out) => PathBuf::from(out),
        None => Path::new(path).with_extension("mid"),
    };
    compose(&config, &out)
}

fn watch(path: &str) -> Result<()> {
    let out = Path::new(path).with_extension("mid");
    if let Err(e) = validate_config(path).and_then(|config| compose(&config, &out)) {
        warn!(error = %format!("{:#}", e), "initial generation failed");
    }

    let watcher = ConfigWatcher::new(path, None)?;
    info!(path = %watcher.watched_path().display(), "watching for changes (Ctrl+C to stop)");

    while let Some(event) = watcher.recv() {
        match event {
            ConfigEvent::Reloaded(config) => {
                if let Err(e) = compose(&config, &out) {
                    eprintln!("Error: {:#}", e);
                }
            }
            ConfigEvent::Error(message) => eprintln!("Error: {}", message),
            ConfigEvent::Removed(path) => warn!(path = %path.display(), "composition removed"),
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return Ok(());
    }

    match args[1].as_str() {
        "--list-scales" => list_scales(),
        "--config" => {
            let path = args.get(2).context("--config requires a file")?;
            generate_config(&args, path)?;
        }
        "--watch" => {
            let path = args.get(2).context("--watch requires a file")?;
            watch(path)?;
        }
        "--help" | "-h" => print_usage(),
        flag if flag.starts_with("--") && args.iter().any(|a| a == "--key") => {
            generate_single(&args)?;
        }
        other => {
            eprintln!("Unknown option: {}", other);
            print_usage();
            bail!("invalid arguments");
        }
    }

    Ok(())
}
