//! # Chime
//!
//! Plays menu sounds from the command line.
//!
//! ```text
//! chime [--config <file>] [--examples] <kind>...
//! ```
//!
//! Each `<kind>` is a sound kind name such as `open-menu` or `key-addition`.
//! Without any configured bindings the bundled example sounds are used.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use chime_audio::{BackendInitGuard, RodioBackend, SoundConfig, SoundKind, SoundRegistry};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Pause between two sounds, on top of the clip length.
const GAP: Duration = Duration::from_millis(150);

/// Command line of the `chime` player.
#[derive(Parser, Debug)]
#[command(name = "chime", about = "Plays Chime menu sounds")]
struct Args {
    /// Sound configuration file (defaults to the user config).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Bind the bundled example sounds.
    #[arg(long)]
    examples: bool,

    /// Sound kinds to play, such as `open-menu`. Plays all kinds when empty.
    kinds: Vec<SoundKind>,
}

/// Main entry point.
fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("chime=info".parse()?))
        .init();

    let mut args = Args::parse();
    if args.kinds.is_empty() {
        args.kinds = SoundKind::ALL.to_vec();
    }
    let mut config = match &args.config {
        Some(path) => SoundConfig::load_from(path),
        None => SoundConfig::load(),
    };
    if args.examples || (config.bindings.is_empty() && !config.load_example_bank) {
        config.load_example_bank = true;
    }

    let guard = BackendInitGuard::new();
    let backend = RodioBackend::with_channels(config.mixer_channels);
    let mut sounds = SoundRegistry::new(backend, &config.registry_options(), &guard)?;
    sounds.apply_config(&config)?;

    for kind in args.kinds {
        let Some(duration) = sounds.clip(kind).map(|clip| clip.duration_secs) else {
            warn!("No sound bound to {kind}");
            continue;
        };
        if sounds.play(kind) {
            info!("Playing {kind} ({duration:.2}s)");
        } else {
            warn!("Could not play {kind}");
        }
        if let Some(status) = sounds.channel_status() {
            info!("Channel busy: {}, volume: {:.2}", status.busy, status.volume);
        }
        thread::sleep(Duration::from_secs_f64(duration) + GAP);
    }

    sounds.stop();
    info!("Done");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse_kinds_and_flags() {
        let args = Args::try_parse_from([
            "chime",
            "--config",
            "menu.toml",
            "--examples",
            "open-menu",
            "key-addition",
        ])
        .expect("valid command line");
        assert_eq!(args.config, Some(PathBuf::from("menu.toml")));
        assert!(args.examples);
        assert_eq!(args.kinds, vec![SoundKind::OpenMenu, SoundKind::KeyAddition]);
    }

    #[test]
    fn test_args_default_to_no_kinds() {
        let args = Args::try_parse_from(["chime"]).expect("empty command line");
        assert!(args.config.is_none());
        assert!(!args.examples);
        assert!(args.kinds.is_empty());
    }

    #[test]
    fn test_args_reject_unknown_kind_and_flag() {
        assert!(Args::try_parse_from(["chime", "doorbell"]).is_err());
        assert!(Args::try_parse_from(["chime", "--loud"]).is_err());
    }
}
