//! # Chime Audio
//!
//! Named sound slots for a menu toolkit.
//!
//! A [`SoundRegistry`] binds one clip to each of the nine UI event kinds
//! (mouse click, menu open/close, key addition/deletion, errors, ...) and
//! plays it on a single shared channel when the menu reports the event.
//!
//! # Modules
//!
//! - [`backend`]: Audio backend boundary and opaque handles
//! - [`rodio_backend`]: Backend playing through rodio
//! - [`registry`]: Sound slots, overlap suppression, transport controls
//! - [`config`]: TOML configuration
//!
//! # Quick Start
//!
//! ```ignore
//! use chime_audio::*;
//!
//! let guard = BackendInitGuard::new();
//! let mut sounds = SoundRegistry::new(RodioBackend::new(), &RegistryOptions::default(), &guard)?;
//! sounds.load_example_bank(0.5)?;
//!
//! // Called by widgets
//! sounds.play_open_menu();
//! sounds.play_key_add();
//! ```
//!
//! # Degraded Mode
//!
//! If the device cannot be opened, or every channel is busy, playback
//! quietly does nothing. Only bad arguments and missing files are reported
//! to the caller.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod backend;
pub mod clock;
pub mod config;
pub mod init_guard;
pub mod kind;
pub mod registry;
pub mod rodio_backend;

#[cfg(test)]
mod mock;

pub use backend::{
    AllowedChanges, AudioBackend, AudioError, AudioResult, ChannelHandle, ChannelStatus,
    ClipHandle, MixerParams, PlayOptions, DEFAULT_BUFFER_SIZE, DEFAULT_CHANNEL_COUNT,
    DEFAULT_FREQUENCY, DEFAULT_SAMPLE_SIZE,
};
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::{BindingConfig, SoundConfig};
pub use init_guard::BackendInitGuard;
pub use kind::SoundKind;
pub use registry::{
    ClipParams, ClipSource, PlaybackState, RegistryOptions, SoundClip, SoundError, SoundRegistry,
    SoundResult, DEFAULT_VOLUME, OVERLAP_FRACTION,
};
pub use rodio_backend::{
    decode_bytes, decode_file, DecodedClip, RodioBackend, DEFAULT_MIXER_CHANNELS,
};
