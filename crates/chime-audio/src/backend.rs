//! Audio backend boundary.
//!
//! The sound registry never touches an audio library directly. It talks to
//! an [`AudioBackend`], which owns the output device, the decoded clips and
//! the playback channels, and hands out opaque [`ClipHandle`]s and
//! [`ChannelHandle`]s.
//!
//! [`RodioBackend`](crate::rodio_backend::RodioBackend) is the real
//! implementation.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default mixer frequency in Hz.
pub const DEFAULT_FREQUENCY: u32 = 22050;

/// Default sample size in bits (negative = signed samples).
pub const DEFAULT_SAMPLE_SIZE: i16 = -16;

/// Default number of output channels (stereo).
pub const DEFAULT_CHANNEL_COUNT: u16 = 2;

/// Default mixer buffer size in samples.
pub const DEFAULT_BUFFER_SIZE: u32 = 4096;

/// Audio backend error types.
#[derive(Debug, Error)]
pub enum AudioError {
    /// Failed to initialize audio device.
    #[error("Failed to initialize audio device: {0}")]
    DeviceInitFailed(String),

    /// No audio device available.
    #[error("No audio device available")]
    NoDevice,

    /// No output device with the requested name.
    #[error("Audio device '{0}' not found")]
    DeviceNotFound(String),

    /// Failed to create a playback channel.
    #[error("Failed to create audio channel: {0}")]
    ChannelCreationFailed(String),

    /// Failed to decode audio data.
    #[error("Failed to decode audio '{path}': {message}")]
    DecodeFailed {
        /// Path of the clip.
        path: PathBuf,
        /// Decoder message.
        message: String,
    },

    /// Handle does not belong to this backend.
    #[error("Invalid audio handle")]
    InvalidHandle,

    /// Audio device not initialized.
    #[error("Audio device not initialized")]
    NotInitialized,

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for backend operations.
pub type AudioResult<T> = Result<T, AudioError>;

/// Opaque handle to a decoded clip owned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClipHandle(u32);

impl ClipHandle {
    /// Create a handle from a raw id.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Raw id.
    #[must_use]
    pub const fn id(self) -> u32 {
        self.0
    }
}

/// Opaque handle to a backend playback channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelHandle(u32);

impl ChannelHandle {
    /// Create a handle from a raw id.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Raw id.
    #[must_use]
    pub const fn id(self) -> u32 {
        self.0
    }
}

/// Which output parameters the device may override.
///
/// An allowed change makes the mixer adopt the device's native value;
/// otherwise clips are converted to the requested one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllowedChanges {
    /// Device may pick its own sample rate.
    pub frequency: bool,
    /// Device may pick its own channel count.
    pub channels: bool,
}

impl Default for AllowedChanges {
    fn default() -> Self {
        Self {
            frequency: true,
            channels: true,
        }
    }
}

impl AllowedChanges {
    /// Neither frequency nor channel count may change.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            frequency: false,
            channels: false,
        }
    }
}

/// Device parameters used when initializing the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MixerParams {
    /// Sample rate in Hz.
    pub frequency: u32,
    /// Sample size in bits, negative for signed samples.
    pub sample_size: i16,
    /// Output channel count.
    pub channel_count: u16,
    /// Buffer size in samples.
    pub buffer_size: u32,
    /// Output device name; empty selects the default device.
    pub device_name: String,
    /// Parameters the device may override.
    pub allowed_changes: AllowedChanges,
}

impl Default for MixerParams {
    fn default() -> Self {
        Self {
            frequency: DEFAULT_FREQUENCY,
            sample_size: DEFAULT_SAMPLE_SIZE,
            channel_count: DEFAULT_CHANNEL_COUNT,
            buffer_size: DEFAULT_BUFFER_SIZE,
            device_name: String::new(),
            allowed_changes: AllowedChanges::default(),
        }
    }
}

/// How a clip is played on a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlayOptions {
    /// Extra repetitions after the first play.
    pub loops: u32,
    /// Stop after this many milliseconds (0 = unlimited).
    pub max_play_ms: u64,
    /// Fade-in length in milliseconds.
    pub fade_in_ms: u64,
}

/// Snapshot of a playback channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelStatus {
    /// Channel is currently playing (or paused mid-clip).
    pub busy: bool,
    /// Event id posted when playback ends (0 = none).
    pub end_event_id: u32,
    /// Clip queued after the current one.
    pub queued_clip: Option<ClipHandle>,
    /// Clip currently playing.
    pub current_clip: Option<ClipHandle>,
    /// Channel volume (0.0-1.0).
    pub volume: f32,
}

/// Operations the sound registry needs from an audio library.
///
/// Methods take `&self`; implementations keep their own interior state so
/// one backend can be shared by several registries.
pub trait AudioBackend {
    /// Whether the output device is open.
    fn is_initialized(&self) -> bool;

    /// Open (or reopen) the output device.
    fn init(&self, params: &MixerParams) -> AudioResult<()>;

    /// Decode a clip from a file.
    fn load_clip(&self, path: &Path) -> AudioResult<ClipHandle>;

    /// Decode a clip from encoded bytes held in memory. `name` identifies
    /// the clip in errors and logs.
    fn load_clip_bytes(&self, name: &str, data: &[u8]) -> AudioResult<ClipHandle>;

    /// Drop a decoded clip.
    fn release_clip(&self, clip: ClipHandle);

    /// Set the playback volume of a clip.
    fn set_volume(&self, clip: ClipHandle, volume: f32);

    /// Length of a clip in seconds.
    fn duration(&self, clip: ClipHandle) -> f64;

    /// An idle channel, if any.
    fn find_available_channel(&self) -> Option<ChannelHandle>;

    /// Start playing `clip` on `channel`, replacing whatever it was playing.
    fn channel_play(
        &self,
        channel: ChannelHandle,
        clip: ClipHandle,
        options: PlayOptions,
    ) -> AudioResult<()>;

    /// Stop the channel.
    fn channel_stop(&self, channel: ChannelHandle) -> AudioResult<()>;

    /// Pause the channel.
    fn channel_pause(&self, channel: ChannelHandle) -> AudioResult<()>;

    /// Resume a paused channel.
    fn channel_resume(&self, channel: ChannelHandle) -> AudioResult<()>;

    /// Read the channel state.
    fn channel_status(&self, channel: ChannelHandle) -> AudioResult<ChannelStatus>;
}
