//! Named sound slots for menu events.
//!
//! A [`SoundRegistry`] binds at most one clip to each [`SoundKind`] and
//! plays it on a single playback channel when the menu reports the matching
//! event. Playback never fails loudly: a missing device, a busy mixer or a
//! backend error all end up as "no sound".

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::backend::{
    AudioBackend, AudioResult, ChannelHandle, ChannelStatus, ClipHandle, MixerParams,
    PlayOptions,
};
use crate::clock::{Clock, MonotonicClock};
use crate::config::SoundConfig;
use crate::init_guard::BackendInitGuard;
use crate::kind::SoundKind;

/// Share of a clip's length during which the same clip is not retriggered.
pub const OVERLAP_FRACTION: f64 = 0.2;

/// Default clip volume.
pub const DEFAULT_VOLUME: f32 = 0.5;

/// Errors surfaced to the caller of the registry.
#[derive(Debug, Error)]
pub enum SoundError {
    /// A parameter is out of range.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Name does not match any sound kind.
    #[error("Sound type '{0}' not valid")]
    UnknownKind(String),

    /// Sound file does not exist.
    #[error("Sound file '{}' does not exist", .0.display())]
    NotFound(PathBuf),
}

/// Result type for registry operations.
pub type SoundResult<T> = Result<T, SoundError>;

/// Playback parameters given when binding a clip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipParams {
    /// Volume, 0.0-1.0.
    pub volume: f32,
    /// Extra repetitions after the first play.
    pub loops: i32,
    /// Maximum play time in milliseconds (0 = unlimited).
    pub max_play_ms: i64,
    /// Fade-in length in milliseconds.
    pub fade_in_ms: i64,
}

impl Default for ClipParams {
    fn default() -> Self {
        Self {
            volume: DEFAULT_VOLUME,
            loops: 0,
            max_play_ms: 0,
            fade_in_ms: 0,
        }
    }
}

impl ClipParams {
    /// Default parameters with the given volume.
    #[must_use]
    pub fn with_volume(volume: f32) -> Self {
        Self {
            volume,
            ..Self::default()
        }
    }

    /// Set the loop count.
    #[must_use]
    pub const fn loops(mut self, loops: i32) -> Self {
        self.loops = loops;
        self
    }

    /// Set the maximum play time.
    #[must_use]
    pub const fn max_play_ms(mut self, ms: i64) -> Self {
        self.max_play_ms = ms;
        self
    }

    /// Set the fade-in time.
    #[must_use]
    pub const fn fade_in_ms(mut self, ms: i64) -> Self {
        self.fade_in_ms = ms;
        self
    }

    /// Check ranges and convert to backend play options.
    pub fn validate(&self) -> SoundResult<PlayOptions> {
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(SoundError::InvalidArgument(format!(
                "volume must be between 0 and 1, got {}",
                self.volume
            )));
        }
        let loops = u32::try_from(self.loops).map_err(|_| {
            SoundError::InvalidArgument(format!(
                "loops count must be equal or greater than zero, got {}",
                self.loops
            ))
        })?;
        let max_play_ms = u64::try_from(self.max_play_ms).map_err(|_| {
            SoundError::InvalidArgument(format!(
                "max play time must be equal or greater than zero, got {}",
                self.max_play_ms
            ))
        })?;
        let fade_in_ms = u64::try_from(self.fade_in_ms).map_err(|_| {
            SoundError::InvalidArgument(format!(
                "fade in time must be equal or greater than zero, got {}",
                self.fade_in_ms
            ))
        })?;
        Ok(PlayOptions {
            loops,
            max_play_ms,
            fade_in_ms,
        })
    }
}

/// Where a bound clip came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipSource {
    /// A sound file on disk.
    File(PathBuf),
    /// A sound embedded in the library, by file name.
    Bundled(&'static str),
}

/// A decoded clip bound to a sound kind.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundClip {
    /// Kind the clip is bound to.
    pub kind: SoundKind,
    /// Where the clip was loaded from.
    pub source: ClipSource,
    /// Decoded length in seconds.
    pub duration_secs: f64,
    /// Playback volume.
    pub volume: f32,
    /// How the clip is played.
    pub options: PlayOptions,
    /// Backend handle of the decoded data.
    pub handle: ClipHandle,
}

/// What was played last, for overlap suppression.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlaybackState {
    /// Kind of the last play request.
    pub last_kind: Option<SoundKind>,
    /// Clock reading of the last play request.
    pub last_played_at: f64,
}

/// Construction options for a [`SoundRegistry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryOptions {
    /// Pin the first channel obtained and stop it before every play.
    pub unique_channel: bool,
    /// Device parameters for backend initialization.
    pub mixer: MixerParams,
    /// Initialize the backend even if it already was.
    pub force_init: bool,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            unique_channel: true,
            mixer: MixerParams::default(),
            force_init: false,
        }
    }
}

impl RegistryOptions {
    /// Check the mixer parameters.
    pub fn validate(&self) -> SoundResult<()> {
        if self.mixer.frequency == 0 {
            return Err(SoundError::InvalidArgument(
                "frequency must be greater than zero".into(),
            ));
        }
        if self.mixer.channel_count == 0 {
            return Err(SoundError::InvalidArgument(
                "channels must be greater than zero".into(),
            ));
        }
        if self.mixer.buffer_size == 0 {
            return Err(SoundError::InvalidArgument(
                "buffer size must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// Sound slots for the menu's UI events.
#[derive(Debug)]
pub struct SoundRegistry<B: AudioBackend, C: Clock = MonotonicClock> {
    backend: B,
    clock: C,
    unique_channel: bool,
    channel: Option<ChannelHandle>,
    bindings: [Option<SoundClip>; SoundKind::COUNT],
    state: PlaybackState,
}

impl<B: AudioBackend> SoundRegistry<B> {
    /// Create a registry timed by the monotonic clock.
    pub fn new(
        backend: B,
        options: &RegistryOptions,
        guard: &BackendInitGuard,
    ) -> SoundResult<Self> {
        Self::with_clock(backend, MonotonicClock::new(), options, guard)
    }
}

impl<B: AudioBackend, C: Clock> SoundRegistry<B, C> {
    /// Create a registry with an explicit clock.
    ///
    /// Initializes the backend device through `guard` if no registry has done
    /// so yet (or `force_init` is set). A failed initialization is logged and
    /// leaves the registry in silent mode.
    pub fn with_clock(
        backend: B,
        clock: C,
        options: &RegistryOptions,
        guard: &BackendInitGuard,
    ) -> SoundResult<Self> {
        options.validate()?;

        guard.initialize_with(
            options.force_init,
            || backend.is_initialized(),
            || match backend.init(&options.mixer) {
                Ok(()) => info!("Sound engine initialized"),
                Err(e) => error!("Sound engine could not be initialized: {e}"),
            },
        );

        Ok(Self {
            backend,
            clock,
            unique_channel: options.unique_channel,
            channel: None,
            bindings: Default::default(),
            state: PlaybackState::default(),
        })
    }

    /// The backend.
    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Whether the registry pins a single channel.
    #[must_use]
    pub const fn is_unique_channel(&self) -> bool {
        self.unique_channel
    }

    /// Channel cached by the last acquisition.
    #[must_use]
    pub const fn channel(&self) -> Option<ChannelHandle> {
        self.channel
    }

    /// Last play request.
    #[must_use]
    pub const fn playback_state(&self) -> PlaybackState {
        self.state
    }

    /// Clip bound to `kind`.
    #[must_use]
    pub fn clip(&self, kind: SoundKind) -> Option<&SoundClip> {
        self.bindings[kind.index()].as_ref()
    }

    /// Whether a clip is bound to `kind`.
    #[must_use]
    pub fn is_bound(&self, kind: SoundKind) -> bool {
        self.clip(kind).is_some()
    }

    /// Bind a sound file to `kind`, or clear it when `source` is `None`.
    ///
    /// Returns `Ok(true)` if a clip is now bound. A file that exists but
    /// cannot be decoded disables the sound and returns `Ok(false)`.
    pub fn bind(
        &mut self,
        kind: SoundKind,
        source: Option<&Path>,
        params: ClipParams,
    ) -> SoundResult<bool> {
        let options = params.validate()?;

        let Some(path) = source else {
            self.clear(kind);
            return Ok(false);
        };
        if !path.is_file() {
            return Err(SoundError::NotFound(path.to_path_buf()));
        }

        let loaded = self.backend.load_clip(path);
        let source = ClipSource::File(path.to_path_buf());
        Ok(self.install(kind, source, loaded, params.volume, options))
    }

    // Bind the outcome of a backend load; a failed load disables the kind.
    fn install(
        &mut self,
        kind: SoundKind,
        source: ClipSource,
        loaded: AudioResult<ClipHandle>,
        volume: f32,
        options: PlayOptions,
    ) -> bool {
        let handle = match loaded {
            Ok(handle) => handle,
            Err(e) => {
                warn!("The sound format is not valid, sound {kind} has been disabled: {e}");
                self.clear(kind);
                return false;
            },
        };
        self.backend.set_volume(handle, volume);

        let clip = SoundClip {
            kind,
            source,
            duration_secs: self.backend.duration(handle),
            volume,
            options,
            handle,
        };
        debug!("Bound {:?} to {kind} ({:.3}s)", clip.source, clip.duration_secs);

        if let Some(old) = self.bindings[kind.index()].replace(clip) {
            self.backend.release_clip(old.handle);
        }
        true
    }

    /// Like [`bind`](Self::bind), naming the kind by its symbolic name.
    pub fn bind_named(
        &mut self,
        kind: &str,
        source: Option<&Path>,
        params: ClipParams,
    ) -> SoundResult<bool> {
        let kind = kind.parse()?;
        self.bind(kind, source, params)
    }

    /// Remove the clip bound to `kind`.
    pub fn clear(&mut self, kind: SoundKind) {
        if let Some(old) = self.bindings[kind.index()].take() {
            self.backend.release_clip(old.handle);
        }
    }

    /// Bind every kind to its bundled example sound.
    ///
    /// The sounds are embedded in the library, so this works wherever the
    /// binary runs.
    pub fn load_example_bank(&mut self, volume: f32) -> SoundResult<()> {
        let params = ClipParams::with_volume(volume);
        let options = params.validate()?;
        for kind in SoundKind::ALL {
            let name = kind.example_file_name();
            let loaded = self.backend.load_clip_bytes(name, kind.example_bytes());
            self.install(kind, ClipSource::Bundled(name), loaded, volume, options);
        }
        Ok(())
    }

    /// Bind everything described by `config`.
    ///
    /// The example bank is loaded first so explicit bindings override it.
    pub fn apply_config(&mut self, config: &SoundConfig) -> SoundResult<()> {
        if config.load_example_bank {
            self.load_example_bank(config.example_volume)?;
        }
        for (name, binding) in &config.bindings {
            let bound = self.bind_named(name, binding.path.as_deref(), binding.params())?;
            if !bound && binding.path.is_some() {
                warn!("Sound {name} from config could not be loaded");
            }
        }
        Ok(())
    }

    /// Current channel according to the acquisition rule.
    ///
    /// In unique mode the first channel obtained is kept for good; otherwise
    /// whatever the backend reports available right now is used.
    pub fn acquire_channel(&mut self) -> Option<ChannelHandle> {
        let found = self.backend.find_available_channel();
        if !self.unique_channel || self.channel.is_none() {
            self.channel = found;
        }
        self.channel
    }

    /// Play the clip bound to `kind`.
    ///
    /// Returns `false` if nothing is bound or no channel is free. A repeat of
    /// the clip that played last is skipped while less than
    /// [`OVERLAP_FRACTION`] of its length has elapsed, except in unique-channel
    /// mode. Skipped requests still count as the last play.
    pub fn play(&mut self, kind: SoundKind) -> bool {
        let Some(clip) = self.bindings[kind.index()].as_ref() else {
            return false;
        };
        let (handle, duration, options) = (clip.handle, clip.duration_secs, clip.options);

        let Some(channel) = self.acquire_channel() else {
            return false;
        };

        let now = self.clock.now();
        let elapsed = now - self.state.last_played_at;
        let should_trigger = self.state.last_kind != Some(kind)
            || elapsed >= OVERLAP_FRACTION * duration
            || self.unique_channel;

        if should_trigger {
            if self.unique_channel {
                if let Err(e) = self.backend.channel_stop(channel) {
                    debug!("Ignoring channel stop error: {e}");
                }
            }
            if let Err(e) = self.backend.channel_play(channel, handle, options) {
                debug!("Ignoring playback error for {kind}: {e}");
            }
        } else {
            debug!("Suppressed {kind}, replayed after {elapsed:.3}s");
        }

        self.state = PlaybackState {
            last_kind: Some(kind),
            last_played_at: now,
        };
        true
    }

    /// Play the mouse click sound.
    pub fn play_click_mouse(&mut self) -> bool {
        self.play(SoundKind::ClickMouse)
    }

    /// Play the close menu sound.
    pub fn play_close_menu(&mut self) -> bool {
        self.play(SoundKind::CloseMenu)
    }

    /// Play the error sound.
    pub fn play_error(&mut self) -> bool {
        self.play(SoundKind::Error)
    }

    /// Play the event sound.
    pub fn play_event(&mut self) -> bool {
        self.play(SoundKind::Event)
    }

    /// Play the event error sound.
    pub fn play_event_error(&mut self) -> bool {
        self.play(SoundKind::EventError)
    }

    /// Play the key addition sound.
    pub fn play_key_add(&mut self) -> bool {
        self.play(SoundKind::KeyAddition)
    }

    /// Play the key deletion sound.
    pub fn play_key_del(&mut self) -> bool {
        self.play(SoundKind::KeyDeletion)
    }

    /// Play the open menu sound.
    pub fn play_open_menu(&mut self) -> bool {
        self.play(SoundKind::OpenMenu)
    }

    /// Play the widget selection sound.
    pub fn play_widget_selection(&mut self) -> bool {
        self.play(SoundKind::WidgetSelection)
    }

    /// Stop the channel.
    pub fn stop(&mut self) {
        if let Some(channel) = self.acquire_channel() {
            if let Err(e) = self.backend.channel_stop(channel) {
                debug!("Ignoring channel stop error: {e}");
            }
        }
    }

    /// Pause the channel.
    pub fn pause(&mut self) {
        if let Some(channel) = self.acquire_channel() {
            if let Err(e) = self.backend.channel_pause(channel) {
                debug!("Ignoring channel pause error: {e}");
            }
        }
    }

    /// Resume the channel.
    pub fn resume(&mut self) {
        if let Some(channel) = self.acquire_channel() {
            if let Err(e) = self.backend.channel_resume(channel) {
                debug!("Ignoring channel resume error: {e}");
            }
        }
    }

    /// Channel state, or `None` when no channel is available.
    pub fn channel_status(&mut self) -> Option<ChannelStatus> {
        let channel = self.acquire_channel()?;
        match self.backend.channel_status(channel) {
            Ok(status) => Some(status),
            Err(e) => {
                debug!("Could not read channel status: {e}");
                None
            },
        }
    }
}
