//! Audio backend with rodio integration.
//!
//! Each playback channel is one rodio [`Sink`]. Clips are decoded up front,
//! converted to the mixer format and cached, so playing a clip only copies
//! samples into a sink.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 RodioBackend                  │
//! │  ┌─────────────┐  ┌────────────┐  ┌────────┐  │
//! │  │ AudioDevice │──│ Channel[N] │  │ Clips  │  │
//! │  │ (rodio)     │  │ (sinks)    │  │ cache  │  │
//! │  └─────────────┘  └────────────┘  └────────┘  │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! The output stream is not `Send`, so the backend is shared between
//! registries on the same thread by cloning it.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use rodio::buffer::SamplesBuffer;
use rodio::cpal::traits::{DeviceTrait, HostTrait};
use rodio::source::UniformSourceIterator;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use tracing::{debug, info, warn};

use crate::backend::{
    AudioBackend, AudioError, AudioResult, ChannelHandle, ChannelStatus, ClipHandle, MixerParams,
    PlayOptions,
};

/// Default number of playback channels.
pub const DEFAULT_MIXER_CHANNELS: usize = 8;

/// Decoded clip samples in mixer format.
#[derive(Debug, Clone)]
pub struct DecodedClip {
    /// Interleaved samples.
    pub samples: Vec<f32>,
    /// Channel count.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl DecodedClip {
    /// Length in seconds.
    #[must_use]
    pub fn duration_secs(&self) -> f64 {
        let frames = self.samples.len() as f64 / f64::from(self.channels.max(1));
        frames / f64::from(self.sample_rate.max(1))
    }
}

/// Decode `path` and convert it to `channels` x `sample_rate`.
pub fn decode_file(path: &Path, channels: u16, sample_rate: u32) -> AudioResult<DecodedClip> {
    let file = File::open(path)?;
    decode_reader(BufReader::new(file), path, channels, sample_rate)
}

/// Decode encoded bytes (WAV, Vorbis, MP3...) and convert them to
/// `channels` x `sample_rate`.
pub fn decode_bytes(
    name: &str,
    data: &[u8],
    channels: u16,
    sample_rate: u32,
) -> AudioResult<DecodedClip> {
    let cursor = Cursor::new(data.to_vec());
    decode_reader(cursor, Path::new(name), channels, sample_rate)
}

fn decode_reader<R>(
    reader: R,
    origin: &Path,
    channels: u16,
    sample_rate: u32,
) -> AudioResult<DecodedClip>
where
    R: Read + Seek + Send + Sync + 'static,
{
    let decoder = Decoder::new(reader).map_err(|e| AudioError::DecodeFailed {
        path: origin.to_path_buf(),
        message: e.to_string(),
    })?;

    let samples: Vec<f32> =
        UniformSourceIterator::<_, f32>::new(decoder, channels, sample_rate).collect();

    Ok(DecodedClip {
        samples,
        channels,
        sample_rate,
    })
}

/// Wraps rodio's output stream.
struct AudioDevice {
    /// The output stream (must be kept alive).
    _stream: OutputStream,
    /// Handle for creating sinks.
    handle: OutputStreamHandle,
    /// Mixer channel count clips are converted to.
    channels: u16,
    /// Mixer sample rate clips are converted to.
    sample_rate: u32,
}

impl std::fmt::Debug for AudioDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioDevice")
            .field("channels", &self.channels)
            .field("sample_rate", &self.sample_rate)
            .finish_non_exhaustive()
    }
}

impl AudioDevice {
    fn open(params: &MixerParams) -> AudioResult<Self> {
        let host = rodio::cpal::default_host();
        let device = if params.device_name.is_empty() {
            host.default_output_device().ok_or(AudioError::NoDevice)?
        } else {
            host.output_devices()
                .map_err(|e| AudioError::DeviceInitFailed(e.to_string()))?
                .find(|d| d.name().is_ok_and(|n| n == params.device_name))
                .ok_or_else(|| AudioError::DeviceNotFound(params.device_name.clone()))?
        };

        let native = device
            .default_output_config()
            .map_err(|e| AudioError::DeviceInitFailed(e.to_string()))?;
        let sample_rate = if params.allowed_changes.frequency {
            native.sample_rate().0
        } else {
            params.frequency
        };
        let channels = if params.allowed_changes.channels {
            native.channels()
        } else {
            params.channel_count
        };

        if sample_rate == 0 || channels == 0 {
            return Err(AudioError::DeviceInitFailed(format!(
                "unusable output format: {sample_rate} Hz, {channels} channels"
            )));
        }

        let (stream, handle) = OutputStream::try_from_device(&device)
            .map_err(|e| AudioError::DeviceInitFailed(e.to_string()))?;

        info!(
            "Audio device initialized: {} Hz, {} channels ({}-bit samples, buffer {})",
            sample_rate,
            channels,
            params.sample_size.unsigned_abs(),
            params.buffer_size
        );

        Ok(Self {
            _stream: stream,
            handle,
            channels,
            sample_rate,
        })
    }

    fn create_sink(&self) -> AudioResult<Sink> {
        Sink::try_new(&self.handle).map_err(|e| AudioError::ChannelCreationFailed(e.to_string()))
    }
}

/// State of one playback channel.
struct ChannelSlot {
    sink: Sink,
    current: Option<ClipHandle>,
}

impl ChannelSlot {
    fn new(sink: Sink) -> Self {
        Self {
            sink,
            current: None,
        }
    }

    // A paused channel still holds its clip, so it is not empty.
    fn is_available(&self) -> bool {
        self.sink.empty()
    }
}

/// A cached clip.
#[derive(Debug)]
struct CachedClip {
    path: PathBuf,
    data: DecodedClip,
    volume: f32,
}

#[derive(Default)]
struct Shared {
    device: RefCell<Option<AudioDevice>>,
    channels: RefCell<Vec<ChannelSlot>>,
    clips: RefCell<HashMap<ClipHandle, CachedClip>>,
    next_clip: Cell<u32>,
    mixer_channels: usize,
}

/// [`AudioBackend`] playing through rodio.
#[derive(Clone)]
pub struct RodioBackend {
    shared: Rc<Shared>,
}

impl std::fmt::Debug for RodioBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioBackend")
            .field("device", &*self.shared.device.borrow())
            .field("channels", &self.shared.channels.borrow().len())
            .field("clips", &self.shared.clips.borrow().len())
            .finish()
    }
}

impl Default for RodioBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RodioBackend {
    /// Backend with the default number of channels. The device is opened by
    /// [`AudioBackend::init`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_channels(DEFAULT_MIXER_CHANNELS)
    }

    /// Backend that opens `mixer_channels` playback channels.
    #[must_use]
    pub fn with_channels(mixer_channels: usize) -> Self {
        Self {
            shared: Rc::new(Shared {
                mixer_channels: mixer_channels.max(1),
                ..Shared::default()
            }),
        }
    }

    /// Number of playback channels currently open.
    #[must_use]
    pub fn channel_count(&self) -> usize {
        self.shared.channels.borrow().len()
    }

    /// Number of clips in the cache.
    #[must_use]
    pub fn cached_clips(&self) -> usize {
        self.shared.clips.borrow().len()
    }

    /// Path (or in-memory name) a clip was loaded from.
    #[must_use]
    pub fn clip_path(&self, clip: ClipHandle) -> Option<PathBuf> {
        self.shared.clips.borrow().get(&clip).map(|c| c.path.clone())
    }

    fn mixer_format(&self) -> AudioResult<(u16, u32)> {
        match &*self.shared.device.borrow() {
            Some(device) => Ok((device.channels, device.sample_rate)),
            None => Err(AudioError::NotInitialized),
        }
    }

    fn cache_clip(&self, path: PathBuf, data: DecodedClip) -> ClipHandle {
        let id = self.shared.next_clip.get();
        self.shared.next_clip.set(id.wrapping_add(1));
        let handle = ClipHandle::new(id);
        self.shared.clips.borrow_mut().insert(
            handle,
            CachedClip {
                path,
                data,
                volume: 1.0,
            },
        );
        handle
    }

    fn with_channel<F, R>(&self, channel: ChannelHandle, f: F) -> AudioResult<R>
    where
        F: FnOnce(&mut ChannelSlot) -> R,
    {
        let mut channels = self.shared.channels.borrow_mut();
        channels
            .get_mut(channel.id() as usize)
            .map(f)
            .ok_or(AudioError::InvalidHandle)
    }

    fn build_source(
        clip: &CachedClip,
        options: PlayOptions,
    ) -> Box<dyn Source<Item = f32> + Send> {
        let data = &clip.data;
        let buffer = SamplesBuffer::new(data.channels, data.sample_rate, data.samples.clone());
        let mut source: Box<dyn Source<Item = f32> + Send> = if options.loops > 0 {
            let plays = f64::from(options.loops.saturating_add(1));
            let total = Duration::from_secs_f64(data.duration_secs() * plays);
            Box::new(buffer.repeat_infinite().take_duration(total))
        } else {
            Box::new(buffer)
        };
        if options.max_play_ms > 0 {
            source = Box::new(source.take_duration(Duration::from_millis(options.max_play_ms)));
        }
        if options.fade_in_ms > 0 {
            source = Box::new(source.fade_in(Duration::from_millis(options.fade_in_ms)));
        }
        Box::new(source.amplify(clip.volume))
    }
}

impl AudioBackend for RodioBackend {
    fn is_initialized(&self) -> bool {
        self.shared.device.borrow().is_some()
    }

    fn init(&self, params: &MixerParams) -> AudioResult<()> {
        // Reinitializing drops the old stream along with its sinks.
        self.shared.channels.borrow_mut().clear();
        self.shared.device.borrow_mut().take();

        let device = AudioDevice::open(params)?;
        let mut channels = Vec::with_capacity(self.shared.mixer_channels);
        for i in 0..self.shared.mixer_channels {
            match device.create_sink() {
                Ok(sink) => channels.push(ChannelSlot::new(sink)),
                Err(e) => {
                    if i == 0 {
                        return Err(e);
                    }
                    warn!("Could only create {} audio channels", i);
                    break;
                },
            }
        }
        debug!("Created {} audio channels", channels.len());

        *self.shared.channels.borrow_mut() = channels;
        *self.shared.device.borrow_mut() = Some(device);
        Ok(())
    }

    fn load_clip(&self, path: &Path) -> AudioResult<ClipHandle> {
        let (channels, sample_rate) = self.mixer_format()?;
        let data = decode_file(path, channels, sample_rate)?;
        let handle = self.cache_clip(path.to_path_buf(), data);
        debug!("Loaded clip {:?} -> {:?}", path, handle);
        Ok(handle)
    }

    fn load_clip_bytes(&self, name: &str, data: &[u8]) -> AudioResult<ClipHandle> {
        let (channels, sample_rate) = self.mixer_format()?;
        let data = decode_bytes(name, data, channels, sample_rate)?;
        let handle = self.cache_clip(PathBuf::from(name), data);
        debug!("Loaded clip {} from memory -> {:?}", name, handle);
        Ok(handle)
    }

    fn release_clip(&self, clip: ClipHandle) {
        if self.shared.clips.borrow_mut().remove(&clip).is_some() {
            debug!("Released clip {:?}", clip);
        }
    }

    fn set_volume(&self, clip: ClipHandle, volume: f32) {
        if let Some(cached) = self.shared.clips.borrow_mut().get_mut(&clip) {
            cached.volume = volume.clamp(0.0, 1.0);
        }
    }

    fn duration(&self, clip: ClipHandle) -> f64 {
        self.shared
            .clips
            .borrow()
            .get(&clip)
            .map_or(0.0, |c| c.data.duration_secs())
    }

    fn find_available_channel(&self) -> Option<ChannelHandle> {
        self.shared
            .channels
            .borrow()
            .iter()
            .position(ChannelSlot::is_available)
            .map(|idx| ChannelHandle::new(idx as u32))
    }

    fn channel_play(
        &self,
        channel: ChannelHandle,
        clip: ClipHandle,
        options: PlayOptions,
    ) -> AudioResult<()> {
        let source = {
            let clips = self.shared.clips.borrow();
            let cached = clips.get(&clip).ok_or(AudioError::InvalidHandle)?;
            Self::build_source(cached, options)
        };
        self.with_channel(channel, |slot| {
            slot.sink.clear();
            slot.sink.append(source);
            slot.sink.play();
            slot.current = Some(clip);
        })
    }

    fn channel_stop(&self, channel: ChannelHandle) -> AudioResult<()> {
        self.with_channel(channel, |slot| {
            slot.sink.clear();
            slot.current = None;
        })
    }

    fn channel_pause(&self, channel: ChannelHandle) -> AudioResult<()> {
        self.with_channel(channel, |slot| slot.sink.pause())
    }

    fn channel_resume(&self, channel: ChannelHandle) -> AudioResult<()> {
        self.with_channel(channel, |slot| slot.sink.play())
    }

    fn channel_status(&self, channel: ChannelHandle) -> AudioResult<ChannelStatus> {
        self.with_channel(channel, |slot| {
            let busy = !slot.sink.empty();
            ChannelStatus {
                busy,
                // rodio sinks post no end events.
                end_event_id: 0,
                queued_clip: None,
                current_clip: if busy { slot.current } else { None },
                volume: slot.sink.volume(),
            }
        })
    }
}
