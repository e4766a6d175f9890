//! Recording backend for registry tests.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::backend::{
    AudioBackend, AudioError, AudioResult, ChannelHandle, ChannelStatus, ClipHandle, MixerParams,
    PlayOptions,
};

/// Transport call received by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BackendCall {
    Play {
        channel: ChannelHandle,
        clip: ClipHandle,
        options: PlayOptions,
    },
    Stop(ChannelHandle),
    Pause(ChannelHandle),
    Resume(ChannelHandle),
}

struct MockState {
    initialized: bool,
    fail_init: bool,
    fail_transport: bool,
    init_calls: Vec<MixerParams>,
    undecodable: HashSet<PathBuf>,
    loaded: Vec<PathBuf>,
    volumes: HashMap<ClipHandle, f32>,
    released: Vec<ClipHandle>,
    next_clip: u32,
    duration: f64,
    available: Option<ChannelHandle>,
    playing: HashMap<ChannelHandle, ClipHandle>,
    calls: Vec<BackendCall>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            initialized: false,
            fail_init: false,
            fail_transport: false,
            init_calls: Vec::new(),
            undecodable: HashSet::new(),
            loaded: Vec::new(),
            volumes: HashMap::new(),
            released: Vec::new(),
            next_clip: 0,
            duration: 1.0,
            available: Some(ChannelHandle::new(0)),
            playing: HashMap::new(),
            calls: Vec::new(),
        }
    }
}

/// Backend that records calls instead of making sound. Clones share state.
#[derive(Clone, Default)]
pub(crate) struct MockBackend {
    state: Rc<RefCell<MockState>>,
}

impl std::fmt::Debug for MockBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockBackend").finish_non_exhaustive()
    }
}

impl MockBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set_initialized(&self, initialized: bool) {
        self.state.borrow_mut().initialized = initialized;
    }

    pub(crate) fn fail_init(&self, fail: bool) {
        self.state.borrow_mut().fail_init = fail;
    }

    pub(crate) fn fail_transport(&self, fail: bool) {
        self.state.borrow_mut().fail_transport = fail;
    }

    pub(crate) fn fail_decode(&self, path: &Path) {
        self.state
            .borrow_mut()
            .undecodable
            .insert(path.to_path_buf());
    }

    /// Duration reported for clips loaded from now on.
    pub(crate) fn set_duration(&self, seconds: f64) {
        self.state.borrow_mut().duration = seconds;
    }

    pub(crate) fn set_available(&self, channel: Option<ChannelHandle>) {
        self.state.borrow_mut().available = channel;
    }

    pub(crate) fn init_calls(&self) -> Vec<MixerParams> {
        self.state.borrow().init_calls.clone()
    }

    pub(crate) fn loaded_paths(&self) -> Vec<PathBuf> {
        self.state.borrow().loaded.clone()
    }

    pub(crate) fn released(&self) -> Vec<ClipHandle> {
        self.state.borrow().released.clone()
    }

    pub(crate) fn volume_of(&self, clip: ClipHandle) -> Option<f32> {
        self.state.borrow().volumes.get(&clip).copied()
    }

    pub(crate) fn calls(&self) -> Vec<BackendCall> {
        self.state.borrow().calls.clone()
    }

    pub(crate) fn played_clips(&self) -> Vec<ClipHandle> {
        self.state
            .borrow()
            .calls
            .iter()
            .filter_map(|call| match call {
                BackendCall::Play { clip, .. } => Some(*clip),
                _ => None,
            })
            .collect()
    }

    fn transport(&self, call: BackendCall) -> AudioResult<()> {
        let mut state = self.state.borrow_mut();
        if state.fail_transport {
            return Err(AudioError::InvalidHandle);
        }
        match call {
            BackendCall::Play { channel, clip, .. } => {
                state.playing.insert(channel, clip);
            },
            BackendCall::Stop(channel) => {
                state.playing.remove(&channel);
            },
            BackendCall::Pause(_) | BackendCall::Resume(_) => {},
        }
        state.calls.push(call);
        Ok(())
    }
}

impl AudioBackend for MockBackend {
    fn is_initialized(&self) -> bool {
        self.state.borrow().initialized
    }

    fn init(&self, params: &MixerParams) -> AudioResult<()> {
        let mut state = self.state.borrow_mut();
        state.init_calls.push(params.clone());
        if state.fail_init {
            return Err(AudioError::NoDevice);
        }
        state.initialized = true;
        Ok(())
    }

    fn load_clip(&self, path: &Path) -> AudioResult<ClipHandle> {
        let mut state = self.state.borrow_mut();
        if state.undecodable.contains(path) {
            return Err(AudioError::DecodeFailed {
                path: path.to_path_buf(),
                message: "unrecognized format".into(),
            });
        }
        let handle = ClipHandle::new(state.next_clip);
        state.next_clip += 1;
        state.loaded.push(path.to_path_buf());
        state.volumes.insert(handle, 1.0);
        Ok(handle)
    }

    fn load_clip_bytes(&self, name: &str, data: &[u8]) -> AudioResult<ClipHandle> {
        if data.is_empty() {
            return Err(AudioError::DecodeFailed {
                path: PathBuf::from(name),
                message: "no data".into(),
            });
        }
        self.load_clip(Path::new(name))
    }

    fn release_clip(&self, clip: ClipHandle) {
        self.state.borrow_mut().released.push(clip);
    }

    fn set_volume(&self, clip: ClipHandle, volume: f32) {
        self.state.borrow_mut().volumes.insert(clip, volume);
    }

    fn duration(&self, _clip: ClipHandle) -> f64 {
        self.state.borrow().duration
    }

    fn find_available_channel(&self) -> Option<ChannelHandle> {
        self.state.borrow().available
    }

    fn channel_play(
        &self,
        channel: ChannelHandle,
        clip: ClipHandle,
        options: PlayOptions,
    ) -> AudioResult<()> {
        self.transport(BackendCall::Play {
            channel,
            clip,
            options,
        })
    }

    fn channel_stop(&self, channel: ChannelHandle) -> AudioResult<()> {
        self.transport(BackendCall::Stop(channel))
    }

    fn channel_pause(&self, channel: ChannelHandle) -> AudioResult<()> {
        self.transport(BackendCall::Pause(channel))
    }

    fn channel_resume(&self, channel: ChannelHandle) -> AudioResult<()> {
        self.transport(BackendCall::Resume(channel))
    }

    fn channel_status(&self, channel: ChannelHandle) -> AudioResult<ChannelStatus> {
        let state = self.state.borrow();
        if state.fail_transport {
            return Err(AudioError::InvalidHandle);
        }
        let current = state.playing.get(&channel).copied();
        Ok(ChannelStatus {
            busy: current.is_some(),
            end_event_id: 0,
            queued_clip: None,
            current_clip: current,
            volume: 1.0,
        })
    }
}
