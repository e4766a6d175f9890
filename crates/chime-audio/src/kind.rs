//! Menu sound event kinds and the bundled example bank.

use std::fmt;
#[cfg(test)]
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::registry::SoundError;

/// UI event a sound can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SoundKind {
    /// Mouse click on a widget.
    ClickMouse,
    /// Menu closed.
    CloseMenu,
    /// Generic error.
    Error,
    /// Widget event (e.g. button applied).
    Event,
    /// Widget event that failed.
    EventError,
    /// Character typed into a text input.
    KeyAddition,
    /// Character deleted from a text input.
    KeyDeletion,
    /// Menu opened.
    OpenMenu,
    /// Selection moved to another widget.
    WidgetSelection,
}

impl SoundKind {
    /// Number of kinds.
    pub const COUNT: usize = 9;

    /// All kinds, in binding order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::ClickMouse,
        Self::CloseMenu,
        Self::Error,
        Self::Event,
        Self::EventError,
        Self::KeyAddition,
        Self::KeyDeletion,
        Self::OpenMenu,
        Self::WidgetSelection,
    ];

    /// Position in [`SoundKind::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Symbolic name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ClickMouse => "click-mouse",
            Self::CloseMenu => "close-menu",
            Self::Error => "error",
            Self::Event => "event",
            Self::EventError => "event-error",
            Self::KeyAddition => "key-addition",
            Self::KeyDeletion => "key-deletion",
            Self::OpenMenu => "open-menu",
            Self::WidgetSelection => "widget-selection",
        }
    }

    /// File name of the bundled example sound.
    #[must_use]
    pub const fn example_file_name(self) -> &'static str {
        match self {
            Self::ClickMouse => "click_mouse.wav",
            Self::CloseMenu => "close_menu.wav",
            Self::Error => "error.wav",
            Self::Event => "event.wav",
            Self::EventError => "event_error.wav",
            Self::KeyAddition => "key_add.wav",
            Self::KeyDeletion => "key_delete.wav",
            Self::OpenMenu => "open_menu.wav",
            Self::WidgetSelection => "widget_selection.wav",
        }
    }

    /// Encoded bytes of the bundled example sound, embedded at build time.
    #[must_use]
    pub const fn example_bytes(self) -> &'static [u8] {
        match self {
            Self::ClickMouse => include_bytes!("../resources/sounds/click_mouse.wav"),
            Self::CloseMenu => include_bytes!("../resources/sounds/close_menu.wav"),
            Self::Error => include_bytes!("../resources/sounds/error.wav"),
            Self::Event => include_bytes!("../resources/sounds/event.wav"),
            Self::EventError => include_bytes!("../resources/sounds/event_error.wav"),
            Self::KeyAddition => include_bytes!("../resources/sounds/key_add.wav"),
            Self::KeyDeletion => include_bytes!("../resources/sounds/key_delete.wav"),
            Self::OpenMenu => include_bytes!("../resources/sounds/open_menu.wav"),
            Self::WidgetSelection => include_bytes!("../resources/sounds/widget_selection.wav"),
        }
    }

    /// Source-tree path of the bundled example sound, for tests that bind
    /// from real files.
    #[cfg(test)]
    pub(crate) fn example_path(self) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("resources")
            .join("sounds")
            .join(self.example_file_name())
    }
}

impl fmt::Display for SoundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SoundKind {
    type Err = SoundError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| SoundError::UnknownKind(s.to_string()))
    }
}
