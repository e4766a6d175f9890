//! Key event sanity check.
//!
//! Some platforms deliver a key press while the keyboard state reports no
//! key held, leaving widgets convinced a key is stuck down. The check below
//! detects that and posts the missing key-up.

use tracing::debug;

/// Backend key code.
pub type KeyCode = u32;

/// A key press as seen by a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Key that was pressed.
    pub key: KeyCode,
    /// Event was injected by a test or replay, not the keyboard.
    pub simulated: bool,
}

impl KeyEvent {
    /// Event coming from the keyboard.
    #[must_use]
    pub const fn new(key: KeyCode) -> Self {
        Self {
            key,
            simulated: false,
        }
    }

    /// Event injected programmatically.
    #[must_use]
    pub const fn simulated(key: KeyCode) -> Self {
        Self {
            key,
            simulated: true,
        }
    }
}

/// Events the check may post back to the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Key released.
    KeyUp {
        /// Released key.
        key: KeyCode,
    },
}

/// Keyboard state and event queue of the windowing backend.
pub trait InputBackend {
    /// Keys currently held down.
    fn pressed_keys(&self) -> Vec<KeyCode>;

    /// Push an event onto the backend queue.
    fn post_event(&mut self, event: InputEvent);
}

/// Returns `true` if `event` reflects a key that is really held down.
///
/// When no key is held the event is spurious: a `KeyUp` for the same key is
/// posted and `false` returned. Simulated events are never second-guessed.
pub fn is_key_press_actually_valid<B: InputBackend>(backend: &mut B, event: &KeyEvent) -> bool {
    if !backend.pressed_keys().is_empty() {
        return true;
    }
    if event.simulated {
        return true;
    }
    debug!("Spurious key press {}, posting key up", event.key);
    backend.post_event(InputEvent::KeyUp { key: event.key });
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeInput {
        pressed: Vec<KeyCode>,
        posted: Vec<InputEvent>,
    }

    impl InputBackend for FakeInput {
        fn pressed_keys(&self) -> Vec<KeyCode> {
            self.pressed.clone()
        }

        fn post_event(&mut self, event: InputEvent) {
            self.posted.push(event);
        }
    }

    #[test]
    fn test_held_key_is_valid() {
        let mut input = FakeInput {
            pressed: vec![13],
            ..FakeInput::default()
        };
        assert!(is_key_press_actually_valid(&mut input, &KeyEvent::new(13)));
        assert!(input.posted.is_empty());
    }

    #[test]
    fn test_spurious_press_posts_key_up() {
        let mut input = FakeInput::default();
        assert!(!is_key_press_actually_valid(&mut input, &KeyEvent::new(27)));
        assert_eq!(input.posted, vec![InputEvent::KeyUp { key: 27 }]);
    }

    #[test]
    fn test_simulated_press_is_trusted() {
        let mut input = FakeInput::default();
        assert!(is_key_press_actually_valid(
            &mut input,
            &KeyEvent::simulated(27)
        ));
        assert!(input.posted.is_empty());
    }
}
