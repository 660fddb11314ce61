//! Input state for camera control
//!
//! The windowing layer feeds key transitions into a [`KeyboardState`]; the
//! camera module only sees the [`Input`] trait and asks for per-key state.

use std::collections::HashMap;

/// Keys the engine reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    W,
    A,
    S,
    D,
    Q,
    E,
    LeftShift,
    Space,
    Escape,
}

/// Per-key state for the current frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyState {
    /// Not pressed
    #[default]
    Idle,
    /// Pressed this frame
    Down,
    /// Held since a previous frame
    Repeat,
    /// Released this frame
    Up,
}

impl KeyState {
    /// True while the key is held (first frame included)
    pub fn is_held(self) -> bool {
        matches!(self, KeyState::Down | KeyState::Repeat)
    }
}

/// Source of key state queried once per frame
pub trait Input {
    fn key_state(&self, key: KeyCode) -> KeyState;
}

/// KeyboardState tracks discrete/repeat transitions for each key
#[derive(Debug, Default)]
pub struct KeyboardState {
    keys: HashMap<KeyCode, KeyState>,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press coming from the window
    pub fn press(&mut self, key: KeyCode) {
        let state = self.keys.entry(key).or_default();
        if !state.is_held() {
            *state = KeyState::Down;
        }
    }

    /// Record a key release coming from the window
    pub fn release(&mut self, key: KeyCode) {
        let state = self.keys.entry(key).or_default();
        if state.is_held() {
            *state = KeyState::Up;
        }
    }

    /// Advance one frame: Down becomes Repeat, Up becomes Idle
    pub fn end_frame(&mut self) {
        for state in self.keys.values_mut() {
            *state = match *state {
                KeyState::Down | KeyState::Repeat => KeyState::Repeat,
                KeyState::Up | KeyState::Idle => KeyState::Idle,
            };
        }
    }

    /// Forget every key (useful when the window loses focus)
    pub fn reset(&mut self) {
        self.keys.clear();
    }
}

impl Input for KeyboardState {
    fn key_state(&self, key: KeyCode) -> KeyState {
        self.keys.get(&key).copied().unwrap_or_default()
    }
}
