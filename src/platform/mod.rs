//! Platform abstraction layer
//!
//! Collaborators the game core talks to:
//! - Frame timing
//! - Input state (keys, mouse buttons, pointer position)
//! - Key/value storage (LocalStorage on web)
//! - Sound playback
//!
//! The browser implementations live in `web` (wasm32 only). In-memory versions
//! here back the native binary and the tests.

#[cfg(target_arch = "wasm32")]
pub mod web;

use std::collections::HashMap;

use glam::Vec2;

use crate::audio::SoundRequest;

/// Timing for one rendered frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTime {
    pub frame_number: u64,
    /// Seconds since the driver started
    pub elapsed: f64,
    /// Seconds since the previous frame
    pub delta: f32,
}

impl FrameTime {
    /// The frame after this one, `delta` seconds later
    pub fn advance(&self, delta: f32) -> Self {
        Self {
            frame_number: self.frame_number + 1,
            elapsed: self.elapsed + delta as f64,
            delta,
        }
    }
}

/// Physical keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Space,
    Enter,
    Escape,
    Tab,
    KeyC,
    KeyY,
    /// Number row 1-9
    Digit(u8),
}

impl Key {
    /// Map a DOM `KeyboardEvent.code`
    pub fn from_code(code: &str) -> Option<Self> {
        let key = match code {
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "ArrowUp" => Key::ArrowUp,
            "ArrowDown" => Key::ArrowDown,
            "Space" => Key::Space,
            "Enter" | "NumpadEnter" => Key::Enter,
            "Escape" => Key::Escape,
            "Tab" => Key::Tab,
            "KeyC" => Key::KeyC,
            "KeyY" => Key::KeyY,
            _ => {
                let digit = code.strip_prefix("Digit")?.parse::<u8>().ok()?;
                if !(1..=9).contains(&digit) {
                    return None;
                }
                Key::Digit(digit)
            }
        };
        Some(key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

impl MouseButton {
    /// Map a DOM `MouseEvent.button`
    pub fn from_dom(button: i16) -> Option<Self> {
        match button {
            0 => Some(MouseButton::Left),
            1 => Some(MouseButton::Middle),
            2 => Some(MouseButton::Right),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressedState {
    NotPressed,
    PressedThisFrame,
    Held,
}

impl PressedState {
    /// Down at all, new or held
    pub fn is_pressed(self) -> bool {
        matches!(self, PressedState::PressedThisFrame | PressedState::Held)
    }

    pub fn was_pressed_this_frame(self) -> bool {
        self == PressedState::PressedThisFrame
    }
}

#[derive(Debug, Clone, Copy)]
struct ButtonState {
    down: bool,
    changed_frame: u64,
}

/// Key and mouse state as of the current frame
///
/// Down/up events are stamped with the frame they arrived in, so a press reads
/// as `PressedThisFrame` for exactly one frame and `Held` afterwards.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    keys: HashMap<Key, ButtonState>,
    buttons: HashMap<MouseButton, ButtonState>,
    mouse_position: Option<Vec2>,
    frame: u64,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp subsequent events with this frame
    pub fn start_frame(&mut self, frame: &FrameTime) {
        self.frame = frame.frame_number;
    }

    pub fn key_down(&mut self, key: Key) {
        // Auto-repeat keeps the original press frame
        if !self.key(key).is_pressed() {
            self.keys.insert(key, ButtonState { down: true, changed_frame: self.frame });
        }
    }

    pub fn key_up(&mut self, key: Key) {
        if self.key(key).is_pressed() {
            self.keys.insert(key, ButtonState { down: false, changed_frame: self.frame });
        }
    }

    pub fn mouse_down(&mut self, button: MouseButton, position: Vec2) {
        self.mouse_position = Some(position);
        if !self.mouse_button(button).is_pressed() {
            self.buttons.insert(button, ButtonState { down: true, changed_frame: self.frame });
        }
    }

    pub fn mouse_up(&mut self, button: MouseButton, position: Vec2) {
        self.mouse_position = Some(position);
        if self.mouse_button(button).is_pressed() {
            self.buttons.insert(button, ButtonState { down: false, changed_frame: self.frame });
        }
    }

    pub fn mouse_moved(&mut self, position: Vec2) {
        self.mouse_position = Some(position);
    }

    /// Release everything, e.g. when the page loses focus
    pub fn release_all(&mut self) {
        let frame = self.frame;
        for state in self.keys.values_mut().chain(self.buttons.values_mut()) {
            if state.down {
                *state = ButtonState { down: false, changed_frame: frame };
            }
        }
    }

    pub fn key(&self, key: Key) -> PressedState {
        Self::pressed_state(self.keys.get(&key), self.frame)
    }

    pub fn mouse_button(&self, button: MouseButton) -> PressedState {
        Self::pressed_state(self.buttons.get(&button), self.frame)
    }

    pub fn mouse_position(&self) -> Option<Vec2> {
        self.mouse_position
    }

    fn pressed_state(state: Option<&ButtonState>, frame: u64) -> PressedState {
        match state {
            Some(s) if s.down && s.changed_frame == frame => PressedState::PressedThisFrame,
            Some(s) if s.down => PressedState::Held,
            _ => PressedState::NotPressed,
        }
    }
}

/// String key/value persistence
pub trait Storage {
    fn load(&self, key: &str) -> Option<String>;
    fn save(&mut self, key: &str, value: &str);
}

/// Storage that lives for the process only
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn load(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn save(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

/// Receiver of fire-and-forget sound requests
pub trait SoundSink {
    fn play(&mut self, request: &SoundRequest);
}

/// Sound sink that records requests (native runs and tests)
#[derive(Debug, Clone, Default)]
pub struct SoundLog {
    pub played: Vec<SoundRequest>,
}

impl SoundSink for SoundLog {
    fn play(&mut self, request: &SoundRequest) {
        log::debug!("sound {} vol={:.2}", request.effect.name(), request.volume);
        self.played.push(*request);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(n: u64) -> FrameTime {
        FrameTime {
            frame_number: n,
            elapsed: n as f64 / 60.0,
            delta: 1.0 / 60.0,
        }
    }

    #[test]
    fn test_press_then_hold_then_release() {
        let mut input = InputState::new();
        input.start_frame(&frame(1));
        input.key_down(Key::Space);
        assert_eq!(input.key(Key::Space), PressedState::PressedThisFrame);

        input.start_frame(&frame(2));
        input.key_down(Key::Space); // auto-repeat
        assert_eq!(input.key(Key::Space), PressedState::Held);

        input.key_up(Key::Space);
        assert_eq!(input.key(Key::Space), PressedState::NotPressed);
        assert_eq!(input.key(Key::Enter), PressedState::NotPressed);
    }

    #[test]
    fn test_mouse_tracks_position() {
        let mut input = InputState::new();
        input.start_frame(&frame(5));
        assert!(input.mouse_position().is_none());
        input.mouse_down(MouseButton::Left, Vec2::new(10.0, 20.0));
        assert!(input.mouse_button(MouseButton::Left).was_pressed_this_frame());
        input.mouse_moved(Vec2::new(30.0, 40.0));
        assert_eq!(input.mouse_position(), Some(Vec2::new(30.0, 40.0)));
    }

    #[test]
    fn test_release_all() {
        let mut input = InputState::new();
        input.start_frame(&frame(1));
        input.key_down(Key::ArrowUp);
        input.mouse_down(MouseButton::Right, Vec2::ZERO);
        input.release_all();
        assert!(!input.key(Key::ArrowUp).is_pressed());
        assert!(!input.mouse_button(MouseButton::Right).is_pressed());
    }

    #[test]
    fn test_key_codes() {
        assert_eq!(Key::from_code("ArrowLeft"), Some(Key::ArrowLeft));
        assert_eq!(Key::from_code("Digit3"), Some(Key::Digit(3)));
        assert_eq!(Key::from_code("Digit0"), None);
        assert_eq!(Key::from_code("KeyQ"), None);
    }

    #[test]
    fn test_memory_storage() {
        let mut storage = MemoryStorage::new();
        assert!(storage.load("playerData").is_none());
        storage.save("playerData", "{}");
        assert_eq!(storage.load("playerData").as_deref(), Some("{}"));
    }
}
