//! Input dispatch contract.
//!
//! Widgets never talk to the game directly. Every synthesized event goes
//! through a `ControlInputBridge`, fire-and-forget.

use std::cell::RefCell;
use vc_core::{KeyCode, KeyType};

/// Sink for synthesized input. Implemented by the host's game bridge.
pub trait ControlInputBridge {
    fn send_key(&self, keycode: KeyCode, is_down: bool);
    /// `screen_x`/`screen_y` are the click position in screen pixels.
    fn send_mouse_button(&self, keycode: KeyCode, is_down: bool, screen_x: f32, screen_y: f32);
    fn send_xbox_button(&self, keycode: KeyCode, is_down: bool);
    /// `value` in [-1, 1].
    fn send_xbox_trigger(&self, keycode: KeyCode, value: f32);
    fn send_mouse_wheel(&self, delta_y: f32);
    /// Open the system IME and forward typed text to the game.
    fn start_text_input(&self);
}

/// Send `keycode` by its dispatch family. Mouse codes click at `center`;
/// special and unknown codes are dropped.
pub fn dispatch_by_type(
    bridge: &dyn ControlInputBridge,
    keycode: KeyCode,
    is_down: bool,
    center: (f32, f32),
) {
    match keycode.key_type() {
        KeyType::Keyboard => bridge.send_key(keycode, is_down),
        KeyType::Mouse => bridge.send_mouse_button(keycode, is_down, center.0, center.1),
        KeyType::Gamepad => bridge.send_xbox_button(keycode, is_down),
        KeyType::Special | KeyType::Unknown => {}
    }
}

// ─── Recording bridge ────────────────────────────────────────────────────

/// One call received by a `RecordingBridge`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputRecord {
    Key { keycode: KeyCode, down: bool },
    MouseButton { keycode: KeyCode, down: bool, x: f32, y: f32 },
    XboxButton { keycode: KeyCode, down: bool },
    XboxTrigger { keycode: KeyCode, value: f32 },
    MouseWheel { delta_y: f32 },
    TextInput,
}

impl InputRecord {
    /// Key code and press direction for button-like records.
    pub fn key_edge(&self) -> Option<(KeyCode, bool)> {
        match *self {
            InputRecord::Key { keycode, down }
            | InputRecord::MouseButton { keycode, down, .. }
            | InputRecord::XboxButton { keycode, down } => Some((keycode, down)),
            InputRecord::XboxTrigger { keycode, value } => Some((keycode, value > 0.0)),
            InputRecord::MouseWheel { .. } | InputRecord::TextInput => None,
        }
    }
}

/// Bridge that stores every call in order. Used for input replay, debug
/// overlays and tests.
#[derive(Debug, Default)]
pub struct RecordingBridge {
    records: RefCell<Vec<InputRecord>>,
}

impl RecordingBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<InputRecord> {
        self.records.borrow().clone()
    }

    /// Drain everything recorded so far.
    pub fn take(&self) -> Vec<InputRecord> {
        std::mem::take(&mut *self.records.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }

    fn push(&self, record: InputRecord) {
        self.records.borrow_mut().push(record);
    }
}

impl ControlInputBridge for RecordingBridge {
    fn send_key(&self, keycode: KeyCode, is_down: bool) {
        self.push(InputRecord::Key {
            keycode,
            down: is_down,
        });
    }

    fn send_mouse_button(&self, keycode: KeyCode, is_down: bool, screen_x: f32, screen_y: f32) {
        self.push(InputRecord::MouseButton {
            keycode,
            down: is_down,
            x: screen_x,
            y: screen_y,
        });
    }

    fn send_xbox_button(&self, keycode: KeyCode, is_down: bool) {
        self.push(InputRecord::XboxButton {
            keycode,
            down: is_down,
        });
    }

    fn send_xbox_trigger(&self, keycode: KeyCode, value: f32) {
        self.push(InputRecord::XboxTrigger { keycode, value });
    }

    fn send_mouse_wheel(&self, delta_y: f32) {
        self.push(InputRecord::MouseWheel { delta_y });
    }

    fn start_text_input(&self) {
        self.push(InputRecord::TextInput);
    }
}
