//! Host keyboard events

use bitflags::bitflags;
use gs_core::{Result, ShellError};

bitflags! {
    /// Keyboard modifier keys
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct KeyModifiers: u8 {
        const CTRL  = 0x01;
        const SHIFT = 0x02;
        const ALT   = 0x04;
    }
}

/// Keyboard key codes (USB HID usage codes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum KeyCode {
    // Letters
    A = 0x04, B = 0x05, C = 0x06, D = 0x07,
    E = 0x08, F = 0x09, G = 0x0A, H = 0x0B,
    I = 0x0C, J = 0x0D, K = 0x0E, L = 0x0F,
    M = 0x10, N = 0x11, O = 0x12, P = 0x13,
    Q = 0x14, R = 0x15, S = 0x16, T = 0x17,
    U = 0x18, V = 0x19, W = 0x1A, X = 0x1B,
    Y = 0x1C, Z = 0x1D,

    // Numbers
    Num1 = 0x1E, Num2 = 0x1F, Num3 = 0x20, Num4 = 0x21,
    Num5 = 0x22, Num6 = 0x23, Num7 = 0x24, Num8 = 0x25,
    Num9 = 0x26, Num0 = 0x27,

    // Special keys
    Enter = 0x28,
    Escape = 0x29,
    Backspace = 0x2A,
    Tab = 0x2B,
    Space = 0x2C,

    // Function keys
    F1 = 0x3A, F2 = 0x3B, F3 = 0x3C, F4 = 0x3D,
    F5 = 0x3E, F6 = 0x3F, F7 = 0x40, F8 = 0x41,
    F9 = 0x42, F10 = 0x43, F11 = 0x44, F12 = 0x45,

    // Arrow keys
    Right = 0x4F,
    Left = 0x50,
    Down = 0x51,
    Up = 0x52,
}

const NAMED_KEYS: [(KeyCode, &str); 57] = [
    (KeyCode::A, "A"), (KeyCode::B, "B"), (KeyCode::C, "C"), (KeyCode::D, "D"),
    (KeyCode::E, "E"), (KeyCode::F, "F"), (KeyCode::G, "G"), (KeyCode::H, "H"),
    (KeyCode::I, "I"), (KeyCode::J, "J"), (KeyCode::K, "K"), (KeyCode::L, "L"),
    (KeyCode::M, "M"), (KeyCode::N, "N"), (KeyCode::O, "O"), (KeyCode::P, "P"),
    (KeyCode::Q, "Q"), (KeyCode::R, "R"), (KeyCode::S, "S"), (KeyCode::T, "T"),
    (KeyCode::U, "U"), (KeyCode::V, "V"), (KeyCode::W, "W"), (KeyCode::X, "X"),
    (KeyCode::Y, "Y"), (KeyCode::Z, "Z"),
    (KeyCode::Num1, "1"), (KeyCode::Num2, "2"), (KeyCode::Num3, "3"), (KeyCode::Num4, "4"),
    (KeyCode::Num5, "5"), (KeyCode::Num6, "6"), (KeyCode::Num7, "7"), (KeyCode::Num8, "8"),
    (KeyCode::Num9, "9"), (KeyCode::Num0, "0"),
    (KeyCode::Enter, "Enter"), (KeyCode::Escape, "Escape"), (KeyCode::Backspace, "Backspace"),
    (KeyCode::Tab, "Tab"), (KeyCode::Space, "Space"),
    (KeyCode::F1, "F1"), (KeyCode::F2, "F2"), (KeyCode::F3, "F3"), (KeyCode::F4, "F4"),
    (KeyCode::F5, "F5"), (KeyCode::F6, "F6"), (KeyCode::F7, "F7"), (KeyCode::F8, "F8"),
    (KeyCode::F9, "F9"), (KeyCode::F10, "F10"), (KeyCode::F11, "F11"), (KeyCode::F12, "F12"),
    (KeyCode::Right, "Right"), (KeyCode::Left, "Left"), (KeyCode::Down, "Down"), (KeyCode::Up, "Up"),
];

impl KeyCode {
    /// Parse a key name as written in the config file (case-insensitive).
    /// "Return" is accepted as an alias for Enter.
    pub fn from_name(name: &str) -> Result<Self> {
        let name = name.trim();
        if name.eq_ignore_ascii_case("return") {
            return Ok(KeyCode::Enter);
        }
        NAMED_KEYS
            .iter()
            .find(|(_, n)| n.eq_ignore_ascii_case(name))
            .map(|(key, _)| *key)
            .ok_or_else(|| ShellError::UnknownKey(name.to_string()))
    }

    pub fn name(&self) -> &'static str {
        NAMED_KEYS
            .iter()
            .find(|(key, _)| key == self)
            .map(|(_, n)| *n)
            .unwrap_or("?")
    }

    /// Function key F1..F9 for a quick save slot number
    pub fn function_key(n: u8) -> Option<Self> {
        match n {
            1 => Some(KeyCode::F1),
            2 => Some(KeyCode::F2),
            3 => Some(KeyCode::F3),
            4 => Some(KeyCode::F4),
            5 => Some(KeyCode::F5),
            6 => Some(KeyCode::F6),
            7 => Some(KeyCode::F7),
            8 => Some(KeyCode::F8),
            9 => Some(KeyCode::F9),
            10 => Some(KeyCode::F10),
            11 => Some(KeyCode::F11),
            12 => Some(KeyCode::F12),
            _ => None,
        }
    }
}

/// Keyboard event type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEventType {
    KeyDown,
    KeyUp,
}

/// Keyboard event as delivered by the windowing layer
#[derive(Debug, Clone, Copy)]
pub struct KeyEvent {
    pub key_code: KeyCode,
    pub modifiers: KeyModifiers,
    pub event_type: KeyEventType,
    /// Set by the OS for events synthesized while a key is held
    pub repeat: bool,
}

impl KeyEvent {
    pub fn new(key_code: KeyCode, modifiers: KeyModifiers, event_type: KeyEventType) -> Self {
        Self {
            key_code,
            modifiers,
            event_type,
            repeat: false,
        }
    }

    pub fn press(key_code: KeyCode) -> Self {
        Self::new(key_code, KeyModifiers::empty(), KeyEventType::KeyDown)
    }

    pub fn release(key_code: KeyCode) -> Self {
        Self::new(key_code, KeyModifiers::empty(), KeyEventType::KeyUp)
    }

    pub fn repeated(mut self) -> Self {
        self.repeat = true;
        self
    }
}
