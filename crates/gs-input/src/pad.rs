//! GBA controller buttons

use bitflags::bitflags;

bitflags! {
    /// GBA button flags, in KEYINPUT register bit order
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct GbaButtons: u16 {
        const A      = 0x0001;
        const B      = 0x0002;
        const SELECT = 0x0004;
        const START  = 0x0008;
        const RIGHT  = 0x0010;
        const LEFT   = 0x0020;
        const UP     = 0x0040;
        const DOWN   = 0x0080;
        const R      = 0x0100;
        const L      = 0x0200;
    }
}

/// A single logical GBA button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GbaKey {
    A,
    B,
    Select,
    Start,
    Right,
    Left,
    Up,
    Down,
    R,
    L,
}

impl GbaKey {
    pub const ALL: [GbaKey; 10] = [
        GbaKey::A,
        GbaKey::B,
        GbaKey::Select,
        GbaKey::Start,
        GbaKey::Right,
        GbaKey::Left,
        GbaKey::Up,
        GbaKey::Down,
        GbaKey::R,
        GbaKey::L,
    ];

    pub fn mask(&self) -> GbaButtons {
        match self {
            GbaKey::A => GbaButtons::A,
            GbaKey::B => GbaButtons::B,
            GbaKey::Select => GbaButtons::SELECT,
            GbaKey::Start => GbaButtons::START,
            GbaKey::Right => GbaButtons::RIGHT,
            GbaKey::Left => GbaButtons::LEFT,
            GbaKey::Up => GbaButtons::UP,
            GbaKey::Down => GbaButtons::DOWN,
            GbaKey::R => GbaButtons::R,
            GbaKey::L => GbaButtons::L,
        }
    }
}

/// Controller state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PadState {
    /// Held buttons
    pub buttons: GbaButtons,
}

impl PadState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_button_pressed(&self, key: GbaKey) -> bool {
        self.buttons.contains(key.mask())
    }

    pub fn set_button(&mut self, key: GbaKey, pressed: bool) {
        self.buttons.set(key.mask(), pressed);
    }

    pub fn clear(&mut self) {
        self.buttons = GbaButtons::empty();
    }

    /// Active-low register value as the GBA reads it
    pub fn keyinput(&self) -> u16 {
        !self.buttons.bits() & GbaButtons::all().bits()
    }
}
