//! Input handling for gba-shell
//!
//! Physical key events come in, GBA button edges come out.

pub mod filter;
pub mod keyboard;
pub mod mapping;
pub mod pad;

pub use filter::{KeyEdge, KeyRoute, RepeatFilter};
pub use keyboard::{KeyCode, KeyEvent, KeyEventType, KeyModifiers};
pub use mapping::InputMapping;
pub use pad::{GbaButtons, GbaKey, PadState};
