//! Input mapping
//!
//! Maps host keyboard keys to GBA buttons. Lookups are pure: the same key
//! always yields the same answer, and keys without a binding yield `None` so
//! the caller can hand them back to the windowing toolkit.

use crate::keyboard::KeyCode;
use crate::pad::GbaKey;
use gs_core::config::KeyboardMapping;
use gs_core::Result;
use std::collections::HashMap;

/// Input mapping configuration
#[derive(Debug, Clone)]
pub struct InputMapping {
    mappings: HashMap<KeyCode, GbaKey>,
}

impl InputMapping {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self {
            mappings: HashMap::new(),
        }
    }

    /// Default keyboard layout
    pub fn default_keyboard_mapping() -> Self {
        let mut mapping = Self::new();

        mapping.map_key(KeyCode::Z, GbaKey::A);
        mapping.map_key(KeyCode::X, GbaKey::B);
        mapping.map_key(KeyCode::A, GbaKey::L);
        mapping.map_key(KeyCode::S, GbaKey::R);
        mapping.map_key(KeyCode::Enter, GbaKey::Start);
        mapping.map_key(KeyCode::Backspace, GbaKey::Select);

        // D-pad
        mapping.map_key(KeyCode::Up, GbaKey::Up);
        mapping.map_key(KeyCode::Down, GbaKey::Down);
        mapping.map_key(KeyCode::Left, GbaKey::Left);
        mapping.map_key(KeyCode::Right, GbaKey::Right);

        mapping
    }

    /// Build a mapping from the `[input.keyboard]` config section
    pub fn from_config(config: &KeyboardMapping) -> Result<Self> {
        let bindings = [
            (&config.a, GbaKey::A),
            (&config.b, GbaKey::B),
            (&config.l, GbaKey::L),
            (&config.r, GbaKey::R),
            (&config.start, GbaKey::Start),
            (&config.select, GbaKey::Select),
            (&config.up, GbaKey::Up),
            (&config.down, GbaKey::Down),
            (&config.left, GbaKey::Left),
            (&config.right, GbaKey::Right),
        ];

        let mut mapping = Self::new();
        for (name, button) in bindings {
            let key = KeyCode::from_name(name)?;
            if let Some(previous) = mapping.mappings.insert(key, button) {
                tracing::warn!(
                    "Key {} bound to both {:?} and {:?}, keeping {:?}",
                    key.name(),
                    previous,
                    button,
                    button
                );
            }
        }
        Ok(mapping)
    }

    /// Map a keyboard key to a GBA button
    pub fn map_key(&mut self, key: KeyCode, button: GbaKey) {
        self.mappings.insert(key, button);
    }

    /// GBA button for a key, if any
    pub fn map(&self, key: KeyCode) -> Option<GbaKey> {
        self.mappings.get(&key).copied()
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

impl Default for InputMapping {
    fn default() -> Self {
        Self::default_keyboard_mapping()
    }
}
