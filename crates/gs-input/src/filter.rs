//! Auto-repeat filtering
//!
//! Holding a key makes the OS emit a stream of synthetic key-down events.
//! Only true press/release edges may reach the emulated controller.

use crate::keyboard::{KeyCode, KeyEvent, KeyEventType};
use crate::mapping::InputMapping;
use crate::pad::GbaKey;
use std::collections::HashMap;

/// A button transition destined for the emulation core
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEdge {
    Pressed(GbaKey),
    Released(GbaKey),
}

/// What to do with a host key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRoute {
    /// Deliver this edge to the session
    Edge(KeyEdge),
    /// Mapped key, but not an edge; swallow it
    Consumed,
    /// Not ours; let the toolkit handle it
    Forward,
}

/// Tracks held keys and drops anything that is not an edge
#[derive(Debug, Default)]
pub struct RepeatFilter {
    held: HashMap<KeyCode, GbaKey>,
}

impl RepeatFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route a host event through the repeat filter and the mapping
    pub fn route(&mut self, event: &KeyEvent, mapping: &InputMapping) -> KeyRoute {
        if event.repeat {
            return KeyRoute::Forward;
        }
        let Some(button) = mapping.map(event.key_code) else {
            return KeyRoute::Forward;
        };

        match event.event_type {
            KeyEventType::KeyDown => {
                if self.held.insert(event.key_code, button).is_some() {
                    // Repeat that arrived without the repeat flag
                    KeyRoute::Consumed
                } else {
                    KeyRoute::Edge(KeyEdge::Pressed(button))
                }
            }
            KeyEventType::KeyUp => match self.held.remove(&event.key_code) {
                Some(pressed) => KeyRoute::Edge(KeyEdge::Released(pressed)),
                None => KeyRoute::Consumed,
            },
        }
    }

    pub fn is_held(&self, key: KeyCode) -> bool {
        self.held.contains_key(&key)
    }

    /// Forget all held keys, returning the releases the core still needs
    pub fn clear(&mut self) -> Vec<KeyEdge> {
        let mut released: Vec<_> = self.held.drain().collect();
        released.sort_by_key(|(key, _)| *key);
        released
            .into_iter()
            .map(|(_, button)| KeyEdge::Released(button))
            .collect()
    }
}
