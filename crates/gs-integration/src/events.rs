//! Session lifecycle events

use crate::emulation::GameHandle;
use gs_core::LogLevel;

/// Notifications delivered to the UI thread through the event queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A game was loaded and is running
    Started(GameHandle),
    /// The game was shut down, by the user or by the core
    Stopped(GameHandle),
    Paused,
    Resumed,
    /// A save state finished loading; the display should redraw
    StateLoaded(GameHandle),
    /// A message for the log sink
    Log { level: LogLevel, message: String },
}

impl SessionEvent {
    pub fn log(level: LogLevel, message: impl Into<String>) -> Self {
        Self::Log {
            level,
            message: message.into(),
        }
    }
}
