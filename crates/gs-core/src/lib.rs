//! Core types for the gba-shell front-end
//!
//! This crate provides the error taxonomy, configuration, logging
//! infrastructure and the UI-thread event queue shared by the other crates.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use config::{AudioBufferSize, Config, FpsTarget, WindowScale};
pub use error::{Result, ShellError};
pub use events::{event_queue, EventReceiver, EventSender};
pub use logging::{LogEntry, LogLevel, LogSink, LogSinkLayer};
