//! Emulation session layer for gba-shell
//!
//! This crate owns the contract with the emulation core and the session
//! state machine that sits on top of it.

pub mod debug_binding;
pub mod emulation;
pub mod events;
pub mod null_core;
pub mod pacer;
pub mod session;

pub use debug_binding::DebugBinding;
pub use emulation::{EmulationCore, GameHandle, SaveSlot, SlotInfo};
pub use events::SessionEvent;
pub use null_core::NullCore;
pub use pacer::FramePacer;
pub use session::{SessionController, SessionState, SharedSession};
