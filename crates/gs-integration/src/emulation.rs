//! Emulation core contract
//!
//! The shell never simulates hardware itself. It drives an [`EmulationCore`]
//! and learns about asynchronous outcomes (state loaded, log lines) through
//! the event sender the core was constructed with.

use gs_core::{AudioBufferSize, FpsTarget, Result};
use gs_input::GbaKey;
use std::fmt;
use std::path::{Path, PathBuf};

/// Opaque reference to a loaded game, issued by the core
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameHandle {
    id: u64,
    title: String,
    path: PathBuf,
}

impl GameHandle {
    pub fn new(id: u64, title: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            id,
            title: title.into(),
            path: path.into(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for GameHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (#{})", self.title, self.id)
    }
}

/// Quick save/load slot, 1 through 9
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SaveSlot(u8);

impl SaveSlot {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 9;

    pub fn new(number: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&number).then_some(Self(number))
    }

    pub fn all() -> impl Iterator<Item = SaveSlot> {
        (Self::MIN..=Self::MAX).map(SaveSlot)
    }

    pub fn number(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for SaveSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Summary of a filled save slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotInfo {
    /// Frame number the snapshot was taken at
    pub frame: u64,
}

/// Interface the session controller drives
///
/// Calls are requests: they return once the core has accepted them and must
/// not block on emulation work.
pub trait EmulationCore: Send {
    /// Load a ROM and start a game
    fn load_rom(&mut self, path: &Path) -> Result<GameHandle>;

    /// Tear down a game and release its resources
    fn close_game(&mut self, handle: &GameHandle);

    fn reset(&mut self, handle: &GameHandle);

    /// Run one frame of free-running emulation
    fn run_frame(&mut self, handle: &GameHandle);

    /// Step exactly one frame while paused
    fn frame_advance(&mut self, handle: &GameHandle) {
        self.run_frame(handle);
    }

    fn save_state(&mut self, handle: &GameHandle, slot: SaveSlot) -> Result<()>;

    /// Restore a slot; completion is announced with `SessionEvent::StateLoaded`
    fn load_state(&mut self, handle: &GameHandle, slot: SaveSlot) -> Result<()>;

    fn slot_info(&self, handle: &GameHandle, slot: SaveSlot) -> Option<SlotInfo>;

    fn key_down(&mut self, key: GbaKey);

    fn key_up(&mut self, key: GbaKey);

    fn set_frame_target(&mut self, target: FpsTarget);

    fn set_audio_buffer(&mut self, size: AudioBufferSize);

    /// Last completed frame, 0x00RRGGBB per pixel, row-major 240x160
    fn frame_buffer(&self) -> &[u32];

    /// Frames emulated since the game was loaded
    fn frame_count(&self) -> u64;
}
