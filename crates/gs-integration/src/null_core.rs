//! Null emulation core
//!
//! Validates and holds a ROM image, counts frames, draws a test pattern and
//! keeps save states in memory. No CPU or video hardware is simulated.

use crate::emulation::{EmulationCore, GameHandle, SaveSlot, SlotInfo};
use crate::events::SessionEvent;
use gs_core::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use gs_core::{AudioBufferSize, EventSender, FpsTarget, LogLevel, Result, ShellError};
use gs_input::{GbaButtons, GbaKey};
use std::collections::HashMap;
use std::path::Path;

/// Largest cartridge ROM the GBA can address (32 MiB)
pub const MAX_ROM_SIZE: usize = 32 * 1024 * 1024;

/// Cartridge header layout
const HEADER_TITLE: std::ops::Range<usize> = 0xA0..0xAC;
const HEADER_SIZE: usize = 0xC0;

const FRAME_PIXELS: usize = (SCREEN_WIDTH * SCREEN_HEIGHT) as usize;

#[derive(Debug, Clone, Copy)]
struct Snapshot {
    frame: u64,
    buttons: GbaButtons,
}

struct LoadedRom {
    handle: GameHandle,
    image: Vec<u8>,
}

/// In-process core with no hardware behind it
pub struct NullCore {
    events: EventSender<SessionEvent>,
    next_id: u64,
    game: Option<LoadedRom>,
    frame: u64,
    buttons: GbaButtons,
    slots: HashMap<SaveSlot, Snapshot>,
    frame_target: FpsTarget,
    audio_buffer: AudioBufferSize,
    framebuffer: Vec<u32>,
}

impl NullCore {
    pub fn new(events: EventSender<SessionEvent>) -> Self {
        Self {
            events,
            next_id: 1,
            game: None,
            frame: 0,
            buttons: GbaButtons::empty(),
            slots: HashMap::new(),
            frame_target: FpsTarget::default(),
            audio_buffer: AudioBufferSize::default(),
            framebuffer: vec![0; FRAME_PIXELS],
        }
    }

    pub fn frame_target(&self) -> FpsTarget {
        self.frame_target
    }

    pub fn audio_buffer(&self) -> AudioBufferSize {
        self.audio_buffer
    }

    pub fn buttons(&self) -> GbaButtons {
        self.buttons
    }

    /// Size in bytes of the loaded ROM image
    pub fn rom_size(&self) -> Option<usize> {
        self.game.as_ref().map(|game| game.image.len())
    }

    /// Title from the cartridge header, if it holds printable ASCII
    pub fn header_title(image: &[u8]) -> Option<String> {
        if image.len() < HEADER_SIZE {
            return None;
        }
        let raw = &image[HEADER_TITLE];
        let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
        let title = &raw[..end];
        if title.is_empty() || !title.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
            return None;
        }
        let title = String::from_utf8_lossy(title).trim().to_string();
        (!title.is_empty()).then_some(title)
    }

    fn is_current(&self, handle: &GameHandle) -> bool {
        match &self.game {
            Some(game) if game.handle.id() == handle.id() => true,
            _ => {
                tracing::debug!("Ignoring request for stale game handle {}", handle);
                false
            }
        }
    }

    fn post_log(&self, level: LogLevel, message: String) {
        self.events.post(SessionEvent::log(level, message));
    }

    fn render(&mut self) {
        let frame = self.frame as u32;
        let blue = if self.buttons.is_empty() { 0x40 } else { 0xFF };
        for y in 0..SCREEN_HEIGHT {
            for x in 0..SCREEN_WIDTH {
                let red = (x + frame) & 0xFF;
                let green = (y * 2 + frame / 2) & 0xFF;
                self.framebuffer[(y * SCREEN_WIDTH + x) as usize] = (red << 16) | (green << 8) | blue;
            }
        }
    }
}

impl EmulationCore for NullCore {
    fn load_rom(&mut self, path: &Path) -> Result<GameHandle> {
        let rom_error = |reason: String| ShellError::RomLoad {
            path: path.to_path_buf(),
            reason,
        };

        let image = std::fs::read(path).map_err(|e| rom_error(e.to_string()))?;
        if image.is_empty() {
            return Err(rom_error("file is empty".to_string()));
        }
        if image.len() > MAX_ROM_SIZE {
            return Err(rom_error(format!(
                "{} bytes exceeds the 32 MiB cartridge limit",
                image.len()
            )));
        }

        let title = Self::header_title(&image).unwrap_or_else(|| {
            path.file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| "Unknown Game".to_string())
        });
        let handle = GameHandle::new(self.next_id, title, path);
        self.next_id += 1;

        self.post_log(
            LogLevel::Info,
            format!("Loaded ROM {} ({} bytes)", handle, image.len()),
        );

        self.game = Some(LoadedRom {
            handle: handle.clone(),
            image,
        });
        self.frame = 0;
        self.buttons = GbaButtons::empty();
        self.slots.clear();
        self.render();

        Ok(handle)
    }

    fn close_game(&mut self, handle: &GameHandle) {
        if !self.is_current(handle) {
            return;
        }
        self.game = None;
        self.frame = 0;
        self.buttons = GbaButtons::empty();
        self.slots.clear();
        self.framebuffer.fill(0);
    }

    fn reset(&mut self, handle: &GameHandle) {
        if !self.is_current(handle) {
            return;
        }
        self.frame = 0;
        self.render();
        self.post_log(LogLevel::Info, format!("Reset {}", handle));
    }

    fn run_frame(&mut self, handle: &GameHandle) {
        if !self.is_current(handle) {
            return;
        }
        self.frame += 1;
        self.render();
    }

    fn save_state(&mut self, handle: &GameHandle, slot: SaveSlot) -> Result<()> {
        if !self.is_current(handle) {
            return Err(ShellError::NoActiveSession);
        }
        self.slots.insert(
            slot,
            Snapshot {
                frame: self.frame,
                buttons: self.buttons,
            },
        );
        self.post_log(
            LogLevel::Info,
            format!("Saved state to slot {} at frame {}", slot, self.frame),
        );
        Ok(())
    }

    fn load_state(&mut self, handle: &GameHandle, slot: SaveSlot) -> Result<()> {
        if !self.is_current(handle) {
            return Err(ShellError::NoActiveSession);
        }
        let snapshot = self
            .slots
            .get(&slot)
            .copied()
            .ok_or_else(|| ShellError::Core(format!("save slot {} is empty", slot)))?;

        self.frame = snapshot.frame;
        self.buttons = snapshot.buttons;
        self.render();
        self.events.post(SessionEvent::StateLoaded(handle.clone()));
        self.post_log(
            LogLevel::Info,
            format!("Loaded state from slot {} (frame {})", slot, snapshot.frame),
        );
        Ok(())
    }

    fn slot_info(&self, handle: &GameHandle, slot: SaveSlot) -> Option<SlotInfo> {
        match &self.game {
            Some(game) if game.handle.id() == handle.id() => self
                .slots
                .get(&slot)
                .map(|snapshot| SlotInfo {
                    frame: snapshot.frame,
                }),
            _ => None,
        }
    }

    fn key_down(&mut self, key: GbaKey) {
        self.buttons.insert(key.mask());
    }

    fn key_up(&mut self, key: GbaKey) {
        self.buttons.remove(key.mask());
    }

    fn set_frame_target(&mut self, target: FpsTarget) {
        self.frame_target = target;
    }

    fn set_audio_buffer(&mut self, size: AudioBufferSize) {
        self.audio_buffer = size;
    }

    fn frame_buffer(&self) -> &[u32] {
        &self.framebuffer
    }

    fn frame_count(&self) -> u64 {
        self.frame
    }
}
