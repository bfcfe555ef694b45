//! Session lifecycle controller
//!
//! Owns the emulation core and the at-most-one game session running on it.
//!
//! ```text
//! Stopped --load_rom ok--> Running <--set_paused--> Paused
//!    ^                        |                        |
//!    +------ close_session ---+------------------------+
//! ```
//!
//! A failed `load_rom` leaves the controller in `Stopped`. Operations invoked
//! outside their valid state are no-ops, not errors: they can only be reached
//! through commands the UI already disables.

use crate::emulation::{EmulationCore, GameHandle, SaveSlot, SlotInfo};
use crate::events::SessionEvent;
use crate::null_core::NullCore;
use gs_core::{AudioBufferSize, EventSender, FpsTarget, LogLevel, Result};
use gs_input::{GbaKey, PadState};
use parking_lot::RwLock;
use std::path::Path;
use std::sync::Arc;

/// Session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No game loaded
    Stopped,
    /// Game loaded and emulating
    Running,
    /// Game loaded, emulation halted
    Paused,
}

/// Session controller shared between the shell and the debug binding
pub type SharedSession = Arc<RwLock<SessionController>>;

/// Session lifecycle controller
pub struct SessionController {
    /// Emulation core
    core: Box<dyn EmulationCore>,
    /// Current state
    state: SessionState,
    /// Present iff state != Stopped
    handle: Option<GameHandle>,
    /// Emulation speed target
    frame_target: FpsTarget,
    /// Audio buffer length
    audio_buffer: AudioBufferSize,
    /// Buttons currently held
    pad: PadState,
    /// Lifecycle event queue
    events: EventSender<SessionEvent>,
}

impl SessionController {
    /// Create a controller driving `core`
    pub fn new(core: Box<dyn EmulationCore>, events: EventSender<SessionEvent>) -> Self {
        Self {
            core,
            state: SessionState::Stopped,
            handle: None,
            frame_target: FpsTarget::default(),
            audio_buffer: AudioBufferSize::default(),
            pad: PadState::new(),
            events,
        }
    }

    /// Create a controller backed by the null core
    pub fn with_null_core(events: EventSender<SessionEvent>) -> Self {
        Self::new(Box::new(NullCore::new(events.clone())), events)
    }

    pub fn into_shared(self) -> SharedSession {
        Arc::new(RwLock::new(self))
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != SessionState::Stopped
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    pub fn is_paused(&self) -> bool {
        self.state == SessionState::Paused
    }

    pub fn handle(&self) -> Option<&GameHandle> {
        self.handle.as_ref()
    }

    pub fn frame_target(&self) -> FpsTarget {
        self.frame_target
    }

    pub fn audio_buffer(&self) -> AudioBufferSize {
        self.audio_buffer
    }

    pub fn pad(&self) -> PadState {
        self.pad
    }

    pub fn frame_count(&self) -> u64 {
        self.core.frame_count()
    }

    pub fn frame_buffer(&self) -> &[u32] {
        self.core.frame_buffer()
    }

    /// Load a ROM and start a session
    ///
    /// An empty path means nothing was picked and is ignored. A running
    /// session is shut down first. On failure the controller stays stopped
    /// and the error is also posted to the log channel.
    pub fn load_rom(&mut self, path: &Path) -> Result<Option<GameHandle>> {
        if path.as_os_str().is_empty() {
            return Ok(None);
        }

        self.close_session();

        tracing::info!("Loading ROM: {}", path.display());
        match self.core.load_rom(path) {
            Ok(handle) => {
                self.core.set_frame_target(self.frame_target);
                self.core.set_audio_buffer(self.audio_buffer);
                self.handle = Some(handle.clone());
                self.state = SessionState::Running;
                tracing::info!("Session started: {}", handle);
                self.events.post(SessionEvent::Started(handle.clone()));
                Ok(Some(handle))
            }
            Err(e) => {
                tracing::error!("{}", e);
                self.events
                    .post(SessionEvent::log(LogLevel::Error, e.to_string()));
                Err(e)
            }
        }
    }

    /// Shut down the current session
    pub fn close_session(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };

        for key in GbaKey::ALL {
            if self.pad.is_button_pressed(key) {
                self.core.key_up(key);
            }
        }
        self.pad.clear();

        self.core.close_game(&handle);
        self.state = SessionState::Stopped;
        tracing::info!("Session stopped: {}", handle);
        self.events.post(SessionEvent::Stopped(handle));
    }

    /// Reconcile a stop that the core reported on its own
    pub fn acknowledge_stopped(&mut self, handle: &GameHandle) {
        if self.handle.as_ref().map(GameHandle::id) != Some(handle.id()) {
            return;
        }
        tracing::warn!("Core stopped {} unexpectedly", handle);
        self.handle = None;
        self.pad.clear();
        self.state = SessionState::Stopped;
    }

    pub fn reset(&mut self) {
        if let Some(handle) = &self.handle {
            tracing::info!("Resetting {}", handle);
            self.core.reset(handle);
        }
    }

    /// Pause or resume. Returns whether the state changed.
    pub fn set_paused(&mut self, paused: bool) -> bool {
        let (next, event) = match (self.state, paused) {
            (SessionState::Running, true) => (SessionState::Paused, SessionEvent::Paused),
            (SessionState::Paused, false) => (SessionState::Running, SessionEvent::Resumed),
            _ => return false,
        };

        tracing::info!("{:?} -> {:?}", self.state, next);
        self.state = next;
        self.events.post(event);
        true
    }

    /// Step one frame while paused
    pub fn frame_advance(&mut self) {
        if self.state != SessionState::Paused {
            return;
        }
        if let Some(handle) = &self.handle {
            self.core.frame_advance(handle);
            tracing::debug!("Advanced to frame {}", self.core.frame_count());
        }
    }

    /// Run one frame of free-running emulation
    pub fn run_frame(&mut self) {
        if self.state != SessionState::Running {
            return;
        }
        if let Some(handle) = &self.handle {
            self.core.run_frame(handle);
        }
    }

    pub fn quick_save(&mut self, slot: u8) {
        let Some((handle, slot)) = self.slot_request(slot) else {
            return;
        };
        if let Err(e) = self.core.save_state(&handle, slot) {
            tracing::error!("Quick save to slot {} failed: {}", slot, e);
            self.events
                .post(SessionEvent::log(LogLevel::Error, e.to_string()));
        }
    }

    pub fn quick_load(&mut self, slot: u8) {
        let Some((handle, slot)) = self.slot_request(slot) else {
            return;
        };
        if let Err(e) = self.core.load_state(&handle, slot) {
            tracing::error!("Quick load from slot {} failed: {}", slot, e);
            self.events
                .post(SessionEvent::log(LogLevel::Error, e.to_string()));
        }
    }

    pub fn slot_info(&self, slot: SaveSlot) -> Option<SlotInfo> {
        self.handle
            .as_ref()
            .and_then(|handle| self.core.slot_info(handle, slot))
    }

    fn slot_request(&self, slot: u8) -> Option<(GameHandle, SaveSlot)> {
        let Some(slot) = SaveSlot::new(slot) else {
            tracing::warn!("Ignoring save slot {} outside 1-9", slot);
            return None;
        };
        self.handle.clone().map(|handle| (handle, slot))
    }

    pub fn set_frame_target(&mut self, target: FpsTarget) {
        tracing::info!("FPS target: {}", target);
        self.frame_target = target;
        self.core.set_frame_target(target);
    }

    pub fn set_audio_buffer(&mut self, size: AudioBufferSize) {
        tracing::info!("Audio buffer: {} samples", size.samples());
        self.audio_buffer = size;
        self.core.set_audio_buffer(size);
    }

    pub fn key_pressed(&mut self, key: GbaKey) {
        if !self.is_active() {
            return;
        }
        self.pad.set_button(key, true);
        self.core.key_down(key);
    }

    pub fn key_released(&mut self, key: GbaKey) {
        if !self.is_active() {
            return;
        }
        self.pad.set_button(key, false);
        self.core.key_up(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gs_core::{event_queue, EventReceiver, ShellError};
    use std::io::Write;

    fn rom_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".gba").tempfile().unwrap();
        file.write_all(&[0u8; 0x200]).unwrap();
        file
    }

    fn controller() -> (SessionController, EventReceiver<SessionEvent>) {
        let (tx, rx) = event_queue();
        (SessionController::with_null_core(tx), rx)
    }

    fn lifecycle(rx: &EventReceiver<SessionEvent>) -> Vec<SessionEvent> {
        rx.drain()
            .into_iter()
            .filter(|event| !matches!(event, SessionEvent::Log { .. }))
            .collect()
    }

    #[test]
    fn test_controller_starts_stopped() {
        let (session, _rx) = controller();
        assert_eq!(session.state(), SessionState::Stopped);
        assert!(session.handle().is_none());
    }

    #[test]
    fn test_load_rom_starts_session() {
        let (mut session, rx) = controller();
        let rom = rom_file();

        let handle = session.load_rom(rom.path()).unwrap().unwrap();
        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(session.handle(), Some(&handle));
        assert_eq!(lifecycle(&rx), vec![SessionEvent::Started(handle)]);
    }

    #[test]
    fn test_empty_path_is_ignored() {
        let (mut session, rx) = controller();
        assert!(session.load_rom(Path::new("")).unwrap().is_none());
        assert_eq!(session.state(), SessionState::Stopped);
        assert!(rx.drain().is_empty());
    }

    #[test]
    fn test_load_failure_stays_stopped_and_logs() {
        let (mut session, rx) = controller();
        let result = session.load_rom(Path::new("/nonexistent/game.gba"));

        assert!(matches!(result, Err(ShellError::RomLoad { .. })));
        assert_eq!(session.state(), SessionState::Stopped);
        let events = rx.drain();
        assert!(events.iter().any(|event| matches!(
            event,
            SessionEvent::Log { level: LogLevel::Error, .. }
        )));
    }

    #[test]
    fn test_loading_replaces_active_session() {
        let (mut session, rx) = controller();
        let rom = rom_file();
        let first = session.load_rom(rom.path()).unwrap().unwrap();
        let second = session.load_rom(rom.path()).unwrap().unwrap();

        assert_eq!(
            lifecycle(&rx),
            vec![
                SessionEvent::Started(first.clone()),
                SessionEvent::Stopped(first),
                SessionEvent::Started(second),
            ]
        );
    }

    #[test]
    fn test_failed_reload_drops_previous_session() {
        let (mut session, _rx) = controller();
        let rom = rom_file();
        session.load_rom(rom.path()).unwrap();

        assert!(session.load_rom(Path::new("/nonexistent/game.gba")).is_err());
        assert_eq!(session.state(), SessionState::Stopped);
        assert!(session.handle().is_none());
    }

    #[test]
    fn test_only_load_leaves_stopped() {
        let (mut session, rx) = controller();
        session.reset();
        assert!(!session.set_paused(true));
        assert!(!session.set_paused(false));
        session.frame_advance();
        session.run_frame();
        session.quick_save(1);
        session.quick_load(1);
        session.close_session();
        session.key_pressed(GbaKey::A);

        assert_eq!(session.state(), SessionState::Stopped);
        assert_eq!(session.frame_count(), 0);
        assert!(session.pad().buttons.is_empty());
        assert!(rx.drain().is_empty());
    }

    #[test]
    fn test_close_session_from_running_and_paused() {
        let (mut session, rx) = controller();
        let rom = rom_file();

        let handle = session.load_rom(rom.path()).unwrap().unwrap();
        session.close_session();
        assert_eq!(session.state(), SessionState::Stopped);
        assert!(session.handle().is_none());

        session.load_rom(rom.path()).unwrap();
        session.set_paused(true);
        session.close_session();
        assert_eq!(session.state(), SessionState::Stopped);

        let events = lifecycle(&rx);
        assert_eq!(events[1], SessionEvent::Stopped(handle));
        assert!(matches!(events.last(), Some(SessionEvent::Stopped(_))));
    }

    #[test]
    fn test_set_paused_is_idempotent() {
        let (mut session, rx) = controller();
        let rom = rom_file();
        session.load_rom(rom.path()).unwrap();
        rx.drain();

        assert!(session.set_paused(true));
        assert!(!session.set_paused(true));
        assert_eq!(session.state(), SessionState::Paused);
        assert_eq!(lifecycle(&rx), vec![SessionEvent::Paused]);

        assert!(session.set_paused(false));
        assert!(!session.set_paused(false));
        assert_eq!(lifecycle(&rx), vec![SessionEvent::Resumed]);
    }

    #[test]
    fn test_frame_advance_only_while_paused() {
        let (mut session, _rx) = controller();
        let rom = rom_file();
        session.load_rom(rom.path()).unwrap();

        session.frame_advance();
        assert_eq!(session.frame_count(), 0);

        session.set_paused(true);
        for _ in 0..3 {
            session.frame_advance();
        }
        assert_eq!(session.frame_count(), 3);
        assert_eq!(session.state(), SessionState::Paused);

        session.run_frame();
        assert_eq!(session.frame_count(), 3);
    }

    #[test]
    fn test_quick_save_and_load() {
        let (mut session, rx) = controller();
        let rom = rom_file();
        let handle = session.load_rom(rom.path()).unwrap().unwrap();

        session.run_frame();
        session.run_frame();
        session.quick_save(3);
        session.run_frame();
        session.quick_save(4);
        session.run_frame();
        rx.drain();

        session.quick_load(3);
        assert_eq!(session.frame_count(), 2);
        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(lifecycle(&rx), vec![SessionEvent::StateLoaded(handle)]);
        assert_eq!(
            session.slot_info(SaveSlot::new(4).unwrap()),
            Some(SlotInfo { frame: 3 })
        );
    }

    #[test]
    fn test_out_of_range_slots_are_ignored() {
        let (mut session, rx) = controller();
        let rom = rom_file();
        session.load_rom(rom.path()).unwrap();
        session.run_frame();
        rx.drain();

        session.quick_save(0);
        session.quick_save(10);
        session.quick_load(10);
        assert!(rx.drain().is_empty());
        assert!(SaveSlot::all().all(|slot| session.slot_info(slot).is_none()));
        assert_eq!(session.frame_count(), 1);
    }

    #[test]
    fn test_loading_empty_slot_is_logged() {
        let (mut session, rx) = controller();
        let rom = rom_file();
        session.load_rom(rom.path()).unwrap();
        rx.drain();

        session.quick_load(5);
        assert_eq!(session.state(), SessionState::Running);
        let events = rx.drain();
        assert!(matches!(
            events.as_slice(),
            [SessionEvent::Log { level: LogLevel::Error, .. }]
        ));
    }

    #[test]
    fn test_configuration_forwarded_in_any_state() {
        let (mut session, _rx) = controller();
        session.set_frame_target(FpsTarget::Fps(30));
        session.set_audio_buffer(AudioBufferSize::Samples512);
        assert_eq!(session.frame_target(), FpsTarget::Fps(30));
        assert_eq!(session.audio_buffer(), AudioBufferSize::Samples512);
    }

    #[test]
    fn test_keys_tracked_and_released_on_close() {
        let (mut session, _rx) = controller();
        let rom = rom_file();
        session.load_rom(rom.path()).unwrap();

        session.key_pressed(GbaKey::Start);
        assert!(session.pad().is_button_pressed(GbaKey::Start));
        session.close_session();
        assert!(session.pad().buttons.is_empty());
    }

    #[test]
    fn test_acknowledge_stopped() {
        let (mut session, _rx) = controller();
        let rom = rom_file();
        let handle = session.load_rom(rom.path()).unwrap().unwrap();
        let stale = GameHandle::new(handle.id() + 100, "other", "other.gba");

        session.acknowledge_stopped(&stale);
        assert_eq!(session.state(), SessionState::Running);

        session.acknowledge_stopped(&handle);
        assert_eq!(session.state(), SessionState::Stopped);
        assert!(session.handle().is_none());
    }
}
