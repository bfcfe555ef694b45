//! Main window controller
//!
//! [`ShellWindow`] owns the session, the display host, the overlays and the
//! command table, and reacts to commands, key events and lifecycle events.
//! It never touches egui directly; requests the window itself must carry out
//! (resize, fullscreen, file picker, close) are queued as [`WindowRequest`]s.

use crate::commands::{CommandId, CommandTable};
use crate::display::DisplaySurfaceHost;
use crate::overlay::OverlayManager;
use crate::state_browser::LoadSave;
use crate::video::VideoSurface;
use gs_core::{
    event_queue, Config, EventReceiver, EventSender, LogLevel, LogSink, Result, WindowScale,
};
use gs_input::{InputMapping, KeyEdge, KeyEvent, KeyEventType, KeyRoute, RepeatFilter};
use gs_integration::{
    EmulationCore, FramePacer, GameHandle, NullCore, SaveSlot, SessionController, SessionEvent,
    SessionState, SharedSession,
};
use std::path::PathBuf;
use std::time::{Duration, Instant};

const APP_NAME: &str = "gba-shell";

/// Work the window toolkit must perform on the shell's behalf
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowRequest {
    /// Resize the window to a multiple of the native resolution
    Resize(WindowScale),
    SetFullscreen(bool),
    /// Ask the user for a ROM file
    OpenRomDialog,
    Close,
}

/// Steps performed by [`ShellWindow::shutdown`], in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownStage {
    StopRendering,
    CloseSession,
    HideOverlays,
}

/// Main window controller
pub struct ShellWindow {
    config: Config,
    session: SharedSession,
    events: EventReceiver<SessionEvent>,
    mapping: InputMapping,
    filter: RepeatFilter,
    host: DisplaySurfaceHost,
    video: VideoSurface,
    overlays: OverlayManager,
    commands: CommandTable,
    pacer: FramePacer,
    log: LogSink,
    fullscreen: bool,
    /// Set when focus loss paused the session
    paused_for_focus: bool,
    requests: Vec<WindowRequest>,
    title: String,
    shut_down: bool,
}

impl ShellWindow {
    /// Create a shell driving the null core
    pub fn new(config: Config, log: LogSink) -> Result<Self> {
        Self::with_core(config, log, |events| Box::new(NullCore::new(events)))
    }

    /// Create a shell driving the core returned by `make_core`
    pub fn with_core<F>(config: Config, log: LogSink, make_core: F) -> Result<Self>
    where
        F: FnOnce(EventSender<SessionEvent>) -> Box<dyn EmulationCore>,
    {
        let mapping = InputMapping::from_config(&config.input.keyboard)?;
        let commands = CommandTable::default_table();
        commands.check_mapping(&mapping)?;
        let (sender, events) = event_queue();

        let mut session = SessionController::new(make_core(sender.clone()), sender);
        session.set_frame_target(config.timing.fps_target);
        session.set_audio_buffer(config.audio.buffer_samples);

        Ok(Self {
            pacer: FramePacer::new(config.timing.fps_target),
            overlays: OverlayManager::new(config.debug.gdb_port),
            fullscreen: config.video.fullscreen,
            config,
            session: session.into_shared(),
            events,
            mapping,
            filter: RepeatFilter::new(),
            host: DisplaySurfaceHost::new(),
            video: VideoSurface::new(),
            commands,
            log,
            paused_for_focus: false,
            requests: Vec::new(),
            title: APP_NAME.to_string(),
            shut_down: false,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    pub fn session_state(&self) -> SessionState {
        self.session.read().state()
    }

    pub fn host(&self) -> &DisplaySurfaceHost {
        &self.host
    }

    pub fn video(&self) -> &VideoSurface {
        &self.video
    }

    pub fn video_mut(&mut self) -> &mut VideoSurface {
        &mut self.video
    }

    pub fn overlays(&self) -> &OverlayManager {
        &self.overlays
    }

    pub fn overlays_mut(&mut self) -> &mut OverlayManager {
        &mut self.overlays
    }

    pub fn commands(&self) -> &CommandTable {
        &self.commands
    }

    pub fn log(&self) -> &LogSink {
        &self.log
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    pub fn is_command_enabled(&self, id: CommandId) -> bool {
        let active = self.session.read().is_active();
        self.commands.is_enabled(id, active)
    }

    /// Drain the pending toolkit requests
    pub fn take_requests(&mut self) -> Vec<WindowRequest> {
        std::mem::take(&mut self.requests)
    }

    /// Load the ROM picked by the user. `None` means the picker was cancelled.
    pub fn select_rom(&mut self, path: Option<PathBuf>) -> Option<GameHandle> {
        let path = path.filter(|p| !p.as_os_str().is_empty())?;

        // Releases for keys held across the switch must not reach the new game
        self.release_held_keys();

        match self.session.write().load_rom(&path) {
            Ok(handle) => {
                if let Some(dir) = path.parent() {
                    self.config.paths.roms = dir.to_path_buf();
                }
                handle
            }
            Err(e) => {
                tracing::debug!("ROM selection failed: {}", e);
                None
            }
        }
    }

    /// Route a key event. Returns how the toolkit should treat it.
    pub fn handle_key(&mut self, event: &KeyEvent) -> KeyRoute {
        if let Some(id) = self.commands.shortcut_for(event) {
            if self.is_command_enabled(id) {
                self.execute(id);
                return KeyRoute::Consumed;
            }
        }

        let route = self.filter.route(event, &self.mapping);
        if let KeyRoute::Edge(edge) = route {
            self.deliver_edge(edge);
        }
        route
    }

    /// Route a key event while a text field owns the keyboard. Only releases
    /// of keys pressed before the field took focus reach the session.
    pub fn handle_key_with_text_focus(&mut self, event: &KeyEvent) -> KeyRoute {
        if event.event_type == KeyEventType::KeyUp && self.filter.is_held(event.key_code) {
            return self.handle_key(event);
        }
        KeyRoute::Forward
    }

    fn deliver_edge(&self, edge: KeyEdge) {
        let mut session = self.session.write();
        match edge {
            KeyEdge::Pressed(key) => session.key_pressed(key),
            KeyEdge::Released(key) => session.key_released(key),
        }
    }

    fn release_held_keys(&mut self) {
        for edge in self.filter.clear() {
            self.deliver_edge(edge);
        }
    }

    /// Window focus changed
    pub fn focus_changed(&mut self, focused: bool) {
        if !focused {
            self.release_held_keys();
            if self.config.general.pause_on_focus_loss && self.session.write().set_paused(true) {
                self.paused_for_focus = true;
            }
        } else if std::mem::take(&mut self.paused_for_focus) {
            self.session.write().set_paused(false);
        }
    }

    /// Run a command. Disabled commands are ignored.
    pub fn execute(&mut self, id: CommandId) {
        if !self.is_command_enabled(id) {
            tracing::debug!("Ignoring disabled command {:?}", id);
            return;
        }

        match id {
            CommandId::LoadRom => self.requests.push(WindowRequest::OpenRomDialog),
            CommandId::Reset => self.session.write().reset(),
            CommandId::Shutdown => self.session.write().close_session(),
            CommandId::LoadState => self.open_state_browser(LoadSave::Load),
            CommandId::SaveState => self.open_state_browser(LoadSave::Save),
            CommandId::QuickLoad(slot) => self.session.write().quick_load(slot),
            CommandId::QuickSave(slot) => self.session.write().quick_save(slot),
            CommandId::Pause => {
                let mut session = self.session.write();
                let paused = session.is_paused();
                session.set_paused(!paused);
            }
            CommandId::FrameAdvance => {
                let mut session = self.session.write();
                session.frame_advance();
                self.video.force_draw(session.frame_buffer());
            }
            CommandId::SetFpsTarget(target) => {
                self.session.write().set_frame_target(target);
                self.pacer.set_target(target);
                self.config.timing.fps_target = target;
            }
            CommandId::SetAudioBuffer(size) => {
                self.session.write().set_audio_buffer(size);
                self.config.audio.buffer_samples = size;
            }
            CommandId::SetScale(scale) => {
                if self.fullscreen {
                    self.set_fullscreen(false);
                }
                self.config.video.scale = scale;
                self.requests.push(WindowRequest::Resize(scale));
            }
            CommandId::ToggleFullscreen => self.set_fullscreen(!self.fullscreen),
            CommandId::ShowLog => self.log.show(),
            CommandId::OpenDebugger => {
                self.overlays.open_debugger(&self.session);
            }
            CommandId::Exit => self.requests.push(WindowRequest::Close),
        }
    }

    fn set_fullscreen(&mut self, fullscreen: bool) {
        if self.fullscreen == fullscreen {
            return;
        }
        tracing::info!("Fullscreen: {}", fullscreen);
        self.fullscreen = fullscreen;
        self.config.video.fullscreen = fullscreen;
        self.requests.push(WindowRequest::SetFullscreen(fullscreen));
    }

    fn open_state_browser(&mut self, mode: LoadSave) {
        if let Err(e) =
            self.overlays
                .open_state_browser(mode, &self.session, &mut self.host, self.fullscreen)
        {
            tracing::warn!("Cannot open state browser: {}", e);
        }
    }

    /// The state browser was dismissed
    pub fn close_state_browser(&mut self) {
        self.overlays
            .state_browser_closed(&self.session, &mut self.host);
    }

    /// The user picked a slot in the state browser
    pub fn choose_slot(&mut self, slot: SaveSlot) {
        let Some(browser) = self.overlays.state_browser() else {
            return;
        };
        browser.view().apply(slot);
        self.close_state_browser();
    }

    /// Drain the lifecycle event queue. Returns the number of events handled.
    pub fn pump_events(&mut self) -> usize {
        let events = self.events.drain();
        let count = events.len();

        for event in events {
            if let SessionEvent::Stopped(handle) = &event {
                if self.is_replaced(handle) {
                    tracing::debug!("Ignoring stop for replaced game {}", handle);
                    continue;
                }
            }

            self.commands.apply_event(&event);
            match event {
                SessionEvent::Started(handle) => {
                    self.title = format!("{} - {}", APP_NAME, handle.title());
                    self.pacer.reset();
                    self.video.start_drawing(handle);
                    let session = self.session.read();
                    self.video.force_draw(session.frame_buffer());
                }
                SessionEvent::Stopped(handle) => {
                    self.session.write().acknowledge_stopped(&handle);
                    self.overlays
                        .state_browser_closed(&self.session, &mut self.host);
                    self.release_held_keys();
                    self.video.stop_drawing();
                    self.paused_for_focus = false;
                    self.title = APP_NAME.to_string();
                }
                SessionEvent::Paused => {}
                SessionEvent::Resumed => self.pacer.reset(),
                SessionEvent::StateLoaded(_) => {
                    let session = self.session.read();
                    self.video.force_draw(session.frame_buffer());
                }
                SessionEvent::Log { level, message } => {
                    self.log.post(level, "core", &message);
                }
            }
        }

        count
    }

    /// A stop for a game the session has already moved past
    fn is_replaced(&self, stopped: &GameHandle) -> bool {
        self.session
            .read()
            .handle()
            .is_some_and(|current| current.id() != stopped.id())
    }

    /// Emulate the frames due at `now`. Returns how long until the next one.
    pub fn tick(&mut self, now: Instant) -> Option<Duration> {
        if self.shut_down || self.session_state() != SessionState::Running {
            return None;
        }

        let due = self.pacer.frames_due(now);
        if due > 0 {
            let mut session = self.session.write();
            for _ in 0..due {
                session.run_frame();
            }
            self.video.present(session.frame_buffer());
        }
        Some(self.pacer.time_until_next(now))
    }

    /// Tear the window down: stop rendering, close the session, then hide
    /// every overlay and the log viewer. Running it again does nothing.
    pub fn shutdown(&mut self) -> Vec<ShutdownStage> {
        if self.shut_down {
            return Vec::new();
        }
        self.shut_down = true;
        tracing::info!("Shutting down");

        let mut stages = Vec::with_capacity(3);

        self.video.stop_drawing();
        stages.push(ShutdownStage::StopRendering);

        self.release_held_keys();
        self.session.write().close_session();
        stages.push(ShutdownStage::CloseSession);

        self.overlays.hide_all(&self.session, &mut self.host);
        self.log.hide();
        stages.push(ShutdownStage::HideOverlays);

        self.pump_events();
        stages
    }

    /// Log a message from the window layer
    pub fn report(&self, level: LogLevel, message: &str) {
        self.log.post(level, "gs_ui", message);
    }
}
