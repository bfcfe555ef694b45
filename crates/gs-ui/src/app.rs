//! Main application

use eframe::egui;
use gs_core::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use gs_core::{AudioBufferSize, FpsTarget, LogLevel, WindowScale};
use gs_input::{KeyCode, KeyEvent, KeyEventType, KeyModifiers};
use gs_integration::SaveSlot;
use std::path::PathBuf;
use std::time::Instant;

use crate::commands::CommandId;
use crate::display::SurfaceId;
use crate::log_viewer::LogViewer;
use crate::overlay::Presentation;
use crate::shell::{ShellWindow, WindowRequest};
use crate::state_browser::StateBrowserView;

/// Height reserved for the menu bar when sizing the window
const MENU_BAR_HEIGHT: f32 = 24.0;

/// Outcome of drawing the state browser for one frame
enum BrowserAction {
    None,
    Chosen(SaveSlot),
    Close,
}

/// Main application state
pub struct GbaShellApp {
    /// Framework-independent window logic
    shell: ShellWindow,
    /// Log viewer panel
    log_viewer: LogViewer,
    /// Live display texture
    texture: Option<egui::TextureHandle>,
    /// Title last sent to the viewport
    title: String,
    /// Show about window
    show_about: bool,
}

impl GbaShellApp {
    pub fn new(cc: &eframe::CreationContext<'_>, mut shell: ShellWindow, rom: Option<PathBuf>) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        let log_viewer = LogViewer::new(shell.log().clone());
        shell.report(LogLevel::Info, "gba-shell UI initialized");
        shell.select_rom(rom);

        Self {
            shell,
            log_viewer,
            texture: None,
            title: String::new(),
            show_about: false,
        }
    }

    /// Feed keyboard and focus events to the shell
    fn handle_input(&mut self, ctx: &egui::Context) {
        let events = ctx.input(|i| i.events.clone());
        let typing = ctx.wants_keyboard_input();

        for event in events {
            match event {
                egui::Event::Key {
                    key,
                    pressed,
                    repeat,
                    modifiers,
                    ..
                } => {
                    let Some(key_code) = key_code(key) else {
                        continue;
                    };
                    let event_type = if pressed {
                        KeyEventType::KeyDown
                    } else {
                        KeyEventType::KeyUp
                    };
                    let mut event = KeyEvent::new(key_code, key_modifiers(modifiers), event_type);
                    event.repeat = repeat;
                    if typing {
                        self.shell.handle_key_with_text_focus(&event);
                    } else {
                        self.shell.handle_key(&event);
                    }
                }
                egui::Event::WindowFocused(focused) => self.shell.focus_changed(focused),
                _ => {}
            }
        }
    }

    fn process_requests(&mut self, ctx: &egui::Context) {
        for request in self.shell.take_requests() {
            match request {
                WindowRequest::Resize(scale) => {
                    let (width, height) = scale.window_size();
                    ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(egui::vec2(
                        width as f32,
                        height as f32 + MENU_BAR_HEIGHT,
                    )));
                }
                WindowRequest::SetFullscreen(fullscreen) => {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(fullscreen));
                }
                WindowRequest::OpenRomDialog => {
                    let path = self.open_rom_dialog();
                    self.shell.select_rom(path);
                }
                WindowRequest::Close => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
            }
        }
    }

    /// Open a file dialog to select a ROM
    fn open_rom_dialog(&self) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title("Select ROM")
            .set_directory(&self.shell.config().paths.roms)
            .add_filter("Game Boy Advance ROMs", &["gba", "agb", "bin"])
            .add_filter("All Files", &["*"])
            .pick_file()
    }

    fn sync_title(&mut self, ctx: &egui::Context) {
        if self.title != self.shell.title() {
            self.title = self.shell.title().to_string();
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(self.title.clone()));
        }
    }

    fn upload_frame(&mut self, ctx: &egui::Context) {
        if !self.shell.video_mut().take_dirty() {
            return;
        }
        let image = self.shell.video().to_color_image();
        match &mut self.texture {
            Some(texture) => texture.set(image, egui::TextureOptions::NEAREST),
            None => {
                self.texture =
                    Some(ctx.load_texture("live_display", image, egui::TextureOptions::NEAREST));
            }
        }
    }

    /// Menu entry bound to a command
    fn command_button(&mut self, ui: &mut egui::Ui, id: CommandId, selected: bool) {
        let Some(command) = self.shell.commands().get(id) else {
            return;
        };
        let mut button = egui::Button::new(command.label.clone()).selected(selected);
        if let Some(shortcut) = command.shortcut {
            button = button.shortcut_text(shortcut.to_string());
        }

        let enabled = self.shell.is_command_enabled(id);
        if ui.add_enabled(enabled, button).clicked() {
            self.shell.execute(id);
            ui.close_menu();
        }
    }

    fn show_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    self.command_button(ui, CommandId::LoadRom, false);
                    ui.separator();
                    self.command_button(ui, CommandId::LoadState, false);
                    self.command_button(ui, CommandId::SaveState, false);
                    ui.menu_button("Quick load", |ui| {
                        for slot in SaveSlot::all() {
                            self.command_button(ui, CommandId::QuickLoad(slot.number()), false);
                        }
                    });
                    ui.menu_button("Quick save", |ui| {
                        for slot in SaveSlot::all() {
                            self.command_button(ui, CommandId::QuickSave(slot.number()), false);
                        }
                    });
                    ui.separator();
                    self.command_button(ui, CommandId::Exit, false);
                });

                ui.menu_button("Emulation", |ui| {
                    self.command_button(ui, CommandId::Reset, false);
                    self.command_button(ui, CommandId::Shutdown, false);
                    ui.separator();
                    let paused = self.shell.commands().is_pause_checked();
                    self.command_button(ui, CommandId::Pause, paused);
                    self.command_button(ui, CommandId::FrameAdvance, false);
                    ui.separator();
                    ui.menu_button("FPS target", |ui| {
                        let current = self.shell.config().timing.fps_target;
                        for target in FpsTarget::all() {
                            self.command_button(ui, CommandId::SetFpsTarget(target), target == current);
                        }
                    });
                    ui.menu_button("Audio buffer", |ui| {
                        let current = self.shell.config().audio.buffer_samples;
                        for size in AudioBufferSize::all() {
                            self.command_button(ui, CommandId::SetAudioBuffer(size), size == current);
                        }
                    });
                });

                ui.menu_button("Video", |ui| {
                    ui.menu_button("Frame size", |ui| {
                        let current = self.shell.config().video.scale;
                        for scale in WindowScale::all() {
                            self.command_button(ui, CommandId::SetScale(scale), scale == current);
                        }
                    });
                    let fullscreen = self.shell.is_fullscreen();
                    self.command_button(ui, CommandId::ToggleFullscreen, fullscreen);
                });

                ui.menu_button("Tools", |ui| {
                    self.command_button(ui, CommandId::ShowLog, false);
                    self.command_button(ui, CommandId::OpenDebugger, false);
                });

                ui.menu_button("Help", |ui| {
                    if ui.button("About").clicked() {
                        self.show_about = true;
                        ui.close_menu();
                    }
                });
            });
        });
    }

    /// Paint the emulated screen scaled to fit, keeping the aspect ratio
    fn show_live_display(&self, ui: &mut egui::Ui) {
        let area = ui.max_rect();
        let native = egui::vec2(SCREEN_WIDTH as f32, SCREEN_HEIGHT as f32);
        let scale = (area.width() / native.x).min(area.height() / native.y).max(0.1);
        let rect = egui::Rect::from_center_size(area.center(), native * scale);

        if let Some(texture) = &self.texture {
            let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
            ui.painter()
                .image(texture.id(), rect, uv, egui::Color32::WHITE);
        }

        if !self.shell.video().is_drawing() {
            ui.painter().text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "No game loaded\nCtrl+O to load a ROM",
                egui::FontId::proportional(18.0),
                egui::Color32::GRAY,
            );
        }
    }

    fn show_state_browser(view: &StateBrowserView, ui: &mut egui::Ui) -> BrowserAction {
        if let Some(slot) = view.show(ui) {
            return BrowserAction::Chosen(slot);
        }
        ui.separator();
        if ui.button("Cancel").clicked() {
            BrowserAction::Close
        } else {
            BrowserAction::None
        }
    }

    fn apply_browser_action(&mut self, action: BrowserAction) {
        match action {
            BrowserAction::None => {}
            BrowserAction::Chosen(slot) => self.shell.choose_slot(slot),
            BrowserAction::Close => self.shell.close_state_browser(),
        }
    }

    fn show_overlays(&mut self, ctx: &egui::Context) {
        // Floating state browser
        let mut action = BrowserAction::None;
        if let Some(browser) = self.shell.overlays().state_browser() {
            if browser.presentation() == Presentation::TopLevel {
                let mut open = true;
                egui::Window::new(browser.mode().title())
                    .open(&mut open)
                    .collapsible(false)
                    .resizable(false)
                    .show(ctx, |ui| {
                        action = Self::show_state_browser(browser.view(), ui);
                    });
                if !open {
                    action = BrowserAction::Close;
                }
            }
        }
        self.apply_browser_action(action);

        // Debugger windows
        let mut closed = Vec::new();
        for window in self.shell.overlays_mut().debuggers_mut() {
            let mut open = true;
            egui::Window::new(format!("Debugger #{}", window.id))
                .id(egui::Id::new(("debugger", window.id)))
                .open(&mut open)
                .default_size([320.0, 200.0])
                .show(ctx, |ui| window.view.show(ui));
            if !open {
                closed.push(window.id);
            }
        }
        for id in closed {
            self.shell.overlays_mut().close_debugger(id);
        }

        // Log viewer window (floating)
        if self.shell.log().is_visible() {
            let mut open = true;
            egui::Window::new("Logs")
                .open(&mut open)
                .default_size([600.0, 400.0])
                .show(ctx, |ui| {
                    self.log_viewer.show(ui);
                });
            if !open {
                self.shell.log().hide();
            }
        }

        // About window
        if self.show_about {
            egui::Window::new("About")
                .open(&mut self.show_about)
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.heading("gba-shell");
                        ui.label("Game Boy Advance emulator front-end");
                        ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                        ui.add_space(10.0);
                        ui.label("Licensed under GPL-3.0");
                    });
                });
        }
    }
}

impl eframe::App for GbaShellApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.viewport().close_requested()) && !self.shell.is_shut_down() {
            self.shell.shutdown();
            if let Err(e) = self.shell.config().save() {
                tracing::error!("Failed to save config: {}", e);
            }
        }

        self.handle_input(ctx);
        self.shell.pump_events();
        let next_frame = self.shell.tick(Instant::now());
        self.process_requests(ctx);
        self.sync_title(ctx);
        self.upload_frame(ctx);

        if self.shell.is_fullscreen() {
            ctx.set_cursor_icon(egui::CursorIcon::None);
        } else {
            self.show_menu_bar(ctx);
        }

        // Main content
        let mut action = BrowserAction::None;
        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(egui::Color32::BLACK))
            .show(ctx, |ui| match self.shell.host().visible() {
                Some(SurfaceId::LiveDisplay) => self.show_live_display(ui),
                Some(SurfaceId::StateBrowser) => {
                    if let Some(browser) = self.shell.overlays().state_browser() {
                        action = Self::show_state_browser(browser.view(), ui);
                    }
                }
                None => {}
            });
        self.apply_browser_action(action);

        self.show_overlays(ctx);

        if let Some(delay) = next_frame {
            ctx.request_repaint_after(delay);
        }
    }

    fn save(&mut self, _storage: &mut dyn eframe::Storage) {
        if let Err(e) = self.shell.config().save() {
            tracing::error!("Failed to save config: {}", e);
        }
    }
}

fn key_modifiers(modifiers: egui::Modifiers) -> KeyModifiers {
    let mut out = KeyModifiers::empty();
    if modifiers.ctrl || modifiers.command {
        out |= KeyModifiers::CTRL;
    }
    if modifiers.shift {
        out |= KeyModifiers::SHIFT;
    }
    if modifiers.alt {
        out |= KeyModifiers::ALT;
    }
    out
}

fn key_code(key: egui::Key) -> Option<KeyCode> {
    use egui::Key;

    Some(match key {
        Key::A => KeyCode::A,
        Key::B => KeyCode::B,
        Key::C => KeyCode::C,
        Key::D => KeyCode::D,
        Key::E => KeyCode::E,
        Key::F => KeyCode::F,
        Key::G => KeyCode::G,
        Key::H => KeyCode::H,
        Key::I => KeyCode::I,
        Key::J => KeyCode::J,
        Key::K => KeyCode::K,
        Key::L => KeyCode::L,
        Key::M => KeyCode::M,
        Key::N => KeyCode::N,
        Key::O => KeyCode::O,
        Key::P => KeyCode::P,
        Key::Q => KeyCode::Q,
        Key::R => KeyCode::R,
        Key::S => KeyCode::S,
        Key::T => KeyCode::T,
        Key::U => KeyCode::U,
        Key::V => KeyCode::V,
        Key::W => KeyCode::W,
        Key::X => KeyCode::X,
        Key::Y => KeyCode::Y,
        Key::Z => KeyCode::Z,
        Key::Num0 => KeyCode::Num0,
        Key::Num1 => KeyCode::Num1,
        Key::Num2 => KeyCode::Num2,
        Key::Num3 => KeyCode::Num3,
        Key::Num4 => KeyCode::Num4,
        Key::Num5 => KeyCode::Num5,
        Key::Num6 => KeyCode::Num6,
        Key::Num7 => KeyCode::Num7,
        Key::Num8 => KeyCode::Num8,
        Key::Num9 => KeyCode::Num9,
        Key::Enter => KeyCode::Enter,
        Key::Escape => KeyCode::Escape,
        Key::Backspace => KeyCode::Backspace,
        Key::Tab => KeyCode::Tab,
        Key::Space => KeyCode::Space,
        Key::F1 => KeyCode::F1,
        Key::F2 => KeyCode::F2,
        Key::F3 => KeyCode::F3,
        Key::F4 => KeyCode::F4,
        Key::F5 => KeyCode::F5,
        Key::F6 => KeyCode::F6,
        Key::F7 => KeyCode::F7,
        Key::F8 => KeyCode::F8,
        Key::F9 => KeyCode::F9,
        Key::F10 => KeyCode::F10,
        Key::F11 => KeyCode::F11,
        Key::F12 => KeyCode::F12,
        Key::ArrowRight => KeyCode::Right,
        Key::ArrowLeft => KeyCode::Left,
        Key::ArrowDown => KeyCode::Down,
        Key::ArrowUp => KeyCode::Up,
        _ => return None,
    })
}

/// Run the application
pub fn run(shell: ShellWindow, rom: Option<PathBuf>) -> eframe::Result<()> {
    let (width, height) = shell.config().video.scale.window_size();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("gba-shell")
            .with_inner_size([width as f32, height as f32 + MENU_BAR_HEIGHT])
            .with_min_inner_size([SCREEN_WIDTH as f32, SCREEN_HEIGHT as f32])
            .with_fullscreen(shell.is_fullscreen()),
        ..Default::default()
    };

    eframe::run_native(
        "gba-shell",
        options,
        Box::new(move |cc| Ok(Box::new(GbaShellApp::new(cc, shell, rom)))),
    )
}
