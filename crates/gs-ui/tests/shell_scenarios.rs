//! End-to-end tests driving the shell window the way the app does

use gs_core::{Config, LogLevel, LogSink};
use gs_input::{KeyCode, KeyEvent, KeyEventType, KeyModifiers, KeyRoute};
use gs_integration::{SaveSlot, SessionState, SlotInfo};
use gs_ui::{CommandId, LoadSave, Presentation, ShellWindow, ShutdownStage, SurfaceId};
use std::io::Write;
use std::path::PathBuf;

const GATED: [CommandId; 8] = [
    CommandId::Reset,
    CommandId::Shutdown,
    CommandId::LoadState,
    CommandId::SaveState,
    CommandId::QuickLoad(1),
    CommandId::QuickSave(9),
    CommandId::Pause,
    CommandId::FrameAdvance,
];

fn rom_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("game")
        .suffix(".gba")
        .tempfile()
        .unwrap();
    let mut image = vec![0u8; 0x400];
    image[0xA0..0xA9].copy_from_slice(b"TESTTITLE");
    file.write_all(&image).unwrap();
    file
}

fn shell() -> ShellWindow {
    ShellWindow::new(Config::default(), LogSink::new()).unwrap()
}

fn running_shell() -> (ShellWindow, tempfile::NamedTempFile) {
    let mut shell = shell();
    let rom = rom_file();
    shell.select_rom(Some(rom.path().to_path_buf())).unwrap();
    shell.pump_events();
    (shell, rom)
}

fn ctrl(key: KeyCode) -> KeyEvent {
    KeyEvent::new(key, KeyModifiers::CTRL, KeyEventType::KeyDown)
}

#[test]
fn load_rom_enables_gated_commands() {
    let mut shell = shell();
    for id in GATED {
        assert!(!shell.is_command_enabled(id), "{:?}", id);
    }

    let rom = rom_file();
    let handle = shell.select_rom(Some(rom.path().to_path_buf())).unwrap();
    assert_eq!(handle.title(), "TESTTITLE");
    shell.pump_events();

    assert_eq!(shell.session_state(), SessionState::Running);
    for id in GATED {
        assert!(shell.is_command_enabled(id), "{:?}", id);
    }
    assert!(shell.video().is_drawing());
    assert_eq!(shell.title(), "gba-shell - TESTTITLE");
}

#[test]
fn failed_load_keeps_shell_stopped() {
    let mut shell = shell();
    let missing = PathBuf::from("/nonexistent/dir/game.gba");
    assert!(shell.select_rom(Some(missing)).is_none());
    shell.pump_events();

    assert_eq!(shell.session_state(), SessionState::Stopped);
    assert!(!shell.is_command_enabled(CommandId::Reset));
    assert!(shell
        .log()
        .snapshot(LogLevel::Error)
        .iter()
        .any(|entry| entry.message.contains("Failed to load ROM")));
}

#[test]
fn pause_then_advance_three_frames() {
    let (mut shell, _rom) = running_shell();

    shell.handle_key(&ctrl(KeyCode::P));
    shell.pump_events();
    assert_eq!(shell.session_state(), SessionState::Paused);
    assert!(shell.commands().is_pause_checked());

    let before = shell.session().read().frame_count();
    for _ in 0..3 {
        shell.execute(CommandId::FrameAdvance);
    }
    assert_eq!(shell.session_state(), SessionState::Paused);
    assert_eq!(shell.session().read().frame_count(), before + 3);

    shell.execute(CommandId::Pause);
    shell.pump_events();
    assert_eq!(shell.session_state(), SessionState::Running);
    assert!(!shell.commands().is_pause_checked());
}

#[test]
fn state_browser_resumes_session_it_paused() {
    let (mut shell, _rom) = running_shell();

    shell.execute(CommandId::SaveState);
    assert_eq!(shell.session_state(), SessionState::Paused);
    let browser = shell.overlays().state_browser().unwrap();
    assert_eq!(browser.mode(), LoadSave::Save);
    assert_eq!(browser.presentation(), Presentation::TopLevel);

    shell.close_state_browser();
    assert_eq!(shell.session_state(), SessionState::Running);
    assert!(shell.overlays().state_browser().is_none());
}

#[test]
fn state_browser_leaves_user_pause_alone() {
    let (mut shell, _rom) = running_shell();

    shell.execute(CommandId::Pause);
    shell.execute(CommandId::LoadState);
    assert!(!shell.overlays().state_browser().unwrap().paused_session_on_open());

    shell.close_state_browser();
    assert_eq!(shell.session_state(), SessionState::Paused);
}

#[test]
fn state_browser_is_single_instance() {
    let (mut shell, _rom) = running_shell();

    shell.handle_key(&ctrl(KeyCode::S));
    shell.handle_key(&ctrl(KeyCode::L));
    assert_eq!(
        shell.overlays().state_browser().map(|b| b.mode()),
        Some(LoadSave::Save)
    );

    shell.close_state_browser();
    assert_eq!(shell.session_state(), SessionState::Running);
}

#[test]
fn choosing_a_slot_saves_and_closes() {
    let (mut shell, _rom) = running_shell();
    shell.session().write().run_frame();

    shell.execute(CommandId::SaveState);
    shell.choose_slot(SaveSlot::new(3).unwrap());

    assert!(shell.overlays().state_browser().is_none());
    assert_eq!(shell.session_state(), SessionState::Running);
    assert_eq!(
        shell.session().read().slot_info(SaveSlot::new(3).unwrap()),
        Some(SlotInfo { frame: 1 })
    );
    assert!(shell
        .session()
        .read()
        .slot_info(SaveSlot::new(4).unwrap())
        .is_none());
}

#[test]
fn fullscreen_state_browser_takes_over_display() {
    let (mut shell, _rom) = running_shell();

    shell.execute(CommandId::ToggleFullscreen);
    shell.execute(CommandId::LoadState);
    assert_eq!(shell.host().visible(), Some(SurfaceId::StateBrowser));
    assert_eq!(
        shell.overlays().state_browser().map(|b| b.presentation()),
        Some(Presentation::Attached)
    );

    shell.close_state_browser();
    assert_eq!(shell.host().visible(), Some(SurfaceId::LiveDisplay));
}

#[test]
fn quick_keys_hit_their_slots() {
    let (mut shell, _rom) = running_shell();
    let shift_f4 = KeyEvent::new(KeyCode::F4, KeyModifiers::SHIFT, KeyEventType::KeyDown);

    shell.session().write().run_frame();
    shell.session().write().run_frame();
    assert_eq!(shell.handle_key(&shift_f4), KeyRoute::Consumed);
    shell.session().write().run_frame();

    shell.handle_key(&KeyEvent::press(KeyCode::F4));
    shell.pump_events();
    assert_eq!(shell.session().read().frame_count(), 2);
}

#[test]
fn held_key_reaches_core_once() {
    let (mut shell, _rom) = running_shell();

    assert!(matches!(
        shell.handle_key(&KeyEvent::press(KeyCode::Enter)),
        KeyRoute::Edge(_)
    ));
    for _ in 0..10 {
        shell.handle_key(&KeyEvent::press(KeyCode::Enter).repeated());
    }
    assert!(shell
        .session()
        .read()
        .pad()
        .is_button_pressed(gs_input::GbaKey::Start));

    assert!(matches!(
        shell.handle_key(&KeyEvent::release(KeyCode::Enter)),
        KeyRoute::Edge(_)
    ));
    assert!(shell.session().read().pad().buttons.is_empty());
    assert_eq!(
        shell.handle_key(&KeyEvent::press(KeyCode::Q)),
        KeyRoute::Forward
    );
}

#[test]
fn debugger_windows_share_binding_and_do_not_pause() {
    let (mut shell, _rom) = running_shell();

    shell.execute(CommandId::OpenDebugger);
    shell.execute(CommandId::OpenDebugger);
    assert_eq!(shell.overlays().debuggers().len(), 2);
    assert_eq!(shell.session_state(), SessionState::Running);

    let binding = shell.overlays().debug_binding().unwrap().clone();
    assert!(binding.is_bound_to(shell.session()));
    binding.break_into();
    shell.pump_events();
    assert!(shell.commands().is_pause_checked());
}

#[test]
fn stop_event_from_core_is_reconciled() {
    let (mut shell, _rom) = running_shell();
    let handle = shell.session().read().handle().cloned().unwrap();

    shell.execute(CommandId::Shutdown);
    let events = shell.pump_events();
    assert!(events >= 1);
    assert_eq!(shell.session_state(), SessionState::Stopped);
    assert!(!shell.video().is_drawing());
    assert_eq!(shell.title(), "gba-shell");

    // A second stop notification for the same game changes nothing
    shell.session().write().acknowledge_stopped(&handle);
    assert_eq!(shell.session_state(), SessionState::Stopped);
    assert!(!shell.commands().is_pause_checked());
    assert!(!shell.is_command_enabled(CommandId::Reset));
}

#[test]
fn shutdown_runs_stages_in_order_once() {
    let (mut shell, _rom) = running_shell();
    shell.execute(CommandId::ToggleFullscreen);
    shell.execute(CommandId::SaveState);
    shell.execute(CommandId::OpenDebugger);
    shell.execute(CommandId::ShowLog);

    let stages = shell.shutdown();
    assert_eq!(
        stages,
        vec![
            ShutdownStage::StopRendering,
            ShutdownStage::CloseSession,
            ShutdownStage::HideOverlays,
        ]
    );
    assert_eq!(shell.session_state(), SessionState::Stopped);
    assert!(shell.overlays().state_browser().is_none());
    assert!(shell.overlays().debuggers().is_empty());
    assert!(!shell.log().is_visible());
    assert_eq!(shell.host().visible(), Some(SurfaceId::LiveDisplay));

    assert!(shell.shutdown().is_empty());
}

#[test]
fn key_held_across_rom_switch_releases_once() {
    let (mut shell, _first) = running_shell();
    let second = rom_file();
    shell.select_rom(Some(second.path().to_path_buf())).unwrap();

    assert!(matches!(
        shell.handle_key(&KeyEvent::press(KeyCode::Z)),
        KeyRoute::Edge(_)
    ));
    shell.pump_events();
    assert_eq!(shell.session_state(), SessionState::Running);
    assert!(shell.video().is_drawing());

    assert!(matches!(
        shell.handle_key(&KeyEvent::release(KeyCode::Z)),
        KeyRoute::Edge(_)
    ));
    assert!(shell.session().read().pad().buttons.is_empty());
}

#[test]
fn stop_of_replaced_game_leaves_state_browser_open() {
    let (mut shell, _first) = running_shell();
    let second = rom_file();
    shell.select_rom(Some(second.path().to_path_buf())).unwrap();

    shell.execute(CommandId::SaveState);
    shell.pump_events();

    let browser = shell.overlays().state_browser().unwrap();
    assert_eq!(browser.mode(), LoadSave::Save);
    assert_eq!(shell.session_state(), SessionState::Paused);
    assert!(shell.commands().is_pause_checked());
    assert_eq!(shell.title(), "gba-shell - TESTTITLE");

    shell.close_state_browser();
    assert_eq!(shell.session_state(), SessionState::Running);
}

#[test]
fn stop_of_current_game_releases_held_keys() {
    let (mut shell, _rom) = running_shell();
    shell.handle_key(&KeyEvent::press(KeyCode::X));

    shell.execute(CommandId::Shutdown);
    shell.pump_events();

    assert_eq!(
        shell.handle_key(&KeyEvent::release(KeyCode::X)),
        KeyRoute::Consumed
    );
    assert!(shell.session().read().pad().buttons.is_empty());
}
