//! Command surface
//!
//! Every user-invokable action is a row in a [`CommandTable`]. Menus and
//! shortcuts are built from the table; effects are dispatched by the shell.

use gs_core::{AudioBufferSize, FpsTarget, Result, ShellError, WindowScale};
use gs_input::{InputMapping, KeyCode, KeyEvent, KeyEventType, KeyModifiers};
use gs_integration::{SaveSlot, SessionEvent};
use std::fmt;

/// Command identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandId {
    LoadRom,
    Reset,
    Shutdown,
    LoadState,
    SaveState,
    QuickLoad(u8),
    QuickSave(u8),
    Pause,
    FrameAdvance,
    SetFpsTarget(FpsTarget),
    SetAudioBuffer(AudioBufferSize),
    SetScale(WindowScale),
    ToggleFullscreen,
    ShowLog,
    OpenDebugger,
    Exit,
}

/// Keyboard shortcut
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortcut {
    pub modifiers: KeyModifiers,
    pub key: KeyCode,
}

impl Shortcut {
    pub const fn new(modifiers: KeyModifiers, key: KeyCode) -> Self {
        Self { modifiers, key }
    }

    pub const fn ctrl(key: KeyCode) -> Self {
        Self::new(KeyModifiers::CTRL, key)
    }

    pub const fn plain(key: KeyCode) -> Self {
        Self::new(KeyModifiers::empty(), key)
    }

    /// Whether a key-down event triggers this shortcut
    pub fn matches(&self, event: &KeyEvent) -> bool {
        event.event_type == KeyEventType::KeyDown
            && event.key_code == self.key
            && event.modifiers == self.modifiers
    }
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.contains(KeyModifiers::CTRL) {
            write!(f, "Ctrl+")?;
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            write!(f, "Alt+")?;
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            write!(f, "Shift+")?;
        }
        write!(f, "{}", self.key.name())
    }
}

/// A command table entry
#[derive(Debug, Clone)]
pub struct Command {
    pub id: CommandId,
    pub label: String,
    pub shortcut: Option<Shortcut>,
    /// Disabled while no session is active
    pub requires_active_session: bool,
}

impl Command {
    fn new(id: CommandId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            shortcut: None,
            requires_active_session: false,
        }
    }

    fn shortcut(mut self, shortcut: Shortcut) -> Self {
        self.shortcut = Some(shortcut);
        self
    }

    fn gated(mut self) -> Self {
        self.requires_active_session = true;
        self
    }
}

/// All commands of the main window
#[derive(Debug, Clone)]
pub struct CommandTable {
    commands: Vec<Command>,
    /// Check mark of the pause command
    pause_checked: bool,
}

impl CommandTable {
    pub fn default_table() -> Self {
        use CommandId::*;

        let mut commands = vec![
            Command::new(LoadRom, "Load ROM...").shortcut(Shortcut::ctrl(KeyCode::O)),
            Command::new(LoadState, "Load State...")
                .shortcut(Shortcut::ctrl(KeyCode::L))
                .gated(),
            Command::new(SaveState, "Save State...")
                .shortcut(Shortcut::ctrl(KeyCode::S))
                .gated(),
        ];

        for slot in SaveSlot::all() {
            let n = slot.number();
            let mut command = Command::new(QuickLoad(n), format!("Slot {}", n)).gated();
            if let Some(key) = KeyCode::function_key(n) {
                command = command.shortcut(Shortcut::plain(key));
            }
            commands.push(command);
        }
        for slot in SaveSlot::all() {
            let n = slot.number();
            let mut command = Command::new(QuickSave(n), format!("Slot {}", n)).gated();
            if let Some(key) = KeyCode::function_key(n) {
                command = command.shortcut(Shortcut::new(KeyModifiers::SHIFT, key));
            }
            commands.push(command);
        }

        commands.extend([
            Command::new(Reset, "Reset")
                .shortcut(Shortcut::ctrl(KeyCode::R))
                .gated(),
            Command::new(Shutdown, "Shutdown").gated(),
            Command::new(Pause, "Pause")
                .shortcut(Shortcut::ctrl(KeyCode::P))
                .gated(),
            Command::new(FrameAdvance, "Next frame")
                .shortcut(Shortcut::ctrl(KeyCode::N))
                .gated(),
        ]);

        commands.extend(
            FpsTarget::all()
                .map(|target| Command::new(SetFpsTarget(target), target.to_string())),
        );
        commands.extend(AudioBufferSize::all().into_iter().map(|size| {
            Command::new(SetAudioBuffer(size), format!("{}", size.samples()))
        }));
        commands.extend(
            WindowScale::all()
                .map(|scale| Command::new(SetScale(scale), format!("{}x", scale.factor()))),
        );

        commands.extend([
            Command::new(ToggleFullscreen, "Fullscreen").shortcut(Shortcut::ctrl(KeyCode::F)),
            Command::new(ShowLog, "View logs..."),
            Command::new(OpenDebugger, "Open debugger window..."),
            Command::new(Exit, "Exit"),
        ]);

        Self {
            commands,
            pause_checked: false,
        }
    }

    pub fn get(&self, id: CommandId) -> Option<&Command> {
        self.commands.iter().find(|command| command.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    /// Enablement is a function of the session being active and nothing else
    pub fn is_enabled(&self, id: CommandId, session_active: bool) -> bool {
        match self.get(id) {
            Some(command) => session_active || !command.requires_active_session,
            None => false,
        }
    }

    /// Command bound to a key-down event
    pub fn shortcut_for(&self, event: &KeyEvent) -> Option<CommandId> {
        if event.repeat {
            return None;
        }
        self.commands
            .iter()
            .find(|command| command.shortcut.is_some_and(|s| s.matches(event)))
            .map(|command| command.id)
    }

    /// Reject GBA bindings on keys that trigger a command on their own.
    /// Shortcuts with modifiers win over a mapped key pressed with them.
    pub fn check_mapping(&self, mapping: &InputMapping) -> Result<()> {
        let plain = self
            .commands
            .iter()
            .filter_map(|command| command.shortcut)
            .filter(|shortcut| shortcut.modifiers.is_empty());

        for shortcut in plain {
            if let Some(button) = mapping.map(shortcut.key) {
                return Err(ShellError::Config(format!(
                    "key {} is a command shortcut and cannot be bound to {:?}",
                    shortcut, button
                )));
            }
        }
        Ok(())
    }

    pub fn is_pause_checked(&self) -> bool {
        self.pause_checked
    }

    /// Track lifecycle events that change command presentation
    pub fn apply_event(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::Paused => self.pause_checked = true,
            SessionEvent::Resumed | SessionEvent::Started(_) | SessionEvent::Stopped(_) => {
                self.pause_checked = false
            }
            _ => {}
        }
    }
}

impl Default for CommandTable {
    fn default() -> Self {
        Self::default_table()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gs_input::GbaKey;
    use gs_integration::GameHandle;

    #[test]
    fn test_gated_commands_disabled_without_session() {
        let table = CommandTable::default_table();
        let gated = [
            CommandId::Reset,
            CommandId::Shutdown,
            CommandId::LoadState,
            CommandId::SaveState,
            CommandId::QuickLoad(1),
            CommandId::QuickSave(9),
            CommandId::Pause,
            CommandId::FrameAdvance,
        ];
        for id in gated {
            assert!(!table.is_enabled(id, false), "{:?}", id);
            assert!(table.is_enabled(id, true), "{:?}", id);
        }
        assert!(table.is_enabled(CommandId::LoadRom, false));
        assert!(table.is_enabled(CommandId::SetFpsTarget(FpsTarget::Fps(30)), false));
        assert!(table.is_enabled(CommandId::OpenDebugger, false));
    }

    #[test]
    fn test_unknown_slot_is_not_a_command() {
        let table = CommandTable::default_table();
        assert!(table.get(CommandId::QuickLoad(10)).is_none());
        assert!(!table.is_enabled(CommandId::QuickLoad(10), true));
    }

    #[test]
    fn test_shortcuts() {
        let table = CommandTable::default_table();
        let ctrl = |key| KeyEvent::new(key, KeyModifiers::CTRL, KeyEventType::KeyDown);

        assert_eq!(table.shortcut_for(&ctrl(KeyCode::O)), Some(CommandId::LoadRom));
        assert_eq!(table.shortcut_for(&ctrl(KeyCode::S)), Some(CommandId::SaveState));
        assert_eq!(table.shortcut_for(&ctrl(KeyCode::P)), Some(CommandId::Pause));
        assert_eq!(
            table.shortcut_for(&KeyEvent::press(KeyCode::F3)),
            Some(CommandId::QuickLoad(3))
        );
        assert_eq!(
            table.shortcut_for(&KeyEvent::new(
                KeyCode::F3,
                KeyModifiers::SHIFT,
                KeyEventType::KeyDown
            )),
            Some(CommandId::QuickSave(3))
        );
        assert_eq!(table.shortcut_for(&KeyEvent::press(KeyCode::S)), None);
        assert_eq!(table.shortcut_for(&KeyEvent::release(KeyCode::F3)), None);
        assert_eq!(table.shortcut_for(&ctrl(KeyCode::O).repeated()), None);
    }

    #[test]
    fn test_mapping_on_plain_shortcut_rejected() {
        let table = CommandTable::default_table();
        assert!(table
            .check_mapping(&InputMapping::default_keyboard_mapping())
            .is_ok());

        let mut mapping = InputMapping::default_keyboard_mapping();
        mapping.map_key(KeyCode::F2, GbaKey::Start);
        assert!(matches!(
            table.check_mapping(&mapping),
            Err(ShellError::Config(msg)) if msg.contains("F2")
        ));
    }

    #[test]
    fn test_shortcut_display() {
        assert_eq!(Shortcut::ctrl(KeyCode::O).to_string(), "Ctrl+O");
        assert_eq!(
            Shortcut::new(KeyModifiers::SHIFT, KeyCode::F4).to_string(),
            "Shift+F4"
        );
        assert_eq!(Shortcut::plain(KeyCode::F1).to_string(), "F1");
    }

    #[test]
    fn test_pause_check_follows_events() {
        let mut table = CommandTable::default_table();
        table.apply_event(&SessionEvent::Paused);
        assert!(table.is_pause_checked());
        table.apply_event(&SessionEvent::Resumed);
        assert!(!table.is_pause_checked());

        table.apply_event(&SessionEvent::Paused);
        table.apply_event(&SessionEvent::Stopped(GameHandle::new(1, "T", "t.gba")));
        assert!(!table.is_pause_checked());
    }

    #[test]
    fn test_knob_commands_cover_every_setting() {
        let table = CommandTable::default_table();
        let fps = table
            .iter()
            .filter(|c| matches!(c.id, CommandId::SetFpsTarget(_)))
            .count();
        let scales = table
            .iter()
            .filter(|c| matches!(c.id, CommandId::SetScale(_)))
            .count();
        assert_eq!(fps, 8);
        assert_eq!(scales, 4);
        assert_eq!(
            table
                .get(CommandId::SetFpsTarget(FpsTarget::Unlimited))
                .map(|c| c.label.as_str()),
            Some("Unlimited")
        );
    }
}
