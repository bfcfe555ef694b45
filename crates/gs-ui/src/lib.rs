//! User interface for gba-shell

pub mod app;
pub mod commands;
pub mod debugger;
pub mod display;
pub mod log_viewer;
pub mod overlay;
pub mod shell;
pub mod state_browser;
pub mod video;

pub use app::GbaShellApp;
pub use commands::{Command, CommandId, CommandTable, Shortcut};
pub use display::{DisplaySurfaceHost, SurfaceId};
pub use log_viewer::LogViewer;
pub use overlay::{OverlayManager, Presentation, StateBrowserHandle};
pub use shell::{ShellWindow, ShutdownStage, WindowRequest};
pub use state_browser::{LoadSave, StateBrowserView};
pub use video::VideoSurface;
