//! Configuration system for the gba-shell front-end

use crate::error::{Result, ShellError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Native GBA screen width in pixels
pub const SCREEN_WIDTH: u32 = 240;
/// Native GBA screen height in pixels
pub const SCREEN_HEIGHT: u32 = 160;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub video: VideoConfig,
    pub timing: TimingConfig,
    pub audio: AudioConfig,
    pub input: InputConfig,
    pub paths: PathConfig,
    pub debug: DebugConfig,
}

/// General front-end settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Pause the session while the window does not have focus
    pub pause_on_focus_loss: bool,
}

/// Window and display settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    pub scale: WindowScale,
    pub fullscreen: bool,
}

/// Emulation speed settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TimingConfig {
    pub fps_target: FpsTarget,
}

/// Audio settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AudioConfig {
    pub buffer_samples: AudioBufferSize,
}

/// Input settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct InputConfig {
    pub keyboard: KeyboardMapping,
}

/// Keyboard to GBA button mapping, by key name
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardMapping {
    pub a: String,
    pub b: String,
    pub l: String,
    pub r: String,
    pub start: String,
    pub select: String,
    pub up: String,
    pub down: String,
    pub left: String,
    pub right: String,
}

/// Path configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// Directory the ROM picker opens in
    pub roms: PathBuf,
}

/// Debug settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    pub log_level: LogLevelConfig,
    pub gdb_port: u16,
}

/// Logging level
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevelConfig {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevelConfig {
    /// Directive understood by `tracing_subscriber::EnvFilter`
    pub fn as_directive(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

/// Emulation speed target
///
/// Only the rates offered by the front-end are representable; zero in the
/// config file means unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum FpsTarget {
    #[default]
    Unlimited,
    Fps(u32),
}

impl FpsTarget {
    /// Rates offered in the FPS target menu
    pub const RATES: [u32; 7] = [15, 30, 45, 60, 90, 120, 240];

    pub fn all() -> impl Iterator<Item = FpsTarget> {
        Self::RATES
            .into_iter()
            .map(FpsTarget::Fps)
            .chain(std::iter::once(FpsTarget::Unlimited))
    }

    /// Time budget of a single frame, `None` when unconstrained
    pub fn frame_interval(&self) -> Option<Duration> {
        match self {
            Self::Unlimited => None,
            Self::Fps(rate) => Some(Duration::from_secs_f64(1.0 / f64::from(*rate))),
        }
    }

    pub fn rate(&self) -> Option<f32> {
        match self {
            Self::Unlimited => None,
            Self::Fps(rate) => Some(*rate as f32),
        }
    }
}

impl TryFrom<u32> for FpsTarget {
    type Error = ShellError;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            0 => Ok(Self::Unlimited),
            v if Self::RATES.contains(&v) => Ok(Self::Fps(v)),
            v => Err(ShellError::Config(format!("unsupported FPS target {}", v))),
        }
    }
}

impl From<FpsTarget> for u32 {
    fn from(target: FpsTarget) -> u32 {
        match target {
            FpsTarget::Unlimited => 0,
            FpsTarget::Fps(rate) => rate,
        }
    }
}

impl fmt::Display for FpsTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unlimited => write!(f, "Unlimited"),
            Self::Fps(rate) => write!(f, "{}", rate),
        }
    }
}

/// Audio buffer length in sample frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum AudioBufferSize {
    Samples512,
    #[default]
    Samples1024,
    Samples2048,
}

impl AudioBufferSize {
    pub fn all() -> [AudioBufferSize; 3] {
        [Self::Samples512, Self::Samples1024, Self::Samples2048]
    }

    pub fn samples(&self) -> u32 {
        match self {
            Self::Samples512 => 512,
            Self::Samples1024 => 1024,
            Self::Samples2048 => 2048,
        }
    }
}

impl TryFrom<u32> for AudioBufferSize {
    type Error = ShellError;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            512 => Ok(Self::Samples512),
            1024 => Ok(Self::Samples1024),
            2048 => Ok(Self::Samples2048),
            v => Err(ShellError::Config(format!("unsupported audio buffer size {}", v))),
        }
    }
}

impl From<AudioBufferSize> for u32 {
    fn from(size: AudioBufferSize) -> u32 {
        size.samples()
    }
}

/// Integer multiple of the native resolution used for the window size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct WindowScale(u32);

impl WindowScale {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 4;

    pub fn new(factor: u32) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&factor).then_some(Self(factor))
    }

    pub fn all() -> impl Iterator<Item = WindowScale> {
        (Self::MIN..=Self::MAX).map(WindowScale)
    }

    pub fn factor(&self) -> u32 {
        self.0
    }

    /// Window content size in pixels for this scale
    pub fn window_size(&self) -> (u32, u32) {
        (SCREEN_WIDTH * self.0, SCREEN_HEIGHT * self.0)
    }
}

impl Default for WindowScale {
    fn default() -> Self {
        Self(2)
    }
}

impl TryFrom<u32> for WindowScale {
    type Error = ShellError;

    fn try_from(value: u32) -> Result<Self> {
        Self::new(value)
            .ok_or_else(|| ShellError::Config(format!("window scale {} out of range 1-4", value)))
    }
}

impl From<WindowScale> for u32 {
    fn from(scale: WindowScale) -> u32 {
        scale.0
    }
}

// Default implementations

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            pause_on_focus_loss: false,
        }
    }
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            scale: WindowScale::default(),
            fullscreen: false,
        }
    }
}

impl Default for KeyboardMapping {
    fn default() -> Self {
        Self {
            a: "Z".to_string(),
            b: "X".to_string(),
            l: "A".to_string(),
            r: "S".to_string(),
            start: "Enter".to_string(),
            select: "Backspace".to_string(),
            up: "Up".to_string(),
            down: "Down".to_string(),
            left: "Left".to_string(),
            right: "Right".to_string(),
        }
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            roms: dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevelConfig::default(),
            gdb_port: 2345,
        }
    }
}

impl Config {
    /// Load configuration from file, or create default if it doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path, writing defaults if missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gba-shell")
            .join("config.toml")
    }
}
