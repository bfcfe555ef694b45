//! Error types for the gba-shell front-end

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the shell
#[derive(Error, Debug)]
pub enum ShellError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Failed to load ROM {}: {reason}", path.display())]
    RomLoad { path: PathBuf, reason: String },

    #[error("Emulation core error: {0}")]
    Core(String),

    #[error("No active session")]
    NoActiveSession,

    #[error("Surface error: {0}")]
    Surface(String),

    #[error("Unknown key name: {0}")]
    UnknownKey(String),
}

impl From<toml::de::Error> for ShellError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for ShellError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type alias for shell operations
pub type Result<T> = std::result::Result<T, ShellError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ShellError::RomLoad {
            path: PathBuf::from("game.gba"),
            reason: "file is empty".to_string(),
        };
        assert_eq!(format!("{}", err), "Failed to load ROM game.gba: file is empty");

        let err = ShellError::UnknownKey("Hyper".to_string());
        assert_eq!(format!("{}", err), "Unknown key name: Hyper");
    }

    #[test]
    fn test_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: ShellError = io_err.into();
        assert!(matches!(err, ShellError::Io(_)));

        let toml_err = toml::from_str::<toml::Value>("= broken").unwrap_err();
        let err: ShellError = toml_err.into();
        assert!(matches!(err, ShellError::Config(_)));
    }
}
