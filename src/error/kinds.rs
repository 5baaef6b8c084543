use std::{fmt, io};

/// Crate-wide `Result` type using [`PebbleError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, PebbleError>;

/// Top-level error type for pebble-complete.
///
/// Classification itself never fails; these errors come from the host side:
/// configuration, command-line input, output formatting and the line editor.
#[derive(Debug)]
pub enum PebbleError {
    /// Configuration errors.
    Config(ConfigError),

    /// I/O errors.
    Io(io::Error),

    /// Output serialization errors.
    Format(String),

    /// Invalid command-line input.
    Usage(String),

    /// Line editor errors.
    Readline(String),
}

/// Configuration-specific errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file not found.
    FileNotFound(String),

    /// Invalid config format.
    InvalidFormat(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for PebbleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PebbleError::Config(e) => write!(f, "Configuration error: {e}"),
            PebbleError::Io(e) => write!(f, "I/O error: {e}"),
            PebbleError::Format(msg) => write!(f, "Format error: {msg}"),
            PebbleError::Usage(msg) => write!(f, "{msg}"),
            PebbleError::Readline(msg) => write!(f, "Readline error: {msg}"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {path}"),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
        }
    }
}

impl std::error::Error for PebbleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PebbleError::Config(e) => Some(e),
            PebbleError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl std::error::Error for ConfigError {}

/* ========================= Conversions to PebbleError ========================= */

impl From<io::Error> for PebbleError {
    fn from(err: io::Error) -> Self {
        PebbleError::Io(err)
    }
}

impl From<ConfigError> for PebbleError {
    fn from(err: ConfigError) -> Self {
        PebbleError::Config(err)
    }
}

impl From<serde_json::Error> for PebbleError {
    fn from(err: serde_json::Error) -> Self {
        PebbleError::Format(err.to_string())
    }
}

impl From<toml::de::Error> for PebbleError {
    fn from(err: toml::de::Error) -> Self {
        PebbleError::Config(ConfigError::InvalidFormat(err.to_string()))
    }
}

impl From<toml::ser::Error> for PebbleError {
    fn from(err: toml::ser::Error) -> Self {
        PebbleError::Format(err.to_string())
    }
}
