//! Configuration errors with codes, the offending file and a recovery hint
//!
//! The binary prints an [`Error`] as text, or as an [`ErrorReport`] under
//! `--format json`, and exits with [`exit_codes::CONFIG_ERROR`].

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    // IO errors (2xxx)
    ReadFailed = 2000,
    FileNotFound = 2001,
    PermissionDenied = 2002,

    // Configuration errors (3xxx)
    ConfigNotFound = 3001,
    ConfigParseError = 3002,
    InvalidConfigValue = 3003,
}

impl ErrorCode {
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// What the user can do about it, if anything obvious.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            ErrorCode::FileNotFound | ErrorCode::ConfigNotFound => {
                Some("Create a .fuelscope.toml file or pass --config with an existing path")
            }
            ErrorCode::PermissionDenied => Some("Check the file's read permissions"),
            ErrorCode::ConfigParseError => Some("Check the TOML syntax and section names"),
            ErrorCode::InvalidConfigValue | ErrorCode::ReadFailed => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

/// A configuration file that could not be used
#[derive(Error, Debug)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    /// The file being loaded
    pub path: Option<PathBuf>,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(path) = &self.path {
            write!(f, "\n  File: {}", path.display())?;
        }
        if let Some(suggestion) = self.code.suggestion() {
            write!(f, "\n  Suggestion: {}", suggestion)?;
        }
        Ok(())
    }
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
            source: None,
        }
    }

    /// Attach the file the error relates to
    pub fn with_path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn config_not_found(path: impl AsRef<Path>) -> Self {
        Self::new(ErrorCode::ConfigNotFound, "Configuration file not found").with_path(path)
    }

    pub fn invalid_config_value(key: &str, reason: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::InvalidConfigValue,
            format!("Invalid value for `{}`: {}", key, reason),
        )
    }

    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code.to_string(),
            kind: self.code,
            message: self.message.clone(),
            path: self.path.as_ref().map(|p| p.display().to_string()),
            suggestion: self.code.suggestion(),
            source: self.source.as_ref().map(|e| e.to_string()),
        }
    }
}

/// Machine-readable form of an [`Error`]
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    pub code: String,
    pub kind: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

pub type Result<T> = std::result::Result<T, Error>;

/// Process exit codes of the `fuelscope` binary
pub mod exit_codes {
    pub const FAILURE: u8 = 1;
    pub const CONFIG_ERROR: u8 = 3;
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorCode::PermissionDenied,
            _ => ErrorCode::ReadFailed,
        };
        Error::new(code, format!("Could not read configuration: {}", err)).with_source(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::new(ErrorCode::ConfigParseError, format!("TOML parse error: {}", err))
            .with_source(err)
    }
}
