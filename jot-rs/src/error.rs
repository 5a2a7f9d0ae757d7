//! Error types and exit codes for jot.

use crate::types::NoteId;
use std::path::PathBuf;
use thiserror::Error;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL_ERROR: i32 = 1;
    pub const NOTE_NOT_FOUND: i32 = 2;
    pub const STORE_UNAVAILABLE: i32 = 3;
    pub const INVALID_ARGUMENT: i32 = 4;
}

/// Main error type for jot operations.
#[derive(Error, Debug)]
pub enum JotError {
    #[error("Note does not exist: {0}")]
    NoteNotFound(NoteId),

    #[error("Connection to sqlite db at {path} failed: {source}")]
    StoreUnavailable {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("SQLite error: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Regex error: {0}")]
    RegexError(#[from] regex::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("No content provided")]
    NoContentProvided,

    #[error("Editor '{command}' failed: {message}")]
    EditorFailed { command: String, message: String },

    #[error("Pager '{command}' failed: {message}")]
    PagerFailed { command: String, message: String },
}

impl JotError {
    /// Returns the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            JotError::NoteNotFound(_) => exit_code::NOTE_NOT_FOUND,
            JotError::StoreUnavailable { .. } => exit_code::STORE_UNAVAILABLE,
            JotError::InvalidArgument(_) => exit_code::INVALID_ARGUMENT,
            _ => exit_code::GENERAL_ERROR,
        }
    }
}

/// Result type alias for jot operations.
pub type Result<T> = std::result::Result<T, JotError>;
