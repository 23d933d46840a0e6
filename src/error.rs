/// Error types shared across the application
///
/// Payloads are plain strings so errors can be cloned into iced messages.
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Date filter text did not match YYYY-MM-DD
    #[error("Invalid date format '{0}'. Please use YYYY-MM-DD.")]
    InvalidDate(String),

    /// The selected directory could not be enumerated
    #[error("Failed to read directory {path}: {reason}")]
    ReadDir { path: PathBuf, reason: String },

    /// An image could not be opened or decoded
    #[error("Error opening image {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// The platform file browser could not be launched
    #[error("Error opening folder: {0}")]
    Reveal(String),

    #[error("Invalid settings: {0}")]
    Settings(String),

    /// A background task panicked or was cancelled
    #[error("Background task failed: {0}")]
    Task(String),
}

impl Error {
    pub fn decode(path: &Path, err: impl std::fmt::Display) -> Self {
        Error::Decode {
            path: path.to_path_buf(),
            reason: err.to_string(),
        }
    }

    pub fn read_dir(path: &Path, err: impl std::fmt::Display) -> Self {
        Error::ReadDir {
            path: path.to_path_buf(),
            reason: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
