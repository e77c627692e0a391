//! CLI error type.

use thiserror::Error;

use crate::config::ConfigError;
use crate::editor::EditorError;
use crate::input::UploadError;
use crate::storage::StorageError;

/// Errors that end a CLI invocation with a failure status.
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid or unreadable configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Rejected editor action.
    #[error(transparent)]
    Editor(#[from] EditorError),

    /// Upload file could not be read or parsed.
    #[error("Failed to read upload: {0}")]
    Upload(#[from] UploadError),

    /// Durable storage failure.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// stdout or file write failure.
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),

    /// The named key does not exist.
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    /// `clear` without `--yes`.
    #[error("Refusing to clear stored translations without --yes")]
    ConfirmationRequired,
}
