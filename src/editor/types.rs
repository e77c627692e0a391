//! Editor type definitions.

use thiserror::Error;

use crate::input::UploadError;
use crate::types::{
    LanguageCode,
    TranslationKey,
};

/// Errors returned by editor actions. None of them leaves a partial mutation.
#[derive(Error, Debug)]
pub enum EditorError {
    /// The uploaded document could not be used.
    #[error(transparent)]
    Upload(#[from] UploadError),
    /// An upload arrived while another conflict still awaits resolution.
    #[error(
        "A previous upload has {0} unresolved conflicting keys. Resolve or cancel it before uploading again"
    )]
    ConflictPending(usize),
    /// Resolve or cancel was requested with no pending conflict.
    #[error("There is no pending conflict to resolve")]
    NoPendingConflict,
    /// Writing the export file failed.
    #[error("Failed to export translations: {0}")]
    Export(#[from] std::io::Error),
}

/// What an upload did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Keys extracted from a schema were added with empty values.
    SchemaSeeded {
        /// Keys extracted from the schema.
        extracted: usize,
        /// Keys that did not exist before.
        added: usize,
    },
    /// Translations were merged without conflicts.
    Merged {
        /// Keys written.
        keys: usize,
        /// Languages activated by the upload.
        new_languages: Vec<LanguageCode>,
    },
    /// The upload overlaps existing keys and waits for a resolution.
    ConflictPending {
        /// Keys present in both.
        conflicting_keys: Vec<TranslationKey>,
    },
}
