//! Upload type definitions.

use thiserror::Error;

use crate::types::{
    TranslationKey,
    TranslationTable,
};

/// Errors surfaced to the user when an uploaded file cannot be used.
///
/// Every variant means no mutation took place.
#[derive(Error, Debug)]
pub enum UploadError {
    /// The file could not be read.
    #[error("Failed to read uploaded file: {0}")]
    Io(#[from] std::io::Error),
    /// The file content is not valid JSON.
    #[error("Error parsing JSON file. Please check the file format: {0}")]
    Malformed(#[from] serde_json::Error),
    /// The JSON is valid but its top level is not an object.
    #[error("Unsupported file format: expected a JSON object at the top level, found {0}")]
    Unsupported(&'static str),
    /// The reader task ended without delivering a result.
    #[error("File read was interrupted before completion")]
    Interrupted,
}

/// Shape detected for an uploaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadKind {
    /// JSON-Schema-like document; seeds keys.
    Schema,
    /// Already `key -> language -> text`.
    Canonical,
    /// `key -> text`, wrapped into the assumed language.
    Flat,
    /// Any other object; flattened to dotted paths, then wrapped.
    Fallback,
    /// Not an object at the top level.
    Rejected,
}

/// Normalized upload, ready for the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Upload {
    /// Keys extracted from a schema, in traversal order.
    Schema {
        /// Extracted keys (may contain duplicates).
        keys: Vec<TranslationKey>,
    },
    /// Translation data in canonical shape.
    Translations {
        /// How the document was recognized.
        kind: UploadKind,
        /// Normalized table.
        table: TranslationTable,
    },
}
