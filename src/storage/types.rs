//! Persistence type definitions.

use std::fmt;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::types::{
    LanguageCode,
    TranslationTable,
};

/// Record holding the JSON-serialized translation table.
pub const TRANSLATIONS_RECORD: &str = "i18n-translations";

/// Record holding the JSON-serialized ordered language list.
pub const LANGUAGES_RECORD: &str = "i18n-languages";

/// Errors raised while reading or writing durable records.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Underlying I/O failure.
    #[error("Failed to access storage record '{name}': {source}")]
    Io {
        /// Record name.
        name: String,
        /// Cause.
        #[source]
        source: std::io::Error,
    },
    /// The value could not be serialized.
    #[error("Failed to serialize storage record '{name}': {source}")]
    Serialize {
        /// Record name.
        name: String,
        /// Cause.
        #[source]
        source: serde_json::Error,
    },
    /// The store refused the write because it is full.
    #[error("Storage quota exceeded while writing '{name}' ({required} bytes needed, {quota} available)")]
    QuotaExceeded {
        /// Record name.
        name: String,
        /// Total bytes the write would have required.
        required: usize,
        /// Configured quota.
        quota: usize,
    },
}

/// Serialized editor state: the table and the active languages.
///
/// The two parts are stored as independent records and are not written
/// atomically.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct PersistedState {
    /// key → language → text
    pub translations: TranslationTable,
    /// Active languages in order.
    pub languages: Vec<LanguageCode>,
}

/// Bytes used by the persisted records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StorageUsage {
    /// Total size of both records.
    pub bytes: usize,
}

/// 1 KB
const KIB: usize = 1024;
/// 1 MB
const MIB: usize = 1024 * 1024;

impl fmt::Display for StorageUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (unit, divisor) = match self.bytes {
            b if b < KIB => return write!(f, "{b} B"),
            b if b < MIB => ("KB", KIB),
            _ => ("MB", MIB),
        };
        // 小数点以下1桁に丸める
        let tenths = (self.bytes * 10 + divisor / 2) / divisor;
        write!(f, "{}.{} {unit}", tenths / 10, tenths % 10)
    }
}
