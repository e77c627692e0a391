//! Conflict set produced when an upload overlaps existing keys.

use std::fmt;
use std::str::FromStr;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::types::{
    TranslationEntry,
    TranslationKey,
    TranslationTable,
};

/// How conflicting keys are treated when an overlapping upload is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    /// Leave conflicting keys untouched.
    Keep,
    /// Overwrite the whole entry with the incoming one.
    Replace,
    /// Incoming languages overwrite, other existing languages stay.
    #[default]
    Merge,
}

impl Resolution {
    /// All modes, in the order they are presented.
    pub const ALL: [Self; 3] = [Self::Keep, Self::Replace, Self::Merge];

    /// Lowercase name of the mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Keep => "keep",
            Self::Replace => "replace",
            Self::Merge => "merge",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown resolution mode name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown conflict resolution '{0}'. Expected one of: keep, replace, merge")]
pub struct ParseResolutionError(pub String);

impl FromStr for Resolution {
    type Err = ParseResolutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseResolutionError(s.to_string()))
    }
}

/// Pending overlap between the current table and an upload.
///
/// Lives only in memory and is consumed by exactly one resolution or
/// cancellation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictSet {
    /// Table snapshot taken when the upload arrived.
    existing: TranslationTable,
    /// Normalized incoming table.
    incoming: TranslationTable,
    /// Keys present in both, in incoming order.
    conflicting_keys: Vec<TranslationKey>,
}

/// One conflicting key with both sides, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConflictPreviewItem<'a> {
    /// Conflicting key.
    pub key: &'a str,
    /// Value before the upload.
    pub existing: Option<&'a TranslationEntry>,
    /// Value from the upload.
    pub incoming: Option<&'a TranslationEntry>,
}

impl ConflictSet {
    pub(crate) const fn new(
        existing: TranslationTable,
        incoming: TranslationTable,
        conflicting_keys: Vec<TranslationKey>,
    ) -> Self {
        Self { existing, incoming, conflicting_keys }
    }

    /// Snapshot of the table taken when the upload arrived.
    #[must_use]
    pub const fn existing(&self) -> &TranslationTable {
        &self.existing
    }

    /// Incoming data, normalized.
    #[must_use]
    pub const fn incoming(&self) -> &TranslationTable {
        &self.incoming
    }

    /// Exact intersection of existing and incoming keys.
    #[must_use]
    pub fn conflicting_keys(&self) -> &[TranslationKey] {
        &self.conflicting_keys
    }

    /// Whether `key` is one of the conflicting keys.
    #[must_use]
    pub fn is_conflicting(&self, key: &str) -> bool {
        self.conflicting_keys.iter().any(|k| k == key)
    }

    /// First `limit` conflicts and the number left out.
    #[must_use]
    pub fn preview(&self, limit: usize) -> (Vec<ConflictPreviewItem<'_>>, usize) {
        let items = self
            .conflicting_keys
            .iter()
            .take(limit)
            .map(|key| ConflictPreviewItem {
                key,
                existing: self.existing.get(key),
                incoming: self.incoming.get(key),
            })
            .collect();
        (items, self.conflicting_keys.len().saturating_sub(limit))
    }

    pub(crate) fn into_incoming(self) -> (TranslationTable, Vec<TranslationKey>) {
        (self.incoming, self.conflicting_keys)
    }
}
