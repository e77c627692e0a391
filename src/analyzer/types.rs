//! Placeholder analysis result types.

use std::fmt;

use indexmap::IndexMap;

use crate::types::{
    LanguageCode,
    TranslationKey,
};

/// Placeholder mismatch for one language of one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderIssue {
    /// Language whose placeholder set differs from the key's union.
    pub language: LanguageCode,
    /// Tokens used elsewhere for the key but absent in this language.
    pub missing: Vec<String>,
    /// Tokens present in this language but not expected.
    pub extra: Vec<String>,
}

impl fmt::Display for PlaceholderIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: missing {}, extra {}",
            self.language,
            self.missing.join(", "),
            self.extra.join(", ")
        )
    }
}

/// Key → issues. Keys without issues are absent.
pub type IssueMap = IndexMap<TranslationKey, Vec<PlaceholderIssue>>;
