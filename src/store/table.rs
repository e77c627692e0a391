//! The in-memory translation table and its operations.
//!
//! Invariant: every key has a value (possibly empty) for every active language,
//! and at least one language is active. Every operation re-establishes it.

use serde::Serialize;

use super::conflict::{
    ConflictSet,
    Resolution,
};
use crate::types::{
    DEFAULT_LANGUAGE,
    LanguageCode,
    TranslationEntry,
    TranslationKey,
    TranslationTable,
    empty_entry,
    normalize_language_code,
};

/// Translated / total language counts for one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionStatus {
    /// Active languages with a non-blank value.
    pub completed: usize,
    /// Active languages.
    pub total: usize,
    /// `completed == total`
    pub is_complete: bool,
}

/// Result of [`TranslationStore::merge_incoming`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// No overlap; the data was merged.
    Merged {
        /// Incoming keys written.
        keys: usize,
        /// Languages activated by the merge.
        new_languages: Vec<LanguageCode>,
    },
    /// Overlap found; nothing was changed.
    Conflict(ConflictSet),
}

/// Translation table plus the ordered list of active languages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationStore {
    /// key → language → text
    table: TranslationTable,
    /// Active languages, in display order. Never empty.
    languages: Vec<LanguageCode>,
}

impl Default for TranslationStore {
    fn default() -> Self {
        Self::new(DEFAULT_LANGUAGE)
    }
}

impl TranslationStore {
    /// Empty table with a single active language.
    #[must_use]
    pub fn new(default_language: &str) -> Self {
        Self { table: TranslationTable::new(), languages: default_languages(default_language) }
    }

    /// Build a store from persisted parts, repairing the invariant.
    ///
    /// Language codes are normalized and deduplicated; an empty list falls back
    /// to `[default_language]`. Missing values are back-filled with `""`.
    #[must_use]
    pub fn from_parts(
        table: TranslationTable,
        languages: Vec<LanguageCode>,
        default_language: &str,
    ) -> Self {
        let mut normalized: Vec<LanguageCode> = Vec::with_capacity(languages.len());
        for code in languages.iter().map(|code| normalize_language_code(code)) {
            if !code.is_empty() && !normalized.contains(&code) {
                normalized.push(code);
            }
        }
        if normalized.is_empty() {
            normalized = default_languages(default_language);
        }

        let mut store = Self { table, languages: normalized };
        store.backfill();
        store
    }

    /// The full table.
    #[must_use]
    pub const fn table(&self) -> &TranslationTable {
        &self.table
    }

    /// Active languages in order.
    #[must_use]
    pub fn languages(&self) -> &[LanguageCode] {
        &self.languages
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(String::as_str)
    }

    /// Values of one key.
    #[must_use]
    pub fn entry(&self, key: &str) -> Option<&TranslationEntry> {
        self.table.get(key)
    }

    /// Whether the key exists.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.table.contains_key(key)
    }

    /// Whether the language is active.
    #[must_use]
    pub fn has_language(&self, code: &str) -> bool {
        let code = normalize_language_code(code);
        self.languages.contains(&code)
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether there are no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Whether [`Self::add_key`] would accept the key.
    #[must_use]
    pub fn can_add_key(&self, key: &str) -> bool {
        !key.is_empty() && !self.table.contains_key(key)
    }

    /// Add a key with an empty value for every active language.
    ///
    /// Returns `false` (and changes nothing) for an empty or existing key.
    pub fn add_key(&mut self, key: &str) -> bool {
        if !self.can_add_key(key) {
            return false;
        }
        self.table.insert(key.to_string(), empty_entry(&self.languages));
        true
    }

    /// Remove a key. Returns whether it existed.
    pub fn delete_key(&mut self, key: &str) -> bool {
        self.table.shift_remove(key).is_some()
    }

    /// Whether [`Self::add_language`] would accept the code.
    #[must_use]
    pub fn can_add_language(&self, code: &str) -> bool {
        let code = normalize_language_code(code);
        !code.is_empty() && !self.languages.contains(&code)
    }

    /// Activate a language and give every key an empty value for it.
    ///
    /// Returns `false` for an empty or already active code.
    pub fn add_language(&mut self, code: &str) -> bool {
        if !self.can_add_language(code) {
            return false;
        }
        let code = normalize_language_code(code);
        for entry in self.table.values_mut() {
            entry.entry(code.clone()).or_default();
        }
        self.languages.push(code);
        true
    }

    /// Whether [`Self::delete_language`] would accept the code.
    #[must_use]
    pub fn can_delete_language(&self, code: &str) -> bool {
        self.languages.len() > 1 && self.has_language(code)
    }

    /// Deactivate a language and drop its values from every key.
    ///
    /// Returns `false` when it is the last active language or not active.
    pub fn delete_language(&mut self, code: &str) -> bool {
        if !self.can_delete_language(code) {
            return false;
        }
        let code = normalize_language_code(code);
        self.languages.retain(|lang| *lang != code);
        for entry in self.table.values_mut() {
            entry.shift_remove(&code);
        }
        true
    }

    /// Set one value, creating the key first if needed.
    ///
    /// A language that is not active yet is activated. Returns `false` for an
    /// empty key or language code.
    pub fn set_value(&mut self, key: &str, language: &str, text: &str) -> bool {
        let language = normalize_language_code(language);
        if key.is_empty() || language.is_empty() {
            return false;
        }
        if !self.languages.contains(&language) {
            self.add_language(&language);
        }

        self.table
            .entry(key.to_string())
            .or_insert_with(|| empty_entry(&self.languages))
            .insert(language, text.to_string());
        true
    }

    /// Add schema-derived keys that are not present yet.
    ///
    /// Existing keys and duplicates are ignored. Returns the number added.
    pub fn seed_keys<I, K>(&mut self, keys: I) -> usize
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        keys.into_iter().filter(|key| self.add_key(key.as_ref())).count()
    }

    /// Merge uploaded data, or defer it when keys overlap.
    ///
    /// Without overlap every incoming value is written and every new language
    /// activated. With overlap nothing changes and a [`ConflictSet`] is
    /// returned for [`Self::resolve_conflicts`].
    pub fn merge_incoming(&mut self, incoming: TranslationTable) -> MergeOutcome {
        let incoming = normalize_incoming(incoming);
        let conflicting_keys: Vec<TranslationKey> =
            incoming.keys().filter(|key| self.table.contains_key(*key)).cloned().collect();

        if !conflicting_keys.is_empty() {
            tracing::info!(conflicts = conflicting_keys.len(), "Upload overlaps existing keys");
            return MergeOutcome::Conflict(ConflictSet::new(
                self.table.clone(),
                incoming,
                conflicting_keys,
            ));
        }

        let new_languages = self.activate_languages_of(&incoming);
        let keys = incoming.len();
        for (key, values) in incoming {
            self.table.entry(key).or_insert_with(|| empty_entry(&self.languages)).extend(values);
        }
        self.backfill();

        tracing::info!(keys, ?new_languages, "Merged upload");
        MergeOutcome::Merged { keys, new_languages }
    }

    /// Apply a pending conflict with the chosen resolution.
    ///
    /// Non-conflicting incoming keys are always added. Returns the languages
    /// activated by the entries actually written; entries discarded by
    /// [`Resolution::Keep`] activate nothing.
    pub fn resolve_conflicts(
        &mut self,
        conflict: ConflictSet,
        resolution: Resolution,
    ) -> Vec<LanguageCode> {
        let (incoming, conflicting_keys) = conflict.into_incoming();
        let written: TranslationTable = incoming
            .into_iter()
            .filter(|(key, _)| resolution != Resolution::Keep || !conflicting_keys.contains(key))
            .collect();
        let new_languages = self.activate_languages_of(&written);

        for (key, values) in written {
            if resolution == Resolution::Merge && conflicting_keys.contains(&key) {
                self.table.entry(key).or_default().extend(values);
            } else {
                self.table.insert(key, values);
            }
        }
        self.backfill();

        tracing::info!(%resolution, conflicts = conflicting_keys.len(), "Resolved conflicts");
        new_languages
    }

    /// Translated / total counts for a key. Blank values count as missing.
    #[must_use]
    pub fn completion_status(&self, key: &str) -> CompletionStatus {
        let entry = self.table.get(key);
        let completed = self
            .languages
            .iter()
            .filter(|lang| {
                entry.and_then(|e| e.get(*lang)).is_some_and(|text| !text.trim().is_empty())
            })
            .count();
        let total = self.languages.len();
        CompletionStatus { completed, total, is_complete: completed == total }
    }

    /// Activate every language used by `incoming` that is not active yet.
    fn activate_languages_of(&mut self, incoming: &TranslationTable) -> Vec<LanguageCode> {
        let mut added = Vec::new();
        for code in incoming.values().flat_map(TranslationEntry::keys) {
            if !self.languages.contains(code) {
                self.languages.push(code.clone());
                added.push(code.clone());
            }
        }
        added
    }

    /// Give every key an empty value for each active language it lacks.
    fn backfill(&mut self) {
        for entry in self.table.values_mut() {
            for lang in &self.languages {
                if !entry.contains_key(lang) {
                    entry.insert(lang.clone(), String::new());
                }
            }
        }
    }
}

/// Normalized, deduplicated languages; the default when none survive.
fn default_languages(default_language: &str) -> Vec<LanguageCode> {
    let code = normalize_language_code(default_language);
    if code.is_empty() { vec![DEFAULT_LANGUAGE.to_string()] } else { vec![code] }
}

/// Normalize language codes of uploaded data, dropping empty keys and codes.
fn normalize_incoming(incoming: TranslationTable) -> TranslationTable {
    incoming
        .into_iter()
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, values)| {
            let values: TranslationEntry = values
                .into_iter()
                .map(|(lang, text)| (normalize_language_code(&lang), text))
                .filter(|(lang, _)| !lang.is_empty())
                .collect();
            (key, values)
        })
        .collect()
}
