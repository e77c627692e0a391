//! Core types used throughout the project.

use indexmap::IndexMap;

/// Identifier of one translatable unit (often a dotted path like `properties.user.title`).
pub type TranslationKey = String;

/// Short identifier of a language or locale (e.g. `en`, `de`).
pub type LanguageCode = String;

/// Language code → translated text for a single key.
pub type TranslationEntry = IndexMap<LanguageCode, String>;

/// Translation key → per-language values. Insertion order is kept for display only.
pub type TranslationTable = IndexMap<TranslationKey, TranslationEntry>;

/// Language used when nothing else is configured or persisted.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Normalize a language code (trim and lowercase).
///
/// Language codes are case-insensitive, so every code entering the store goes
/// through this function.
#[must_use]
pub fn normalize_language_code(code: &str) -> LanguageCode {
    code.trim().to_lowercase()
}

/// Build an entry mapping every given language to the empty string.
#[must_use]
pub fn empty_entry(languages: &[LanguageCode]) -> TranslationEntry {
    languages.iter().map(|lang| (lang.clone(), String::new())).collect()
}
