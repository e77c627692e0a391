//! Placeholder extraction and cross-language consistency checks.
//!
//! A placeholder is the literal text `${identifier}`. For each key, the union of
//! placeholders over all languages is the expected set; every language whose own
//! set differs is reported.

use std::sync::LazyLock;

use indexmap::IndexSet;
use regex::Regex;

use super::types::{
    IssueMap,
    PlaceholderIssue,
};
use crate::types::{
    LanguageCode,
    TranslationEntry,
    TranslationTable,
};

/// `${` + one or more non-`}` characters + `}`
#[allow(clippy::unwrap_used)]
static PLACEHOLDER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{[^}]+\}").unwrap());

/// Extract every placeholder token from a text, delimiters included.
///
/// The result is a set; first-seen order is kept so that messages are stable.
///
/// # Examples
/// ```
/// use json_i18n_translator::analyzer::extract_placeholders;
///
/// let placeholders = extract_placeholders("Hello ${name}, you have ${count} ${count}");
/// assert_eq!(placeholders.len(), 2);
/// assert!(placeholders.contains("${name}"));
/// assert!(placeholders.contains("${count}"));
/// ```
#[must_use]
pub fn extract_placeholders(text: &str) -> IndexSet<String> {
    PLACEHOLDER_PATTERN.find_iter(text).map(|m| m.as_str().to_string()).collect()
}

/// Union of placeholders over every value of an entry.
#[must_use]
pub fn collect_placeholders(entry: &TranslationEntry) -> IndexSet<String> {
    entry.values().flat_map(|text| extract_placeholders(text)).collect()
}

/// Compare each language's placeholders against the expected set.
///
/// Languages are visited in `languages` order; a language without a value is
/// analysed as the empty string. When `expected` is empty the key is clean by
/// definition and nothing is reported.
#[must_use]
pub fn find_inconsistencies(
    entry: &TranslationEntry,
    languages: &[LanguageCode],
    expected: &IndexSet<String>,
) -> Vec<PlaceholderIssue> {
    if expected.is_empty() {
        return Vec::new();
    }

    languages
        .iter()
        .filter_map(|language| {
            let text = entry.get(language).map_or("", String::as_str);
            let found = extract_placeholders(text);

            let missing: Vec<String> =
                expected.iter().filter(|p| !found.contains(*p)).cloned().collect();
            let extra: Vec<String> =
                found.iter().filter(|p| !expected.contains(*p)).cloned().collect();

            if missing.is_empty() && extra.is_empty() {
                None
            } else {
                Some(PlaceholderIssue { language: language.clone(), missing, extra })
            }
        })
        .collect()
}

/// Recompute placeholder issues for the whole table.
///
/// Stateless: the previous result is never consulted.
#[must_use]
pub fn recompute_issues(table: &TranslationTable, languages: &[LanguageCode]) -> IssueMap {
    let mut issues = IssueMap::new();

    for (key, entry) in table {
        let expected = collect_placeholders(entry);
        let key_issues = find_inconsistencies(entry, languages, &expected);
        if !key_issues.is_empty() {
            issues.insert(key.clone(), key_issues);
        }
    }

    tracing::debug!(keys = table.len(), with_issues = issues.len(), "Recomputed placeholder issues");
    issues
}
