//! Loads and saves editor state through a [`KeyValueStore`].

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::backend::KeyValueStore;
use super::types::{
    LANGUAGES_RECORD,
    PersistedState,
    StorageError,
    StorageUsage,
    TRANSLATIONS_RECORD,
};
use crate::types::{
    LanguageCode,
    TranslationTable,
    normalize_language_code,
};

/// Persistence adapter for the translation table and the language list.
#[derive(Debug, Clone)]
pub struct PersistenceAdapter<S> {
    /// Backend holding the two records.
    store: S,
    /// Language list used when the languages record is absent or unusable.
    default_language: LanguageCode,
}

impl<S: KeyValueStore> PersistenceAdapter<S> {
    /// Adapter over `store`.
    #[must_use]
    pub fn new(store: S, default_language: &str) -> Self {
        Self { store, default_language: normalize_language_code(default_language) }
    }

    /// The underlying backend.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Default state: empty table, single default language.
    #[must_use]
    pub fn default_state(&self) -> PersistedState {
        PersistedState {
            translations: TranslationTable::new(),
            languages: vec![self.default_language.clone()],
        }
    }

    /// Read both records.
    ///
    /// Each record is loaded on its own; an absent, unreadable or unparsable
    /// record falls back to its default without affecting the other. An empty
    /// language list counts as unusable.
    #[must_use]
    pub fn load(&self) -> PersistedState {
        let defaults = self.default_state();

        let translations =
            self.load_record::<TranslationTable>(TRANSLATIONS_RECORD).unwrap_or(defaults.translations);
        let languages = self
            .load_record::<Vec<LanguageCode>>(LANGUAGES_RECORD)
            .filter(|languages| !languages.is_empty())
            .unwrap_or(defaults.languages);

        tracing::info!(keys = translations.len(), ?languages, "Loaded persisted state");
        PersistedState { translations, languages }
    }

    /// Read and parse one record. `None` when absent or unusable.
    fn load_record<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        let text = match self.store.get(name) {
            Ok(Some(text)) => text,
            Ok(None) => {
                tracing::debug!(record = name, "Record not found; using default");
                return None;
            }
            Err(e) => {
                tracing::warn!(record = name, error = %e, "Failed to read record; using default");
                return None;
            }
        };

        match serde_json::from_str(&text) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(record = name, error = %e, "Failed to parse record; using default");
                None
            }
        }
    }

    /// Write both records.
    ///
    /// # Errors
    /// The first failure. The second record is still attempted when the first
    /// one fails.
    pub fn save(&mut self, state: &PersistedState) -> Result<(), StorageError> {
        self.save_parts(&state.translations, &state.languages)
    }

    /// Write both records from borrowed parts. See [`Self::save`].
    ///
    /// # Errors
    /// The first failure.
    pub fn save_parts(
        &mut self,
        translations: &TranslationTable,
        languages: &[LanguageCode],
    ) -> Result<(), StorageError> {
        let translations_result = self.save_record(TRANSLATIONS_RECORD, translations);
        let languages_result = self.save_record(LANGUAGES_RECORD, languages);
        translations_result.and(languages_result)
    }

    /// Serialize compactly and write one record.
    fn save_record<T: Serialize + ?Sized>(
        &mut self,
        name: &str,
        value: &T,
    ) -> Result<(), StorageError> {
        let text = serde_json::to_string(value)
            .map_err(|source| StorageError::Serialize { name: name.to_string(), source })?;
        self.store.set(name, &text)
    }

    /// Delete both records.
    ///
    /// # Errors
    /// The first failure; both removals are attempted.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        let translations_result = self.store.remove(TRANSLATIONS_RECORD);
        let languages_result = self.store.remove(LANGUAGES_RECORD);
        tracing::info!("Cleared persisted state");
        translations_result.and(languages_result)
    }

    /// Size of both records as currently stored.
    #[must_use]
    pub fn usage(&self) -> StorageUsage {
        let bytes = [TRANSLATIONS_RECORD, LANGUAGES_RECORD]
            .into_iter()
            .filter_map(|name| self.store.get(name).ok().flatten())
            .map(|text| text.len())
            .sum();
        StorageUsage { bytes }
    }
}
