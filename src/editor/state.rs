//! エディタの状態管理
//!
//! 翻訳ストア・永続化・派生状態（プレースホルダー問題）を一つのコントローラーに
//! まとめます。すべての変更は [`EditorState::commit`] を通り、問題の再計算と
//! 保存が同期的に行われます。

use std::path::Path;

use serde_json::Value;

use super::export::{
    render_export,
    write_export,
};
use super::types::{
    EditorError,
    UploadOutcome,
};
use crate::analyzer::{
    IssueMap,
    PlaceholderIssue,
    recompute_issues,
};
use crate::config::EditorSettings;
use crate::input::{
    Upload,
    normalize,
};
use crate::storage::{
    KeyValueStore,
    PersistenceAdapter,
    StorageError,
    StorageUsage,
};
use crate::store::{
    CompletionStatus,
    ConflictSet,
    MergeOutcome,
    Resolution,
    TranslationStore,
};
use crate::types::{
    LanguageCode,
    TranslationEntry,
    TranslationTable,
    normalize_language_code,
};

/// Editor controller owning all state.
pub struct EditorState<S> {
    /// Authoritative table and language list
    store: TranslationStore,
    /// Durable storage
    persistence: PersistenceAdapter<S>,
    /// Placeholder issues derived from `store`
    issues: IssueMap,
    /// Key shown in the editor pane
    selected_key: Option<String>,
    /// Upload waiting for a conflict resolution
    pending_conflict: Option<ConflictSet>,
    /// Error of the most recent save, if it failed
    last_save_error: Option<StorageError>,
    /// Language assumed for flat and nested uploads
    upload_language: LanguageCode,
    /// Separator for flattened upload keys
    key_separator: String,
    /// Language restored by `clear`
    default_language: LanguageCode,
}

impl<S> std::fmt::Debug for EditorState<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorState")
            .field("keys", &self.store.len())
            .field("languages", &self.store.languages())
            .field("issues", &self.issues.len())
            .field("selected_key", &self.selected_key)
            .field("pending_conflict", &self.pending_conflict.is_some())
            .field("last_save_error", &self.last_save_error.as_ref().map(ToString::to_string))
            .finish_non_exhaustive()
    }
}

impl<S: KeyValueStore> EditorState<S> {
    /// 永続化ストアから状態を読み込んでエディタを作成
    #[must_use]
    pub fn open(store: S, settings: &EditorSettings) -> Self {
        let persistence = PersistenceAdapter::new(store, &settings.default_language);
        let persisted = persistence.load();
        let store = TranslationStore::from_parts(
            persisted.translations,
            persisted.languages,
            &settings.default_language,
        );
        let issues = recompute_issues(store.table(), store.languages());

        Self {
            store,
            persistence,
            issues,
            selected_key: None,
            pending_conflict: None,
            last_save_error: None,
            upload_language: normalize_language_code(&settings.upload_language),
            key_separator: settings.key_separator.clone(),
            default_language: normalize_language_code(&settings.default_language),
        }
    }

    /// 変更確定後の処理: 問題の再計算と保存
    ///
    /// 保存に失敗してもメモリ上の状態は巻き戻さない
    fn commit(&mut self) {
        self.issues = recompute_issues(self.store.table(), self.store.languages());

        match self.persistence.save_parts(self.store.table(), self.store.languages()) {
            Ok(()) => self.last_save_error = None,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to persist state; changes are kept in memory");
                self.last_save_error = Some(e);
            }
        }
    }

    /// Commit when `changed`, pass the flag through.
    fn commit_if(&mut self, changed: bool) -> bool {
        if changed {
            self.commit();
        }
        changed
    }

    // ---- Read access ----

    /// The translation store.
    #[must_use]
    pub const fn store(&self) -> &TranslationStore {
        &self.store
    }

    /// Full table.
    #[must_use]
    pub const fn table(&self) -> &TranslationTable {
        self.store.table()
    }

    /// Active languages.
    #[must_use]
    pub fn languages(&self) -> &[LanguageCode] {
        self.store.languages()
    }

    /// Placeholder issues for every key that has any.
    #[must_use]
    pub const fn issues(&self) -> &IssueMap {
        &self.issues
    }

    /// Placeholder issues of one key (empty when clean).
    #[must_use]
    pub fn issues_for(&self, key: &str) -> &[PlaceholderIssue] {
        self.issues.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Translation progress of one key.
    #[must_use]
    pub fn completion_status(&self, key: &str) -> CompletionStatus {
        self.store.completion_status(key)
    }

    /// Error of the last save, `None` when the state is durable.
    #[must_use]
    pub const fn last_save_error(&self) -> Option<&StorageError> {
        self.last_save_error.as_ref()
    }

    /// Bytes used by the persisted records.
    #[must_use]
    pub fn storage_usage(&self) -> StorageUsage {
        self.persistence.usage()
    }

    /// The durable backend.
    #[must_use]
    pub const fn backend(&self) -> &S {
        self.persistence.store()
    }

    // ---- Selection ----

    /// Currently selected key.
    #[must_use]
    pub fn selected_key(&self) -> Option<&str> {
        self.selected_key.as_deref()
    }

    /// Select an existing key. Returns `false` for unknown keys.
    pub fn select_key(&mut self, key: &str) -> bool {
        if !self.store.contains_key(key) {
            return false;
        }
        self.selected_key = Some(key.to_string());
        true
    }

    /// The selected key with its values.
    #[must_use]
    pub fn selected_entry(&self) -> Option<(&str, &TranslationEntry)> {
        let key = self.selected_key.as_deref()?;
        self.store.entry(key).map(|entry| (key, entry))
    }

    // ---- Key and language edits ----

    /// See [`TranslationStore::add_key`].
    pub fn add_key(&mut self, key: &str) -> bool {
        let changed = self.store.add_key(key);
        self.commit_if(changed)
    }

    /// Delete a key, clearing the selection when it was selected.
    pub fn delete_key(&mut self, key: &str) -> bool {
        let changed = self.store.delete_key(key);
        if changed && self.selected_key.as_deref() == Some(key) {
            self.selected_key = None;
        }
        self.commit_if(changed)
    }

    /// See [`TranslationStore::add_language`].
    pub fn add_language(&mut self, code: &str) -> bool {
        let changed = self.store.add_language(code);
        self.commit_if(changed)
    }

    /// See [`TranslationStore::delete_language`].
    pub fn delete_language(&mut self, code: &str) -> bool {
        let changed = self.store.delete_language(code);
        self.commit_if(changed)
    }

    /// See [`TranslationStore::set_value`].
    pub fn set_value(&mut self, key: &str, language: &str, text: &str) -> bool {
        let changed = self.store.set_value(key, language, text);
        self.commit_if(changed)
    }

    // ---- Upload and conflicts ----

    /// Whether an upload waits for a conflict resolution.
    #[must_use]
    pub const fn is_conflict_pending(&self) -> bool {
        self.pending_conflict.is_some()
    }

    /// The pending conflict, if any.
    #[must_use]
    pub const fn pending_conflict(&self) -> Option<&ConflictSet> {
        self.pending_conflict.as_ref()
    }

    /// Apply an uploaded document.
    ///
    /// Schemas seed empty keys; translation data is merged, or parked as a
    /// pending conflict when keys overlap.
    ///
    /// # Errors
    /// - [`EditorError::ConflictPending`]: a previous conflict is unresolved
    /// - [`EditorError::Upload`]: the document shape is not supported
    pub fn upload(&mut self, document: &Value) -> Result<UploadOutcome, EditorError> {
        if let Some(conflict) = &self.pending_conflict {
            tracing::warn!("Upload rejected while a conflict is pending");
            return Err(EditorError::ConflictPending(conflict.conflicting_keys().len()));
        }

        match normalize(document, &self.upload_language, &self.key_separator)? {
            Upload::Schema { keys } => {
                let extracted = keys.len();
                let added = self.store.seed_keys(&keys);
                tracing::info!(extracted, added, "Seeded keys from schema");
                self.commit_if(added > 0);
                Ok(UploadOutcome::SchemaSeeded { extracted, added })
            }
            Upload::Translations { kind, table } => {
                tracing::debug!(?kind, keys = table.len(), "Merging uploaded translations");
                match self.store.merge_incoming(table) {
                    MergeOutcome::Merged { keys, new_languages } => {
                        self.commit();
                        Ok(UploadOutcome::Merged { keys, new_languages })
                    }
                    MergeOutcome::Conflict(conflict) => {
                        let conflicting_keys = conflict.conflicting_keys().to_vec();
                        self.pending_conflict = Some(conflict);
                        Ok(UploadOutcome::ConflictPending { conflicting_keys })
                    }
                }
            }
        }
    }

    /// Resolve the pending conflict. Returns newly activated languages.
    ///
    /// # Errors
    /// [`EditorError::NoPendingConflict`] when nothing is pending.
    pub fn resolve(&mut self, resolution: Resolution) -> Result<Vec<LanguageCode>, EditorError> {
        let conflict = self.pending_conflict.take().ok_or(EditorError::NoPendingConflict)?;
        let new_languages = self.store.resolve_conflicts(conflict, resolution);
        self.commit();
        Ok(new_languages)
    }

    /// Discard the pending conflict and its incoming data.
    ///
    /// # Errors
    /// [`EditorError::NoPendingConflict`] when nothing is pending.
    pub fn cancel_conflict(&mut self) -> Result<(), EditorError> {
        let conflict = self.pending_conflict.take().ok_or(EditorError::NoPendingConflict)?;
        tracing::info!(conflicts = conflict.conflicting_keys().len(), "Cancelled upload");
        Ok(())
    }

    // ---- Storage and export ----

    /// Remove both durable records and reset to an empty table with the single
    /// default language. Destructive; callers confirm beforehand.
    ///
    /// # Errors
    /// Record removal failure. The in-memory state is reset regardless.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        let result = self.persistence.clear();
        self.store = TranslationStore::new(&self.default_language);
        self.issues = IssueMap::new();
        self.selected_key = None;
        self.pending_conflict = None;
        self.last_save_error = None;
        result
    }

    /// Canonical export as pretty-printed JSON.
    #[must_use]
    pub fn export_json(&self) -> String {
        render_export(self.store.table())
    }

    /// Write the canonical export to `path`.
    ///
    /// # Errors
    /// [`EditorError::Export`] when the file cannot be written.
    pub fn export_to(&self, path: &Path) -> Result<(), EditorError> {
        Ok(write_export(self.store.table(), path)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::panic)]
mod tests {
    use googletest::prelude::*;
    use rstest::{
        fixture,
        rstest,
    };
    use serde_json::json;

    use super::*;
    use crate::storage::{
        LANGUAGES_RECORD,
        MemoryStore,
        TRANSLATIONS_RECORD,
    };

    #[fixture]
    fn editor() -> EditorState<MemoryStore> {
        EditorState::open(MemoryStore::new(), &EditorSettings::default())
    }

    fn stored(editor: &EditorState<MemoryStore>, name: &str) -> Option<String> {
        editor.backend().get(name).unwrap()
    }

    #[rstest]
    fn test_open_empty_store(editor: EditorState<MemoryStore>) {
        assert!(editor.table().is_empty());
        assert_eq!(editor.languages(), ["en"]);
        assert!(!editor.is_conflict_pending());
    }

    #[rstest]
    fn test_mutation_recomputes_issues_and_persists(mut editor: EditorState<MemoryStore>) {
        editor.add_language("de");
        editor.set_value("greeting", "en", "Hello ${name}");
        editor.set_value("greeting", "de", "Hallo");

        assert_that!(
            editor.issues_for("greeting"),
            elements_are![field!(PlaceholderIssue.language, eq("de"))]
        );
        assert_that!(stored(&editor, LANGUAGES_RECORD), some(eq(r#"["en","de"]"#)));
        assert_that!(
            stored(&editor, TRANSLATIONS_RECORD),
            some(eq(r#"{"greeting":{"en":"Hello ${name}","de":"Hallo"}}"#))
        );

        editor.set_value("greeting", "de", "Hallo ${name}");

        assert!(editor.issues().is_empty());
    }

    #[rstest]
    fn test_rejected_action_does_not_persist(mut editor: EditorState<MemoryStore>) {
        assert!(!editor.add_key(""));
        assert!(!editor.delete_language("en"));

        assert_that!(stored(&editor, TRANSLATIONS_RECORD), none());
    }

    #[rstest]
    fn test_delete_selected_key_clears_selection(mut editor: EditorState<MemoryStore>) {
        editor.add_key("a");
        editor.add_key("b");
        assert!(editor.select_key("a"));

        editor.delete_key("b");
        assert_that!(editor.selected_key(), some(eq("a")));

        editor.delete_key("a");
        assert_that!(editor.selected_key(), none());
    }

    #[rstest]
    fn test_select_unknown_key(mut editor: EditorState<MemoryStore>) {
        assert!(!editor.select_key("missing"));
        assert!(editor.selected_entry().is_none());
    }

    #[rstest]
    fn test_schema_upload_seeds_empty_keys(mut editor: EditorState<MemoryStore>) {
        let schema = json!({
            "title": "Root",
            "properties": { "name": { "title": "Name", "description": "Full name" } }
        });

        let outcome = editor.upload(&schema).unwrap();

        assert_eq!(outcome, UploadOutcome::SchemaSeeded { extracted: 3, added: 3 });
        assert_eq!(
            editor.store().keys().collect::<Vec<_>>(),
            vec!["title", "properties.name.title", "properties.name.description"]
        );
        // スキーマの値は翻訳として取り込まない
        assert_eq!(editor.table()["title"]["en"], "");

        let outcome = editor.upload(&schema).unwrap();
        assert_eq!(outcome, UploadOutcome::SchemaSeeded { extracted: 3, added: 0 });
    }

    #[rstest]
    fn test_conflicting_upload_blocks_next_upload(mut editor: EditorState<MemoryStore>) {
        editor.upload(&json!({ "a": "A" })).unwrap();

        let outcome = editor.upload(&json!({ "a": "X", "b": "B" })).unwrap();
        assert_eq!(outcome, UploadOutcome::ConflictPending { conflicting_keys: vec!["a".to_string()] });
        assert!(!editor.store().contains_key("b"));

        let result = editor.upload(&json!({ "c": "C" }));
        assert!(matches!(result, Err(EditorError::ConflictPending(1))));
        assert!(!editor.store().contains_key("c"));

        editor.resolve(Resolution::Replace).unwrap();
        assert_eq!(editor.table()["a"]["en"], "X");
        assert_eq!(editor.table()["b"]["en"], "B");
        assert!(!editor.is_conflict_pending());
    }

    #[rstest]
    fn test_cancel_conflict_discards_incoming(mut editor: EditorState<MemoryStore>) {
        editor.upload(&json!({ "a": "A" })).unwrap();
        editor.upload(&json!({ "a": "X", "b": "B" })).unwrap();
        let before = editor.table().clone();

        editor.cancel_conflict().unwrap();

        assert_eq!(editor.table(), &before);
        assert!(matches!(editor.cancel_conflict(), Err(EditorError::NoPendingConflict)));
        assert!(matches!(editor.resolve(Resolution::Keep), Err(EditorError::NoPendingConflict)));
    }

    #[rstest]
    fn test_rejected_upload_leaves_state(mut editor: EditorState<MemoryStore>) {
        editor.add_key("a");
        let before = editor.table().clone();

        let result = editor.upload(&json!(["not", "an", "object"]));

        assert!(matches!(result, Err(EditorError::Upload(_))));
        assert_eq!(editor.table(), &before);
    }

    #[rstest]
    fn test_save_failure_keeps_memory_state() {
        let mut editor = EditorState::open(MemoryStore::with_quota(8), &EditorSettings::default());

        assert!(editor.set_value("greeting", "en", "Hello there"));

        assert_eq!(editor.table()["greeting"]["en"], "Hello there");
        assert!(matches!(editor.last_save_error(), Some(StorageError::QuotaExceeded { .. })));
    }

    #[rstest]
    fn test_clear_resets_to_default_language(mut editor: EditorState<MemoryStore>) {
        editor.add_language("de");
        editor.add_language("fr");
        editor.set_value("a", "de", "A");
        editor.select_key("a");

        editor.clear().unwrap();

        assert!(editor.table().is_empty());
        assert_eq!(editor.languages(), ["en"]);
        assert_that!(editor.selected_key(), none());
        assert_that!(stored(&editor, TRANSLATIONS_RECORD), none());
        assert_that!(stored(&editor, LANGUAGES_RECORD), none());
    }

    #[rstest]
    fn test_export_json_matches_table(mut editor: EditorState<MemoryStore>) {
        editor.set_value("k", "en", "v");

        assert_eq!(editor.export_json(), "{\n  \"k\": {\n    \"en\": \"v\"\n  }\n}");
    }
}
