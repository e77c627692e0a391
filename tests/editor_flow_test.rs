//! ファイルストアを使ったエディタの一連の操作に関するテスト

#![allow(clippy::unwrap_used)]
#![allow(clippy::indexing_slicing)]
#![allow(missing_docs)]

use googletest::prelude::*;
use json_i18n_translator::EditorState;
use json_i18n_translator::config::EditorSettings;
use json_i18n_translator::editor::UploadOutcome;
use json_i18n_translator::input::load_upload;
use json_i18n_translator::storage::{
    FileStore,
    LANGUAGES_RECORD,
    TRANSLATIONS_RECORD,
};
use json_i18n_translator::store::Resolution;
use serde_json::json;
use tempfile::TempDir;

fn open(dir: &TempDir) -> EditorState<FileStore> {
    EditorState::open(FileStore::new(dir.path().join("store")), &EditorSettings::default())
}

#[tokio::test]
async fn test_schema_then_translations_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let schema_path = dir.path().join("schema.json");
    std::fs::write(
        &schema_path,
        r#"{
            "type": "object",
            "title": "Profile",
            "properties": {
                "name": { "type": "string", "title": "Name" },
                "tags": { "type": "array", "items": { "description": "Tag" } }
            }
        }"#,
    )
    .unwrap();

    {
        let mut editor = open(&dir);
        let schema = load_upload(schema_path).await.unwrap();
        let outcome = editor.upload(&schema).unwrap();
        assert_eq!(outcome, UploadOutcome::SchemaSeeded { extracted: 3, added: 3 });

        let outcome = editor
            .upload(&json!({
                "title": { "de": "Profil" },
                "properties.name.title": { "de": "Name" }
            }))
            .unwrap();
        // 既存キーと重なるため保留になる
        assert!(matches!(outcome, UploadOutcome::ConflictPending { .. }));

        let new_languages = editor.resolve(Resolution::Merge).unwrap();
        assert_eq!(new_languages, vec!["de".to_string()]);
        assert!(editor.last_save_error().is_none());
    }

    let editor = open(&dir);
    assert_eq!(editor.languages(), ["en", "de"]);
    assert_eq!(
        editor.store().keys().collect::<Vec<_>>(),
        vec!["title", "properties.name.title", "properties.tags.items.description"]
    );
    assert_eq!(editor.table()["title"]["de"], "Profil");
    assert_eq!(editor.table()["title"]["en"], "");
    assert_eq!(editor.table()["properties.tags.items.description"]["de"], "");
}

#[googletest::test]
fn test_placeholder_issues_follow_edits() {
    let dir = TempDir::new().unwrap();
    let mut editor = open(&dir);

    editor
        .upload(&json!({
            "greeting": { "en": "Hello ${name}", "fr": "Bonjour ${name}", "de": "Hallo" }
        }))
        .unwrap();

    assert_eq!(editor.languages(), ["en", "fr", "de"]);
    expect_that!(editor.issues_for("greeting").len(), eq(1));

    editor.delete_language("de");
    expect_that!(editor.issues().len(), eq(0));

    editor.set_value("greeting", "fr", "Bonjour ${user}");
    let issues = editor.issues_for("greeting");
    expect_that!(issues.len(), eq(2));
}

#[googletest::test]
fn test_corrupt_record_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let store_dir = dir.path().join("store");
    std::fs::create_dir_all(&store_dir).unwrap();
    std::fs::write(store_dir.join(format!("{TRANSLATIONS_RECORD}.json")), "{ not json").unwrap();
    std::fs::write(store_dir.join(format!("{LANGUAGES_RECORD}.json")), r#"["en","ja"]"#).unwrap();

    let editor = open(&dir);

    expect_that!(editor.table().len(), eq(0));
    assert_eq!(editor.languages(), ["en", "ja"]);
}

#[tokio::test]
async fn test_export_and_clear() {
    let dir = TempDir::new().unwrap();
    let mut editor = open(&dir);
    editor.set_value("a.b", "en", "Value");
    let export_path = dir.path().join("i18n.data.json");

    editor.export_to(&export_path).unwrap();
    let exported: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&export_path).unwrap()).unwrap();
    assert_eq!(exported, json!({ "a.b": { "en": "Value" } }));

    editor.clear().unwrap();
    drop(editor);

    let editor = open(&dir);
    assert!(editor.table().is_empty());
    assert_eq!(editor.languages(), ["en"]);
}
