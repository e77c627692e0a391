//! Command execution against an [`EditorState`].

use std::io::Write;
use std::path::Path;

use super::args::Command;
use super::types::CliError;
use crate::editor::{
    EditorState,
    UploadOutcome,
};
use crate::input::load_upload;
use crate::storage::KeyValueStore;
use crate::store::{
    ConflictSet,
    Resolution,
};
use crate::types::TranslationEntry;

/// Conflicting keys printed before an upload is cancelled.
const CONFLICT_PREVIEW_LIMIT: usize = 5;

/// Run one command and print its result to `out`.
///
/// # Errors
/// Command failures and output write failures.
pub async fn run<S, W>(
    editor: &mut EditorState<S>,
    command: &Command,
    default_export: &Path,
    out: &mut W,
) -> Result<(), CliError>
where
    S: KeyValueStore,
    W: Write,
{
    tracing::debug!(?command, "Running command");

    match command {
        Command::Upload { file, on_conflict } => {
            let document = load_upload(file.clone()).await?;
            let outcome = editor.upload(&document)?;
            report_upload(editor, outcome, *on_conflict, out)?;
        }
        Command::AddKey { key } => {
            if editor.add_key(key) {
                writeln!(out, "Added key {key}")?;
            } else {
                writeln!(out, "Key {key:?} was not added (empty or already present)")?;
            }
        }
        Command::DeleteKey { key } => {
            if editor.delete_key(key) {
                writeln!(out, "Deleted key {key}")?;
            } else {
                return Err(CliError::KeyNotFound(key.clone()));
            }
        }
        Command::AddLanguage { code } => {
            if editor.add_language(code) {
                writeln!(out, "Added language {}", code.trim().to_lowercase())?;
            } else {
                writeln!(out, "Language {code:?} was not added (empty or already active)")?;
            }
        }
        Command::DeleteLanguage { code } => {
            if editor.delete_language(code) {
                writeln!(out, "Deleted language {}", code.trim().to_lowercase())?;
            } else {
                writeln!(out, "Language {code:?} was not deleted (unknown or the last one)")?;
            }
        }
        Command::Set { key, language, text } => {
            if editor.set_value(key, language, text) {
                writeln!(out, "Updated {key} [{}]", language.trim().to_lowercase())?;
            } else {
                writeln!(out, "Nothing updated: key and language must not be empty")?;
            }
        }
        Command::Show { key } => show_key(editor, key, out)?,
        Command::Status => show_status(editor, out)?,
        Command::Issues => show_issues(editor, out)?,
        Command::Export { output } => {
            let path = output.as_deref().unwrap_or(default_export);
            editor.export_to(path)?;
            writeln!(out, "Exported {} keys to {}", editor.store().len(), path.display())?;
        }
        Command::Clear { yes } => {
            if !*yes {
                return Err(CliError::ConfirmationRequired);
            }
            editor.clear()?;
            writeln!(out, "Cleared stored translations")?;
        }
    }

    if let Some(error) = editor.last_save_error() {
        writeln!(out, "warning: changes were not saved: {error}")?;
    }
    Ok(())
}

/// Print an upload outcome, settling a conflict with `on_conflict` or cancelling it.
fn report_upload<S, W>(
    editor: &mut EditorState<S>,
    outcome: UploadOutcome,
    on_conflict: Option<Resolution>,
    out: &mut W,
) -> Result<(), CliError>
where
    S: KeyValueStore,
    W: Write,
{
    match outcome {
        UploadOutcome::SchemaSeeded { extracted, added } => {
            writeln!(out, "Extracted {extracted} keys from schema, {added} new")?;
        }
        UploadOutcome::Merged { keys, new_languages } => {
            writeln!(out, "Merged {keys} keys")?;
            if !new_languages.is_empty() {
                writeln!(out, "New languages: {}", new_languages.join(", "))?;
            }
        }
        UploadOutcome::ConflictPending { conflicting_keys } => {
            if let Some(resolution) = on_conflict {
                let new_languages = editor.resolve(resolution)?;
                writeln!(
                    out,
                    "Resolved {} conflicting keys with {resolution}",
                    conflicting_keys.len()
                )?;
                if !new_languages.is_empty() {
                    writeln!(out, "New languages: {}", new_languages.join(", "))?;
                }
            } else {
                if let Some(conflict) = editor.pending_conflict() {
                    print_conflict(conflict, out)?;
                }
                editor.cancel_conflict()?;
                writeln!(
                    out,
                    "Upload cancelled. Re-run with --on-conflict {}",
                    Resolution::ALL.map(Resolution::as_str).join("|")
                )?;
            }
        }
    }
    Ok(())
}

/// Print the first conflicting keys side by side.
fn print_conflict<W: Write>(conflict: &ConflictSet, out: &mut W) -> Result<(), CliError> {
    let (items, remaining) = conflict.preview(CONFLICT_PREVIEW_LIMIT);

    writeln!(out, "Upload conflicts with {} existing keys:", conflict.conflicting_keys().len())?;
    for item in items {
        writeln!(out, "  {}", item.key)?;
        writeln!(out, "    existing: {}", format_entry(item.existing))?;
        writeln!(out, "    incoming: {}", format_entry(item.incoming))?;
    }
    if remaining > 0 {
        writeln!(out, "  ... and {remaining} more")?;
    }
    Ok(())
}

/// `en="..", de=".."`, or `-` when absent.
fn format_entry(entry: Option<&TranslationEntry>) -> String {
    entry.map_or_else(
        || "-".to_string(),
        |entry| {
            entry
                .iter()
                .map(|(language, text)| format!("{language}={text:?}"))
                .collect::<Vec<_>>()
                .join(", ")
        },
    )
}

/// `show` command.
fn show_key<S, W>(editor: &EditorState<S>, key: &str, out: &mut W) -> Result<(), CliError>
where
    S: KeyValueStore,
    W: Write,
{
    let entry = editor.store().entry(key).ok_or_else(|| CliError::KeyNotFound(key.to_string()))?;
    let status = editor.completion_status(key);

    writeln!(out, "{key} ({}/{} translated)", status.completed, status.total)?;
    for language in editor.languages() {
        match entry.get(language).map(String::as_str) {
            Some(text) if !text.trim().is_empty() => writeln!(out, "  {language}: {text}")?,
            _ => writeln!(out, "  {language}: (empty)")?,
        }
    }
    for issue in editor.issues_for(key) {
        writeln!(out, "  ! {issue}")?;
    }
    Ok(())
}

/// `status` command.
fn show_status<S, W>(editor: &EditorState<S>, out: &mut W) -> Result<(), CliError>
where
    S: KeyValueStore,
    W: Write,
{
    let incomplete =
        editor.store().keys().filter(|key| !editor.completion_status(key).is_complete).count();

    writeln!(out, "Keys: {}", editor.store().len())?;
    writeln!(out, "Languages: {}", editor.languages().join(", "))?;
    writeln!(out, "Incomplete keys: {incomplete}")?;
    writeln!(out, "Keys with placeholder issues: {}", editor.issues().len())?;
    writeln!(out, "Storage used: {}", editor.storage_usage())?;
    Ok(())
}

/// `issues` command.
fn show_issues<S, W>(editor: &EditorState<S>, out: &mut W) -> Result<(), CliError>
where
    S: KeyValueStore,
    W: Write,
{
    if editor.issues().is_empty() {
        writeln!(out, "No placeholder issues")?;
        return Ok(());
    }
    for (key, issues) in editor.issues() {
        writeln!(out, "{key}")?;
        for issue in issues {
            writeln!(out, "  {issue}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use googletest::prelude::*;
    use rstest::{
        fixture,
        rstest,
    };
    use tempfile::TempDir;

    use super::*;
    use crate::config::EditorSettings;
    use crate::storage::MemoryStore;

    #[fixture]
    fn editor() -> EditorState<MemoryStore> {
        EditorState::open(MemoryStore::new(), &EditorSettings::default())
    }

    async fn run_to_string(
        editor: &mut EditorState<MemoryStore>,
        command: Command,
    ) -> Result<String, CliError> {
        let mut out = Vec::new();
        run(editor, &command, Path::new("unused.json"), &mut out).await?;
        Ok(String::from_utf8(out).unwrap())
    }

    fn write_upload(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[rstest]
    #[tokio::test]
    async fn test_conflicting_upload_without_resolution_is_cancelled(
        mut editor: EditorState<MemoryStore>,
    ) {
        let dir = TempDir::new().unwrap();
        editor.set_value("a", "en", "A");
        let file = write_upload(&dir, "up.json", r#"{"a": "X", "b": "B"}"#);

        let output =
            run_to_string(&mut editor, Command::Upload { file, on_conflict: None }).await.unwrap();

        assert_that!(output, contains_substring("Upload conflicts with 1 existing keys"));
        assert_that!(output, contains_substring("existing: en=\"A\""));
        assert_that!(output, contains_substring("--on-conflict keep|replace|merge"));
        assert!(!editor.is_conflict_pending());
        assert!(!editor.store().contains_key("b"));
    }

    #[rstest]
    #[tokio::test]
    async fn test_conflicting_upload_with_resolution(mut editor: EditorState<MemoryStore>) {
        let dir = TempDir::new().unwrap();
        editor.set_value("a", "en", "A");
        let file = write_upload(&dir, "up.json", r#"{"a": {"de": "A-de"}}"#);

        let output = run_to_string(
            &mut editor,
            Command::Upload { file, on_conflict: Some(Resolution::Merge) },
        )
        .await
        .unwrap();

        assert_that!(output, contains_substring("Resolved 1 conflicting keys with merge"));
        assert_eq!(editor.table()["a"]["en"], "A");
        assert_eq!(editor.table()["a"]["de"], "A-de");
    }

    #[rstest]
    #[tokio::test]
    async fn test_show_lists_issues(mut editor: EditorState<MemoryStore>) {
        editor.set_value("greeting", "en", "Hi ${name}");
        editor.set_value("greeting", "de", "Hallo");

        let output =
            run_to_string(&mut editor, Command::Show { key: "greeting".to_string() }).await.unwrap();

        assert_that!(output, contains_substring("greeting (2/2 translated)"));
        assert_that!(output, contains_substring("! de: missing ${name}"));
    }

    #[rstest]
    #[tokio::test]
    async fn test_show_unknown_key(mut editor: EditorState<MemoryStore>) {
        let result = run_to_string(&mut editor, Command::Show { key: "nope".to_string() }).await;
        assert!(matches!(result, Err(CliError::KeyNotFound(key)) if key == "nope"));
    }

    #[rstest]
    #[tokio::test]
    async fn test_clear_requires_confirmation(mut editor: EditorState<MemoryStore>) {
        editor.add_key("a");

        let result = run_to_string(&mut editor, Command::Clear { yes: false }).await;

        assert!(matches!(result, Err(CliError::ConfirmationRequired)));
        assert!(editor.store().contains_key("a"));
    }

    #[rstest]
    #[tokio::test]
    async fn test_export_writes_file(mut editor: EditorState<MemoryStore>) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");
        editor.set_value("k", "en", "v");

        run_to_string(&mut editor, Command::Export { output: Some(path.clone()) }).await.unwrap();

        assert_eq!(fs::read_to_string(path).unwrap(), editor.export_json());
    }
}
