//! Canonical translation export.

use std::path::Path;

use crate::types::TranslationTable;

/// Render the table as pretty-printed JSON (2-space indent).
///
/// # Examples
/// ```
/// use json_i18n_translator::editor::render_export;
/// use json_i18n_translator::types::{TranslationEntry, TranslationTable};
///
/// let mut entry = TranslationEntry::new();
/// entry.insert("en".to_string(), "Hello".to_string());
/// let mut table = TranslationTable::new();
/// table.insert("greeting".to_string(), entry);
///
/// assert_eq!(render_export(&table), "{\n  \"greeting\": {\n    \"en\": \"Hello\"\n  }\n}");
/// ```
#[must_use]
pub fn render_export(table: &TranslationTable) -> String {
    // 文字列キーのマップのシリアライズは失敗しない
    serde_json::to_string_pretty(table).unwrap_or_else(|_| "{}".to_string())
}

/// Write the export to `path`.
///
/// # Errors
/// File write failure.
pub fn write_export(table: &TranslationTable, path: &Path) -> std::io::Result<()> {
    std::fs::write(path, render_export(table))?;
    tracing::info!(path = %path.display(), keys = table.len(), "Exported translations");
    Ok(())
}
