use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::input::DEFAULT_KEY_SEPARATOR;
use crate::types::{
    DEFAULT_LANGUAGE,
    normalize_language_code,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "storageDir")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorSettings {
    /// Directory holding the persisted records, relative to the workspace root.
    pub storage_dir: String,

    /// Language active on a fresh start and after clearing storage.
    pub default_language: String,

    /// Language assumed for values of flat and nested uploads.
    pub upload_language: String,

    /// Separator used when flattening nested uploads.
    pub key_separator: String,

    pub export_file_name: String,
}

impl EditorSettings {
    /// # Errors
    /// - Required field is empty
    /// - Export file name is not a plain `.json` file name
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.storage_dir.trim().is_empty() {
            errors.push(ValidationError::new(
                "storageDir",
                "The directory cannot be empty. Example: \".i18n-translator\"",
            ));
        }

        for (field_path, code) in
            [("defaultLanguage", &self.default_language), ("uploadLanguage", &self.upload_language)]
        {
            let normalized = normalize_language_code(code);
            if normalized.is_empty() {
                errors.push(ValidationError::new(
                    field_path,
                    "The language code cannot be empty. Example: \"en\"",
                ));
            } else if normalized.chars().any(char::is_whitespace) {
                errors.push(ValidationError::new(
                    field_path,
                    format!("Invalid language code '{code}': whitespace is not allowed"),
                ));
            }
        }

        if self.key_separator.is_empty() {
            errors.push(ValidationError::new(
                "keySeparator",
                "The separator cannot be empty. Please specify a separator, for example: \".\" (dot)",
            ));
        }

        if self.export_file_name.is_empty() {
            errors.push(ValidationError::new(
                "exportFileName",
                "The file name cannot be empty. Example: \"i18n.data.json\"",
            ));
        } else if self.export_file_name.contains(['/', '\\'])
            || !self.export_file_name.ends_with(".json")
        {
            errors.push(ValidationError::new(
                "exportFileName",
                format!(
                    "Invalid file name '{}': expected a plain file name ending in .json",
                    self.export_file_name
                ),
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            storage_dir: ".i18n-translator".to_string(),
            default_language: DEFAULT_LANGUAGE.to_string(),
            upload_language: DEFAULT_LANGUAGE.to_string(),
            key_separator: DEFAULT_KEY_SEPARATOR.to_string(),
            export_file_name: "i18n.data.json".to_string(),
        }
    }
}
