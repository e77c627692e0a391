//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{
    Parser,
    Subcommand,
};

use crate::config::SettingsOverrides;
use crate::store::Resolution;

/// json-i18n-translator - manage a multi-language translation catalog
#[derive(Parser, Debug)]
#[command(name = "json-i18n-translator")]
#[command(version)]
#[command(about = "Merge, edit and validate a multi-language translation catalog", long_about = None)]
pub struct Args {
    /// Workspace directory holding `.i18n-translator.json` (default: current directory)
    #[arg(short, long, global = true)]
    pub workspace: Option<PathBuf>,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Language assumed for flat and nested uploads (overrides `uploadLanguage`)
    #[arg(long, global = true)]
    pub upload_language: Option<String>,

    /// Storage directory (overrides `storageDir`)
    #[arg(long, global = true)]
    pub storage_dir: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    /// Settings given on the command line.
    #[must_use]
    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            upload_language: self.upload_language.clone(),
            storage_dir: self.storage_dir.clone(),
        }
    }
}

/// Editor actions.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Import a schema, a canonical table, a flat map or a nested object
    Upload {
        /// JSON file to import
        file: PathBuf,
        /// How to settle keys that already exist (keep, replace, merge)
        #[arg(long)]
        on_conflict: Option<Resolution>,
    },
    /// Add an empty translation key
    AddKey {
        /// Key to add
        key: String,
    },
    /// Delete a translation key
    DeleteKey {
        /// Key to delete
        key: String,
    },
    /// Activate a language
    AddLanguage {
        /// Language code
        code: String,
    },
    /// Deactivate a language and drop its values
    DeleteLanguage {
        /// Language code
        code: String,
    },
    /// Set one translation value
    Set {
        /// Translation key (created when missing)
        key: String,
        /// Language code (activated when missing)
        language: String,
        /// Translated text
        text: String,
    },
    /// Show every value of a key
    Show {
        /// Translation key
        key: String,
    },
    /// Summary of keys, languages and storage
    Status,
    /// List placeholder inconsistencies
    Issues,
    /// Write the catalog as pretty-printed JSON
    Export {
        /// Output file (default: `exportFileName` in the workspace)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Remove all stored translations
    Clear {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}
