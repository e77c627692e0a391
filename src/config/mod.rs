//! Editor configuration
/// Configuration loading and path resolution
mod manager;
/// Configuration types and settings
mod types;

pub use manager::{
    CONFIG_FILE_NAME,
    ConfigManager,
    SettingsOverrides,
};
pub use types::{
    ConfigError,
    EditorSettings,
    ValidationError,
};
