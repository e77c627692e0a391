//! ワークスペース設定の読み込みと解決
//!
//! 設定ファイル・コマンドライン引数の上書き・検証を一度に行い、
//! 以降は検証済みの設定だけを公開する

use std::io::ErrorKind;
use std::path::{
    Path,
    PathBuf,
};

use super::{
    ConfigError,
    EditorSettings,
};

/// ワークスペース内の設定ファイル名
pub const CONFIG_FILE_NAME: &str = ".i18n-translator.json";

/// コマンドライン引数による設定の上書き
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsOverrides {
    /// `uploadLanguage` を置き換える
    pub upload_language: Option<String>,
    /// `storageDir` を置き換える
    pub storage_dir: Option<String>,
}

impl SettingsOverrides {
    /// 指定された項目だけを反映
    fn apply(&self, settings: &mut EditorSettings) {
        if let Some(code) = &self.upload_language {
            settings.upload_language.clone_from(code);
        }
        if let Some(dir) = &self.storage_dir {
            settings.storage_dir.clone_from(dir);
        }
    }
}

/// 検証済みの設定とワークスペースルート
#[derive(Debug, Clone)]
pub struct ConfigManager {
    /// 設定ファイルと上書きを合成した結果
    settings: EditorSettings,

    /// 相対パスの基準
    workspace_root: PathBuf,
}

impl ConfigManager {
    /// 設定を読み込む
    ///
    /// 設定ファイルがなければデフォルト値を使い、上書きを適用してから検証する
    ///
    /// # Errors
    /// - 設定ファイルの読み込みエラー（ファイルが存在しない場合を除く）
    /// - JSON パースエラー
    /// - バリデーションエラー
    pub fn load(
        workspace_root: impl Into<PathBuf>,
        overrides: &SettingsOverrides,
    ) -> Result<Self, ConfigError> {
        let workspace_root = workspace_root.into();
        let mut settings =
            read_settings_file(&workspace_root.join(CONFIG_FILE_NAME))?.unwrap_or_default();
        overrides.apply(&mut settings);
        settings.validate().map_err(ConfigError::ValidationErrors)?;

        tracing::debug!(root = %workspace_root.display(), ?settings, "Settings loaded");
        Ok(Self { settings, workspace_root })
    }

    /// 検証済みの設定
    #[must_use]
    pub const fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    /// ワークスペースルート
    #[must_use]
    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// 永続化ディレクトリのパス
    #[must_use]
    pub fn storage_path(&self) -> PathBuf {
        self.resolve(&self.settings.storage_dir)
    }

    /// エクスポート先のデフォルトパス
    #[must_use]
    pub fn export_path(&self) -> PathBuf {
        self.resolve(&self.settings.export_file_name)
    }

    /// 相対パスはワークスペースルートから解決する
    fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_relative() { self.workspace_root.join(path) } else { path.to_path_buf() }
    }
}

/// 設定ファイルを読む。存在しなければ `Ok(None)`
fn read_settings_file(path: &Path) -> Result<Option<EditorSettings>, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "No configuration file; using defaults");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}
