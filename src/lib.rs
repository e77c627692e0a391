//! json-i18n-translator
//!
//! 多言語翻訳カタログのマージ・編集・検証エンジン

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod editor;
pub mod input;
pub mod storage;
pub mod store;
pub mod types;

#[cfg(test)]
mod test_utils;

// EditorState を再エクスポート
pub use editor::EditorState;
