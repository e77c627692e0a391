//! テスト用ユーティリティ関数
//!
//! 複数のテストモジュールで使用される共通のヘルパー関数を提供します。
#![cfg(test)]

use serde_json::Value;

use crate::types::{
    LanguageCode,
    TranslationTable,
};

/// テスト用の `TranslationTable` を JSON から作成する
///
/// # Arguments
/// * `value` - `{ "<key>": { "<lang>": "<text>" } }` 形式の JSON
///
/// # Panics
/// JSON が翻訳テーブルの形式でない場合
#[allow(clippy::expect_used)]
pub(crate) fn table(value: Value) -> TranslationTable {
    serde_json::from_value(value).expect("test table must be canonical")
}

/// テスト用の言語リストを作成する
pub(crate) fn languages(codes: &[&str]) -> Vec<LanguageCode> {
    codes.iter().map(ToString::to_string).collect()
}
