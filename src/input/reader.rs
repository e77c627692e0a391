//! One-shot asynchronous upload reading.

use std::path::{
    Path,
    PathBuf,
};

use serde_json::Value;
use tokio::sync::oneshot;

use super::types::UploadError;
use super::upload::parse_upload;

/// Start reading and parsing an uploaded file.
///
/// The read runs on a spawned task and delivers exactly one result through the
/// returned receiver: the parsed document or the error that prevented it.
/// Concurrent reads are not coordinated; each result is handled on its own as
/// it arrives.
#[must_use]
pub fn read_upload(path: impl Into<PathBuf>) -> oneshot::Receiver<Result<Value, UploadError>> {
    let path = path.into();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let result = read_and_parse(&path).await;
        if let Err(e) = &result {
            tracing::warn!(path = %path.display(), error = %e, "Failed to read upload");
        }
        // 受信側が既に破棄されている場合は結果を捨てる
        let _ = tx.send(result);
    });

    rx
}

/// Read an uploaded file and wait for its result.
///
/// # Errors
/// Read or parse failures, or [`UploadError::Interrupted`] if the reader task
/// ended without a result.
pub async fn load_upload(path: impl Into<PathBuf>) -> Result<Value, UploadError> {
    read_upload(path).await.map_err(|_| UploadError::Interrupted)?
}

/// ファイルを読み込んで JSON として解析
async fn read_and_parse(path: &Path) -> Result<Value, UploadError> {
    tracing::debug!(path = %path.display(), "Reading upload");
    let content = tokio::fs::read_to_string(path).await?;
    parse_upload(&content)
}
