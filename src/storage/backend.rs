//! Durable key-value backends.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{
    Path,
    PathBuf,
};

use super::types::StorageError;

/// String-valued durable store addressed by record name.
pub trait KeyValueStore {
    /// Read a record. `Ok(None)` when it does not exist.
    ///
    /// # Errors
    /// Backend failure other than absence.
    fn get(&self, name: &str) -> Result<Option<String>, StorageError>;

    /// Create or overwrite a record.
    ///
    /// # Errors
    /// Backend failure, including a full store.
    fn set(&mut self, name: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a record. Deleting an absent record succeeds.
    ///
    /// # Errors
    /// Backend failure.
    fn remove(&mut self, name: &str) -> Result<(), StorageError>;
}

/// One `<name>.json` file per record inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Directory holding the record files. Created on first write.
    dir: PathBuf,
}

impl FileStore {
    /// Store rooted at `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the records.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `<dir>/<name>.json`
    fn record_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }
}

/// Attach the record name to an I/O error.
fn io_error(name: &str, source: std::io::Error) -> StorageError {
    StorageError::Io { name: name.to_string(), source }
}

impl KeyValueStore for FileStore {
    fn get(&self, name: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.record_path(name)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(name, e)),
        }
    }

    fn set(&mut self, name: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).map_err(|e| io_error(name, e))?;

        // 書き込み途中の状態を残さないよう一時ファイル経由で置き換える
        let path = self.record_path(name);
        let tmp_path = self.dir.join(format!(".{name}.json.tmp"));
        fs::write(&tmp_path, value).map_err(|e| io_error(name, e))?;
        fs::rename(&tmp_path, &path).map_err(|e| io_error(name, e))?;

        tracing::debug!(record = name, path = %path.display(), bytes = value.len(), "Wrote record");
        Ok(())
    }

    fn remove(&mut self, name: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.record_path(name)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(name, e)),
        }
    }
}

/// In-memory store with an optional byte quota.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    /// name → value
    records: HashMap<String, String>,
    /// Maximum total bytes over all records.
    quota: Option<usize>,
}

impl MemoryStore {
    /// Unlimited store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that rejects writes pushing the total past `quota` bytes.
    #[must_use]
    pub fn with_quota(quota: usize) -> Self {
        Self { records: HashMap::new(), quota: Some(quota) }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, name: &str) -> Result<Option<String>, StorageError> {
        Ok(self.records.get(name).cloned())
    }

    fn set(&mut self, name: &str, value: &str) -> Result<(), StorageError> {
        if let Some(quota) = self.quota {
            let others: usize =
                self.records.iter().filter(|(k, _)| *k != name).map(|(_, v)| v.len()).sum();
            let required = others + value.len();
            if required > quota {
                return Err(StorageError::QuotaExceeded { name: name.to_string(), required, quota });
            }
        }
        self.records.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, name: &str) -> Result<(), StorageError> {
        self.records.remove(name);
        Ok(())
    }
}
