//! Durable storage of editor state.
mod adapter;
mod backend;
mod types;

pub use adapter::PersistenceAdapter;
pub use backend::{
    FileStore,
    KeyValueStore,
    MemoryStore,
};
pub use types::{
    LANGUAGES_RECORD,
    PersistedState,
    StorageError,
    StorageUsage,
    TRANSLATIONS_RECORD,
};
