//! Translation store: the single owner of the translation table.
mod conflict;
mod table;

pub use conflict::{
    ConflictPreviewItem,
    ConflictSet,
    ParseResolutionError,
    Resolution,
};
pub use table::{
    CompletionStatus,
    MergeOutcome,
    TranslationStore,
};
