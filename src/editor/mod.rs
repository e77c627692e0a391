//! Editor controller: the single owner of the translation state.
mod export;
mod state;
mod types;

pub use export::{
    render_export,
    write_export,
};
pub use state::EditorState;
pub use types::{
    EditorError,
    UploadOutcome,
};
