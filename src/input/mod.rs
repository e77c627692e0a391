//! Uploaded document handling: reading, classification, normalization and
//! schema key extraction.
mod reader;
mod schema;
mod types;
mod upload;

pub use reader::{
    load_upload,
    read_upload,
};
pub use schema::extract_schema_keys;
pub use types::{
    Upload,
    UploadError,
    UploadKind,
};
pub use upload::{
    DEFAULT_KEY_SEPARATOR,
    classify,
    flatten_object,
    is_canonical_table,
    is_flat_map,
    is_schema,
    normalize,
    parse_upload,
};
