// In crates/ingest/src/lib.rs

pub mod columns;
pub mod error;
pub mod trades;
pub mod upload;

pub use columns::resolve_columns;
pub use error::{Error, Result, SchemaError};
pub use trades::{trades_from_csv, trades_from_json};
pub use upload::{
    DEFAULT_UPLOAD_LIMIT, PREVIEW_ROWS, UploadPreview, format_bytes, inspect_upload,
    validate_upload_headers,
};
