// In crates/ingest/src/error.rs

use thiserror::Error;

/// The uploaded file lacks columns the backend needs to run a backtest.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("missing required columns: {}", .missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    #[error("file has no header row")]
    NoHeader,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("file is too large ({size} bytes, limit is {limit} bytes)")]
    TooLarge { size: u64, limit: u64 },
}

pub type Result<T> = std::result::Result<T, Error>;
