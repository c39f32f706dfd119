// In crates/table/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseFilterError {
    #[error("unknown side filter `{0}` (expected both, long or short)")]
    Side(String),
    #[error("unknown outcome filter `{0}` (expected all, wins or losses)")]
    Outcome(String),
}

pub type Result<T> = std::result::Result<T, ParseFilterError>;
