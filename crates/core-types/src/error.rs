// In crates/core-types/src/error.rs

use thiserror::Error;

/// A response or series did not have the shape the pipeline expects.
///
/// Callers degrade to an empty series when they see this; it never aborts a load.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataShapeError {
    #[error("{series}: {left} labels but {right} values")]
    LengthMismatch {
        series: &'static str,
        left: usize,
        right: usize,
    },
    #[error("response is missing `{0}`")]
    MissingField(&'static str),
}

pub type Result<T> = std::result::Result<T, DataShapeError>;
