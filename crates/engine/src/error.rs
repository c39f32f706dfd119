// In crates/engine/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] api_client::Error),

    #[error(transparent)]
    Ingest(#[from] ingest::Error),

    #[error(transparent)]
    Schema(#[from] ingest::SchemaError),

    #[error(transparent)]
    DataShape(#[from] core_types::DataShapeError),

    #[error("Please provide a {0}")]
    MissingInput(&'static str),

    #[error("No trades CSV is available for the current result")]
    NoTradesCsv,
}

pub type Result<T> = std::result::Result<T, Error>;
