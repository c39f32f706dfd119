// In crates/charts/src/error.rs

use thiserror::Error;

use crate::kind::ChartKind;

/// A derived series could not be turned into chart data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProjectionError {
    #[error("{kind}: {labels} labels but {values} values")]
    LengthMismatch {
        kind: ChartKind,
        labels: usize,
        values: usize,
    },
    #[error("{kind}: value at index {index} cannot be plotted")]
    NotRepresentable { kind: ChartKind, index: usize },
}

/// The rendering backend refused to draw a chart.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("failed to render into `{viewport}`: {message}")]
    Backend { viewport: String, message: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown theme `{0}` (expected light or dark)")]
pub struct ParseThemeError(pub String);
