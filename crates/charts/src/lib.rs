// In crates/charts/src/lib.rs

pub mod color;
pub mod error;
pub mod format;
pub mod kind;
pub mod projection;
pub mod registry;
pub mod style;
pub mod theme;
pub mod tiles;
pub mod trade_table;

pub use color::Color;
pub use error::{ParseThemeError, ProjectionError, RenderError};
pub use kind::{ChartKind, ChartType};
pub use projection::{ChartData, Coloring, Dataset, project};
pub use registry::{ChartBackend, ChartHandle, ChartRegistry};
pub use style::{ChartStyle, Chrome, DatasetStyle, Paint, style};
pub use trade_table::{TableCell, TableProjection, project_table};
pub use theme::{SeriesColors, SeriesRole, Theme, ThemeMode, Tone};
pub use tiles::{MetricTile, metric_tiles};
