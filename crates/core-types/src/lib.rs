// In crates/core-types/src/lib.rs

pub mod error;
pub mod pnl;
pub mod types;

// Re-export the most important types for easy access from other crates.
pub use error::{DataShapeError, Result};
pub use pnl::{Outcome, coerce_pnl};
pub use types::{
    BacktestParams, BacktestResult, ColumnMap, DownloadLinks, EquitySeries, HistoryItem,
    MetricsSummary, MonthlyReturns, Side, TradeRecord, TradeTable, UploadedFile,
};
