// In crates/analytics/src/lib.rs

pub mod engine;
pub mod types;

pub use engine::{AnalyticsEngine, cumulative_pnl, distribution, drawdown, monthly};
pub use types::{DerivedSeries, Distribution, LabeledSeries};
