// In crates/analytics/src/types.rs

use rust_decimal::Decimal;
use serde::Serialize;

/// Trade counts per outcome class. The classes never overlap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Distribution {
    pub wins: usize,
    pub losses: usize,
    pub breakeven: usize,
}

impl Distribution {
    pub fn total(&self) -> usize {
        self.wins + self.losses + self.breakeven
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Parallel labels and values, one point per label.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LabeledSeries {
    pub labels: Vec<String>,
    pub values: Vec<Decimal>,
}

impl LabeledSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Everything derived from one result, ready for projection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DerivedSeries {
    /// Peak-to-current distance, aligned with the equity dates.
    pub drawdown: Vec<Decimal>,
    /// Running P&L sum, one point per trade.
    pub cumulative_pnl: Vec<Decimal>,
    pub monthly: LabeledSeries,
    pub distribution: Distribution,
}
