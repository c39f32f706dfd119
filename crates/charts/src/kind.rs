// In crates/charts/src/kind.rs

use std::fmt;

use serde::Serialize;

/// The five charts of a results view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Equity,
    Drawdown,
    Monthly,
    Distribution,
    CumulativePnl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Line,
    Bar,
    Doughnut,
}

impl ChartKind {
    /// Render order of a results view.
    pub const ALL: [ChartKind; 5] = [
        ChartKind::Equity,
        ChartKind::Monthly,
        ChartKind::Drawdown,
        ChartKind::Distribution,
        ChartKind::CumulativePnl,
    ];

    /// The fixed viewport each chart is drawn into.
    pub fn viewport_id(&self) -> &'static str {
        match self {
            ChartKind::Equity => "equityChart",
            ChartKind::Drawdown => "drawdownChart",
            ChartKind::Monthly => "monthlyChart",
            ChartKind::Distribution => "distributionChart",
            ChartKind::CumulativePnl => "cumulativePnlChart",
        }
    }

    pub fn chart_type(&self) -> ChartType {
        match self {
            ChartKind::Equity | ChartKind::Drawdown | ChartKind::CumulativePnl => ChartType::Line,
            ChartKind::Monthly => ChartType::Bar,
            ChartKind::Distribution => ChartType::Doughnut,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ChartKind::Equity => "Equity Curve",
            ChartKind::Drawdown => "Drawdown",
            ChartKind::Monthly => "Monthly Returns",
            ChartKind::Distribution => "P&L Distribution",
            ChartKind::CumulativePnl => "Cumulative P&L",
        }
    }

    pub fn y_axis_label(&self) -> Option<&'static str> {
        match self {
            ChartKind::Equity => Some("Balance ($)"),
            ChartKind::Drawdown => Some("Drawdown ($)"),
            ChartKind::Monthly => Some("P&L ($)"),
            ChartKind::Distribution => None,
            ChartKind::CumulativePnl => Some("Cumulative P&L ($)"),
        }
    }

    pub fn dataset_label(&self) -> &'static str {
        match self {
            ChartKind::Equity => "Balance",
            ChartKind::Drawdown => "Drawdown",
            ChartKind::Monthly => "Monthly P&L",
            ChartKind::Distribution => "Trades",
            ChartKind::CumulativePnl => "Cumulative P&L",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}
