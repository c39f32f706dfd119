// In crates/charts/src/tiles.rs

use core_types::MetricsSummary;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

use crate::format::{format_fixed, format_percent};
use crate::theme::Tone;

/// One headline number of the results view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricTile {
    pub label: &'static str,
    pub value: String,
    pub tone: Tone,
}

/// The eight metric tiles, in display order.
pub fn metric_tiles(metrics: &MetricsSummary) -> Vec<MetricTile> {
    vec![
        neutral("Total Trades", metrics.total_trades.to_string()),
        neutral("Win Rate", format_percent(metrics.win_rate)),
        signed("Total P&L", metrics.total_pnl),
        signed("Average P&L", metrics.avg_pnl),
        neutral("Sharpe Ratio", format_fixed(metrics.sharpe_ratio)),
        neutral("Max Drawdown", format_fixed(to_f64(metrics.max_drawdown))),
        signed("Best Trade", metrics.best_trade),
        signed("Worst Trade", metrics.worst_trade),
    ]
}

fn neutral(label: &'static str, value: String) -> MetricTile {
    MetricTile {
        label,
        value,
        tone: Tone::Neutral,
    }
}

fn signed(label: &'static str, value: Decimal) -> MetricTile {
    MetricTile {
        label,
        value: format_fixed(to_f64(value)),
        tone: Tone::of_sign(value < Decimal::ZERO),
    }
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_eight_tiles_with_two_decimals() {
        let metrics = MetricsSummary {
            total_trades: 42,
            win_rate: 0.5714,
            total_pnl: dec!(1530.456),
            avg_pnl: dec!(36.44),
            sharpe_ratio: 1.2,
            max_drawdown: dec!(410),
            best_trade: dec!(250),
            worst_trade: dec!(-120.5),
        };
        let tiles = metric_tiles(&metrics);

        assert_eq!(tiles.len(), 8);
        let values: Vec<&str> = tiles.iter().map(|t| t.value.as_str()).collect();
        assert_eq!(
            values,
            vec!["42", "57.14%", "1530.46", "36.44", "1.20", "410.00", "250.00", "-120.50"]
        );
        assert_eq!(tiles[7].tone, Tone::Negative);
        assert_eq!(tiles[2].tone, Tone::Positive);
    }

    #[test]
    fn test_default_metrics_render_zeroes() {
        let tiles = metric_tiles(&MetricsSummary::default());
        assert_eq!(tiles[1].value, "0.00%");
        assert_eq!(tiles[2].value, "0.00");
        assert_eq!(tiles[2].tone, Tone::Positive);
    }
}
