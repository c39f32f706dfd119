// In crates/analytics/src/engine.rs

use crate::types::{DerivedSeries, Distribution, LabeledSeries};
use core_types::{BacktestResult, MonthlyReturns, Outcome, TradeRecord};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Derives the chart series of a backtest result. Every transform is pure.
#[derive(Default)]
pub struct AnalyticsEngine;

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculates all derived series for one result.
    pub fn derive(&self, result: &BacktestResult) -> DerivedSeries {
        let trades = result.trades.records();

        let derived = DerivedSeries {
            drawdown: drawdown(result.equity.balance()),
            cumulative_pnl: cumulative_pnl(trades),
            monthly: monthly(&result.monthly),
            distribution: distribution(trades),
        };

        tracing::debug!(
            equity_points = result.equity.len(),
            trades = trades.len(),
            months = derived.monthly.len(),
            wins = derived.distribution.wins,
            losses = derived.distribution.losses,
            "Derived series computed."
        );
        derived
    }
}

/// Distance below the running peak at each point of a balance series.
///
/// The peak is seeded at the first balance, so the result is never negative
/// and is zero wherever the balance sets a new high. A gap wider than
/// `Decimal` can hold saturates at `Decimal::MAX`.
pub fn drawdown(balance: &[Decimal]) -> Vec<Decimal> {
    let mut peak = balance.first().copied().unwrap_or(dec!(0));
    balance
        .iter()
        .map(|value| {
            peak = peak.max(*value);
            peak.saturating_sub(*value)
        })
        .collect()
}

/// Running sum of trade P&L, one point per trade. Non-numeric P&L adds zero
/// and the sum saturates at the bounds of `Decimal`.
pub fn cumulative_pnl(trades: &[TradeRecord]) -> Vec<Decimal> {
    trades
        .iter()
        .scan(dec!(0), |running, trade| {
            *running = running.saturating_add(trade.pnl_or_zero());
            Some(*running)
        })
        .collect()
}

/// Passes server-computed monthly P&L through as a labeled series.
pub fn monthly(returns: &MonthlyReturns) -> LabeledSeries {
    let (months, pnl) = (returns.months.len(), returns.pnl.len());
    let len = months.min(pnl);
    if months != pnl {
        tracing::warn!(months, pnl, kept = len, "Monthly returns have unequal lengths; truncating.");
    }

    LabeledSeries {
        labels: returns.months[..len].to_vec(),
        values: returns.pnl[..len].to_vec(),
    }
}

/// Counts wins, losses and breakeven trades by the strict sign of their P&L.
pub fn distribution(trades: &[TradeRecord]) -> Distribution {
    trades
        .iter()
        .fold(Distribution::default(), |mut acc, trade| {
            match trade.outcome() {
                Outcome::Win => acc.wins += 1,
                Outcome::Loss => acc.losses += 1,
                Outcome::Breakeven => acc.breakeven += 1,
            }
            acc
        })
}
