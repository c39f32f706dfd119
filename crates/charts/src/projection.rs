// In crates/charts/src/projection.rs

use analytics::{DerivedSeries, Distribution, LabeledSeries};
use core_types::{BacktestResult, EquitySeries};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

use crate::error::ProjectionError;
use crate::kind::ChartKind;
use crate::theme::SeriesRole;

pub type Result<T> = std::result::Result<T, ProjectionError>;

/// How a dataset is coloured, resolved against a theme only at style time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", content = "roles", rename_all = "snake_case")]
pub enum Coloring {
    /// Every point shares the colour of one role.
    Series(SeriesRole),
    /// Positive colour for values `>= 0`, negative below.
    BySign,
    /// One role per point, in label order.
    ByCategory(Vec<SeriesRole>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub label: String,
    pub values: Vec<f64>,
    pub coloring: Coloring,
}

/// Theme-free chart content: labels plus one or more datasets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

impl ChartData {
    pub fn point_count(&self) -> usize {
        self.labels.len()
    }
}

/// Projects one chart of a result.
///
/// # Returns
/// `Ok(None)` when the underlying series is empty and there is nothing to draw.
pub fn project(
    kind: ChartKind,
    result: &BacktestResult,
    derived: &DerivedSeries,
) -> Result<Option<ChartData>> {
    match kind {
        ChartKind::Equity => project_equity(&result.equity),
        ChartKind::Drawdown => project_drawdown(result.equity.dates(), &derived.drawdown),
        ChartKind::Monthly => project_monthly(&derived.monthly),
        ChartKind::Distribution => Ok(project_distribution(&derived.distribution)),
        ChartKind::CumulativePnl => project_cumulative(&derived.cumulative_pnl),
    }
}

pub fn project_equity(equity: &EquitySeries) -> Result<Option<ChartData>> {
    single_series(
        ChartKind::Equity,
        equity.dates().to_vec(),
        equity.balance(),
        Coloring::Series(SeriesRole::Equity),
    )
}

pub fn project_drawdown(dates: &[String], drawdown: &[Decimal]) -> Result<Option<ChartData>> {
    single_series(
        ChartKind::Drawdown,
        dates.to_vec(),
        drawdown,
        Coloring::Series(SeriesRole::Drawdown),
    )
}

pub fn project_monthly(monthly: &LabeledSeries) -> Result<Option<ChartData>> {
    single_series(
        ChartKind::Monthly,
        monthly.labels.clone(),
        &monthly.values,
        Coloring::BySign,
    )
}

/// Cumulative P&L is labeled `Trade 1`, `Trade 2`, ... in trade order.
pub fn project_cumulative(cumulative: &[Decimal]) -> Result<Option<ChartData>> {
    let labels = (1..=cumulative.len()).map(|n| format!("Trade {}", n)).collect();
    single_series(
        ChartKind::CumulativePnl,
        labels,
        cumulative,
        Coloring::Series(SeriesRole::Cumulative),
    )
}

pub fn project_distribution(distribution: &Distribution) -> Option<ChartData> {
    if distribution.is_empty() {
        return None;
    }

    let kind = ChartKind::Distribution;
    Some(ChartData {
        kind,
        labels: vec!["Wins".into(), "Losses".into(), "Breakeven".into()],
        datasets: vec![Dataset {
            label: kind.dataset_label().to_string(),
            values: vec![
                distribution.wins as f64,
                distribution.losses as f64,
                distribution.breakeven as f64,
            ],
            coloring: Coloring::ByCategory(vec![
                SeriesRole::Positive,
                SeriesRole::Negative,
                SeriesRole::Neutral,
            ]),
        }],
    })
}

fn single_series(
    kind: ChartKind,
    labels: Vec<String>,
    values: &[Decimal],
    coloring: Coloring,
) -> Result<Option<ChartData>> {
    if labels.len() != values.len() {
        return Err(ProjectionError::LengthMismatch {
            kind,
            labels: labels.len(),
            values: values.len(),
        });
    }
    if values.is_empty() {
        return Ok(None);
    }

    let values = values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            value
                .to_f64()
                .filter(|v| v.is_finite())
                .ok_or(ProjectionError::NotRepresentable { kind, index })
        })
        .collect::<Result<Vec<f64>>>()?;

    Ok(Some(ChartData {
        kind,
        labels,
        datasets: vec![Dataset {
            label: kind.dataset_label().to_string(),
            values,
            coloring,
        }],
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cumulative_labels_are_one_based() {
        let data = project_cumulative(&[dec!(10), dec!(6), dec!(16.5)]).unwrap().unwrap();
        assert_eq!(data.labels, vec!["Trade 1", "Trade 2", "Trade 3"]);
        assert_eq!(data.datasets[0].values, vec![10.0, 6.0, 16.5]);
    }

    #[test]
    fn test_empty_series_is_no_data() {
        assert_eq!(project_cumulative(&[]), Ok(None));
        assert_eq!(project_equity(&EquitySeries::default()), Ok(None));
        assert_eq!(project_distribution(&Distribution::default()), None);
    }

    #[test]
    fn test_drawdown_length_mismatch_is_an_error() {
        let err = project_drawdown(&["d1".to_string()], &[dec!(0), dec!(1)]).unwrap_err();
        assert_eq!(
            err,
            ProjectionError::LengthMismatch {
                kind: ChartKind::Drawdown,
                labels: 1,
                values: 2
            }
        );
    }

    #[test]
    fn test_distribution_wedges() {
        let data = project_distribution(&Distribution {
            wins: 1,
            losses: 1,
            breakeven: 1,
        })
        .unwrap();
        assert_eq!(data.labels, vec!["Wins", "Losses", "Breakeven"]);
        assert_eq!(data.datasets[0].values, vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_monthly_bars_color_by_sign() {
        let monthly = LabeledSeries {
            labels: vec!["2024-01".into(), "2024-02".into()],
            values: vec![dec!(120.5), dec!(-30)],
        };
        let data = project_monthly(&monthly).unwrap().unwrap();
        assert_eq!(data.datasets[0].coloring, Coloring::BySign);
        assert_eq!(data.kind.viewport_id(), "monthlyChart");
    }
}
