// In crates/engine/src/normalize.rs

use api_client::{BacktestDetail, EquityCurveWire, HistoricalResult, download_url, join_url};
use core_types::{BacktestResult, DownloadLinks, EquitySeries};
use ingest::trades_from_json;

/// Converts a completed run detail into a result.
///
/// Missing sections become empty series. Relative download links are joined
/// onto `base_url`.
pub fn from_detail(id: &str, detail: BacktestDetail, base_url: &str) -> BacktestResult {
    let chart_data = detail.chart_data.unwrap_or_default();
    let links = detail.download_links.unwrap_or_default();

    BacktestResult {
        id: Some(id.to_string()),
        source_name: None,
        metrics: detail.metrics.unwrap_or_default(),
        equity: equity_series(chart_data.equity_curve),
        monthly: chart_data.monthly_returns.unwrap_or_default(),
        trades: trades_from_json(&detail.trades),
        downloads: DownloadLinks {
            trades_csv: non_empty(links.trades_csv).map(|link| join_url(base_url, &link)),
            metrics_csv: non_empty(links.metrics_csv).map(|link| join_url(base_url, &link)),
        },
    }
}

/// Converts a stored historical result. Artifact paths become `/downloads/{basename}` URLs.
pub fn from_historical(id: &str, data: HistoricalResult, base_url: &str) -> BacktestResult {
    BacktestResult {
        id: Some(id.to_string()),
        source_name: data.original_filename,
        metrics: data.metrics.unwrap_or_default(),
        equity: equity_series(data.equity_curve),
        monthly: data.monthly_returns.unwrap_or_default(),
        trades: trades_from_json(&data.trades),
        downloads: DownloadLinks {
            trades_csv: data.trades_csv_path.and_then(|p| download_url(base_url, &p)),
            metrics_csv: data.metrics_csv_path.and_then(|p| download_url(base_url, &p)),
        },
    }
}

/// Builds the equity series, degrading unequal arrays to an empty series.
fn equity_series(wire: Option<EquityCurveWire>) -> EquitySeries {
    let wire = wire.unwrap_or_default();
    EquitySeries::new(wire.dates, wire.balance).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "Discarding malformed equity curve.");
        EquitySeries::default()
    })
}

fn non_empty(link: Option<String>) -> Option<String> {
    link.filter(|l| !l.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_client::{ChartDataWire, DownloadLinksWire};
    use core_types::Side;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_detail_is_normalized() {
        let detail = BacktestDetail {
            status: Some("completed".into()),
            chart_data: Some(ChartDataWire {
                equity_curve: Some(EquityCurveWire {
                    dates: vec!["d1".into(), "d2".into()],
                    balance: vec![dec!(10000), dec!(10100)],
                }),
                monthly_returns: None,
            }),
            trades: vec![json!({"entry_time": "d1", "side": "Long", "pnl": 100})],
            download_links: Some(DownloadLinksWire {
                trades_csv: Some("/files/trades_7.csv".into()),
                metrics_csv: Some(String::new()),
            }),
            ..BacktestDetail::default()
        };

        let result = from_detail("7", detail, "http://h:8000");
        assert_eq!(result.id.as_deref(), Some("7"));
        assert_eq!(result.equity.len(), 2);
        assert!(result.monthly.months.is_empty());
        assert_eq!(result.trades.records()[0].side(), Some(Side::Long));
        assert_eq!(result.trades.records()[0].pnl(), Some(dec!(100)));
        assert_eq!(
            result.downloads.trades_csv.as_deref(),
            Some("http://h:8000/files/trades_7.csv")
        );
        assert_eq!(result.downloads.metrics_csv, None);
    }

    #[test]
    fn test_mismatched_equity_degrades_to_empty() {
        let detail = BacktestDetail {
            chart_data: Some(ChartDataWire {
                equity_curve: Some(EquityCurveWire {
                    dates: vec!["d1".into()],
                    balance: vec![dec!(1), dec!(2)],
                }),
                monthly_returns: None,
            }),
            ..BacktestDetail::default()
        };

        let result = from_detail("1", detail, "http://h");
        assert!(result.equity.is_empty());
    }

    #[test]
    fn test_null_points_drop_only_their_series() {
        let detail: BacktestDetail = serde_json::from_value(json!({
            "status": "completed",
            "chart_data": {
                "equity_curve": {"dates": ["d1", "d2"], "balance": [10000, null]},
                "monthly_returns": {"months": ["2024-01"], "pnl": null}
            },
            "trades": [{"entry_time": "d1", "side": "Short", "pnl": -12}]
        }))
        .unwrap();

        let result = from_detail("3", detail, "http://h");
        assert!(result.equity.is_empty());
        assert!(result.monthly.pnl.is_empty());
        assert_eq!(result.trades.len(), 1);
        assert_eq!(result.trades.records()[0].pnl(), Some(dec!(-12)));
    }

    #[test]
    fn test_historical_links_use_basename() {
        let data = HistoricalResult {
            original_filename: Some("es_2024.csv".into()),
            trades_csv_path: Some("/var/data/results/trades_a1.csv".into()),
            ..HistoricalResult::default()
        };

        let result = from_historical("a1", data, "http://h");
        assert_eq!(result.source_name.as_deref(), Some("es_2024.csv"));
        assert_eq!(
            result.downloads.trades_csv.as_deref(),
            Some("http://h/downloads/trades_a1.csv")
        );
        assert!(result.trades.is_empty());
    }
}
