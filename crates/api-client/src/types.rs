// In crates/api-client/src/types.rs

use core_types::types::{lenient_seq, null_as_default, string_or_number};
use core_types::{BacktestParams, MetricsSummary, MonthlyReturns};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Everything needed to start a remote backtest.
#[derive(Debug, Clone)]
pub struct SubmitRequest {
    pub file_name: String,
    pub file_bytes: Vec<u8>,
    pub params: BacktestParams,
    pub category: String,
    pub symbol: String,
}

/// Acknowledgement of `POST /backtests`.
#[derive(Deserialize, Debug, Clone)]
pub struct SubmitResponse {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
}

/// `GET /backtests/{id}`. Every field may be absent on an unfinished run.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct BacktestDetail {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub metrics: Option<MetricsSummary>,
    #[serde(default)]
    pub chart_data: Option<ChartDataWire>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub trades: Vec<Value>,
    #[serde(default)]
    pub download_links: Option<DownloadLinksWire>,
}

impl BacktestDetail {
    /// A missing or empty status counts as completed.
    pub fn is_completed(&self) -> bool {
        match self.status.as_deref().map(str::trim) {
            None | Some("") | Some("completed") => true,
            Some(_) => false,
        }
    }

    /// Whether the backend is still working on the run.
    pub fn is_in_progress(&self) -> bool {
        matches!(
            self.status.as_deref().map(str::trim),
            Some("pending" | "queued" | "running")
        )
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct ChartDataWire {
    #[serde(default)]
    pub equity_curve: Option<EquityCurveWire>,
    #[serde(default)]
    pub monthly_returns: Option<MonthlyReturns>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct EquityCurveWire {
    #[serde(default, deserialize_with = "lenient_seq")]
    pub dates: Vec<String>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub balance: Vec<Decimal>,
}

/// Artifact paths relative to the API base URL.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct DownloadLinksWire {
    #[serde(default)]
    pub trades_csv: Option<String>,
    #[serde(default)]
    pub metrics_csv: Option<String>,
}

/// `GET /api/historical-data/{id}`.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct HistoricalResult {
    #[serde(default)]
    pub metrics: Option<MetricsSummary>,
    #[serde(default)]
    pub equity_curve: Option<EquityCurveWire>,
    #[serde(default)]
    pub monthly_returns: Option<MonthlyReturns>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub trades: Vec<Value>,
    #[serde(default)]
    pub original_filename: Option<String>,
    #[serde(default)]
    pub strategy_name: Option<String>,
    /// Server-side file path; only its basename is meaningful to clients.
    #[serde(default)]
    pub trades_csv_path: Option<String>,
    #[serde(default)]
    pub metrics_csv_path: Option<String>,
}
