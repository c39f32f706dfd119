// In crates/core-types/src/types.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{DataShapeError, Result};
use crate::pnl::{Outcome, coerce_pnl};

/// The direction of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Long,
    Short,
}

impl Side {
    /// Case-insensitive exact match on `long` / `short`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "long" => Some(Side::Long),
            "short" => Some(Side::Short),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Long => "long",
            Side::Short => "short",
        }
    }
}

/// Which header positions carry the canonical fields of a trade table.
///
/// Resolved once when the table is ingested so nothing downstream has to
/// look columns up by name again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ColumnMap {
    pub pnl: Option<usize>,
    pub side: Option<usize>,
    pub timestamp: Option<usize>,
}

/// A single trade row, aligned to the header of the [`TradeTable`] that owns it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeRecord {
    cells: Vec<String>,
    side: Option<Side>,
    pnl: Option<Decimal>,
    timestamp: String,
}

impl TradeRecord {
    /// Builds a record from display cells, resolving the canonical fields through `columns`.
    pub fn from_cells(cells: Vec<String>, columns: &ColumnMap) -> Self {
        let cell = |index: Option<usize>| {
            index
                .and_then(|i| cells.get(i))
                .map(String::as_str)
                .unwrap_or("")
        };
        let side = Side::parse(cell(columns.side));
        let pnl = coerce_pnl(cell(columns.pnl));
        let timestamp = cell(columns.timestamp).trim().to_string();
        Self {
            cells,
            side,
            pnl,
            timestamp,
        }
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    /// The display text of a cell. Missing cells render as an empty string.
    pub fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map(String::as_str).unwrap_or("")
    }

    pub fn side(&self) -> Option<Side> {
        self.side
    }

    /// The parsed P&L, or `None` when the cell was missing or non-numeric.
    pub fn pnl(&self) -> Option<Decimal> {
        self.pnl
    }

    pub fn pnl_or_zero(&self) -> Decimal {
        self.pnl.unwrap_or(Decimal::ZERO)
    }

    pub fn outcome(&self) -> Outcome {
        Outcome::classify(self.pnl)
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }
}

/// An ordered collection of trades sharing one header.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TradeTable {
    header: Vec<String>,
    columns: ColumnMap,
    records: Vec<TradeRecord>,
}

impl TradeTable {
    pub fn new(header: Vec<String>, columns: ColumnMap, records: Vec<TradeRecord>) -> Self {
        Self {
            header,
            columns,
            records,
        }
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn columns(&self) -> &ColumnMap {
        &self.columns
    }

    pub fn records(&self) -> &[TradeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Account balance over the life of a backtest, as parallel date/balance arrays.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EquitySeries {
    dates: Vec<String>,
    balance: Vec<Decimal>,
}

impl EquitySeries {
    /// Builds a series, rejecting arrays of unequal length.
    pub fn new(dates: Vec<String>, balance: Vec<Decimal>) -> Result<Self> {
        if dates.len() != balance.len() {
            return Err(DataShapeError::LengthMismatch {
                series: "equity_curve",
                left: dates.len(),
                right: balance.len(),
            });
        }
        Ok(Self { dates, balance })
    }

    pub fn dates(&self) -> &[String] {
        &self.dates
    }

    pub fn balance(&self) -> &[Decimal] {
        &self.balance
    }

    pub fn len(&self) -> usize {
        self.balance.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balance.is_empty()
    }
}

/// Monthly P&L as computed by the backend. Passed through unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyReturns {
    #[serde(default, deserialize_with = "lenient_seq")]
    pub months: Vec<String>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub pnl: Vec<Decimal>,
}

/// Summary metrics computed server-side. The client only formats them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsSummary {
    #[serde(deserialize_with = "null_as_default")]
    pub total_trades: u64,
    /// Fraction of winning trades, `0.0..=1.0`.
    #[serde(deserialize_with = "null_as_default")]
    pub win_rate: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_pnl: Decimal,
    #[serde(deserialize_with = "null_as_default")]
    pub avg_pnl: Decimal,
    #[serde(deserialize_with = "null_as_default")]
    pub sharpe_ratio: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub max_drawdown: Decimal,
    #[serde(deserialize_with = "null_as_default")]
    pub best_trade: Decimal,
    #[serde(deserialize_with = "null_as_default")]
    pub worst_trade: Decimal,
}

/// Absolute URLs of the CSV artifacts for a result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DownloadLinks {
    pub trades_csv: Option<String>,
    pub metrics_csv: Option<String>,
}

/// Everything one results view shows. Replaced wholesale on every load.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BacktestResult {
    pub id: Option<String>,
    pub source_name: Option<String>,
    pub metrics: MetricsSummary,
    pub equity: EquitySeries,
    pub monthly: MonthlyReturns,
    pub trades: TradeTable,
    pub downloads: DownloadLinks,
}

/// One entry of the stored-results listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryItem {
    #[serde(rename = "_id", deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub original_filename: Option<String>,
    #[serde(default)]
    pub strategy_name: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub metrics: Option<MetricsSummary>,
}

/// A price-data file previously uploaded to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub filename: String,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub uploaded_at: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub row_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub size_mb: f64,
}

/// Run parameters sent alongside an upload as `params_json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestParams {
    pub starting_balance: f64,
    pub tp_ticks: i64,
    pub sl_ticks: i64,
    /// Fraction of the balance risked per trade (1% is `0.01`).
    pub risk_percentage: f64,
    pub trailing_stop: bool,
    pub trailing_stop_ticks: i64,
    pub tick_size: f64,
    pub tick_value: f64,
    pub commission_per_trade: f64,
    pub slippage_ticks: i64,
    pub contract_margin: f64,
}

impl Default for BacktestParams {
    fn default() -> Self {
        Self {
            starting_balance: 10_000.0,
            tp_ticks: 20,
            sl_ticks: 10,
            risk_percentage: 0.01,
            trailing_stop: false,
            trailing_stop_ticks: 10,
            tick_size: 0.25,
            tick_value: 12.5,
            commission_per_trade: 2.5,
            slippage_ticks: 1,
            contract_margin: 500.0,
        }
    }
}

/// Deserializes `null` as the type's default value.
pub fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserializes a chart series that may be `null` or hold `null` points.
///
/// A series with any `null` point cannot be plotted, so it is read as empty.
pub fn lenient_seq<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let points = Option::<Vec<Option<T>>>::deserialize(deserializer)?.unwrap_or_default();
    let len = points.len();
    let kept: Vec<T> = points.into_iter().flatten().collect();
    if kept.len() != len {
        tracing::warn!(points = len, nulls = len - kept.len(), "Discarding series with null points.");
        return Ok(Vec::new());
    }
    Ok(kept)
}

/// Accepts identifiers sent either as JSON strings or numbers.
pub fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Int(i64),
        Uint(u64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Int(n) => n.to_string(),
        Id::Uint(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn columns() -> ColumnMap {
        ColumnMap {
            timestamp: Some(0),
            side: Some(1),
            pnl: Some(2),
        }
    }

    #[test]
    fn test_record_resolves_canonical_fields() {
        let cells = vec!["2024-01-02".to_string(), "LONG".to_string(), "125.5".to_string()];
        let record = TradeRecord::from_cells(cells, &columns());

        assert_eq!(record.side(), Some(Side::Long));
        assert_eq!(record.pnl(), Some(dec!(125.5)));
        assert_eq!(record.timestamp(), "2024-01-02");
        assert_eq!(record.outcome(), Outcome::Win);
    }

    #[test]
    fn test_missing_cells_render_empty() {
        let record = TradeRecord::from_cells(vec!["2024-01-02".to_string()], &columns());

        assert_eq!(record.cell(0), "2024-01-02");
        assert_eq!(record.cell(5), "");
        assert_eq!(record.side(), None);
        assert_eq!(record.pnl(), None);
        assert_eq!(record.pnl_or_zero(), Decimal::ZERO);
        assert_eq!(record.outcome(), Outcome::Breakeven);
    }

    #[test]
    fn test_equity_series_rejects_mismatched_lengths() {
        let err = EquitySeries::new(vec!["d1".into(), "d2".into()], vec![dec!(1)]).unwrap_err();
        assert_eq!(
            err,
            DataShapeError::LengthMismatch {
                series: "equity_curve",
                left: 2,
                right: 1
            }
        );
        assert!(EquitySeries::new(vec![], vec![]).unwrap().is_empty());
    }

    #[test]
    fn test_metrics_tolerate_nulls_and_missing_fields() {
        let metrics: MetricsSummary =
            serde_json::from_str(r#"{"total_trades": 12, "win_rate": null, "total_pnl": 310.5}"#)
                .unwrap();

        assert_eq!(metrics.total_trades, 12);
        assert_eq!(metrics.win_rate, 0.0);
        assert_eq!(metrics.total_pnl, dec!(310.5));
        assert_eq!(metrics.sharpe_ratio, 0.0);
    }

    #[test]
    fn test_monthly_returns_degrade_on_nulls() {
        let monthly: MonthlyReturns =
            serde_json::from_str(r#"{"months": ["2024-01"], "pnl": null}"#).unwrap();
        assert_eq!(monthly.months, vec!["2024-01"]);
        assert!(monthly.pnl.is_empty());

        let monthly: MonthlyReturns =
            serde_json::from_str(r#"{"months": ["2024-01", "2024-02"], "pnl": [5, null]}"#)
                .unwrap();
        assert_eq!(monthly.months.len(), 2);
        assert!(monthly.pnl.is_empty());

        let monthly: MonthlyReturns =
            serde_json::from_str(r#"{"months": ["2024-01"], "pnl": [12.5]}"#).unwrap();
        assert_eq!(monthly.pnl, vec![dec!(12.5)]);
    }

    #[test]
    fn test_history_item_accepts_numeric_id() {
        let item: HistoryItem = serde_json::from_str(r#"{"_id": 42}"#).unwrap();
        assert_eq!(item.id, "42");
        assert!(item.metrics.is_none());
    }
}
