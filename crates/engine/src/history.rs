// In crates/engine/src/history.rs

use std::cmp::Ordering;
use std::str::FromStr;

use charts::Tone;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use core_types::{HistoryItem, MetricsSummary};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HistorySort {
    #[default]
    Newest,
    Oldest,
    /// Highest total P&L first.
    Best,
    Worst,
}

impl FromStr for HistorySort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest" => Ok(HistorySort::Newest),
            "oldest" => Ok(HistorySort::Oldest),
            "best" => Ok(HistorySort::Best),
            "worst" => Ok(HistorySort::Worst),
            other => Err(format!(
                "unknown sort `{}` (expected newest, oldest, best or worst)",
                other
            )),
        }
    }
}

/// Search and ordering applied to the stored-results listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryQuery {
    pub search: String,
    pub sort: HistorySort,
}

impl HistoryQuery {
    /// Keeps items whose filename or strategy contains the search text
    /// (case-insensitive), then sorts them. The sort is stable.
    pub fn apply(&self, items: Vec<HistoryItem>) -> Vec<HistoryItem> {
        let needle = self.search.trim().to_lowercase();
        let mut matched: Vec<HistoryItem> = items
            .into_iter()
            .filter(|item| {
                let filename = item.original_filename.as_deref().unwrap_or("").to_lowercase();
                let strategy = item.strategy_name.as_deref().unwrap_or("").to_lowercase();
                filename.contains(&needle) || strategy.contains(&needle)
            })
            .collect();

        match self.sort {
            HistorySort::Newest => matched.sort_by(|a, b| by_time(b, a)),
            HistorySort::Oldest => matched.sort_by(by_time),
            HistorySort::Best => matched.sort_by(|a, b| total_pnl(b).cmp(&total_pnl(a))),
            HistorySort::Worst => matched.sort_by(|a, b| total_pnl(a).cmp(&total_pnl(b))),
        }
        matched
    }
}

fn by_time(a: &HistoryItem, b: &HistoryItem) -> Ordering {
    let parse = |item: &HistoryItem| item.timestamp.as_deref().and_then(parse_timestamp);
    parse(a).cmp(&parse(b))
}

fn total_pnl(item: &HistoryItem) -> Decimal {
    item.metrics
        .as_ref()
        .map(|m| m.total_pnl)
        .unwrap_or(Decimal::ZERO)
}

/// Parses the timestamp formats the backend is known to emit.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// One row of the history listing, formatted for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryCard {
    pub id: String,
    pub title: String,
    /// `{strategy} • {n} trades`.
    pub subtitle: String,
    pub date: String,
    pub total_pnl: String,
    pub pnl_tone: Tone,
    pub win_rate: String,
    pub win_rate_tone: Tone,
    pub sharpe_ratio: String,
    pub max_drawdown: String,
}

impl From<&HistoryItem> for HistoryCard {
    fn from(item: &HistoryItem) -> Self {
        let metrics = item.metrics.clone().unwrap_or_default();
        let win_rate = metrics.win_rate * 100.0;

        Self {
            id: item.id.clone(),
            title: item
                .original_filename
                .clone()
                .unwrap_or_else(|| "Unknown File".to_string()),
            subtitle: format!(
                "{} • {} trades",
                item.strategy_name.as_deref().unwrap_or("Strategy"),
                metrics.total_trades
            ),
            date: item
                .timestamp
                .as_deref()
                .and_then(parse_timestamp)
                .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "Unknown date".to_string()),
            total_pnl: format!("{:.2}", to_f64(metrics.total_pnl)),
            pnl_tone: pnl_tone(&metrics),
            win_rate: format!("{:.1}%", win_rate),
            win_rate_tone: if win_rate >= 50.0 { Tone::Positive } else { Tone::Negative },
            sharpe_ratio: format!("{:.2}", metrics.sharpe_ratio),
            max_drawdown: format!("{:.2}", to_f64(metrics.max_drawdown)),
        }
    }
}

fn pnl_tone(metrics: &MetricsSummary) -> Tone {
    match metrics.total_pnl.cmp(&Decimal::ZERO) {
        Ordering::Greater => Tone::Positive,
        Ordering::Less => Tone::Negative,
        Ordering::Equal => Tone::Neutral,
    }
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(id: &str, file: &str, strategy: Option<&str>, ts: &str, pnl: Decimal) -> HistoryItem {
        HistoryItem {
            id: id.to_string(),
            original_filename: Some(file.to_string()),
            strategy_name: strategy.map(str::to_string),
            timestamp: Some(ts.to_string()),
            metrics: Some(MetricsSummary {
                total_pnl: pnl,
                total_trades: 10,
                win_rate: 0.55,
                ..MetricsSummary::default()
            }),
        }
    }

    fn items() -> Vec<HistoryItem> {
        vec![
            item("a", "ES_2023.csv", Some("Breakout"), "2024-01-05T10:00:00", dec!(120)),
            item("b", "nq_2024.csv", Some("Mean Reversion"), "2024-03-01 09:30:00", dec!(-40)),
            item("c", "cl.csv", None, "2023-12-31", dec!(300)),
        ]
    }

    fn ids(items: &[HistoryItem]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_sort_orders() {
        let sorted = |sort| HistoryQuery { search: String::new(), sort }.apply(items());
        assert_eq!(ids(&sorted(HistorySort::Newest)), vec!["b", "a", "c"]);
        assert_eq!(ids(&sorted(HistorySort::Oldest)), vec!["c", "a", "b"]);
        assert_eq!(ids(&sorted(HistorySort::Best)), vec!["c", "a", "b"]);
        assert_eq!(ids(&sorted(HistorySort::Worst)), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_search_matches_filename_or_strategy() {
        let query = |search: &str| HistoryQuery {
            search: search.to_string(),
            sort: HistorySort::Newest,
        };
        assert_eq!(ids(&query("es_").apply(items())), vec!["a"]);
        assert_eq!(ids(&query("REVERSION").apply(items())), vec!["b"]);
        assert!(query("gold").apply(items()).is_empty());
    }

    #[test]
    fn test_card_formatting() {
        let card = HistoryCard::from(&items()[1]);
        assert_eq!(card.title, "nq_2024.csv");
        assert_eq!(card.subtitle, "Mean Reversion • 10 trades");
        assert_eq!(card.date, "2024-03-01 09:30:00");
        assert_eq!(card.total_pnl, "-40.00");
        assert_eq!(card.pnl_tone, Tone::Negative);
        assert_eq!(card.win_rate, "55.0%");
        assert_eq!(card.win_rate_tone, Tone::Positive);

        let bare = HistoryItem {
            id: "z".into(),
            original_filename: None,
            strategy_name: None,
            timestamp: None,
            metrics: None,
        };
        let card = HistoryCard::from(&bare);
        assert_eq!(card.title, "Unknown File");
        assert_eq!(card.subtitle, "Strategy • 0 trades");
        assert_eq!(card.pnl_tone, Tone::Neutral);
        assert_eq!(card.win_rate_tone, Tone::Negative);
    }

    #[test]
    fn test_parse_sort() {
        assert_eq!("Best".parse::<HistorySort>(), Ok(HistorySort::Best));
        assert!("random".parse::<HistorySort>().is_err());
    }
}
