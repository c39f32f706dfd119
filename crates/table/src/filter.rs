// In crates/table/src/filter.rs

use std::str::FromStr;

use core_types::{Outcome, Side, TradeRecord};
use serde::{Deserialize, Serialize};

use crate::error::ParseFilterError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SideFilter {
    #[default]
    Both,
    Long,
    Short,
}

impl SideFilter {
    pub fn matches(&self, side: Option<Side>) -> bool {
        match self {
            SideFilter::Both => true,
            SideFilter::Long => side == Some(Side::Long),
            SideFilter::Short => side == Some(Side::Short),
        }
    }
}

impl FromStr for SideFilter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "both" | "all" => Ok(SideFilter::Both),
            "long" => Ok(SideFilter::Long),
            "short" => Ok(SideFilter::Short),
            _ => Err(ParseFilterError::Side(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeFilter {
    #[default]
    All,
    Wins,
    Losses,
}

impl OutcomeFilter {
    pub fn matches(&self, outcome: Outcome) -> bool {
        match self {
            OutcomeFilter::All => true,
            OutcomeFilter::Wins => outcome == Outcome::Win,
            OutcomeFilter::Losses => outcome == Outcome::Loss,
        }
    }
}

impl FromStr for OutcomeFilter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(OutcomeFilter::All),
            "wins" => Ok(OutcomeFilter::Wins),
            "losses" => Ok(OutcomeFilter::Losses),
            _ => Err(ParseFilterError::Outcome(s.to_string())),
        }
    }
}

/// The side and outcome a trade must have to be shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeFilter {
    pub side: SideFilter,
    pub outcome: OutcomeFilter,
}

impl TradeFilter {
    pub fn new(side: SideFilter, outcome: OutcomeFilter) -> Self {
        Self { side, outcome }
    }

    pub fn matches(&self, trade: &TradeRecord) -> bool {
        self.side.matches(trade.side()) && self.outcome.matches(trade.outcome())
    }
}

/// Returns the trades matching `criteria`, in their original order.
///
/// The source is only borrowed, so filtering never changes it.
pub fn filter<'a, I>(trades: I, criteria: TradeFilter) -> Vec<&'a TradeRecord>
where
    I: IntoIterator<Item = &'a TradeRecord>,
{
    trades.into_iter().filter(|t| criteria.matches(t)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::ColumnMap;

    fn rows() -> Vec<TradeRecord> {
        let columns = ColumnMap {
            timestamp: Some(0),
            side: Some(1),
            pnl: Some(2),
        };
        [("d1", "long", "100"), ("d2", "short", "-40"), ("d3", "long", "0")]
            .iter()
            .map(|(d, s, p)| {
                TradeRecord::from_cells(vec![d.to_string(), s.to_string(), p.to_string()], &columns)
            })
            .collect()
    }

    fn dates(trades: &[&TradeRecord]) -> Vec<String> {
        trades.iter().map(|t| t.timestamp().to_string()).collect()
    }

    #[test]
    fn test_filter_by_side() {
        let all = rows();
        let longs = filter(&all, TradeFilter::new(SideFilter::Long, OutcomeFilter::All));
        assert_eq!(dates(&longs), vec!["d1", "d3"]);
    }

    #[test]
    fn test_filter_by_outcome_excludes_breakeven() {
        let all = rows();
        let wins = filter(&all, TradeFilter::new(SideFilter::Both, OutcomeFilter::Wins));
        let losses = filter(&all, TradeFilter::new(SideFilter::Both, OutcomeFilter::Losses));
        assert_eq!(dates(&wins), vec!["d1"]);
        assert_eq!(dates(&losses), vec!["d2"]);
    }

    #[test]
    fn test_side_match_is_case_insensitive() {
        let columns = ColumnMap {
            side: Some(0),
            ..ColumnMap::default()
        };
        let trade = TradeRecord::from_cells(vec![" SHORT ".to_string()], &columns);
        assert!(SideFilter::Short.matches(trade.side()));
        assert!(!SideFilter::Long.matches(trade.side()));
    }

    #[test]
    fn test_parse_filters() {
        assert_eq!("Long".parse::<SideFilter>(), Ok(SideFilter::Long));
        assert_eq!("both".parse::<SideFilter>(), Ok(SideFilter::Both));
        assert_eq!("losses".parse::<OutcomeFilter>(), Ok(OutcomeFilter::Losses));
        assert_eq!(
            "sideways".parse::<SideFilter>(),
            Err(ParseFilterError::Side("sideways".to_string()))
        );
    }
}
