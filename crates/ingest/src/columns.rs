// In crates/ingest/src/columns.rs

use core_types::ColumnMap;

const PNL_EXACT: &[&str] = &["p&l", "pnl"];
const PNL_TOKENS: &[&str] = &["p&l", "pnl"];
const SIDE_NAMES: &[&str] = &["position", "side", "direction"];
const TIMESTAMP_NAMES: &[&str] = &[
    "date",
    "timestamp",
    "date_time",
    "datetime",
    "date time",
    "exit_time",
    "entry_time",
    "time",
];

/// Resolves which header positions hold the P&L, side and timestamp fields.
///
/// Matching is case-insensitive on trimmed names. Candidate lists are tried in
/// priority order, so `P&L` beats a `Net PnL` column even when it comes later
/// in the header.
pub fn resolve_columns(header: &[String]) -> ColumnMap {
    let normalized: Vec<String> = header.iter().map(|h| normalize(h)).collect();

    let pnl = first_exact(&normalized, PNL_EXACT).or_else(|| {
        normalized
            .iter()
            .position(|h| PNL_TOKENS.iter().any(|token| h.contains(token)))
    });

    ColumnMap {
        pnl,
        side: first_exact(&normalized, SIDE_NAMES),
        timestamp: first_exact(&normalized, TIMESTAMP_NAMES),
    }
}

/// Trims, lowercases and collapses inner whitespace runs to a single space.
pub(crate) fn normalize(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn first_exact(normalized: &[String], candidates: &[&str]) -> Option<usize> {
    candidates
        .iter()
        .find_map(|candidate| normalized.iter().position(|h| h == candidate))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_resolves_common_layout() {
        let map = resolve_columns(&header(&["Date", "Position", "P&L"]));
        assert_eq!(map.timestamp, Some(0));
        assert_eq!(map.side, Some(1));
        assert_eq!(map.pnl, Some(2));
    }

    #[test]
    fn test_exact_pnl_wins_over_token_match() {
        let map = resolve_columns(&header(&["Net PnL ($)", "entry_time", " PNL "]));
        assert_eq!(map.pnl, Some(2));
        assert_eq!(map.timestamp, Some(1));
    }

    #[test]
    fn test_token_match_is_fallback() {
        let map = resolve_columns(&header(&["Exit Time", "Realized P&L"]));
        assert_eq!(map.pnl, Some(1));
        assert_eq!(map.timestamp, None);
    }

    #[test]
    fn test_side_priority() {
        let map = resolve_columns(&header(&["direction", "Side"]));
        assert_eq!(map.side, Some(1));
    }

    #[test]
    fn test_unknown_header_resolves_nothing() {
        assert_eq!(resolve_columns(&header(&["a", "b"])), ColumnMap::default());
        assert_eq!(resolve_columns(&[]), ColumnMap::default());
    }
}
