// In crates/charts/src/trade_table.rs

use core_types::{TradeTable, coerce_pnl};
use rust_decimal::Decimal;
use serde::Serialize;
use table::TablePage;

use crate::theme::Tone;

pub const EMPTY_TABLE_MESSAGE: &str = "No trades loaded";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableCell {
    pub text: String,
    /// Set only on numeric cells of P&L-like columns.
    pub tone: Option<Tone>,
}

/// The visible page of the trade table, ready to draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableProjection {
    pub header: Vec<String>,
    pub rows: Vec<Vec<TableCell>>,
    pub page_label: String,
    /// Shown in place of rows when the page is empty.
    pub empty_message: Option<&'static str>,
}

impl TableProjection {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Projects one page of `table` into display cells.
///
/// Cells under the resolved P&L column, or any header containing `pnl` /
/// `p&l`, are toned by sign. Non-numeric cells in those columns stay untoned.
pub fn project_table(table: &TradeTable, page: &TablePage<'_>) -> TableProjection {
    let header = table.header().to_vec();
    let pnl_like: Vec<bool> = header
        .iter()
        .enumerate()
        .map(|(i, name)| table.columns().pnl == Some(i) || is_pnl_like(name))
        .collect();

    let rows: Vec<Vec<TableCell>> = page
        .rows
        .iter()
        .map(|record| {
            (0..header.len())
                .map(|i| {
                    let text = record.cell(i).to_string();
                    let tone = if pnl_like[i] { tone_of(&text) } else { None };
                    TableCell { text, tone }
                })
                .collect()
        })
        .collect();

    let empty_message = rows.is_empty().then_some(EMPTY_TABLE_MESSAGE);
    TableProjection {
        header,
        rows,
        page_label: page.label(),
        empty_message,
    }
}

fn is_pnl_like(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.contains("pnl") || lower.contains("p&l")
}

fn tone_of(text: &str) -> Option<Tone> {
    coerce_pnl(text).map(|value| Tone::of_sign(value < Decimal::ZERO))
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{ColumnMap, TradeRecord};
    use table::PageView;

    fn table() -> TradeTable {
        let header: Vec<String> = ["Date", "Position", "P&L", "Net PnL"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let columns = ColumnMap {
            timestamp: Some(0),
            side: Some(1),
            pnl: Some(2),
        };
        let records = [["d1", "long", "100", "98"], ["d2", "short", "-40", "n/a"]]
            .iter()
            .map(|row| TradeRecord::from_cells(row.iter().map(|s| s.to_string()).collect(), &columns))
            .collect();
        TradeTable::new(header, columns, records)
    }

    #[test]
    fn test_pnl_cells_are_toned() {
        let table = table();
        let page = PageView::new().current(&table);
        let projection = project_table(&table, &page);

        assert_eq!(projection.rows.len(), 2);
        assert_eq!(projection.rows[0][2].tone, Some(Tone::Positive));
        assert_eq!(projection.rows[0][3].tone, Some(Tone::Positive));
        assert_eq!(projection.rows[1][2].tone, Some(Tone::Negative));
        assert_eq!(projection.rows[1][3].tone, None);
        assert_eq!(projection.rows[1][1].tone, None);
        assert_eq!(projection.page_label, "Page 1 / 1");
        assert_eq!(projection.empty_message, None);
    }

    #[test]
    fn test_empty_table_shows_message() {
        let table = TradeTable::default();
        let page = PageView::new().current(&table);
        let projection = project_table(&table, &page);

        assert!(projection.is_empty());
        assert_eq!(projection.empty_message, Some(EMPTY_TABLE_MESSAGE));
    }
}
