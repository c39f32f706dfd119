// In crates/ingest/src/trades.rs

use core_types::{TradeRecord, TradeTable};
use csv::{ReaderBuilder, Trim};
use serde_json::Value;

use crate::columns::resolve_columns;
use crate::error::Result;

/// Parses trade rows from CSV text.
///
/// The first row is the header. Rows with at most one field (this includes
/// blank lines) are dropped. Short rows are padded with empty cells and extra
/// cells beyond the header are ignored, so every record lines up with the header.
pub fn trades_from_csv(text: &str) -> Result<TradeTable> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(text.as_bytes());

    let header: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if header.iter().all(|h| h.is_empty()) {
        return Ok(TradeTable::default());
    }

    let columns = resolve_columns(&header);
    let mut records = Vec::new();
    let mut dropped = 0usize;

    for row in reader.records() {
        let row = row?;
        if row.len() <= 1 {
            dropped += 1;
            continue;
        }
        let mut cells: Vec<String> = row.iter().take(header.len()).map(str::to_string).collect();
        cells.resize(header.len(), String::new());
        records.push(TradeRecord::from_cells(cells, &columns));
    }

    tracing::debug!(
        rows = records.len(),
        dropped,
        columns = header.len(),
        "Parsed trades CSV."
    );
    Ok(TradeTable::new(header, columns, records))
}

/// Builds a trade table from a JSON array of row objects.
///
/// Column order is the key order of the first object. Later rows are read by
/// key; keys the first row lacks are not shown. Non-object elements are skipped.
pub fn trades_from_json(rows: &[Value]) -> TradeTable {
    let Some(first) = rows.iter().find_map(Value::as_object) else {
        return TradeTable::default();
    };

    let header: Vec<String> = first.keys().cloned().collect();
    let columns = resolve_columns(&header);

    let records: Vec<TradeRecord> = rows
        .iter()
        .filter_map(Value::as_object)
        .map(|row| {
            let cells = header
                .iter()
                .map(|key| row.get(key).map(cell_text).unwrap_or_default())
                .collect();
            TradeRecord::from_cells(cells, &columns)
        })
        .collect();

    let skipped = rows.len() - records.len();
    if skipped > 0 {
        tracing::warn!(skipped, "Skipped non-object trade rows.");
    }
    TradeTable::new(header, columns, records)
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{Outcome, Side};
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_csv_canonical_fields() {
        let table = trades_from_csv("Date,Position,P&L\nd1,long,100\nd2,short,-40\nd3,long,0\n").unwrap();

        assert_eq!(table.header(), &["Date", "Position", "P&L"]);
        assert_eq!(table.len(), 3);
        let outcomes: Vec<Outcome> = table.records().iter().map(|r| r.outcome()).collect();
        assert_eq!(outcomes, vec![Outcome::Win, Outcome::Loss, Outcome::Breakeven]);
        assert_eq!(table.records()[1].side(), Some(Side::Short));
        assert_eq!(table.records()[2].timestamp(), "d3");
    }

    #[test]
    fn test_csv_drops_single_field_rows_and_pads_short_ones() {
        let text = "Date,Position,P&L,Note\n\nstray\nd1,long\nd2,short,5,ok,extra\n";
        let table = trades_from_csv(text).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.records()[0].cells(), &["d1", "long", "", ""]);
        assert_eq!(table.records()[0].pnl(), None);
        assert_eq!(table.records()[1].cells(), &["d2", "short", "5", "ok"]);
        assert_eq!(table.records()[1].pnl(), Some(dec!(5)));
    }

    #[test]
    fn test_csv_empty_input_is_empty_table() {
        assert!(trades_from_csv("").unwrap().is_empty());
        assert!(trades_from_csv("Date,P&L\n").unwrap().is_empty());
    }

    #[test]
    fn test_json_keeps_first_row_key_order() {
        let rows = vec![
            json!({"exit_time": "2024-03-01", "side": "SHORT", "pnl": -12.5, "note": null}),
            json!({"pnl": "30", "side": "long", "extra": 1}),
            json!("not a row"),
        ];
        let table = trades_from_json(&rows);

        assert_eq!(table.header(), &["exit_time", "side", "pnl", "note"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.records()[0].cells(), &["2024-03-01", "SHORT", "-12.5", ""]);
        assert_eq!(table.records()[0].pnl(), Some(dec!(-12.5)));
        assert_eq!(table.records()[1].cell(0), "");
        assert_eq!(table.records()[1].side(), Some(Side::Long));
    }

    #[test]
    fn test_json_without_objects_is_empty() {
        assert!(trades_from_json(&[]).is_empty());
        assert!(trades_from_json(&[json!(1), json!(null)]).is_empty());
    }
}
