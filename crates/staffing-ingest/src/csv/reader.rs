//! CSV text parsing into a [`Table`] of text cells.

use csv::ReaderBuilder;
use tracing::trace;

use crate::error::Result;
use crate::table::{Cell, Table};

use super::header::{normalize_cell, normalize_header};

/// Parses comma-separated text with a header row.
///
/// - A leading UTF-8 byte-order mark is stripped.
/// - Empty or whitespace-only input yields an empty table, not an error.
/// - Rows whose cells are all empty are skipped.
/// - Short rows are padded with empty cells; extra trailing cells are dropped.
pub fn parse(raw: &str) -> Result<Table> {
    let text = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    if text.trim().is_empty() {
        return Ok(Table::default());
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut table: Option<Table> = None;
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        match table.as_mut() {
            None => {
                table = Some(Table::new(record.iter().map(normalize_header)));
            }
            Some(table) => {
                let cells = record
                    .iter()
                    .map(|value| Cell::Text(normalize_cell(value)))
                    .collect();
                table.push_row(cells);
            }
        }
    }

    let table = table.unwrap_or_default();
    trace!(
        columns = table.columns().len(),
        rows = table.len(),
        "parsed csv text"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_input() {
        assert!(parse("").unwrap().is_blank());
        assert!(parse("  \n\n ").unwrap().is_blank());
        assert!(parse("\u{feff}").unwrap().is_blank());
    }

    #[test]
    fn test_parse_normalizes_headers() {
        let table = parse("Servicio, Camas Utiles \nUCI,12\n").unwrap();
        assert_eq!(table.columns(), ["Servicio", "Camas_Utiles"]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.row(0).unwrap().text("Camas_Utiles"), "12");
    }

    #[test]
    fn test_parse_strips_bom() {
        let table = parse("\u{feff}ID,Nombre\n1,Ana\n").unwrap();
        assert_eq!(table.columns()[0], "ID");
    }

    #[test]
    fn test_parse_skips_blank_rows_and_pads_short_ones() {
        let table = parse("A,B,C\n1,2,3\n,,\n4\n").unwrap();
        assert_eq!(table.len(), 2);
        let row = table.row(1).unwrap();
        assert_eq!(row.text("A"), "4");
        assert_eq!(row.text("C"), "");
    }

    #[test]
    fn test_parse_quoted_fields() {
        let table = parse("Nombre,Servicio\n\"López, Ana\",UCI\n").unwrap();
        assert_eq!(table.row(0).unwrap().text("Nombre"), "López, Ana");
    }

    #[test]
    fn test_parse_header_only() {
        let table = parse("ID,Nombre\n").unwrap();
        assert_eq!(table.columns().len(), 2);
        assert!(table.is_empty());
        assert!(!table.is_blank());
    }
}
