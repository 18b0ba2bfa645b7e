//! CSV text serialization.

use csv::WriterBuilder;

use crate::error::{IngestError, Result};
use crate::table::Table;

/// Serializes a table to CSV text: a header row, then one line per record.
///
/// Numbers are written without trailing zeros and booleans as `True`/`False`.
/// A table without columns serializes to an empty string.
pub fn to_csv(table: &Table) -> Result<String> {
    if table.columns().is_empty() {
        return Ok(String::new());
    }

    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(table.columns())?;
    for row in table.raw_rows() {
        writer.write_record(row.iter().map(|cell| cell.as_text().into_owned()))?;
    }
    let bytes = writer.into_inner().map_err(|err| IngestError::Write {
        table: table.columns().join(","),
        message: err.to_string(),
    })?;
    String::from_utf8(bytes).map_err(|err| IngestError::Write {
        table: table.columns().join(","),
        message: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv::parse;
    use crate::table::Cell;

    #[test]
    fn test_to_csv_formats_cells() {
        let mut table = Table::new(["Servicio", "Camas_Utiles", "Activo"]);
        table.push_row(vec![
            Cell::text("UCI"),
            Cell::Number(12.0),
            Cell::Bool(true),
        ]);
        let text = to_csv(&table).unwrap();
        assert_eq!(text, "Servicio,Camas_Utiles,Activo\nUCI,12,True\n");
    }

    #[test]
    fn test_to_csv_quotes_commas() {
        let mut table = Table::new(["Nombre"]);
        table.push_row(vec![Cell::text("López, Ana")]);
        let text = to_csv(&table).unwrap();
        assert_eq!(text, "Nombre\n\"López, Ana\"\n");
        assert_eq!(parse(&text).unwrap(), table);
    }

    #[test]
    fn test_to_csv_empty_table() {
        assert_eq!(to_csv(&Table::default()).unwrap(), "");
    }
}
