use chrono::{NaiveDate, NaiveDateTime};
use staffing_model::{StaffId, TIMESTAMP_FORMAT, TransferId, TransferRecord, TransferStatus};

use crate::error::{IngestError, Result};
use crate::kind::TableKind;
use crate::table::{Cell, Row, Table};

use super::{UniqueKeys, parse_id};

const COLUMNS: [&str; 10] = [
    "ID_Transferencia",
    "ID_Enfermera",
    "Nombre_Enfermera",
    "Servicio_Origen",
    "Turno_Origen",
    "Servicio_Destino",
    "Turno_Destino",
    "Estado",
    "Fecha_Oferta",
    "Fecha_Aceptacion",
];

/// Alternative timestamp layouts seen in older exports.
const FALLBACK_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Decodes the transfer log.
///
/// Files written before `ID_Transferencia` existed get positional ids: the
/// one-based row number.
pub fn decode_transfers(table: &Table) -> Result<Vec<TransferRecord>> {
    let kind = TableKind::Transfers;
    let has_ids = table.has_column("ID_Transferencia");
    let mut keys = UniqueKeys::new(kind, "ID_Transferencia");
    let mut records = Vec::with_capacity(table.len());
    for row in table.rows() {
        if row.is_blank() {
            continue;
        }
        let id = if has_ids {
            parse_id(&row, kind, "ID_Transferencia")?
        } else {
            u32::try_from(row.index() + 1).unwrap_or(u32::MAX)
        };
        keys.insert(&id.to_string())?;

        let status_text = row.text("Estado");
        let status = status_text
            .parse::<TransferStatus>()
            .map_err(|_| invalid(&row, "Estado", status_text.clone()))?;

        let offered_at = parse_timestamp(&row, "Fecha_Oferta")?
            .ok_or_else(|| invalid(&row, "Fecha_Oferta", String::new()))?;
        let accepted_at = parse_timestamp(&row, "Fecha_Aceptacion")?;

        records.push(TransferRecord {
            id: TransferId(id),
            staff_id: StaffId(parse_id(&row, kind, "ID_Enfermera")?),
            staff_name: row.text("Nombre_Enfermera"),
            origin_service: row.text("Servicio_Origen"),
            origin_shift: row.text("Turno_Origen"),
            destination_service: row.text("Servicio_Destino"),
            destination_shift: row.text("Turno_Destino"),
            status,
            offered_at,
            accepted_at,
        });
    }
    Ok(records)
}

pub fn encode_transfers(records: &[TransferRecord]) -> Table {
    let mut table = Table::new(COLUMNS);
    for record in records {
        table.push_row(vec![
            Cell::text(record.id.to_string()),
            Cell::text(record.staff_id.to_string()),
            Cell::text(record.staff_name.as_str()),
            Cell::text(record.origin_service.as_str()),
            Cell::text(record.origin_shift.as_str()),
            Cell::text(record.destination_service.as_str()),
            Cell::text(record.destination_shift.as_str()),
            Cell::text(record.status.label()),
            Cell::text(record.offered_at.format(TIMESTAMP_FORMAT).to_string()),
            Cell::text(
                record
                    .accepted_at
                    .map(|at| at.format(TIMESTAMP_FORMAT).to_string())
                    .unwrap_or_default(),
            ),
        ]);
    }
    table
}

/// Parses an optional timestamp column. Empty cells are `None`.
fn parse_timestamp(row: &Row<'_>, column: &'static str) -> Result<Option<NaiveDateTime>> {
    let text = row.text(column);
    if text.is_empty() || text.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    if let Ok(value) = NaiveDateTime::parse_from_str(&text, TIMESTAMP_FORMAT) {
        return Ok(Some(value));
    }
    for format in FALLBACK_FORMATS {
        if let Ok(value) = NaiveDateTime::parse_from_str(&text, format) {
            return Ok(Some(value));
        }
    }
    NaiveDate::parse_from_str(&text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(Some)
        .ok_or_else(|| invalid(row, column, text))
}

fn invalid(row: &Row<'_>, column: &'static str, value: String) -> IngestError {
    IngestError::InvalidValue {
        table: TableKind::Transfers.name(),
        column,
        line: row.line(),
        value,
    }
}
