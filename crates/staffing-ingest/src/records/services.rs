use staffing_model::{Service, ShiftQuota};
use tracing::warn;

use crate::coerce::to_count;
use crate::error::Result;
use crate::kind::TableKind;
use crate::table::{Cell, Table};

use super::UniqueKeys;

const COLUMNS: [&str; 6] = [
    "Servicio",
    "Camas_Utiles",
    "Plantilla_Manana",
    "Plantilla_Tarde",
    "Plantilla_Noche",
    "Turno_Actual",
];

/// Decodes the services table. Rows without a service name are skipped.
pub fn decode_services(table: &Table) -> Result<Vec<Service>> {
    let kind = TableKind::Services;
    let mut keys = UniqueKeys::new(kind, "Servicio");
    let mut services = Vec::with_capacity(table.len());
    for row in table.rows() {
        let name = row.text("Servicio");
        if name.is_empty() {
            if !row.is_blank() {
                warn!(table = kind.name(), line = row.line(), "row without service name skipped");
            }
            continue;
        }
        keys.insert(&name)?;
        let current_shift = Some(row.text("Turno_Actual")).filter(|value| !value.is_empty());
        services.push(Service {
            name,
            beds: to_count(row.number("Camas_Utiles")),
            quota: ShiftQuota::new(
                to_count(row.number("Plantilla_Manana")),
                to_count(row.number("Plantilla_Tarde")),
                to_count(row.number("Plantilla_Noche")),
            ),
            current_shift,
        });
    }
    Ok(services)
}

pub fn encode_services(services: &[Service]) -> Table {
    let mut table = Table::new(COLUMNS);
    for service in services {
        table.push_row(vec![
            Cell::text(service.name.as_str()),
            Cell::Number(f64::from(service.beds)),
            Cell::Number(f64::from(service.quota.morning)),
            Cell::Number(f64::from(service.quota.afternoon)),
            Cell::Number(f64::from(service.quota.night)),
            Cell::text(service.current_shift.clone().unwrap_or_default()),
        ]);
    }
    table
}
