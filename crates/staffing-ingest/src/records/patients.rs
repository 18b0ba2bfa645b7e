use staffing_model::{PatientCensus, service_key};
use tracing::debug;

use crate::coerce::to_count;
use crate::error::Result;
use crate::kind::TableKind;
use crate::table::{Cell, Table};

use super::UniqueKeys;

const COLUMNS: [&str; 4] = [
    "Servicio",
    "Pacientes_Actuales",
    "Pacientes_Esperados",
    "Prioridad",
];

/// Decodes the patient file into one census entry per service.
///
/// Two layouts are accepted. A snapshot carries `Pacientes_Actuales` and has
/// one row per service. A roster has one row per patient and is grouped by
/// `Servicio` and counted, in order of first appearance.
pub fn decode_patients(table: &Table) -> Result<Vec<PatientCensus>> {
    if table.has_column("Pacientes_Actuales") {
        decode_snapshot(table)
    } else {
        Ok(group_roster(table))
    }
}

fn decode_snapshot(table: &Table) -> Result<Vec<PatientCensus>> {
    let mut keys = UniqueKeys::new(TableKind::Patients, "Servicio");
    let mut census = Vec::with_capacity(table.len());
    for row in table.rows() {
        let service = row.text("Servicio");
        if service.is_empty() {
            continue;
        }
        keys.insert(&service)?;
        census.push(PatientCensus {
            service,
            current: to_count(row.number("Pacientes_Actuales")),
            expected: to_count(row.number("Pacientes_Esperados")),
            priority: row.text("Prioridad"),
        });
    }
    Ok(census)
}

fn group_roster(table: &Table) -> Vec<PatientCensus> {
    let mut census: Vec<PatientCensus> = Vec::new();
    for row in table.rows() {
        let service = row.text("Servicio");
        if service.is_empty() {
            continue;
        }
        let key = service_key(&service);
        match census
            .iter_mut()
            .find(|entry| service_key(&entry.service) == key)
        {
            Some(entry) => entry.current += 1,
            None => census.push(PatientCensus::new(service, 1)),
        }
    }
    debug!(
        patients = table.len(),
        services = census.len(),
        "grouped patient roster"
    );
    census
}

/// Encodes census entries in the snapshot layout.
pub fn encode_patients(census: &[PatientCensus]) -> Table {
    let mut table = Table::new(COLUMNS);
    for entry in census {
        table.push_row(vec![
            Cell::text(entry.service.as_str()),
            Cell::Number(f64::from(entry.current)),
            Cell::Number(f64::from(entry.expected)),
            Cell::text(entry.priority.as_str()),
        ]);
    }
    table
}
