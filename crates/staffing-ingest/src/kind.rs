//! Per-table-kind column rules and post-processing.

use std::fmt;

use tracing::{debug, warn};

use crate::coerce::{parse_bool, parse_number};
use crate::error::{IngestError, Result};
use crate::table::{Cell, Table};

/// The logical tables kept in the remote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TableKind {
    /// `servicios.csv`
    Services,
    /// `enfermeras.csv`
    Staff,
    /// `pacientes.csv`
    Patients,
    /// `transferencias.csv`
    Transfers,
    /// `usuarios.csv`
    Users,
}

impl TableKind {
    pub const ALL: [TableKind; 5] = [
        TableKind::Services,
        TableKind::Staff,
        TableKind::Patients,
        TableKind::Transfers,
        TableKind::Users,
    ];

    /// Logical table name, also the key in the configured file map.
    pub const fn name(&self) -> &'static str {
        match self {
            TableKind::Services => "servicios",
            TableKind::Staff => "enfermeras",
            TableKind::Patients => "pacientes",
            TableKind::Transfers => "transferencias",
            TableKind::Users => "usuarios",
        }
    }

    pub const fn default_file_name(&self) -> &'static str {
        match self {
            TableKind::Services => "servicios.csv",
            TableKind::Staff => "enfermeras.csv",
            TableKind::Patients => "pacientes.csv",
            TableKind::Transfers => "transferencias.csv",
            TableKind::Users => "usuarios.csv",
        }
    }

    /// Columns whose absence is a validation failure.
    pub const fn required_columns(&self) -> &'static [&'static str] {
        match self {
            TableKind::Services => &[
                "Servicio",
                "Plantilla_Manana",
                "Plantilla_Tarde",
                "Plantilla_Noche",
            ],
            TableKind::Staff => &[
                "ID",
                "Nombre",
                "Servicio",
                "Turno",
                "Disponible",
                "Presente",
            ],
            TableKind::Patients => &["Servicio"],
            TableKind::Transfers => &[
                "ID_Enfermera",
                "Servicio_Origen",
                "Servicio_Destino",
                "Estado",
                "Fecha_Oferta",
            ],
            TableKind::Users => &["Servicio", "Password"],
        }
    }

    /// Historical spellings, as `(alias, canonical)` pairs.
    pub const fn aliases(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            TableKind::Services => &[
                ("Plantilla_Mañana", "Plantilla_Manana"),
                ("Camas_Útiles", "Camas_Utiles"),
                ("Turno", "Turno_Actual"),
            ],
            TableKind::Staff => &[("Tipo", "Rol")],
            TableKind::Patients => &[],
            TableKind::Transfers => &[
                ("Tumo_Origen", "Turno_Origen"),
                ("Tumo_Destino", "Turno_Destino"),
            ],
            TableKind::Users => &[("Contraseña", "Password")],
        }
    }

    pub const fn boolean_columns(&self) -> &'static [&'static str] {
        match self {
            TableKind::Staff => &["Disponible", "Presente"],
            _ => &[],
        }
    }

    pub const fn numeric_columns(&self) -> &'static [&'static str] {
        match self {
            TableKind::Services => &[
                "Camas_Utiles",
                "Plantilla_Manana",
                "Plantilla_Tarde",
                "Plantilla_Noche",
            ],
            TableKind::Patients => &["Pacientes_Actuales", "Pacientes_Esperados"],
            _ => &[],
        }
    }

    /// Applies the kind's post-processing to a freshly parsed table.
    ///
    /// Steps run in order: alias renames, required-column validation,
    /// boolean coercion, numeric coercion. A blank table (empty input) is
    /// returned unchanged.
    pub fn prepare(&self, mut table: Table) -> Result<Table> {
        if table.is_blank() {
            return Ok(table);
        }

        for &(alias, canonical) in self.aliases() {
            if table.has_column(alias) && !table.has_column(canonical) {
                table.rename_column(alias, canonical);
                debug!(table = self.name(), alias, canonical, "renamed column");
            }
        }

        for &column in self.required_columns() {
            if !table.has_column(column) {
                return Err(IngestError::MissingColumn {
                    table: self.name(),
                    column,
                });
            }
        }

        for &column in self.boolean_columns() {
            let Some(idx) = table.column_index(column) else {
                continue;
            };
            let name = self.name();
            table.map_column(idx, |row, cell| {
                let text = cell.as_text();
                let value = parse_bool(&text).unwrap_or_else(|| {
                    warn!(
                        table = name,
                        column,
                        line = row + 2,
                        value = %text,
                        "unrecognized boolean, treating as false"
                    );
                    false
                });
                Cell::Bool(value)
            });
        }

        for &column in self.numeric_columns() {
            if let Some(idx) = table.column_index(column) {
                table.map_column(idx, |_, cell| Cell::Number(parse_number(&cell.as_text())));
            }
        }

        Ok(table)
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv::parse;

    #[test]
    fn test_prepare_blank_table_is_not_an_error() {
        for kind in TableKind::ALL {
            let table = kind.prepare(parse("").unwrap()).unwrap();
            assert!(table.is_blank());
        }
    }

    #[test]
    fn test_prepare_reports_missing_column_by_name() {
        let table = parse("ID,Nombre,Servicio,Turno,Disponible\n1,Ana,UCI,M,1\n").unwrap();
        let err = TableKind::Staff.prepare(table).unwrap_err();
        assert!(matches!(
            err,
            IngestError::MissingColumn {
                table: "enfermeras",
                column: "Presente"
            }
        ));
    }

    #[test]
    fn test_prepare_renames_historical_spelling() {
        let table = parse(
            "ID_Enfermera,Servicio_Origen,Tumo_Origen,Servicio_Destino,Estado,Fecha_Oferta\n\
             1,UCI,M,Planta,Pendiente,2024-01-01 08:00:00\n",
        )
        .unwrap();
        let table = TableKind::Transfers.prepare(table).unwrap();
        assert!(table.has_column("Turno_Origen"));
        assert!(!table.has_column("Tumo_Origen"));
    }

    #[test]
    fn test_prepare_keeps_canonical_when_both_spellings_present() {
        let table = parse("ID,Nombre,Servicio,Turno,Disponible,Presente,Tipo,Rol\n").unwrap();
        let table = TableKind::Staff.prepare(table).unwrap();
        assert!(table.has_column("Tipo"));
        assert!(table.has_column("Rol"));
    }

    #[test]
    fn test_prepare_coerces_booleans_and_numbers() {
        let staff = parse("ID,Nombre,Servicio,Turno,Disponible,Presente\n1,Ana,UCI,M,Sí,tal vez\n")
            .unwrap();
        let staff = TableKind::Staff.prepare(staff).unwrap();
        let row = staff.row(0).unwrap();
        assert_eq!(row.get("Disponible"), Some(&Cell::Bool(true)));
        assert_eq!(row.get("Presente"), Some(&Cell::Bool(false)));

        let services = parse(
            "Servicio,Camas Utiles,Plantilla_Manana,Plantilla_Tarde,Plantilla_Noche\nUCI,doce,4,3,2\n",
        )
        .unwrap();
        let services = TableKind::Services.prepare(services).unwrap();
        let row = services.row(0).unwrap();
        assert_eq!(row.get("Camas_Utiles"), Some(&Cell::Number(0.0)));
        assert_eq!(row.get("Plantilla_Manana"), Some(&Cell::Number(4.0)));
    }
}
