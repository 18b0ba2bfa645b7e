use staffing_model::{StaffId, StaffMember};

use crate::error::Result;
use crate::kind::TableKind;
use crate::table::{Cell, Table};

use super::{UniqueKeys, parse_id};

const COLUMNS: [&str; 7] = [
    "ID",
    "Nombre",
    "Rol",
    "Servicio",
    "Turno",
    "Disponible",
    "Presente",
];

/// Decodes the staff table. Identifiers must be unique non-negative integers.
pub fn decode_staff(table: &Table) -> Result<Vec<StaffMember>> {
    let kind = TableKind::Staff;
    let mut keys = UniqueKeys::new(kind, "ID");
    let mut staff = Vec::with_capacity(table.len());
    for row in table.rows() {
        if row.is_blank() {
            continue;
        }
        let id = parse_id(&row, kind, "ID")?;
        keys.insert(&id.to_string())?;
        staff.push(StaffMember {
            id: StaffId(id),
            name: row.text("Nombre"),
            role: row.text("Rol"),
            service: row.text("Servicio"),
            shift: row.text("Turno"),
            available: row.flag("Disponible"),
            present: row.flag("Presente"),
        });
    }
    Ok(staff)
}

pub fn encode_staff(staff: &[StaffMember]) -> Table {
    let mut table = Table::new(COLUMNS);
    for member in staff {
        table.push_row(vec![
            Cell::text(member.id.to_string()),
            Cell::text(member.name.as_str()),
            Cell::text(member.role.as_str()),
            Cell::text(member.service.as_str()),
            Cell::text(member.shift.as_str()),
            Cell::Bool(member.available),
            Cell::Bool(member.present),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv::parse;
    use crate::error::IngestError;

    fn prepared(text: &str) -> Table {
        TableKind::Staff.prepare(parse(text).unwrap()).unwrap()
    }

    #[test]
    fn test_decode_staff_with_historical_role_column() {
        let table = prepared(
            "ID,Nombre,Tipo,Servicio,Turno,Disponible,Presente\n\
             1001,Ana López,especialista,Urgencias,Mañana,True,True\n\
             1002.0,Carlos Ruiz,general-a,UCI,N,0,1\n",
        );
        let staff = decode_staff(&table).unwrap();
        assert_eq!(staff.len(), 2);
        assert_eq!(staff[0].id, StaffId(1001));
        assert_eq!(staff[0].role, "especialista");
        assert!(staff[0].available && staff[0].present);
        assert_eq!(staff[1].id, StaffId(1002));
        assert!(!staff[1].available);
        assert!(staff[1].present);
    }

    #[test]
    fn test_decode_staff_invalid_id() {
        let table = prepared("ID,Nombre,Servicio,Turno,Disponible,Presente\nA1,Ana,UCI,M,1,1\n");
        let err = decode_staff(&table).unwrap_err();
        assert!(matches!(
            err,
            IngestError::InvalidValue { column: "ID", line: 2, .. }
        ));
    }

    #[test]
    fn test_decode_staff_duplicate_id() {
        let table = prepared(
            "ID,Nombre,Servicio,Turno,Disponible,Presente\n7,Ana,UCI,M,1,1\n7,Eva,UCI,T,1,1\n",
        );
        assert!(matches!(
            decode_staff(&table).unwrap_err(),
            IngestError::DuplicateKey { column: "ID", .. }
        ));
    }
}
