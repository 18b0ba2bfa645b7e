use staffing_model::UserCredential;

use crate::error::Result;
use crate::kind::TableKind;
use crate::table::{Cell, Table};

use super::UniqueKeys;

pub fn decode_users(table: &Table) -> Result<Vec<UserCredential>> {
    let mut keys = UniqueKeys::new(TableKind::Users, "Servicio");
    let mut users = Vec::with_capacity(table.len());
    for row in table.rows() {
        let service = row.text("Servicio");
        if service.is_empty() {
            continue;
        }
        keys.insert(&service)?;
        users.push(UserCredential {
            service,
            password_hash: row.text("Password"),
        });
    }
    Ok(users)
}

pub fn encode_users(users: &[UserCredential]) -> Table {
    let mut table = Table::new(["Servicio", "Password"]);
    for user in users {
        table.push_row(vec![
            Cell::text(user.service.as_str()),
            Cell::text(user.password_hash.as_str()),
        ]);
    }
    table
}
