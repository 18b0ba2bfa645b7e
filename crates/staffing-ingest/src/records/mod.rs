//! Typed record codecs for prepared tables.
//!
//! `decode_*` functions expect a table that went through
//! [`crate::TableKind::prepare`] for the matching kind. `encode_*` functions
//! produce tables in the canonical column layout, ready for [`crate::to_csv`].

mod patients;
mod services;
mod staff;
mod transfers;
mod users;

use std::collections::BTreeSet;

pub use patients::{decode_patients, encode_patients};
pub use services::{decode_services, encode_services};
pub use staff::{decode_staff, encode_staff};
pub use transfers::{decode_transfers, encode_transfers};
pub use users::{decode_users, encode_users};

use crate::error::{IngestError, Result};
use crate::kind::TableKind;
use crate::table::Row;

/// Parses an integer identifier. Accepts `"1001"` and `"1001.0"` (as written
/// by spreadsheet exports).
fn parse_id(row: &Row<'_>, kind: TableKind, column: &'static str) -> Result<u32> {
    let text = row.text(column);
    let parsed = text.parse::<u32>().ok().or_else(|| {
        text.parse::<f64>()
            .ok()
            .filter(|v| v.fract() == 0.0 && *v >= 0.0 && *v <= f64::from(u32::MAX))
            .map(|v| v as u32)
    });
    parsed.ok_or_else(|| IngestError::InvalidValue {
        table: kind.name(),
        column,
        line: row.line(),
        value: text,
    })
}

/// Tracks keys that must be unique within one table.
struct UniqueKeys {
    kind: TableKind,
    column: &'static str,
    seen: BTreeSet<String>,
}

impl UniqueKeys {
    fn new(kind: TableKind, column: &'static str) -> Self {
        Self {
            kind,
            column,
            seen: BTreeSet::new(),
        }
    }

    fn insert(&mut self, key: &str) -> Result<()> {
        if self.seen.insert(key.trim().to_lowercase()) {
            Ok(())
        } else {
            Err(IngestError::DuplicateKey {
                table: self.kind.name(),
                column: self.column,
                key: key.to_string(),
            })
        }
    }
}
