//! Staffing table ingestion.
//!
//! This crate turns the CSV text exchanged with the hospital file store into
//! typed tables and back.
//!
//! # Pipeline
//!
//! 1. [`parse`]: CSV text into a [`Table`] of text cells, with header names
//!    trimmed and internal spaces replaced by underscores.
//! 2. [`TableKind::prepare`]: per-kind post-processing (historical column
//!    spellings renamed, required columns validated, boolean and numeric
//!    columns coerced).
//! 3. `decode_*`: typed records from a prepared table; `encode_*` builds a
//!    table for writing, and [`to_csv`] serializes it.
//!
//! # Example
//!
//! ```ignore
//! use staffing_ingest::{TableKind, decode_staff, parse};
//!
//! let table = TableKind::Staff.prepare(parse(&contents)?)?;
//! let staff = decode_staff(&table)?;
//! ```

mod coerce;
mod csv;
mod error;
mod kind;
mod records;
mod table;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Text ===
pub use self::csv::{normalize_header, parse, to_csv};

// === Table Kinds ===
pub use kind::TableKind;

// === Tables ===
pub use table::{Cell, Row, Table};

// === Coercion ===
pub use coerce::{format_numeric, parse_bool, parse_number};

// === Typed Records ===
pub use records::{
    decode_patients, decode_services, decode_staff, decode_transfers, decode_users,
    encode_patients, encode_services, encode_staff, encode_transfers, encode_users,
};
