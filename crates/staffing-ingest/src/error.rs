//! Error types for staffing table ingestion.

use thiserror::Error;

/// Errors that can occur while parsing, validating or decoding a table.
#[derive(Debug, Error)]
pub enum IngestError {
    // === CSV Errors ===
    /// The CSV text could not be tokenized.
    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Serializing a table to CSV text failed.
    #[error("failed to write CSV for {table}: {message}")]
    Write { table: String, message: String },

    // === Validation Errors ===
    /// A column the table kind cannot do without is absent.
    #[error("required column '{column}' not found in {table}")]
    MissingColumn {
        table: &'static str,
        column: &'static str,
    },

    /// A cell could not be decoded into its typed field.
    #[error("invalid {column} value '{value}' in {table} line {line}")]
    InvalidValue {
        table: &'static str,
        column: &'static str,
        line: usize,
        value: String,
    },

    /// Two records share a key that must be unique.
    #[error("duplicate {column} '{key}' in {table}")]
    DuplicateKey {
        table: &'static str,
        column: &'static str,
        key: String,
    },
}

impl IngestError {
    /// Name of the column the error points at, when there is one.
    pub fn column(&self) -> Option<&str> {
        match self {
            Self::MissingColumn { column, .. }
            | Self::InvalidValue { column, .. }
            | Self::DuplicateKey { column, .. } => Some(column),
            Self::Csv(_) | Self::Write { .. } => None,
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
