//! Table-level reads and writes over a [`RemoteStore`].

use std::time::Instant;

use staffing_ingest::{Table, TableKind, parse, to_csv};
use tracing::info;

use crate::config::FileNames;
use crate::error::{ExchangeError, Result};
use crate::retry::RetryPolicy;
use crate::store::RemoteStore;

/// Reads and writes whole staffing tables, retrying transient failures.
pub struct TableClient<S> {
    store: S,
    policy: RetryPolicy,
    files: FileNames,
}

impl<S: RemoteStore> TableClient<S> {
    /// Creates a client with the default retry policy and file names.
    pub fn new(store: S) -> Self {
        Self {
            store,
            policy: RetryPolicy::default(),
            files: FileNames::default(),
        }
    }

    #[must_use]
    pub fn with_retry(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_files(mut self, files: FileNames) -> Self {
        self.files = files;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn file_name(&self, kind: TableKind) -> &str {
        self.files.get(kind)
    }

    /// Fetches, decodes, parses and prepares the table for `kind`.
    pub fn read(&mut self, kind: TableKind) -> Result<Table> {
        let file = self.files.get(kind).to_string();
        let started = Instant::now();
        let bytes = self.policy.run(&file, |_| self.store.fetch(&file))?;
        let text = decode_text(&file, bytes)?;
        let table = parse(&text)
            .and_then(|table| kind.prepare(table))
            .map_err(|source| ExchangeError::Ingest {
                file: file.clone(),
                source,
            })?;
        info!(
            table = kind.name(),
            file = %file,
            rows = table.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "table loaded"
        );
        Ok(table)
    }

    /// Serializes `table` and overwrites the file for `kind`.
    pub fn write(&mut self, kind: TableKind, table: &Table) -> Result<()> {
        let file = self.files.get(kind).to_string();
        let started = Instant::now();
        let text = to_csv(table).map_err(|source| ExchangeError::Ingest {
            file: file.clone(),
            source,
        })?;
        self.policy
            .run(&file, |_| self.store.upload(&file, text.as_bytes()))?;
        info!(
            table = kind.name(),
            file = %file,
            rows = table.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "table written"
        );
        Ok(())
    }
}

/// Decodes file contents as UTF-8, dropping a leading byte-order mark.
fn decode_text(file: &str, bytes: Vec<u8>) -> Result<String> {
    let text = String::from_utf8(bytes).map_err(|_| ExchangeError::Encoding {
        file: file.to_string(),
    })?;
    Ok(match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    })
}
