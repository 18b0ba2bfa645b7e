//! Client behaviour against scripted and on-disk stores.

use std::collections::BTreeMap;
use std::fs;
use std::time::Duration;

use staffing_exchange::{
    ExchangeError, FileNames, LocalStore, RemoteStore, Result, RetryPolicy, TableClient,
};
use staffing_ingest::{Cell, IngestError, TableKind};

/// A store that fails a set number of times before serving its files.
#[derive(Default)]
struct FlakyStore {
    files: BTreeMap<String, Vec<u8>>,
    failures_left: u32,
    fetches: u32,
    uploads: u32,
}

impl FlakyStore {
    fn with_file(mut self, name: &str, contents: &str) -> Self {
        self.files.insert(name.to_string(), contents.as_bytes().to_vec());
        self
    }

    fn failing(mut self, times: u32) -> Self {
        self.failures_left = times;
        self
    }

    fn transient(&mut self) -> Result<()> {
        if self.failures_left > 0 {
            self.failures_left -= 1;
            return Err(ExchangeError::Connection("connection reset".to_string()));
        }
        Ok(())
    }
}

impl RemoteStore for FlakyStore {
    fn location(&self) -> String {
        "memory".to_string()
    }

    fn fetch(&mut self, file: &str) -> Result<Vec<u8>> {
        self.fetches += 1;
        self.transient()?;
        self.files
            .get(file)
            .cloned()
            .ok_or_else(|| ExchangeError::NotFound {
                file: file.to_string(),
            })
    }

    fn upload(&mut self, file: &str, contents: &[u8]) -> Result<()> {
        self.uploads += 1;
        self.transient()?;
        self.files.insert(file.to_string(), contents.to_vec());
        Ok(())
    }
}

const SERVICES: &str = "Servicio,Plantilla_Manana,Plantilla_Tarde,Plantilla_Noche\n\
                        Urgencias,4,3,2\n";

fn client(store: FlakyStore) -> TableClient<FlakyStore> {
    TableClient::new(store).with_retry(RetryPolicy::new(3, Duration::ZERO))
}

#[test]
fn test_read_succeeds_after_two_connection_failures() {
    let store = FlakyStore::default()
        .with_file("servicios.csv", SERVICES)
        .failing(2);
    let mut client = client(store);
    let table = client.read(TableKind::Services).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(client.store().fetches, 3);
}

#[test]
fn test_read_gives_up_after_max_attempts() {
    let store = FlakyStore::default()
        .with_file("servicios.csv", SERVICES)
        .failing(10);
    let mut client = client(store);
    let err = client.read(TableKind::Services).unwrap_err();
    assert!(matches!(err, ExchangeError::Connection(_)));
    assert_eq!(client.store().fetches, 3);
}

#[test]
fn test_missing_file_is_attempted_once() {
    let mut client = client(FlakyStore::default());
    let err = client.read(TableKind::Staff).unwrap_err();
    assert!(matches!(err, ExchangeError::NotFound { ref file } if file == "enfermeras.csv"));
    assert_eq!(client.store().fetches, 1);
}

#[test]
fn test_empty_file_reads_as_blank_table() {
    let store = FlakyStore::default().with_file("transferencias.csv", "");
    let mut client = client(store);
    assert!(client.read(TableKind::Transfers).unwrap().is_blank());
}

#[test]
fn test_missing_column_is_reported_with_file_and_column() {
    let store = FlakyStore::default().with_file("servicios.csv", "Servicio\nUCI\n");
    let mut client = client(store);
    let err = client.read(TableKind::Services).unwrap_err();
    match err {
        ExchangeError::Ingest { file, source } => {
            assert_eq!(file, "servicios.csv");
            assert!(matches!(
                source,
                IngestError::MissingColumn {
                    column: "Plantilla_Manana",
                    ..
                }
            ));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_write_retries_and_overwrites() {
    let store = FlakyStore::default()
        .with_file("servicios.csv", "stale")
        .failing(1);
    let mut client = client(store);
    let mut table = staffing_ingest::Table::new(["Servicio", "Plantilla_Manana"]);
    table.push_row(vec![Cell::text("UCI"), Cell::Number(3.0)]);
    client.write(TableKind::Services, &table).unwrap();
    assert_eq!(client.store().uploads, 2);
    assert_eq!(
        client.store().files["servicios.csv"],
        b"Servicio,Plantilla_Manana\nUCI,3\n".to_vec()
    );
}

#[test]
fn test_local_store_round_trip_with_custom_file_names() {
    let dir = tempfile::tempdir().unwrap();
    let files = FileNames {
        servicios: "wards.csv".to_string(),
        ..FileNames::default()
    };
    fs::write(dir.path().join("wards.csv"), format!("\u{feff}{SERVICES}")).unwrap();

    let mut client = TableClient::new(LocalStore::new(dir.path())).with_files(files);
    let table = client.read(TableKind::Services).unwrap();
    assert_eq!(table.row(0).unwrap().text("Servicio"), "Urgencias");
    assert_eq!(table.row(0).unwrap().number("Plantilla_Manana"), 4.0);

    client.write(TableKind::Services, &table).unwrap();
    let written = fs::read_to_string(dir.path().join("wards.csv")).unwrap();
    assert_eq!(
        written,
        "Servicio,Plantilla_Manana,Plantilla_Tarde,Plantilla_Noche\nUrgencias,4,3,2\n"
    );
}

#[test]
fn test_local_store_missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = LocalStore::new(dir.path());
    assert!(matches!(
        store.fetch("usuarios.csv"),
        Err(ExchangeError::NotFound { .. })
    ));
}

#[test]
fn test_local_store_rejects_invalid_utf8() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("pacientes.csv"), [0x53u8, 0xff, 0x0a]).unwrap();
    let mut client = TableClient::new(LocalStore::new(dir.path()));
    assert!(matches!(
        client.read(TableKind::Patients),
        Err(ExchangeError::Encoding { .. })
    ));
}
