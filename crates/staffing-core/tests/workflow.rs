//! End-to-end transfer workflow against an on-disk store.

use std::fs;
use std::path::Path;
use std::time::Duration;

use staffing_core::{
    AppState, AuthError, CoverageStatus, OfferRequest, PasswordHash, StateError, TransferError,
};
use staffing_exchange::{ExchangeError, LocalStore, RemoteStore, RetryPolicy, TableClient};
use staffing_model::{Shift, StaffId, TransferId, TransferStatus};

const SERVICES: &str = "\
Servicio,Camas_Utiles,Plantilla_Manana,Plantilla_Tarde,Plantilla_Noche,Turno_Actual
Urgencias,20,4,3,2,Mañana
UCI,8,3,3,2,Mañana
";

const STAFF: &str = "\
ID,Nombre,Rol,Servicio,Turno,Disponible,Presente
1001,Ana López,Enfermera,Urgencias,Mañana,True,True
1002,Eva Ruiz,Enfermera,Urgencias,M,True,True
1003,Luis Gil,Auxiliar,Urgencias,mañana,False,True
1004,Sara Paz,Enfermera,Urgencias,Turno Mañana,True,True
1005,Iker Sanz,Enfermera,UCI,Noche,True,False
";

fn write_fixtures(dir: &Path) {
    fs::write(dir.join("servicios.csv"), SERVICES).unwrap();
    fs::write(dir.join("enfermeras.csv"), STAFF).unwrap();
    let users = format!(
        "Servicio,Password\nUrgencias,{}\nUCI,{}\n",
        PasswordHash::generate("urg-pass", 1_000),
        PasswordHash::generate("uci-pass", 1_000),
    );
    fs::write(dir.join("usuarios.csv"), users).unwrap();
}

fn state(dir: &Path) -> AppState<LocalStore> {
    AppState::new(TableClient::new(LocalStore::new(dir)))
}

#[test]
fn test_missing_optional_tables_load_empty() {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path());
    let mut state = state(dir.path());
    let snapshot = state.snapshot().unwrap();
    assert_eq!(snapshot.services.len(), 2);
    assert_eq!(snapshot.staff.len(), 5);
    assert!(snapshot.patients.is_empty());
    assert!(snapshot.transfers.is_empty());
}

#[test]
fn test_missing_staff_table_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("servicios.csv"), SERVICES).unwrap();
    let mut state = state(dir.path());
    let err = state.snapshot().unwrap_err();
    assert!(matches!(
        err,
        StateError::Exchange(ExchangeError::NotFound { ref file }) if file == "enfermeras.csv"
    ));
}

#[test]
fn test_coverage_scenario_balanced_morning() {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path());
    let mut state = state(dir.path());
    let report = state.snapshot().unwrap().coverage();
    let morning = report
        .rows()
        .iter()
        .find(|row| row.service == "Urgencias" && row.shift == Shift::Morning)
        .unwrap();
    assert_eq!(morning.required, 4);
    assert_eq!(morning.present, 4);
    assert_eq!(morning.status, CoverageStatus::Balanced);
    assert_eq!(report.rows().len(), 6);
}

#[test]
fn test_offer_accept_then_accept_again() {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path());
    let mut state = state(dir.path());

    let request = OfferRequest::new(StaffId(1001), "Urgencias", "UCI");
    let offered = state.offer(&request, "urg-pass").unwrap();
    assert_eq!(offered.id, TransferId(1));
    assert_eq!(offered.status, TransferStatus::Pending);
    let log = fs::read_to_string(dir.path().join("transferencias.csv")).unwrap();
    assert!(log.contains("Pendiente"));

    let (record, member) = state.accept(offered.id, "uci-pass").unwrap();
    assert_eq!(record.status, TransferStatus::Accepted);
    assert_eq!(member.service, "UCI");

    // A fresh session sees the persisted result.
    let mut fresh = self::state(dir.path());
    let snapshot = fresh.snapshot().unwrap();
    assert_eq!(snapshot.find_staff(StaffId(1001)).unwrap().service, "UCI");
    assert_eq!(
        snapshot.find_transfer(offered.id).unwrap().status,
        TransferStatus::Accepted
    );

    let staff_before = fs::read_to_string(dir.path().join("enfermeras.csv")).unwrap();
    let err = state.accept(offered.id, "uci-pass").unwrap_err();
    assert!(matches!(
        err,
        StateError::Transfer(TransferError::NotPending { .. })
    ));
    let staff_after = fs::read_to_string(dir.path().join("enfermeras.csv")).unwrap();
    assert_eq!(staff_before, staff_after);
}

#[test]
fn test_same_service_offer_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path());
    let mut state = state(dir.path());
    let request = OfferRequest::new(StaffId(1001), "Urgencias", "Urgencias");
    let err = state.offer(&request, "urg-pass").unwrap_err();
    assert!(matches!(
        err,
        StateError::Transfer(TransferError::SameService { .. })
    ));
    assert!(!dir.path().join("transferencias.csv").exists());
}

#[test]
fn test_wrong_credential_persists_nothing() {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path());
    let mut state = state(dir.path());

    let request = OfferRequest::new(StaffId(1001), "Urgencias", "UCI");
    let err = state.offer(&request, "uci-pass").unwrap_err();
    assert!(matches!(
        err,
        StateError::Auth(AuthError::InvalidCredential { .. })
    ));
    assert!(err.is_rejection());
    assert!(!dir.path().join("transferencias.csv").exists());

    let offered = state.offer(&request, "urg-pass").unwrap();
    let log_before = fs::read_to_string(dir.path().join("transferencias.csv")).unwrap();
    let err = state.accept(offered.id, "urg-pass").unwrap_err();
    assert!(matches!(
        err,
        StateError::Auth(AuthError::InvalidCredential { ref service }) if service == "UCI"
    ));
    let log_after = fs::read_to_string(dir.path().join("transferencias.csv")).unwrap();
    assert_eq!(log_before, log_after);
    assert_eq!(fs::read_to_string(dir.path().join("enfermeras.csv")).unwrap(), STAFF);
}

/// Local store whose uploads can be switched off.
struct ReadOnlyAfter {
    inner: LocalStore,
    writable: bool,
}

impl RemoteStore for ReadOnlyAfter {
    fn location(&self) -> String {
        self.inner.location()
    }

    fn fetch(&mut self, file: &str) -> staffing_exchange::Result<Vec<u8>> {
        self.inner.fetch(file)
    }

    fn upload(&mut self, file: &str, contents: &[u8]) -> staffing_exchange::Result<()> {
        if self.writable {
            self.inner.upload(file, contents)
        } else {
            Err(ExchangeError::Connection("server went away".to_string()))
        }
    }
}

#[test]
fn test_failed_persist_drops_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path());
    let store = ReadOnlyAfter {
        inner: LocalStore::new(dir.path()),
        writable: false,
    };
    let client = TableClient::new(store).with_retry(RetryPolicy::new(2, Duration::ZERO));
    let mut state = AppState::new(client);
    state.snapshot().unwrap();
    assert!(state.cached().is_some());

    let request = OfferRequest::new(StaffId(1001), "Urgencias", "UCI");
    let err = state.offer(&request, "urg-pass").unwrap_err();
    assert!(matches!(err, StateError::Exchange(ExchangeError::Connection(_))));
    assert!(state.cached().is_none());

    state.client_mut().store_mut().writable = true;
    let offered = state.offer(&request, "urg-pass").unwrap();
    assert_eq!(offered.id, TransferId(1));
    assert_eq!(state.cached().unwrap().transfers.len(), 1);
}

#[test]
fn test_reset_forces_reload() {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path());
    let mut state = state(dir.path());
    assert_eq!(state.snapshot().unwrap().staff.len(), 5);

    fs::write(
        dir.path().join("enfermeras.csv"),
        "ID,Nombre,Servicio,Turno,Disponible,Presente\n1001,Ana,UCI,Tarde,True,True\n",
    )
    .unwrap();
    assert_eq!(state.snapshot().unwrap().staff.len(), 5);
    state.reset();
    assert_eq!(state.snapshot().unwrap().staff.len(), 1);
}

/// Local store that refuses uploads of one file while `refusing` is set.
struct RefusesFile {
    inner: LocalStore,
    file: &'static str,
    refusing: bool,
}

impl RemoteStore for RefusesFile {
    fn location(&self) -> String {
        self.inner.location()
    }

    fn fetch(&mut self, file: &str) -> staffing_exchange::Result<Vec<u8>> {
        self.inner.fetch(file)
    }

    fn upload(&mut self, file: &str, contents: &[u8]) -> staffing_exchange::Result<()> {
        if self.refusing && file == self.file {
            Err(ExchangeError::Connection("upload refused".to_string()))
        } else {
            self.inner.upload(file, contents)
        }
    }
}

fn refusing_state(dir: &Path, file: &'static str) -> AppState<RefusesFile> {
    let store = RefusesFile {
        inner: LocalStore::new(dir),
        file,
        refusing: false,
    };
    AppState::new(TableClient::new(store).with_retry(RetryPolicy::once()))
}

#[test]
fn test_accept_interrupted_before_staff_write_can_be_retried() {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path());
    let mut state = refusing_state(dir.path(), "enfermeras.csv");
    let request = OfferRequest::new(StaffId(1001), "Urgencias", "UCI");
    let offered = state.offer(&request, "urg-pass").unwrap();

    state.client_mut().store_mut().refusing = true;
    let err = state.accept(offered.id, "uci-pass").unwrap_err();
    assert!(matches!(err, StateError::Exchange(ExchangeError::Connection(_))));

    let mut fresh = self::state(dir.path());
    let snapshot = fresh.snapshot().unwrap();
    assert!(snapshot.find_transfer(offered.id).unwrap().is_pending());
    assert_eq!(snapshot.find_staff(StaffId(1001)).unwrap().service, "Urgencias");

    state.client_mut().store_mut().refusing = false;
    let (record, member) = state.accept(offered.id, "uci-pass").unwrap();
    assert_eq!(record.status, TransferStatus::Accepted);
    assert_eq!(member.service, "UCI");
}

#[test]
fn test_accept_interrupted_before_transfer_write_can_be_retried() {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path());
    let mut state = refusing_state(dir.path(), "transferencias.csv");
    let request = OfferRequest::new(StaffId(1001), "Urgencias", "UCI");
    let offered = state.offer(&request, "urg-pass").unwrap();

    state.client_mut().store_mut().refusing = true;
    assert!(state.accept(offered.id, "uci-pass").is_err());
    assert!(state.cached().is_none());

    state.client_mut().store_mut().refusing = false;
    state.accept(offered.id, "uci-pass").unwrap();

    let mut fresh = self::state(dir.path());
    let snapshot = fresh.snapshot().unwrap();
    assert_eq!(
        snapshot.find_transfer(offered.id).unwrap().status,
        TransferStatus::Accepted
    );
    assert_eq!(snapshot.find_staff(StaffId(1001)).unwrap().service, "UCI");
}

#[test]
fn test_cached_snapshot_matches_store_after_accept() {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path());
    let mut state = state(dir.path());
    let request = OfferRequest::new(StaffId(1001), "Urgencias", "UCI");
    let offered = state.offer(&request, "urg-pass").unwrap();
    state.accept(offered.id, "uci-pass").unwrap();

    let cached = state.cached().unwrap().clone();
    let mut fresh = self::state(dir.path());
    let stored = fresh.snapshot().unwrap();
    assert_eq!(cached.transfers, stored.transfers);
    assert_eq!(cached.staff, stored.staff);
}
