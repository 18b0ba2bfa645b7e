//! Application state: the exchange client plus a cached snapshot of the
//! tables.

use chrono::{Local, NaiveDateTime, SubsecRound};
use staffing_exchange::{ExchangeError, RemoteStore, TableClient};
use staffing_ingest::{
    Table, TableKind, decode_patients, decode_services, decode_staff, decode_transfers,
    decode_users, encode_staff, encode_transfers,
};
use staffing_model::{
    PatientCensus, Service, StaffId, StaffMember, TransferId, TransferRecord,
};
use tracing::{info, warn};

use crate::auth::{CredentialVerifier, UserDirectory};
use crate::coverage::{CoverageReport, compute_coverage};
use crate::error::{Result, StateError};
use crate::occupancy::{OccupancyRow, compute_occupancy};
use crate::transfer::{self, OfferRequest};

/// The four operational tables as read at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub services: Vec<Service>,
    pub staff: Vec<StaffMember>,
    pub patients: Vec<PatientCensus>,
    pub transfers: Vec<TransferRecord>,
    pub loaded_at: NaiveDateTime,
}

impl Snapshot {
    pub fn coverage(&self) -> CoverageReport {
        compute_coverage(&self.staff, &self.services)
    }

    pub fn occupancy(&self) -> Vec<OccupancyRow> {
        compute_occupancy(&self.services, &self.patients)
    }

    pub fn find_staff(&self, id: StaffId) -> Option<&StaffMember> {
        self.staff.iter().find(|member| member.id == id)
    }

    pub fn find_transfer(&self, id: TransferId) -> Option<&TransferRecord> {
        self.transfers.iter().find(|record| record.id == id)
    }

    pub fn staff_in<'a>(&'a self, service: &'a str) -> impl Iterator<Item = &'a StaffMember> {
        self.staff
            .iter()
            .filter(move |member| member.is_assigned_to(service))
    }

    /// Transfers ordered by offer time, most recent first.
    pub fn transfers_newest_first(&self) -> Vec<&TransferRecord> {
        let mut records: Vec<&TransferRecord> = self.transfers.iter().collect();
        records.sort_by(|a, b| b.offered_at.cmp(&a.offered_at).then(b.id.cmp(&a.id)));
        records
    }
}

/// Owns the exchange client and the cached snapshot for one session.
pub struct AppState<S> {
    client: TableClient<S>,
    snapshot: Option<Snapshot>,
}

impl<S: RemoteStore> AppState<S> {
    pub fn new(client: TableClient<S>) -> Self {
        Self {
            client,
            snapshot: None,
        }
    }

    pub fn client(&self) -> &TableClient<S> {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut TableClient<S> {
        &mut self.client
    }

    /// The cached snapshot, if one is loaded.
    pub fn cached(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    /// Returns the cached snapshot, loading it first if needed.
    pub fn snapshot(&mut self) -> Result<&Snapshot> {
        let snapshot = match self.snapshot.take() {
            Some(snapshot) => snapshot,
            None => self.load()?,
        };
        Ok(self.snapshot.insert(snapshot))
    }

    /// Re-reads every table and replaces the cached snapshot.
    pub fn reload(&mut self) -> Result<&Snapshot> {
        self.snapshot = None;
        self.snapshot()
    }

    /// Drops the cached snapshot.
    pub fn reset(&mut self) {
        self.snapshot = None;
    }

    /// Reads the users table into a credential directory.
    pub fn users(&mut self) -> Result<UserDirectory> {
        let table = self.client.read(TableKind::Users)?;
        Ok(UserDirectory::new(decode_users(&table)?))
    }

    /// Offers a transfer, authorized by the origin service's credential.
    pub fn offer(&mut self, request: &OfferRequest, credential: &str) -> Result<TransferRecord> {
        let users = self.users()?;
        self.offer_with(&users, request, credential)
    }

    pub fn offer_with(
        &mut self,
        verifier: &impl CredentialVerifier,
        request: &OfferRequest,
        credential: &str,
    ) -> Result<TransferRecord> {
        self.snapshot = None;
        let mut snapshot = self.load()?;
        let outcome = verifier
            .verify(&request.origin_service, credential)
            .map_err(StateError::from)
            .and_then(|()| {
                transfer::offer(
                    request,
                    &snapshot.staff,
                    &snapshot.services,
                    &mut snapshot.transfers,
                    now(),
                )
                .map_err(StateError::from)
            });
        let record = match outcome {
            Ok(record) => record,
            Err(err) => {
                self.snapshot = Some(snapshot);
                return Err(err);
            }
        };

        self.persist(&[TableKind::Transfers], &snapshot)?;
        self.snapshot = Some(snapshot);
        Ok(record)
    }

    /// Accepts a pending transfer, authorized by the destination service's
    /// credential.
    pub fn accept(
        &mut self,
        transfer_id: TransferId,
        credential: &str,
    ) -> Result<(TransferRecord, StaffMember)> {
        let users = self.users()?;
        self.accept_with(&users, transfer_id, credential)
    }

    pub fn accept_with(
        &mut self,
        verifier: &impl CredentialVerifier,
        transfer_id: TransferId,
        credential: &str,
    ) -> Result<(TransferRecord, StaffMember)> {
        self.snapshot = None;
        let mut snapshot = self.load()?;
        let authorized = match snapshot.find_transfer(transfer_id) {
            Some(record) => verifier
                .verify(&record.destination_service, credential)
                .map_err(StateError::from),
            None => Ok(()),
        };
        let outcome = authorized.and_then(|()| {
            transfer::accept(
                transfer_id,
                &mut snapshot.staff,
                &mut snapshot.transfers,
                now(),
            )
            .map_err(StateError::from)
        });
        let accepted = match outcome {
            Ok(accepted) => accepted,
            Err(err) => {
                self.snapshot = Some(snapshot);
                return Err(err);
            }
        };

        // Staff first: a failed transfer write leaves the transfer pending, so
        // accepting again finishes the move.
        self.persist(&[TableKind::Staff, TableKind::Transfers], &snapshot)?;
        self.snapshot = Some(snapshot);
        Ok(accepted)
    }

    /// Writes the given tables in order. On failure the cached snapshot stays
    /// empty so the next call reloads from the store.
    fn persist(&mut self, kinds: &[TableKind], snapshot: &Snapshot) -> Result<()> {
        for &kind in kinds {
            let table = match kind {
                TableKind::Transfers => encode_transfers(&snapshot.transfers),
                TableKind::Staff => encode_staff(&snapshot.staff),
                _ => continue,
            };
            if let Err(err) = self.client.write(kind, &table) {
                warn!(table = kind.name(), error = %err, "persisting failed, snapshot dropped");
                self.snapshot = None;
                return Err(err.into());
            }
        }
        Ok(())
    }

    fn load(&mut self) -> Result<Snapshot> {
        let services = decode_services(&self.client.read(TableKind::Services)?)?;
        let staff = decode_staff(&self.client.read(TableKind::Staff)?)?;
        let patients = decode_patients(&self.read_optional(TableKind::Patients)?)?;
        let transfers = decode_transfers(&self.read_optional(TableKind::Transfers)?)?;
        info!(
            services = services.len(),
            staff = staff.len(),
            transfers = transfers.len(),
            "snapshot loaded"
        );
        Ok(Snapshot {
            services,
            staff,
            patients,
            transfers,
            loaded_at: now(),
        })
    }

    /// Reads a table whose file may not exist yet; a missing file is empty.
    fn read_optional(&mut self, kind: TableKind) -> Result<Table> {
        match self.client.read(kind) {
            Err(ExchangeError::NotFound { file }) => {
                info!(table = kind.name(), file = %file, "table file not found, starting empty");
                Ok(Table::default())
            }
            other => other.map_err(StateError::from),
        }
    }
}

/// Local time at the precision the transfer file stores.
fn now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(0)
}
