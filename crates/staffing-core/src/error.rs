//! Error types for the staffing workflows.

use staffing_exchange::ExchangeError;
use staffing_ingest::IngestError;
use staffing_model::{StaffId, TransferId, TransferStatus};
use thiserror::Error;

/// A transfer request that breaks a workflow rule. Nothing is changed when
/// one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TransferError {
    // === Offer Errors ===
    #[error("origin and destination are the same service: {service}")]
    SameService { service: String },

    #[error("staff {staff_id} is assigned to {assigned}, not {requested}")]
    OriginMismatch {
        staff_id: StaffId,
        assigned: String,
        requested: String,
    },

    #[error("unknown staff id {0}")]
    UnknownStaff(StaffId),

    #[error("unknown service: {0}")]
    UnknownService(String),

    #[error("staff {0} is not both present and available")]
    NotEligible(StaffId),

    #[error("staff {staff_id} already has pending transfer {transfer_id}")]
    AlreadyPending {
        staff_id: StaffId,
        transfer_id: TransferId,
    },

    #[error("no transfer ids left after {}", u32::MAX)]
    IdsExhausted,

    // === Accept Errors ===
    #[error("unknown transfer id {0}")]
    UnknownTransfer(TransferId),

    #[error("transfer {transfer_id} is not pending (status {status})")]
    NotPending {
        transfer_id: TransferId,
        status: TransferStatus,
    },
}

impl TransferError {
    /// Returns a user-friendly error message suitable for display.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::SameService { .. } => {
                "The destination service must differ from the origin service.".to_string()
            }
            Self::OriginMismatch { assigned, .. } => {
                format!("This staff member currently works in {assigned}.")
            }
            Self::UnknownStaff(id) => format!("No staff member with ID {id}."),
            Self::UnknownService(name) => format!("The service {name} does not exist."),
            Self::NotEligible(_) => {
                "Only staff who are present and available can be offered.".to_string()
            }
            Self::AlreadyPending { transfer_id, .. } => {
                format!("This staff member already has a pending transfer ({transfer_id}).")
            }
            Self::IdsExhausted => {
                "The transfer log has no free transfer IDs left.".to_string()
            }
            Self::UnknownTransfer(id) => format!("No transfer with ID {id}."),
            Self::NotPending { status, .. } => {
                format!("This transfer is no longer pending ({status}).")
            }
        }
    }
}

/// Credential check failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error("no credential registered for service {0}")]
    UnknownService(String),

    #[error("invalid credential for service {service}")]
    InvalidCredential { service: String },

    #[error("malformed password hash: {0}")]
    MalformedHash(String),
}

impl AuthError {
    /// Returns a user-friendly error message suitable for display.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::UnknownService(service) => {
                format!("No credential is registered for {service}.")
            }
            Self::InvalidCredential { service } => format!("Wrong password for {service}."),
            Self::MalformedHash(_) => {
                "The stored credential is damaged. Ask an administrator to reset it.".to_string()
            }
        }
    }
}

/// Errors from [`crate::AppState`] operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StateError {
    #[error(transparent)]
    Exchange(#[from] ExchangeError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl StateError {
    /// Returns a user-friendly error message suitable for display.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Exchange(err) => err.user_message(),
            Self::Ingest(err) => err.to_string(),
            Self::Transfer(err) => err.user_message(),
            Self::Auth(err) => err.user_message(),
        }
    }

    /// True for workflow and credential rejections, as opposed to I/O and
    /// data problems.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Transfer(_) | Self::Auth(_))
    }
}

/// Result type alias for state operations.
pub type Result<T> = std::result::Result<T, StateError>;
