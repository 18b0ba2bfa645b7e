//! Ward staffing workflows.
//!
//! - [`compute_coverage`]: present vs required staff per service and shift
//! - [`compute_occupancy`]: beds vs patients per service
//! - [`offer`] / [`accept`]: the staff transfer workflow
//! - [`UserDirectory`]: per-service credential checks
//! - [`AppState`]: ties the above to a [`staffing_exchange::TableClient`]

mod auth;
mod coverage;
mod error;
mod occupancy;
mod state;
mod transfer;

// === Error Types ===
pub use error::{AuthError, Result, StateError, TransferError};

// === Coverage ===
pub use coverage::{
    CoverageReport, CoverageRow, CoverageStatus, UncountedReason, UncountedStaff,
    compute_coverage,
};

// === Occupancy ===
pub use occupancy::{OccupancyRow, compute_occupancy};

// === Transfers ===
pub use transfer::{OfferRequest, accept, next_transfer_id, offer};

// === Credentials ===
pub use auth::{
    CredentialVerifier, DEFAULT_ITERATIONS, HASH_SCHEME, PasswordHash, UserDirectory,
    hash_password,
};

// === State ===
pub use state::{AppState, Snapshot};
