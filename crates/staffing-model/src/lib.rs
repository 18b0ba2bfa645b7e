//! Ward staffing data model.
//!
//! Typed records for the flat tables exchanged with the hospital file store:
//!
//! - [`Service`]: a ward with bed capacity and a per-shift staffing quota
//! - [`StaffMember`]: a nurse or auxiliary with assignment and presence flags
//! - [`PatientCensus`]: current/expected patient counts per service
//! - [`TransferRecord`]: an offered or accepted staff reassignment
//! - [`UserCredential`]: a per-service credential hash
//!
//! Shift text is free-form in the source files; [`Shift::normalize`] maps
//! the known synonyms onto the three scheduled shifts.

mod census;
mod credential;
mod error;
mod service;
mod shift;
mod staff;
mod transfer;

pub use census::PatientCensus;
pub use credential::UserCredential;
pub use error::{ModelError, Result};
pub use service::{Service, ShiftQuota, service_key};
pub use shift::Shift;
pub use staff::{StaffId, StaffMember};
pub use transfer::{TIMESTAMP_FORMAT, TransferId, TransferRecord, TransferStatus};
