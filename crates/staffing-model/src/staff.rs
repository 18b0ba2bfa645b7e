use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;
use crate::service::service_key;
use crate::shift::Shift;

/// Numeric staff identifier (`ID` in the staff file).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaffId(pub u32);

impl fmt::Display for StaffId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for StaffId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map(StaffId)
            .map_err(|_| ModelError::InvalidId(s.to_string()))
    }
}

/// A nurse or auxiliary on the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: StaffId,
    pub name: String,
    /// Role or category (`Rol`, historically `Tipo`).
    pub role: String,
    /// Assigned service name.
    pub service: String,
    /// Assigned shift as written in the file; see [`StaffMember::shift`].
    pub shift: String,
    /// May be offered for transfer.
    pub available: bool,
    /// Currently on duty.
    pub present: bool,
}

impl StaffMember {
    /// Normalized assigned shift.
    pub fn shift(&self) -> Shift {
        Shift::normalize(&self.shift)
    }

    pub fn is_assigned_to(&self, service: &str) -> bool {
        service_key(&self.service) == service_key(service)
    }

    /// Present and available: the precondition for offering a transfer.
    pub fn is_transferable(&self) -> bool {
        self.present && self.available
    }

    /// Overwrites the assignment. An empty `shift` keeps the current shift.
    pub fn reassign(&mut self, service: &str, shift: &str) {
        self.service = service.trim().to_string();
        if !shift.trim().is_empty() {
            self.shift = shift.trim().to_string();
        }
    }
}
