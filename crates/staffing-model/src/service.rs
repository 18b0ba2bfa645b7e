use serde::{Deserialize, Serialize};

use crate::shift::Shift;

/// Required staff per scheduled shift.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftQuota {
    pub morning: u32,
    pub afternoon: u32,
    pub night: u32,
}

impl ShiftQuota {
    pub const fn new(morning: u32, afternoon: u32, night: u32) -> Self {
        Self {
            morning,
            afternoon,
            night,
        }
    }

    /// Quota for one shift. [`Shift::Unknown`] has no quota.
    pub const fn for_shift(&self, shift: Shift) -> u32 {
        match shift {
            Shift::Morning => self.morning,
            Shift::Afternoon => self.afternoon,
            Shift::Night => self.night,
            Shift::Unknown => 0,
        }
    }

    pub const fn total(&self) -> u32 {
        self.morning + self.afternoon + self.night
    }
}

/// A hospital ward: a location and a staffing quota bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Unique service name (`Servicio`).
    pub name: String,
    /// Usable beds (`Camas_Utiles`).
    pub beds: u32,
    /// Per-shift staffing quota (`Plantilla_Manana/Tarde/Noche`).
    pub quota: ShiftQuota,
    /// Free-text current shift (`Turno_Actual`), when the file carries one.
    pub current_shift: Option<String>,
}

impl Service {
    pub fn new(name: impl Into<String>, quota: ShiftQuota) -> Self {
        Self {
            name: name.into(),
            beds: 0,
            quota,
            current_shift: None,
        }
    }

    #[must_use]
    pub fn with_beds(mut self, beds: u32) -> Self {
        self.beds = beds;
        self
    }

    /// True when `name` refers to this service (trimmed, case-insensitive).
    pub fn matches(&self, name: &str) -> bool {
        service_key(&self.name) == service_key(name)
    }
}

/// Comparison key for service names.
pub fn service_key(name: &str) -> String {
    name.trim().to_lowercase()
}
