use serde::{Deserialize, Serialize};

/// Patient counts for one service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientCensus {
    pub service: String,
    pub current: u32,
    pub expected: u32,
    /// Free-text priority (`Prioridad`), empty when absent.
    pub priority: String,
}

impl PatientCensus {
    pub fn new(service: impl Into<String>, current: u32) -> Self {
        Self {
            service: service.into(),
            current,
            expected: 0,
            priority: String::new(),
        }
    }
}
