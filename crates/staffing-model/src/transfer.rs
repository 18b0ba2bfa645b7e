use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;
use crate::staff::StaffId;

/// Timestamp layout used by the transfer file (`Fecha_Oferta`, `Fecha_Aceptacion`).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransferId(pub u32);

impl fmt::Display for TransferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TransferId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map(TransferId)
            .map_err(|_| ModelError::InvalidId(s.to_string()))
    }
}

/// Transfer lifecycle. The only transition is `Pending -> Accepted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransferStatus {
    Pending,
    Accepted,
}

impl TransferStatus {
    /// Value stored in the `Estado` column.
    pub const fn label(&self) -> &'static str {
        match self {
            TransferStatus::Pending => "Pendiente",
            TransferStatus::Accepted => "Aceptada",
        }
    }
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TransferStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pendiente" | "pending" => Ok(TransferStatus::Pending),
            "aceptada" | "aceptado" | "accepted" => Ok(TransferStatus::Accepted),
            _ => Err(ModelError::UnknownStatus(s.to_string())),
        }
    }
}

/// One entry of the transfer log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    pub id: TransferId,
    pub staff_id: StaffId,
    /// Copy of the staff member's name taken from the staff table at offer time.
    pub staff_name: String,
    pub origin_service: String,
    pub origin_shift: String,
    pub destination_service: String,
    /// Empty when the transfer keeps the staff member's shift.
    pub destination_shift: String,
    pub status: TransferStatus,
    pub offered_at: NaiveDateTime,
    pub accepted_at: Option<NaiveDateTime>,
}

impl TransferRecord {
    pub fn is_pending(&self) -> bool {
        self.status == TransferStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_accepts_both_languages() {
        assert_eq!("Pendiente".parse::<TransferStatus>(), Ok(TransferStatus::Pending));
        assert_eq!(" accepted ".parse::<TransferStatus>(), Ok(TransferStatus::Accepted));
        assert!("Rechazada".parse::<TransferStatus>().is_err());
    }

    #[test]
    fn test_status_label_round_trip() {
        for status in [TransferStatus::Pending, TransferStatus::Accepted] {
            assert_eq!(status.label().parse::<TransferStatus>(), Ok(status));
        }
    }
}
