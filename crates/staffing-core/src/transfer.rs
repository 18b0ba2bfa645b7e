//! Offer/accept workflow for staff transfers between services.
//!
//! Both operations validate everything before touching their inputs, so a
//! rejected request leaves staff and transfers exactly as they were.

use chrono::NaiveDateTime;
use staffing_model::{
    Service, StaffId, StaffMember, TransferId, TransferRecord, TransferStatus, service_key,
};
use tracing::info;

use crate::error::TransferError;

/// A request to move one staff member to another service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferRequest {
    pub staff_id: StaffId,
    pub origin_service: String,
    pub destination_service: String,
    /// Shift at the destination. Empty keeps the current shift on accept.
    pub destination_shift: String,
}

impl OfferRequest {
    pub fn new(
        staff_id: StaffId,
        origin_service: impl Into<String>,
        destination_service: impl Into<String>,
    ) -> Self {
        Self {
            staff_id,
            origin_service: origin_service.into(),
            destination_service: destination_service.into(),
            destination_shift: String::new(),
        }
    }

    #[must_use]
    pub fn with_destination_shift(mut self, shift: impl Into<String>) -> Self {
        self.destination_shift = shift.into();
        self
    }
}

/// Id for the next transfer: one past the largest existing id.
pub fn next_transfer_id(transfers: &[TransferRecord]) -> Result<TransferId, TransferError> {
    let max = transfers.iter().map(|record| record.id.0).max().unwrap_or(0);
    max.checked_add(1)
        .map(TransferId)
        .ok_or(TransferError::IdsExhausted)
}

/// Validates `request` and appends a pending transfer to `transfers`.
pub fn offer(
    request: &OfferRequest,
    staff: &[StaffMember],
    services: &[Service],
    transfers: &mut Vec<TransferRecord>,
    now: NaiveDateTime,
) -> Result<TransferRecord, TransferError> {
    let origin = request.origin_service.trim();
    let destination = request.destination_service.trim();
    if service_key(origin) == service_key(destination) {
        return Err(TransferError::SameService {
            service: destination.to_string(),
        });
    }

    let member = staff
        .iter()
        .find(|member| member.id == request.staff_id)
        .ok_or(TransferError::UnknownStaff(request.staff_id))?;
    if !member.is_assigned_to(origin) {
        return Err(TransferError::OriginMismatch {
            staff_id: member.id,
            assigned: member.service.clone(),
            requested: origin.to_string(),
        });
    }
    let destination_service = services
        .iter()
        .find(|service| service.matches(destination))
        .ok_or_else(|| TransferError::UnknownService(destination.to_string()))?;
    if !member.is_transferable() {
        return Err(TransferError::NotEligible(member.id));
    }
    if let Some(pending) = transfers
        .iter()
        .find(|record| record.staff_id == member.id && record.is_pending())
    {
        return Err(TransferError::AlreadyPending {
            staff_id: member.id,
            transfer_id: pending.id,
        });
    }

    let id = next_transfer_id(transfers)?;
    let record = TransferRecord {
        id,
        staff_id: member.id,
        staff_name: member.name.clone(),
        origin_service: member.service.clone(),
        origin_shift: member.shift.clone(),
        destination_service: destination_service.name.clone(),
        destination_shift: request.destination_shift.trim().to_string(),
        status: TransferStatus::Pending,
        offered_at: now,
        accepted_at: None,
    };
    info!(
        transfer = %record.id,
        staff = %record.staff_id,
        from = %record.origin_service,
        to = %record.destination_service,
        "transfer offered"
    );
    transfers.push(record.clone());
    Ok(record)
}

/// Marks a pending transfer accepted and moves the staff member.
///
/// Returns the updated transfer and staff member.
pub fn accept(
    transfer_id: TransferId,
    staff: &mut [StaffMember],
    transfers: &mut [TransferRecord],
    now: NaiveDateTime,
) -> Result<(TransferRecord, StaffMember), TransferError> {
    let record = transfers
        .iter_mut()
        .find(|record| record.id == transfer_id)
        .ok_or(TransferError::UnknownTransfer(transfer_id))?;
    if !record.is_pending() {
        return Err(TransferError::NotPending {
            transfer_id,
            status: record.status,
        });
    }
    let member = staff
        .iter_mut()
        .find(|member| member.id == record.staff_id)
        .ok_or(TransferError::UnknownStaff(record.staff_id))?;

    record.status = TransferStatus::Accepted;
    record.accepted_at = Some(now);
    member.reassign(&record.destination_service, &record.destination_shift);
    info!(
        transfer = %record.id,
        staff = %member.id,
        to = %record.destination_service,
        "transfer accepted"
    );
    Ok((record.clone(), member.clone()))
}
