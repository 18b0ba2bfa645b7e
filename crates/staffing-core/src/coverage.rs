//! Staff coverage per service and shift.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::Serialize;
use staffing_model::{Service, Shift, StaffId, StaffMember, service_key};
use tracing::debug;

/// Sign of `present - required`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum CoverageStatus {
    /// Fewer staff present than required.
    Deficit,
    /// Exactly the required staff.
    Balanced,
    /// More staff present than required.
    Surplus,
}

impl CoverageStatus {
    pub const ALL: [CoverageStatus; 3] = [
        CoverageStatus::Deficit,
        CoverageStatus::Balanced,
        CoverageStatus::Surplus,
    ];

    #[must_use]
    pub const fn from_difference(difference: i64) -> Self {
        if difference < 0 {
            CoverageStatus::Deficit
        } else if difference > 0 {
            CoverageStatus::Surplus
        } else {
            CoverageStatus::Balanced
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            CoverageStatus::Deficit => "Déficit",
            CoverageStatus::Balanced => "Equilibrio",
            CoverageStatus::Surplus => "Superávit",
        }
    }
}

impl fmt::Display for CoverageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Coverage of one service during one shift.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageRow {
    pub service: String,
    pub shift: Shift,
    /// Quota for the shift.
    pub required: u32,
    /// Present staff assigned to the service and shift.
    pub present: u32,
    /// `present - required`.
    pub difference: i64,
    /// `present / required`; `None` when nothing is required.
    pub ratio: Option<f64>,
    pub status: CoverageStatus,
}

impl CoverageRow {
    fn new(service: &str, shift: Shift, required: u32, present: u32) -> Self {
        let difference = i64::from(present) - i64::from(required);
        let ratio = (required > 0).then(|| f64::from(present) / f64::from(required));
        Self {
            service: service.to_string(),
            shift,
            required,
            present,
            difference,
            ratio,
            status: CoverageStatus::from_difference(difference),
        }
    }
}

/// Why a present staff member was left out of the counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UncountedReason {
    /// The shift text matches no known synonym.
    UnknownShift,
    /// The assigned service is not in the services table.
    UnknownService,
}

impl UncountedReason {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            UncountedReason::UnknownShift => "unknown shift",
            UncountedReason::UnknownService => "unknown service",
        }
    }
}

/// A present staff member that could not be placed in any coverage row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UncountedStaff {
    pub id: StaffId,
    pub service: String,
    pub shift: String,
    pub reason: UncountedReason,
}

/// Result of [`compute_coverage`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CoverageReport {
    rows: Vec<CoverageRow>,
    uncounted: Vec<UncountedStaff>,
}

impl CoverageReport {
    /// One row per service and scheduled shift, in services-table order.
    pub fn rows(&self) -> &[CoverageRow] {
        &self.rows
    }

    pub fn uncounted(&self) -> &[UncountedStaff] {
        &self.uncounted
    }

    pub fn total_required(&self) -> u32 {
        self.rows.iter().map(|row| row.required).sum()
    }

    pub fn total_present(&self) -> u32 {
        self.rows.iter().map(|row| row.present).sum()
    }

    pub fn count(&self, status: CoverageStatus) -> usize {
        self.rows.iter().filter(|row| row.status == status).count()
    }

    pub fn for_shift(&self, shift: Shift) -> impl Iterator<Item = &CoverageRow> {
        self.rows.iter().filter(move |row| row.shift == shift)
    }

    /// Rows for each service's current shift. Services without a recognized
    /// current shift are left out.
    pub fn for_current_shift<'a>(&'a self, services: &[Service]) -> Vec<&'a CoverageRow> {
        let current: HashMap<String, Shift> = services
            .iter()
            .filter_map(|service| {
                let shift = Shift::normalize(service.current_shift.as_deref()?);
                shift
                    .is_scheduled()
                    .then(|| (service_key(&service.name), shift))
            })
            .collect();
        self.rows
            .iter()
            .filter(|row| current.get(&service_key(&row.service)) == Some(&row.shift))
            .collect()
    }
}

/// Counts present staff per service and shift against each service's quota.
pub fn compute_coverage(staff: &[StaffMember], services: &[Service]) -> CoverageReport {
    let known: BTreeSet<String> = services
        .iter()
        .map(|service| service_key(&service.name))
        .collect();

    let mut counts: HashMap<(String, Shift), u32> = HashMap::new();
    let mut uncounted = Vec::new();
    for member in staff.iter().filter(|member| member.present) {
        let key = service_key(&member.service);
        let shift = member.shift();
        let reason = if !known.contains(&key) {
            UncountedReason::UnknownService
        } else if !shift.is_scheduled() {
            UncountedReason::UnknownShift
        } else {
            *counts.entry((key, shift)).or_default() += 1;
            continue;
        };
        uncounted.push(UncountedStaff {
            id: member.id,
            service: member.service.clone(),
            shift: member.shift.clone(),
            reason,
        });
    }

    let mut rows = Vec::with_capacity(services.len() * Shift::SCHEDULED.len());
    for service in services {
        let key = service_key(&service.name);
        for shift in Shift::SCHEDULED {
            let present = counts.get(&(key.clone(), shift)).copied().unwrap_or(0);
            rows.push(CoverageRow::new(
                &service.name,
                shift,
                service.quota.for_shift(shift),
                present,
            ));
        }
    }

    debug!(
        services = services.len(),
        staff = staff.len(),
        uncounted = uncounted.len(),
        "computed coverage"
    );
    CoverageReport { rows, uncounted }
}

#[cfg(test)]
mod tests {
    use super::*;
    use staffing_model::ShiftQuota;

    fn nurse(id: u32, service: &str, shift: &str, present: bool) -> StaffMember {
        StaffMember {
            id: StaffId(id),
            name: format!("Nurse {id}"),
            role: "Enfermera".to_string(),
            service: service.to_string(),
            shift: shift.to_string(),
            available: true,
            present,
        }
    }

    #[test]
    fn test_status_from_difference() {
        assert_eq!(CoverageStatus::from_difference(-2), CoverageStatus::Deficit);
        assert_eq!(CoverageStatus::from_difference(0), CoverageStatus::Balanced);
        assert_eq!(CoverageStatus::from_difference(1), CoverageStatus::Surplus);
        assert_eq!(CoverageStatus::Surplus.to_string(), "Superávit");
    }

    #[test]
    fn test_counts_only_present_staff_matching_service_and_shift() {
        let services = vec![Service::new("Urgencias", ShiftQuota::new(2, 1, 1))];
        let staff = vec![
            nurse(1, "Urgencias", "Mañana", true),
            nurse(2, " urgencias ", "m", true),
            nurse(3, "Urgencias", "Mañana", false),
            nurse(4, "Urgencias", "Noche", true),
        ];
        let report = compute_coverage(&staff, &services);
        let rows = report.rows();
        assert_eq!(rows.len(), 3);
        assert_eq!((rows[0].shift, rows[0].present), (Shift::Morning, 2));
        assert_eq!(rows[0].status, CoverageStatus::Balanced);
        assert_eq!(rows[1].present, 0);
        assert_eq!(rows[1].difference, -1);
        assert_eq!(rows[1].ratio, Some(0.0));
        assert_eq!(rows[2].status, CoverageStatus::Balanced);
    }

    #[test]
    fn test_zero_quota_has_no_ratio() {
        let services = vec![Service::new("Planta", ShiftQuota::new(0, 0, 0))];
        let staff = vec![nurse(1, "Planta", "Tarde", true)];
        let report = compute_coverage(&staff, &services);
        let afternoon = report.for_shift(Shift::Afternoon).next().unwrap();
        assert_eq!(afternoon.ratio, None);
        assert_eq!(afternoon.status, CoverageStatus::Surplus);
    }

    #[test]
    fn test_uncounted_staff_are_reported() {
        let services = vec![Service::new("UCI", ShiftQuota::new(1, 1, 1))];
        let staff = vec![
            nurse(1, "UCI", "guardia", true),
            nurse(2, "Pediatría", "Mañana", true),
            nurse(3, "Pediatría", "Mañana", false),
        ];
        let report = compute_coverage(&staff, &services);
        assert_eq!(report.total_present(), 0);
        assert_eq!(report.uncounted().len(), 2);
        assert_eq!(report.uncounted()[0].reason, UncountedReason::UnknownShift);
        assert_eq!(report.uncounted()[1].reason, UncountedReason::UnknownService);
    }

    #[test]
    fn test_current_shift_filter() {
        let mut uci = Service::new("UCI", ShiftQuota::new(3, 2, 1));
        uci.current_shift = Some("Noche".to_string());
        let planta = Service::new("Planta", ShiftQuota::new(1, 1, 1));
        let services = vec![uci, planta];
        let report = compute_coverage(&[], &services);
        let current = report.for_current_shift(&services);
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].service, "UCI");
        assert_eq!(current[0].shift, Shift::Night);
        assert_eq!(report.total_required(), 9);
        assert_eq!(report.count(CoverageStatus::Deficit), 6);
    }
}
