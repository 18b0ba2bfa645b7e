//! Bed occupancy per service.

use serde::Serialize;
use staffing_model::{PatientCensus, Service};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OccupancyRow {
    pub service: String,
    pub beds: u32,
    pub current: u32,
    pub expected: u32,
    /// `current / beds`; `None` for services without beds.
    pub rate: Option<f64>,
}

impl OccupancyRow {
    /// Beds left after current patients. Negative when over capacity.
    pub fn free_beds(&self) -> i64 {
        i64::from(self.beds) - i64::from(self.current)
    }
}

/// Joins bed capacity with the patient census, one row per service in
/// services-table order. Services without a census entry count zero patients.
pub fn compute_occupancy(services: &[Service], census: &[PatientCensus]) -> Vec<OccupancyRow> {
    services
        .iter()
        .map(|service| {
            let entry = census.iter().find(|entry| service.matches(&entry.service));
            let current = entry.map_or(0, |entry| entry.current);
            OccupancyRow {
                service: service.name.clone(),
                beds: service.beds,
                current,
                expected: entry.map_or(0, |entry| entry.expected),
                rate: (service.beds > 0).then(|| f64::from(current) / f64::from(service.beds)),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use staffing_model::ShiftQuota;

    #[test]
    fn test_join_by_service_name() {
        let services = vec![
            Service::new("UCI", ShiftQuota::default()).with_beds(8),
            Service::new("Planta", ShiftQuota::default()).with_beds(0),
            Service::new("Urgencias", ShiftQuota::default()).with_beds(10),
        ];
        let census = vec![
            PatientCensus {
                service: "uci".to_string(),
                current: 6,
                expected: 7,
                priority: String::new(),
            },
            PatientCensus::new("Planta", 3),
        ];
        let rows = compute_occupancy(&services, &census);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].current, 6);
        assert_eq!(rows[0].expected, 7);
        assert_eq!(rows[0].rate, Some(0.75));
        assert_eq!(rows[1].rate, None);
        assert_eq!(rows[1].free_beds(), -3);
        assert_eq!(rows[2].current, 0);
        assert_eq!(rows[2].rate, Some(0.0));
    }
}
