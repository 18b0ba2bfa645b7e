//! Write-then-read round trips for every table kind.

use chrono::{DateTime, NaiveDateTime};
use proptest::prelude::*;

use staffing_ingest::{
    Table, TableKind, decode_patients, decode_services, decode_staff, decode_transfers,
    decode_users, encode_patients, encode_services, encode_staff, encode_transfers, encode_users,
    parse, to_csv,
};
use staffing_model::{
    PatientCensus, Service, ShiftQuota, StaffId, StaffMember, TransferId, TransferRecord,
    TransferStatus, UserCredential,
};

fn round_trip(kind: TableKind, table: &Table) -> Table {
    let text = to_csv(table).unwrap();
    kind.prepare(parse(&text).unwrap()).unwrap()
}

fn word() -> impl Strategy<Value = String> {
    "[A-Za-zñÁé][A-Za-z ñ,\"]{0,10}[a-z]"
}

fn timestamp() -> impl Strategy<Value = NaiveDateTime> {
    (0i64..2_000_000_000).prop_map(|secs| DateTime::from_timestamp(secs, 0).unwrap().naive_utc())
}

fn services() -> impl Strategy<Value = Vec<Service>> {
    prop::collection::vec(
        (0u32..200, 0u32..20, 0u32..20, 0u32..20, prop::option::of(word())),
        0..8,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(idx, (beds, morning, afternoon, night, current_shift))| Service {
                name: format!("Servicio {idx}"),
                beds,
                quota: ShiftQuota::new(morning, afternoon, night),
                current_shift,
            })
            .collect()
    })
}

fn staff() -> impl Strategy<Value = Vec<StaffMember>> {
    prop::collection::vec(
        (word(), word(), word(), word(), any::<bool>(), any::<bool>()),
        0..12,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(
                |(idx, (name, role, service, shift, available, present))| StaffMember {
                    id: StaffId(1000 + idx as u32),
                    name,
                    role,
                    service,
                    shift,
                    available,
                    present,
                },
            )
            .collect()
    })
}

fn transfers() -> impl Strategy<Value = Vec<TransferRecord>> {
    prop::collection::vec(
        (
            0u32..5000,
            word(),
            word(),
            word(),
            timestamp(),
            prop::option::of(timestamp()),
        ),
        0..10,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(
                |(idx, (staff_id, name, origin, destination, offered_at, accepted_at))| {
                    TransferRecord {
                        id: TransferId(idx as u32 + 1),
                        staff_id: StaffId(staff_id),
                        staff_name: name,
                        origin_service: origin,
                        origin_shift: "Mañana".to_string(),
                        destination_service: destination,
                        destination_shift: String::new(),
                        status: if accepted_at.is_some() {
                            TransferStatus::Accepted
                        } else {
                            TransferStatus::Pending
                        },
                        offered_at,
                        accepted_at,
                    }
                },
            )
            .collect()
    })
}

proptest! {
    #[test]
    fn services_round_trip(records in services()) {
        let table = encode_services(&records);
        let read = round_trip(TableKind::Services, &table);
        prop_assert_eq!(&read, &table);
        prop_assert_eq!(decode_services(&read).unwrap(), records);
    }

    #[test]
    fn staff_round_trip(records in staff()) {
        let table = encode_staff(&records);
        let read = round_trip(TableKind::Staff, &table);
        prop_assert_eq!(&read, &table);
        prop_assert_eq!(decode_staff(&read).unwrap(), records);
    }

    #[test]
    fn transfers_round_trip(records in transfers()) {
        let table = encode_transfers(&records);
        let read = round_trip(TableKind::Transfers, &table);
        prop_assert_eq!(&read, &table);
        prop_assert_eq!(decode_transfers(&read).unwrap(), records);
    }

    #[test]
    fn patients_round_trip(rows in prop::collection::vec((0u32..80, 0u32..80, word()), 0..8)) {
        let records: Vec<PatientCensus> = rows
            .into_iter()
            .enumerate()
            .map(|(idx, (current, expected, priority))| PatientCensus {
                service: format!("Servicio {idx}"),
                current,
                expected,
                priority,
            })
            .collect();
        let table = encode_patients(&records);
        let read = round_trip(TableKind::Patients, &table);
        prop_assert_eq!(&read, &table);
        prop_assert_eq!(decode_patients(&read).unwrap(), records);
    }
}

#[test]
fn users_round_trip() {
    let users = vec![
        UserCredential {
            service: "Urgencias".to_string(),
            password_hash: "pbkdf2-sha256$1000$00ff$abcd".to_string(),
        },
        UserCredential {
            service: "UCI".to_string(),
            password_hash: "pbkdf2-sha256$1000$0102$ef01".to_string(),
        },
    ];
    let table = encode_users(&users);
    let read = round_trip(TableKind::Users, &table);
    assert_eq!(read, table);
    assert_eq!(decode_users(&read).unwrap(), users);
}
