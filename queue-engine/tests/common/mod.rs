//! Shared fixtures for the integration tests

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveTime};
use queue_engine::db::repository::appointment;
use queue_engine::{Config, DbService, QueueEngine};
use shared::models::{
    AppointmentCreate, AssignRequest, AssignmentSchedule, AssignmentType, Employee, EmployeeCreate, PriorityLevel,
    QueueEntry, QueueEntryCreate, QueueType, Station, StationCreate, StationType,
};

pub const SERVICE: i64 = 1;
pub const PRIMARY_FACILITY: i64 = 1;
pub const OTHER_FACILITY: i64 = 2;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

pub async fn engine() -> QueueEngine {
    let db = DbService::in_memory().await.unwrap();
    QueueEngine::new(db, Config::for_tests())
}

pub async fn station(engine: &QueueEngine, name: &str, station_type: StationType) -> Station {
    engine
        .stations()
        .create_station(StationCreate {
            name: name.into(),
            station_type,
            service_id: SERVICE,
        })
        .await
        .unwrap()
}

pub async fn employee(engine: &QueueEngine, name: &str) -> Employee {
    engine
        .assignments()
        .create_employee(EmployeeCreate { name: name.into() })
        .await
        .unwrap()
}

pub fn assign_request(employee_id: i64, station_id: i64, start: NaiveDate) -> AssignRequest {
    AssignRequest {
        employee_id,
        station_id,
        start_date: start,
        assignment_type: AssignmentType::Permanent,
        shift_start: time(8, 0),
        shift_end: time(17, 0),
        assigned_by: Some(99),
        end_date: None,
    }
}

pub async fn assign(engine: &QueueEngine, employee_id: i64, station_id: i64, start: NaiveDate) -> AssignmentSchedule {
    engine
        .assignments()
        .assign(assign_request(employee_id, station_id, start))
        .await
        .unwrap()
}

/// Insert an appointment row directly; the connection is released before returning
pub async fn book(engine: &QueueEngine, patient_id: i64, facility_id: i64, on: NaiveDate, at: NaiveTime) -> i64 {
    let mut conn = engine.pool().acquire().await.unwrap();
    appointment::create(
        &mut conn,
        &AppointmentCreate {
            patient_id,
            facility_id,
            service_id: SERVICE,
            scheduled_date: on,
            scheduled_time: at,
        },
        0,
    )
    .await
    .unwrap()
    .id
}

pub fn entry_request(patient_id: i64, appointment_id: Option<i64>, priority_level: PriorityLevel) -> QueueEntryCreate {
    QueueEntryCreate {
        appointment_id,
        patient_id,
        service_id: SERVICE,
        queue_type: QueueType::Triage,
        priority_level,
        performed_by: None,
    }
}

/// Book a primary-facility appointment and queue it
pub async fn queue_patient(engine: &QueueEngine, patient_id: i64, on: NaiveDate, at: NaiveTime) -> QueueEntry {
    let appt = book(engine, patient_id, PRIMARY_FACILITY, on, at).await;
    engine
        .queue()
        .create(entry_request(patient_id, Some(appt), PriorityLevel::Normal))
        .await
        .unwrap()
}

/// Move `time_in` into the past so elapsed-minute fields are observable
pub async fn backdate_time_in(engine: &QueueEngine, entry_id: i64, minutes: i64) {
    sqlx::query("UPDATE queue_entry SET time_in = time_in - ? WHERE id = ?")
        .bind(minutes * 60_000)
        .bind(entry_id)
        .execute(engine.pool())
        .await
        .unwrap();
}
