//! End-to-end scenarios against an in-memory store

mod common;

use common::*;
use queue_engine::EngineError;
use shared::error::ErrorCode;
use shared::models::{
    AssignmentAction, PriorityLevel, QueueAction, QueueStatus, RemoveMode, RemoveRequest, StationType,
};

#[tokio::test]
async fn employee_cannot_hold_two_stations_in_overlapping_shifts() {
    let engine = engine().await;
    let e1 = employee(&engine, "Ana Cruz").await;
    let s1 = station(&engine, "Triage 1", StationType::Triage).await;
    let s2 = station(&engine, "Consultation 1", StationType::Consultation).await;

    assign(&engine, e1.id, s1.id, date(2025, 1, 10)).await;

    let mut overlapping = assign_request(e1.id, s2.id, date(2025, 1, 10));
    overlapping.shift_start = time(13, 0);
    overlapping.shift_end = time(18, 0);
    let err = engine.assignments().assign(overlapping).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::EmployeeConflict);
    match err {
        EngineError::EmployeeConflict { conflicts, .. } => {
            assert_eq!(conflicts.len(), 1);
            assert_eq!(conflicts[0].station_name, "Triage 1");
        }
        other => panic!("expected employee conflict, got {:?}", other),
    }

    // Back-to-back shift windows do not overlap
    let mut evening = assign_request(e1.id, s2.id, date(2025, 1, 10));
    evening.shift_start = time(17, 0);
    evening.shift_end = time(21, 0);
    engine.assignments().assign(evening).await.unwrap();
}

#[tokio::test]
async fn twenty_first_booking_in_a_slot_is_rejected() {
    let engine = engine().await;
    station(&engine, "Triage 1", StationType::Triage).await;
    let day = date(2025, 1, 15);

    let mut entries = Vec::new();
    for patient in 1..=20 {
        entries.push(queue_patient(&engine, patient, day, time(8, (patient * 2) as u32)).await);
    }

    let appt = book(&engine, 21, PRIMARY_FACILITY, day, time(8, 55)).await;
    let err = engine
        .queue()
        .create(entry_request(21, Some(appt), PriorityLevel::Normal))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::SlotFull);
    assert!(err.to_string().contains("08A"));

    for (i, entry) in entries.iter().enumerate() {
        let stored = engine.queue().find_entry(entry.id).await.unwrap();
        assert_eq!(stored, *entry);
        assert_eq!(stored.queue_number, Some(i as i64 + 1));
        assert_eq!(stored.queue_code.as_deref(), Some(format!("150125-08A-{:03}", i + 1).as_str()));
    }

    // A neighbouring slot is unaffected
    let nine = queue_patient(&engine, 22, day, time(9, 0)).await;
    assert_eq!(nine.queue_code.as_deref(), Some("150125-09A-001"));
}

#[tokio::test]
async fn cancelled_entry_frees_capacity_without_reusing_its_number() {
    let engine = engine().await;
    station(&engine, "Triage 1", StationType::Triage).await;
    let day = date(2025, 1, 15);

    let mut first = None;
    for patient in 1..=20 {
        let entry = queue_patient(&engine, patient, day, time(10, 0)).await;
        first.get_or_insert(entry.id);
    }
    engine
        .queue()
        .cancel(first.unwrap(), "patient rescheduled", None)
        .await
        .unwrap();

    let entry = queue_patient(&engine, 21, day, time(10, 30)).await;
    assert_eq!(entry.queue_number, Some(21));
    assert_eq!(entry.queue_code.as_deref(), Some("150125-10A-021"));
}

#[tokio::test]
async fn entry_walks_the_happy_path() {
    let engine = engine().await;
    let triage = station(&engine, "Triage 1", StationType::Triage).await;
    let day = date(2025, 1, 15);
    let entry = queue_patient(&engine, 1, day, time(13, 15)).await;
    assert_eq!(entry.status, QueueStatus::Waiting);
    assert_eq!(entry.station_id, triage.id);
    assert_eq!(entry.queue_code.as_deref(), Some("150125-01P-001"));

    let arrived = engine.queue().check_in(entry.id, Some(7)).await.unwrap();
    assert_eq!(arrived.status, QueueStatus::Arrived);

    backdate_time_in(&engine, entry.id, 25).await;
    let called = engine.queue().call_next(triage.id, day, Some(7)).await.unwrap();
    assert_eq!(called.id, entry.id);
    assert_eq!(called.status, QueueStatus::InProgress);
    assert!(called.time_started.is_some());
    assert_eq!(called.waiting_time, Some(25));

    let done = engine.queue().complete(entry.id, Some(7)).await.unwrap();
    assert_eq!(done.status, QueueStatus::Done);
    assert!(done.time_completed.is_some());
    assert_eq!(done.turnaround_time, Some(25));

    let trail: Vec<_> = engine
        .queue()
        .history(entry.id)
        .await
        .unwrap()
        .into_iter()
        .map(|l| (l.old_status, l.new_status))
        .collect();
    assert_eq!(
        trail,
        vec![
            (None, QueueStatus::Waiting),
            (Some(QueueStatus::Waiting), QueueStatus::Arrived),
            (Some(QueueStatus::Arrived), QueueStatus::InProgress),
            (Some(QueueStatus::InProgress), QueueStatus::Done),
        ]
    );

    let stats = engine.routing().station_queue_stats(triage.id, day).await.unwrap();
    assert_eq!(stats.counts.done, 1);
    assert_eq!(stats.average_turnaround, Some(25.0));
    assert_eq!(stats.next_entry_id, None);
}

#[tokio::test]
async fn no_show_can_be_reinstated() {
    let engine = engine().await;
    station(&engine, "Triage 1", StationType::Triage).await;
    let entry = queue_patient(&engine, 1, date(2025, 1, 15), time(9, 30)).await;

    let gone = engine.queue().mark_no_show(entry.id, Some(3)).await.unwrap();
    assert_eq!(gone.status, QueueStatus::NoShow);
    assert!(gone.time_completed.is_some());

    let back = engine.queue().reinstate(entry.id, Some(3)).await.unwrap();
    assert_eq!(back.status, QueueStatus::Waiting);
    assert_eq!(back.time_completed, None);
    assert_eq!(back.turnaround_time, None);

    let history = engine.queue().history(entry.id).await.unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[1].action, QueueAction::StatusChanged);
    assert_eq!(history[1].new_status, QueueStatus::NoShow);
    assert_eq!(history[2].action, QueueAction::Reinstated);
    assert_eq!(history[2].old_status, Some(QueueStatus::NoShow));
    assert_eq!(history[2].performed_by, Some(3));
}

#[tokio::test]
async fn ending_a_future_assignment_before_it_starts_is_rejected() {
    let engine = engine().await;
    let e1 = employee(&engine, "Ana Cruz").await;
    let s1 = station(&engine, "Triage 1", StationType::Triage).await;
    let schedule = assign(&engine, e1.id, s1.id, date(2025, 1, 25)).await;

    let err = engine
        .assignments()
        .remove(RemoveRequest {
            station_id: s1.id,
            effective_date: date(2025, 1, 20),
            mode: RemoveMode::EndAssignment,
            performed_by: Some(99),
        })
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidDateRange);

    let history = engine.assignments().schedules_for_station(s1.id).await.unwrap();
    assert_eq!(history, vec![schedule]);
}

#[tokio::test]
async fn assigning_a_deactivated_tuple_reactivates_it() {
    let engine = engine().await;
    let e1 = employee(&engine, "Ana Cruz").await;
    let s1 = station(&engine, "Triage 1", StationType::Triage).await;
    let original = assign(&engine, e1.id, s1.id, date(2025, 1, 10)).await;

    engine
        .assignments()
        .remove(RemoveRequest {
            station_id: s1.id,
            effective_date: date(2025, 1, 12),
            mode: RemoveMode::Deactivate,
            performed_by: None,
        })
        .await
        .unwrap();
    assert!(engine
        .assignments()
        .active_assignment_for(e1.id, date(2025, 1, 12))
        .await
        .unwrap()
        .is_none());

    let again = assign(&engine, e1.id, s1.id, date(2025, 1, 10)).await;
    assert_eq!(again.id, original.id);
    assert!(again.is_active);
    assert_eq!(engine.assignments().schedules_for_station(s1.id).await.unwrap().len(), 1);

    let actions: Vec<_> = engine
        .audit()
        .assignment_history(original.id)
        .await
        .unwrap()
        .into_iter()
        .map(|l| l.action)
        .collect();
    assert_eq!(
        actions,
        vec![
            AssignmentAction::Assigned,
            AssignmentAction::Deactivated,
            AssignmentAction::Reactivated
        ]
    );
}

#[tokio::test]
async fn other_facility_walk_ins_bypass_slots() {
    let engine = engine().await;
    station(&engine, "Triage 1", StationType::Triage).await;
    let appt = book(&engine, 1, OTHER_FACILITY, date(2025, 1, 15), time(8, 0)).await;

    let entry = engine
        .queue()
        .create(entry_request(1, Some(appt), PriorityLevel::Emergency))
        .await
        .unwrap();
    assert_eq!(entry.time_slot, None);
    assert_eq!(entry.queue_number, None);
    assert_eq!(entry.queue_code, None);
}

#[tokio::test]
async fn failed_audit_append_keeps_the_transition_and_is_reported() {
    let engine = engine().await;
    station(&engine, "Triage 1", StationType::Triage).await;
    let day = date(2025, 1, 15);
    let entry = queue_patient(&engine, 1, day, time(8, 0)).await;

    sqlx::query(
        "CREATE TRIGGER reject_queue_log BEFORE INSERT ON queue_log \
         BEGIN SELECT RAISE(ABORT, 'log store unavailable'); END",
    )
    .execute(engine.pool())
    .await
    .unwrap();

    let arrived = engine.queue().check_in(entry.id, None).await.unwrap();
    assert_eq!(arrived.status, QueueStatus::Arrived);
    assert_eq!(
        engine.queue().find_entry(entry.id).await.unwrap().status,
        QueueStatus::Arrived
    );
    let unlogged = queue_patient(&engine, 2, day, time(8, 5)).await;

    let report = engine.audit().integrity_check(Some(day)).await.unwrap();
    assert!(!report.is_clean());
    assert_eq!(report.entries_without_logs, vec![unlogged.id]);
    assert_eq!(report.status_mismatches.len(), 1);
    assert_eq!(report.status_mismatches[0].entry_id, entry.id);
    assert_eq!(report.status_mismatches[0].entry_status, QueueStatus::Arrived);
    assert_eq!(report.status_mismatches[0].logged_status, QueueStatus::Waiting);
    assert!(report.queue_chain.chain_intact);
}

#[tokio::test]
async fn call_next_with_empty_station_reports_no_patients() {
    let engine = engine().await;
    let triage = station(&engine, "Triage 1", StationType::Triage).await;

    let err = engine
        .queue()
        .call_next(triage.id, date(2025, 1, 15), None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::NoPatientsWaiting);
}
