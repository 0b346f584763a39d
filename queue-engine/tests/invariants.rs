//! Randomized operation sequences with fixed seeds, checked against the
//! engine's standing invariants

mod common;

use std::collections::{BTreeMap, HashMap};

use chrono::{Duration, NaiveDate};
use common::*;
use queue_engine::queue::QueueTransition;
use queue_engine::{EngineError, QueueEngine};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared::models::{
    AssignRequest, AssignmentSchedule, AssignmentType, PriorityLevel, QueueAction, QueueEntry, QueueStatus,
    ReassignRequest, RemoveMode, RemoveRequest, StationType,
};

const SEEDS: [u64; 3] = [7, 42, 2025];
const SHIFTS: [(u32, u32); 4] = [(8, 12), (12, 17), (8, 17), (13, 20)];

fn covers(schedule: &AssignmentSchedule, day: NaiveDate) -> bool {
    schedule.is_active && schedule.start_date <= day && schedule.end_date.is_none_or(|end| day <= end)
}

fn jan(rng: &mut StdRng) -> NaiveDate {
    date(2025, 1, rng.gen_range(1..=28))
}

/// Only domain errors are acceptable outcomes of a random operation
fn assert_domain_error(err: &EngineError) {
    assert!(!matches!(err, EngineError::Repo(_)), "storage error leaked: {:?}", err);
}

async fn random_assignment_ops(engine: &QueueEngine, rng: &mut StdRng, employees: &[i64], stations: &[i64]) {
    let scheduler = engine.assignments();
    for _ in 0..80 {
        let result = match rng.gen_range(0..10) {
            0..=4 => {
                let start = jan(rng);
                let (from, to) = SHIFTS[rng.gen_range(0..SHIFTS.len())];
                let end_date = if rng.gen_bool(0.4) {
                    Some(start + Duration::days(rng.gen_range(0..10)))
                } else {
                    None
                };
                scheduler
                    .assign(AssignRequest {
                        employee_id: employees[rng.gen_range(0..employees.len())],
                        station_id: stations[rng.gen_range(0..stations.len())],
                        start_date: start,
                        assignment_type: if rng.gen_bool(0.5) {
                            AssignmentType::Permanent
                        } else {
                            AssignmentType::Temporary
                        },
                        shift_start: time(from, 0),
                        shift_end: time(to, 0),
                        assigned_by: Some(1),
                        end_date,
                    })
                    .await
                    .map(|_| ())
            }
            5..=7 => scheduler
                .remove(RemoveRequest {
                    station_id: stations[rng.gen_range(0..stations.len())],
                    effective_date: jan(rng),
                    mode: if rng.gen_bool(0.5) {
                        RemoveMode::EndAssignment
                    } else {
                        RemoveMode::Deactivate
                    },
                    performed_by: Some(1),
                })
                .await
                .map(|_| ()),
            _ => scheduler
                .reassign(ReassignRequest {
                    station_id: stations[rng.gen_range(0..stations.len())],
                    new_employee_id: employees[rng.gen_range(0..employees.len())],
                    effective_date: jan(rng),
                    assigned_by: Some(1),
                })
                .await
                .map(|_| ()),
        };
        if let Err(err) = result {
            assert_domain_error(&err);
        }
    }
}

#[tokio::test]
async fn random_assignments_never_double_book() {
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let engine = engine().await;
        let mut employees = Vec::new();
        for name in ["Ana Cruz", "Ben Reyes", "Carla Lim", "Dan Uy"] {
            employees.push(employee(&engine, name).await.id);
        }
        let mut stations = Vec::new();
        for (name, kind) in [
            ("Triage 1", StationType::Triage),
            ("Triage 2", StationType::Triage),
            ("Consultation 1", StationType::Consultation),
        ] {
            stations.push(station(&engine, name, kind).await.id);
        }

        random_assignment_ops(&engine, &mut rng, &employees, &stations).await;

        let mut schedules = Vec::new();
        for &station_id in &stations {
            schedules.extend(engine.assignments().schedules_for_station(station_id).await.unwrap());
        }

        for day in (1..=31).map(|d| date(2025, 1, d)) {
            for &station_id in &stations {
                let occupants = schedules
                    .iter()
                    .filter(|s| s.station_id == station_id && covers(s, day))
                    .count();
                assert!(occupants <= 1, "seed {}: station {} double-booked on {}", seed, station_id, day);
            }

            for &employee_id in &employees {
                let bound: Vec<_> = schedules
                    .iter()
                    .filter(|s| s.employee_id == employee_id && covers(s, day))
                    .collect();
                for (i, a) in bound.iter().enumerate() {
                    for b in &bound[i + 1..] {
                        if a.station_id == b.station_id {
                            continue;
                        }
                        let overlap = a.shift_start < b.shift_end && b.shift_start < a.shift_end;
                        assert!(
                            !overlap,
                            "seed {}: employee {} bound to stations {} and {} on {}",
                            seed, employee_id, a.station_id, b.station_id, day
                        );
                    }
                }
            }
        }

        let report = engine.audit().integrity_check(None).await.unwrap();
        assert!(report.assignment_chain.chain_intact, "seed {}: {:?}", seed, report.assignment_chain);
    }
}

/// Run a transition through the public API
async fn drive(engine: &QueueEngine, entry_id: i64, transition: QueueTransition) -> Result<QueueEntry, EngineError> {
    let queue = engine.queue();
    match transition {
        QueueTransition::CheckIn => queue.check_in(entry_id, Some(1)).await,
        QueueTransition::Complete => queue.complete(entry_id, Some(1)).await,
        QueueTransition::Skip => queue.skip(entry_id, Some(1), Some("stepped out".into())).await,
        QueueTransition::NoShow => queue.mark_no_show(entry_id, Some(1)).await,
        QueueTransition::Cancel => queue.cancel(entry_id, "changed plans", None).await,
        QueueTransition::Reinstate => queue.reinstate(entry_id, Some(1)).await,
        QueueTransition::CallNext => unreachable!("call-next is station-scoped"),
    }
}

#[tokio::test]
async fn random_queue_activity_keeps_invariants() {
    let day = date(2025, 1, 15);
    let capacity = queue_engine::Config::for_tests().slot_capacity;

    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let engine = engine().await;
        let triage = station(&engine, "Triage 1", StationType::Triage).await;

        let mut model: BTreeMap<i64, QueueStatus> = BTreeMap::new();
        let mut slots: HashMap<i64, String> = HashMap::new();
        let mut patient = 0;

        for _ in 0..200 {
            match rng.gen_range(0..10) {
                0..=3 => {
                    patient += 1;
                    let hour = if rng.gen_bool(0.5) { 8 } else { 9 };
                    let appt = book(&engine, patient, PRIMARY_FACILITY, day, time(hour, rng.gen_range(0..60))).await;
                    let priority = match rng.gen_range(0..10) {
                        0 => PriorityLevel::Emergency,
                        1..=2 => PriorityLevel::Priority,
                        _ => PriorityLevel::Normal,
                    };
                    let slot = format!("{:02}A", hour);
                    let active = slots
                        .iter()
                        .filter(|(id, s)| **s == slot && model[*id] != QueueStatus::Cancelled)
                        .count() as i64;

                    match engine.queue().create(entry_request(patient, Some(appt), priority)).await {
                        Ok(entry) => {
                            assert!(active < capacity, "seed {}: slot {} over capacity", seed, slot);
                            assert_eq!(entry.status, QueueStatus::Waiting);
                            assert_eq!(entry.time_slot.as_deref(), Some(slot.as_str()));
                            model.insert(entry.id, entry.status);
                            slots.insert(entry.id, slot);
                        }
                        Err(EngineError::Capacity { .. }) => {
                            assert_eq!(active, capacity, "seed {}: slot {} rejected early", seed, slot);
                        }
                        Err(other) => panic!("seed {}: unexpected create error {:?}", seed, other),
                    }
                }
                4..=5 => match engine.queue().call_next(triage.id, day, Some(1)).await {
                    Ok(called) => {
                        let before = model[&called.id];
                        assert!(QueueTransition::CallNext.permits(before));
                        assert_eq!(called.status, QueueStatus::InProgress);
                        model.insert(called.id, called.status);
                    }
                    Err(err) => {
                        assert!(matches!(err, EngineError::NoPatientsWaiting { .. }));
                        assert!(!model.values().any(|s| QueueTransition::CallNext.permits(*s)));
                    }
                },
                _ => {
                    if model.is_empty() {
                        continue;
                    }
                    let ids: Vec<i64> = model.keys().copied().collect();
                    let entry_id = ids[rng.gen_range(0..ids.len())];
                    let transition = loop {
                        let t = QueueTransition::ALL[rng.gen_range(0..QueueTransition::ALL.len())];
                        if t != QueueTransition::CallNext {
                            break t;
                        }
                    };
                    let before = model[&entry_id];
                    match drive(&engine, entry_id, transition).await {
                        Ok(updated) => {
                            assert!(transition.permits(before), "seed {}: {:?} from {}", seed, transition, before);
                            assert!(before.can_transition_to(updated.status));
                            model.insert(entry_id, updated.status);
                        }
                        Err(EngineError::InvalidState { current, .. }) => {
                            assert!(!transition.permits(before));
                            assert_eq!(current, before);
                        }
                        Err(other) => panic!("seed {}: unexpected transition error {:?}", seed, other),
                    }
                }
            }
        }

        // Stored state matches the model and each trail is a path in the lifecycle graph
        for (&entry_id, &status) in &model {
            let stored = engine.queue().find_entry(entry_id).await.unwrap();
            assert_eq!(stored.status, status);

            let trail = engine.queue().history(entry_id).await.unwrap();
            assert_eq!(trail[0].action, QueueAction::Created);
            assert_eq!(trail[0].old_status, None);
            assert_eq!(trail[0].new_status, QueueStatus::Waiting);
            for pair in trail.windows(2) {
                assert_eq!(pair[1].old_status, Some(pair[0].new_status));
                assert!(pair[0].new_status.can_transition_to(pair[1].new_status));
            }
            assert_eq!(trail.last().unwrap().new_status, status);
            assert_eq!(
                trail.iter().filter(|l| l.action == QueueAction::Created).count(),
                1
            );
        }

        // Numbers per slot are unique and contiguous from 1
        for slot in ["08A", "09A"] {
            let mut numbers = Vec::new();
            let mut active = 0;
            for (id, s) in &slots {
                if s != slot {
                    continue;
                }
                let entry = engine.queue().find_entry(*id).await.unwrap();
                numbers.push(entry.queue_number.unwrap());
                if entry.status != QueueStatus::Cancelled {
                    active += 1;
                }
            }
            numbers.sort_unstable();
            let expected: Vec<i64> = (1..=numbers.len() as i64).collect();
            assert_eq!(numbers, expected, "seed {}: slot {}", seed, slot);
            assert!(active <= capacity);
        }

        let report = engine.audit().integrity_check(Some(day)).await.unwrap();
        assert!(report.is_clean(), "seed {}: {:?}", seed, report);
    }
}

#[tokio::test]
async fn call_next_serves_by_priority_then_slot_then_number() {
    let day = date(2025, 1, 15);
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let engine = engine().await;
        let triage = station(&engine, "Triage 1", StationType::Triage).await;

        let mut expected = Vec::new();
        for patient in 1..=15 {
            let hour = if rng.gen_bool(0.5) { 10 } else { 14 };
            let appt = book(&engine, patient, PRIMARY_FACILITY, day, time(hour, rng.gen_range(0..60))).await;
            let priority = match rng.gen_range(0..3) {
                0 => PriorityLevel::Emergency,
                1 => PriorityLevel::Priority,
                _ => PriorityLevel::Normal,
            };
            let entry = engine
                .queue()
                .create(entry_request(patient, Some(appt), priority))
                .await
                .unwrap();
            expected.push((std::cmp::Reverse(priority), hour, entry.queue_number, entry.id));
        }
        expected.sort();

        for (_, _, _, id) in expected {
            let called = engine.queue().call_next(triage.id, day, None).await.unwrap();
            assert_eq!(called.id, id, "seed {}", seed);
            engine.queue().complete(called.id, None).await.unwrap();
        }
    }
}
